use super::{Evolution, Generation};
use crate::agents::Scorable;
use crate::networks::Network;

use std::fmt;

/// Defines different possible reporting levels for logging.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReportingLevel {
    /// Clones the champion's network.
    Champion,
    /// Clones no networks.
    Summary,
}

/// A snapshot of a scored generation.
#[derive(Clone, Debug)]
pub struct Log {
    pub generation_number: usize,
    pub champion_name: String,
    pub champion_fitness: f64,
    pub champion_network: Option<Network>,
    /// Statistics over the finite fitnesses, if any.
    pub fitness: Option<Stats>,
    /// Members whose scoring failed.
    pub failures: usize,
}

impl fmt::Display for Log {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Log {{\n\
            \tgeneration_number: {:?}\n\
            \tchampion: {} @ {:.2}\n\
            \tfitness: {:?}\n\
            \tfailures: {:?}\n\
            }}",
            &self.generation_number,
            &self.champion_name,
            &self.champion_fitness,
            &self.fitness,
            &self.failures
        )
    }
}

/// A struct for reporting basic statistical data.
#[derive(Clone, Debug, PartialEq)]
pub struct Stats {
    pub maximum: f64,
    pub minimum: f64,
    pub mean: f64,
    pub median: f64,
}

impl Stats {
    /// Returns statistics about the finite numbers in a
    /// sequence, or `None` if there are none.
    ///
    /// # Examples
    /// ```
    /// use nnt::evolution::logging::Stats;
    ///
    /// let stats = Stats::from_values([-2.0, -1.0, 0.5, 1.0, 1.5, f64::NEG_INFINITY]).unwrap();
    /// assert_eq!(stats.maximum, 1.5);
    /// assert_eq!(stats.minimum, -2.0);
    /// assert_eq!(stats.mean, 0.0);
    /// assert_eq!(stats.median, 0.5);
    ///
    /// assert!(Stats::from_values([f64::NAN]).is_none());
    /// ```
    pub fn from_values(data: impl IntoIterator<Item = f64>) -> Option<Stats> {
        let mut data: Vec<f64> = data.into_iter().filter(|d| d.is_finite()).collect();
        if data.is_empty() {
            return None;
        }
        data.sort_unstable_by(f64::total_cmp);
        let mid = data.len() / 2;
        let median = if data.len() % 2 == 0 {
            (data[mid - 1] + data[mid]) / 2.0
        } else {
            data[mid]
        };
        Some(Stats {
            maximum: data[data.len() - 1],
            minimum: data[0],
            mean: data.iter().sum::<f64>() / data.len() as f64,
            median,
        })
    }
}

/// A log of the evolution of a run over time.
#[derive(Clone, Debug)]
pub struct EvolutionLogger {
    reporting_level: ReportingLevel,
    logs: Vec<Log>,
}

impl EvolutionLogger {
    /// Returns a logger with the appropiate reporting level.
    ///
    /// # Examples
    /// ```
    /// use nnt::evolution::logging::{EvolutionLogger, ReportingLevel};
    ///
    /// let logger = EvolutionLogger::new(ReportingLevel::Summary);
    /// assert_eq!(logger.iter().count(), 0);
    /// ```
    pub fn new(reporting_level: ReportingLevel) -> EvolutionLogger {
        EvolutionLogger {
            reporting_level,
            logs: vec![],
        }
    }

    /// Stores a snapshot of the run's current generation.
    /// Does nothing if no generation has been scored yet.
    pub fn log<S: Scorable>(&mut self, evolution: &Evolution<S>) {
        if let Some(generation) = evolution.generation() {
            self.log_generation(generation);
        }
    }

    /// Stores a snapshot of a scored generation.
    pub fn log_generation<S: Scorable>(&mut self, generation: &Generation<S>) {
        let champion = generation.champion();
        let fitnesses = generation.members().iter().map(|a| a.fitness());
        self.logs.push(Log {
            generation_number: generation.index(),
            champion_name: champion.name().to_owned(),
            champion_fitness: champion.fitness(),
            champion_network: match self.reporting_level {
                ReportingLevel::Champion => Some(champion.network().clone()),
                ReportingLevel::Summary => None,
            },
            fitness: Stats::from_values(fitnesses.clone()),
            failures: fitnesses.filter(|f| !f.is_finite()).count(),
        })
    }

    /// Iterate over all logged snapshots.
    pub fn iter(&self) -> impl Iterator<Item = &Log> {
        self.logs.iter()
    }

    /// Returns the most recent snapshot.
    pub fn last(&self) -> Option<&Log> {
        self.logs.last()
    }
}
