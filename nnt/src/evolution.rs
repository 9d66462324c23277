//! An Evolution run breeds successive generations of
//! agents. Generation 0 is randomly initialized; every later
//! generation is mutated from a parent picked among the
//! previous generation's members.
//!
//! Generations are strictly sequential: each one is fully
//! scored before the next is built.
mod config;
mod errors;
mod generation;
pub mod logging;

pub use config::{EvolutionConfig, ParentSelection};
pub use errors::EvolutionError;
pub use generation::Generation;

use crate::agents::{Agent, Scorable};
use crate::networks::NetworkSettings;

use log::info;
use rand::Rng;

use std::sync::Arc;

/// An evolution run over a fixed environment.
pub struct Evolution<S: Scorable> {
    settings: Arc<NetworkSettings>,
    config: EvolutionConfig,
    scorer: S,
    environment: S::Environment,
    generation: Option<Generation<S>>,
    generation_count: usize,
}

impl<S> Evolution<S>
where
    S: Scorable + Clone + Send,
    S::Environment: Sync,
{
    /// Creates a new run. No generation exists until
    /// the first call to [`advance`].
    ///
    /// Every agent gets its own clone of `scorer`, and is
    /// scored against `environment`.
    ///
    /// # Errors
    /// Returns an error if the network settings are invalid,
    /// or if `scorer` rejects the environment.
    ///
    /// [`advance`]: Evolution::advance
    pub fn new(
        settings: NetworkSettings,
        config: EvolutionConfig,
        scorer: S,
        environment: S::Environment,
    ) -> Result<Evolution<S>, EvolutionError> {
        settings.validate()?;
        S::validate_environment(&environment).map_err(EvolutionError::InvalidEnvironment)?;
        Ok(Evolution {
            settings: Arc::new(settings),
            config,
            scorer,
            environment,
            generation: None,
            generation_count: 0,
        })
    }

    /// Builds and scores the next generation, blocking
    /// until all of its members are done.
    ///
    /// The first call creates generation 0 from random
    /// weights. Each later call selects a parent from the
    /// current generation, and mutates its network for every
    /// member of the next one, which then replaces it.
    ///
    /// # Errors
    /// Returns an error if an agent could not be started. The
    /// current generation is left unchanged in that case.
    pub fn advance(&mut self) -> Result<&Generation<S>, EvolutionError> {
        self.advance_with(&mut rand::thread_rng())
    }

    /// Like [`advance`], drawing all randomness from `rng`.
    ///
    /// [`advance`]: Evolution::advance
    pub fn advance_with<R: Rng>(&mut self, rng: &mut R) -> Result<&Generation<S>, EvolutionError> {
        let parent = self
            .generation
            .as_ref()
            .map(|g| g.select_parent(self.config.selection, rng));
        if let Some(parent) = parent {
            info!("breeding from {} @ {:.2} fit", parent.name(), parent.fitness());
        }

        let mut next = Generation::new(
            self.generation_count,
            self.config.population_size,
            &self.settings,
            parent.map(Agent::network),
            &self.scorer,
            rng,
        )?;
        next.start(&self.environment, self.config.threaded)?;

        let champion = next.champion();
        info!(
            "generation {} done, champion {} @ {:.2} fit",
            next.index(),
            champion.name(),
            champion.fitness()
        );
        self.generation_count += 1;
        Ok(self.generation.insert(next))
    }

    /// Advances `count` generations.
    pub fn advance_by(&mut self, count: usize) -> Result<(), EvolutionError> {
        for _ in 0..count {
            self.advance()?;
        }
        Ok(())
    }
}

impl<S: Scorable> Evolution<S> {
    /// Returns the most recently scored generation.
    pub fn generation(&self) -> Option<&Generation<S>> {
        self.generation.as_ref()
    }

    /// Returns the number of generations scored so far.
    pub fn generation_count(&self) -> usize {
        self.generation_count
    }

    /// Returns the current generation's members,
    /// sorted by decreasing fitness.
    pub fn ranked(&self) -> Vec<&Agent<S>> {
        self.generation.as_ref().map(Generation::ranked).unwrap_or_default()
    }

    /// Returns the current generation's champion.
    pub fn champion(&self) -> Option<&Agent<S>> {
        self.generation.as_ref().map(Generation::champion)
    }

    /// Returns the environment agents are scored against.
    pub fn environment(&self) -> &S::Environment {
        &self.environment
    }

    /// Returns the shared network settings.
    pub fn settings(&self) -> &Arc<NetworkSettings> {
        &self.settings
    }

    /// Returns the run's configuration.
    pub fn config(&self) -> &EvolutionConfig {
        &self.config
    }

    /// Discards every generation, so that the next
    /// advance starts over from random weights.
    pub fn reset(&mut self) {
        self.generation = None;
        self.generation_count = 0;
    }
}
