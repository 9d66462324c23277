use nnt::evolution::logging::{EvolutionLogger, ReportingLevel, Stats};
use nnt::evolution::{Evolution, EvolutionConfig};
use nnt::networks::{ActivationType, NetworkSettings};
use nnt_maze::maze::Maze;
use nnt_maze::mazer::{Mazer, MazerConfig};
use nnt_maze::replay::Playback;

use log::{error, info};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use std::env;
use std::error::Error;
use std::fs;
use std::num::NonZeroUsize;
use std::process;
use std::sync::Arc;
use std::time::Duration;

const DEFAULT_MAZE: &str = "
S..#......
.#.#.####.
.#...#....
.#####.##.
.....#..#.
####.##.#.
.......#.G
";

/// Run settings, read from a RON file. Missing
/// fields take their default values.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
struct RunConfig {
    hidden_layer_count: NonZeroUsize,
    hidden_layer_size: NonZeroUsize,
    mutation_rate: f64,
    activation: ActivationType,
    evolution: EvolutionConfig,
    mazer: MazerConfig,
    /// Maximum number of generations per run.
    generations: usize,
    /// Delay between replayed steps, in milliseconds.
    replay_interval_ms: u64,
    /// Number of independent runs to gather statistics
    /// over. 0 runs once and replays the champion.
    trials: usize,
}

impl Default for RunConfig {
    fn default() -> RunConfig {
        RunConfig {
            hidden_layer_count: NonZeroUsize::new(2).unwrap(),
            hidden_layer_size: NonZeroUsize::new(5).unwrap(),
            mutation_rate: 0.2,
            activation: ActivationType::Sigmoid,
            evolution: EvolutionConfig {
                population_size: NonZeroUsize::new(24).unwrap(),
                threaded: true,
                ..EvolutionConfig::zero()
            },
            mazer: MazerConfig::zero(),
            generations: 200,
            replay_interval_ms: 150,
            trials: 0,
        }
    }
}

impl RunConfig {
    fn network_settings(&self) -> NetworkSettings {
        Mazer::network_settings(NetworkSettings {
            hidden_layer_count: self.hidden_layer_count,
            hidden_layer_size: self.hidden_layer_size,
            mutation_rate: self.mutation_rate,
            activation: self.activation,
            ..NetworkSettings::zero()
        })
    }

    fn evolution(&self, maze: Maze) -> Result<Evolution<Mazer>, Box<dyn Error>> {
        Ok(Evolution::new(
            self.network_settings(),
            self.evolution.clone(),
            Mazer::new(self.mazer),
            maze,
        )?)
    }
}

fn main() {
    env_logger::init();
    if let Err(e) = run() {
        eprintln!("{}", e);
        process::exit(1);
    }
}

/// Usage: `maze [MAZE_FILE] [CONFIG_FILE]`
fn run() -> Result<(), Box<dyn Error>> {
    let mut args = env::args().skip(1);
    let maze: Maze = match args.next() {
        Some(path) => fs::read_to_string(path)?.parse()?,
        None => DEFAULT_MAZE.parse()?,
    };
    let config: RunConfig = match args.next() {
        Some(path) => ron::from_str(&fs::read_to_string(path)?)?,
        None => RunConfig::default(),
    };
    info!("loaded {}x{} maze", maze.width(), maze.height());

    if config.trials > 0 {
        stress_test(&maze, &config).map(drop)
    } else {
        evolve(maze, &config)
    }
}

/// Evolves mazers until one reaches the goal, then replays it.
fn evolve(maze: Maze, config: &RunConfig) -> Result<(), Box<dyn Error>> {
    let mut evolution = config.evolution(maze)?;
    let mut logger = EvolutionLogger::new(ReportingLevel::Summary);

    for _ in 0..config.generations {
        let generation = evolution.advance()?;
        println!("Generation {}", generation.index());
        for agent in generation.ranked() {
            println!("\t{} @ {:.3} fit", agent.name(), agent.fitness());
        }
        let solved = generation.champion().fitness() >= 1.0;
        logger.log(&evolution);
        if solved {
            break;
        }
    }
    if let Some(log) = logger.last() {
        println!("{}", log);
    }

    let champion = evolution.champion().ok_or("no generation was evolved")?;
    println!("Replaying {} @ {:.3} fit", champion.name(), champion.fitness());
    let maze = Arc::new(evolution.environment().clone());
    let view = Arc::clone(&maze);
    let playback = Playback::spawn(
        champion.network().clone(),
        maze,
        config.mazer,
        Duration::from_millis(config.replay_interval_ms),
        move |position| println!("{}", view.render_with(position)),
    )?;
    let outcome = playback.join().map_err(|_| "playback panicked")?;
    println!("Replay ended: {:?}", outcome);
    Ok(())
}

/// Runs independent evolutions in parallel, and reports
/// how many generations successful runs took. Returns each
/// run's result, as given by [`solve`].
fn stress_test(maze: &Maze, config: &RunConfig) -> Result<Vec<Option<usize>>, Box<dyn Error>> {
    // Surface configuration errors once, rather than once per trial.
    config.evolution(maze.clone())?;

    let generations: Vec<Option<usize>> = (0..config.trials)
        .into_par_iter()
        .map(|_| solve(maze.clone(), config))
        .collect();

    let failures = generations.iter().filter(|g| g.is_none()).count();
    println!(
        "Successful run generation count {:?}, {}% failure rate over {} iterations",
        Stats::from_values(generations.iter().flatten().map(|&g| g as f64)),
        failures as f64 * 100.0 / config.trials as f64,
        config.trials
    );
    Ok(generations)
}

/// Returns the index of the first generation
/// that reached the goal, if any did.
fn solve(maze: Maze, config: &RunConfig) -> Option<usize> {
    let mut evolution = config.evolution(maze).ok()?;
    for _ in 0..config.generations {
        match evolution.advance() {
            Ok(generation) if generation.champion().fitness() >= 1.0 => {
                return Some(generation.index());
            }
            Ok(_) => {}
            Err(e) => {
                error!("{}", e);
                return None;
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use nnt::evolution::ParentSelection;
    use std::path::Path;

    fn quick(trials: usize) -> RunConfig {
        RunConfig {
            evolution: EvolutionConfig {
                population_size: NonZeroUsize::new(6).unwrap(),
                ..EvolutionConfig::zero()
            },
            generations: 4,
            trials,
            ..RunConfig::default()
        }
    }

    #[test]
    fn shipped_files_parse() {
        let root = Path::new(env!("CARGO_MANIFEST_DIR"));
        let config: RunConfig = ron::from_str(&fs::read_to_string(root.join("config.ron")).unwrap()).unwrap();
        assert_eq!(config.generations, 300);
        assert_eq!(
            config.evolution.selection,
            ParentSelection::Tournament {
                size: NonZeroUsize::new(4).unwrap()
            }
        );

        let mut parsed = 0;
        for entry in fs::read_dir(root.join("mazes")).unwrap() {
            let path = entry.unwrap().path();
            if path.extension().map_or(false, |e| e == "txt") {
                let maze: Maze = fs::read_to_string(&path).unwrap().parse().unwrap();
                assert!(config.evolution(maze).is_ok(), "{}", path.display());
                parsed += 1;
            }
        }
        assert_eq!(parsed, 3);
        assert!(DEFAULT_MAZE.parse::<Maze>().is_ok());
    }

    #[test]
    fn missing_fields_take_defaults() {
        let config: RunConfig = ron::from_str("(hidden_layer_count: 3, mutation_rate: 0.5, trials: 7)").unwrap();
        let defaults = RunConfig::default();
        assert_eq!(config.hidden_layer_count.get(), 3);
        assert_eq!(config.mutation_rate, 0.5);
        assert_eq!(config.trials, 7);
        assert_eq!(config.hidden_layer_size, defaults.hidden_layer_size);
        assert_eq!(config.activation, defaults.activation);
        assert_eq!(config.evolution, defaults.evolution);
        assert_eq!(config.mazer, defaults.mazer);
        assert_eq!(config.generations, defaults.generations);
        assert_eq!(config.replay_interval_ms, defaults.replay_interval_ms);

        let settings = config.network_settings();
        assert_eq!(settings.input_count.get(), nnt_maze::mazer::INPUT_COUNT);
        assert_eq!(settings.output_count.get(), nnt_maze::mazer::OUTPUT_COUNT);
    }

    #[test]
    fn stress_test_rejects_invalid_config() {
        let maze: Maze = DEFAULT_MAZE.parse().unwrap();
        let config = RunConfig {
            mutation_rate: 2.0,
            ..quick(1000)
        };
        let e = stress_test(&maze, &config).unwrap_err();
        assert!(e.to_string().contains("mutation rate"), "{}", e);
    }

    #[test]
    fn stress_test_runs_every_trial() {
        let maze: Maze = "S..\n.#G".parse().unwrap();
        let config = quick(5);
        let generations = stress_test(&maze, &config).unwrap();
        assert_eq!(generations.len(), 5);
        assert!(generations.iter().flatten().all(|&g| g < config.generations));
    }
}
