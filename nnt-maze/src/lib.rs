//! # nnt-maze
//! A maze-navigation implementation of the `nnt` crate's `Scorable` trait.
//!
//! Provides:
//! - [`Grid`]: an editable grid of cells, with a plain-text format.
//! - [`Maze`]: a validated maze, with exactly one start and one goal.
//! - [`Mazer`]: a scorer steering networks from the start towards the goal.
//! - [`Playback`]: a stoppable, interval-driven replay of a network's walk.
//!
//! [`Grid`]: crate::grid::Grid
//! [`Maze`]: crate::maze::Maze
//! [`Mazer`]: crate::mazer::Mazer
//! [`Playback`]: crate::replay::Playback
//!
//! # Example usage: Evolution of a maze solver
//! ```
//! use nnt::evolution::{Evolution, EvolutionConfig};
//! use nnt::networks::NetworkSettings;
//! use nnt_maze::maze::Maze;
//! use nnt_maze::mazer::{Mazer, MazerConfig};
//! use std::num::NonZeroUsize;
//!
//! const MAZE: &str = "
//! S.#.....
//! ..#.##.#
//! .##..#..
//! ....#..G
//! ";
//!
//! fn main() {
//!     let maze: Maze = MAZE.parse().unwrap();
//!     let settings = Mazer::network_settings(NetworkSettings {
//!         hidden_layer_count: NonZeroUsize::new(2).unwrap(),
//!         hidden_layer_size: NonZeroUsize::new(5).unwrap(),
//!         mutation_rate: 0.25,
//!         ..NetworkSettings::zero()
//!     });
//!     let config = EvolutionConfig {
//!         population_size: NonZeroUsize::new(24).unwrap(),
//!         threaded: true,
//!         ..EvolutionConfig::zero()
//!     };
//!     let mazer = Mazer::new(MazerConfig { max_steps: 64 });
//!
//!     let mut evolution = Evolution::new(settings, config, mazer, maze).unwrap();
//!     for _ in 0..50 {
//!         if let Err(e) = evolution.advance() {
//!             eprintln!("{}", e);
//!             break;
//!         }
//!         let champion = evolution.champion().unwrap();
//!         if champion.fitness() >= 1.0 {
//!             println!("Goal reached by {}: {:?}", champion.name(), champion.scorer().path());
//!             break;
//!         }
//!     }
//! }
//! ```

mod errors;
pub mod grid;
pub mod maze;
pub mod mazer;
pub mod replay;

pub use errors::MazeError;
