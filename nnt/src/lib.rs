//! Fixed-topology feedforward neural networks, evolved by
//! weight mutation alone.
//!
//! Every generation is a population of [`Agent`]s, each owning
//! a [`Network`] and a domain-specific scorer implementing
//! [`Scorable`]. A generation's agents are scored concurrently,
//! one worker thread each, and the generation completes once all
//! of them are done. The next generation is then mutated from a
//! single parent picked among them.
//!
//! A maze-navigation implementation of [`Scorable`] is supplied
//! by the `nnt-maze` crate.
//!
//! [`Agent`]: agents::Agent
//! [`Network`]: networks::Network
//! [`Scorable`]: agents::Scorable
//!
//! # Example usage: Evolution of a constant approximator
//! ```
//! use nnt::agents::{Scorable, ScoringError};
//! use nnt::evolution::{Evolution, EvolutionConfig};
//! use nnt::networks::{Network, NetworkSettings};
//! use std::num::NonZeroUsize;
//!
//! // Rewards networks whose output lies close to the target.
//! #[derive(Clone)]
//! struct Approximator;
//!
//! impl Scorable for Approximator {
//!     type Environment = f64;
//!
//!     fn score(&mut self, network: &mut Network, target: &f64) -> Result<f64, ScoringError> {
//!         let output = network.evaluate(&[1.0, 0.0])?[0];
//!         Ok(1.0 - (output - target).abs())
//!     }
//! }
//!
//! fn main() {
//!     let settings = NetworkSettings {
//!         input_count: NonZeroUsize::new(2).unwrap(),
//!         hidden_layer_count: NonZeroUsize::new(2).unwrap(),
//!         hidden_layer_size: NonZeroUsize::new(3).unwrap(),
//!         mutation_rate: 0.2,
//!         ..NetworkSettings::zero()
//!     };
//!     let config = EvolutionConfig {
//!         population_size: NonZeroUsize::new(12).unwrap(),
//!         threaded: true,
//!         ..EvolutionConfig::zero()
//!     };
//!
//!     let mut evolution = Evolution::new(settings, config, Approximator, 0.75).unwrap();
//!     for _ in 0..20 {
//!         if let Err(e) = evolution.advance() {
//!             eprintln!("{}", e);
//!             break;
//!         }
//!     }
//!
//!     let champion = evolution.champion().unwrap();
//!     println!("{} @ {:.3} fit", champion.name(), champion.fitness());
//!     assert!(champion.fitness() <= 1.0);
//! }
//! ```

pub mod agents;
pub mod evolution;
pub mod networks;
