use serde::{Deserialize, Serialize};

use std::num::NonZeroUsize;

/// Strategy used to pick the parent of the
/// next generation among a scored generation's members.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParentSelection {
    /// The member with the highest fitness.
    Champion,
    /// The fittest of `size` members drawn
    /// uniformly at random, with replacement.
    Tournament { size: NonZeroUsize },
}

/// Configuration data for successive generations.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EvolutionConfig {
    /// Number of agents in each generation.
    pub population_size: NonZeroUsize,
    /// Whether each agent is scored on a worker
    /// thread of its own, or inline one after another.
    pub threaded: bool,
    /// How the parent of each generation is chosen.
    pub selection: ParentSelection,
}

impl EvolutionConfig {
    /// Returns a "zero-valued" default configuration:
    /// a single unthreaded agent per generation, bred
    /// from the previous generation's champion.
    ///
    /// # Note
    /// This value is not suitable for use in most experiments.
    /// It is meant as a way to abbreviate configuration
    /// instantiation, or to fill in unused values.
    ///
    /// # Examples
    /// ```
    /// use nnt::evolution::EvolutionConfig;
    /// use std::num::NonZeroUsize;
    ///
    /// let config = EvolutionConfig {
    ///     population_size: NonZeroUsize::new(24).unwrap(),
    ///     threaded: true,
    ///     ..EvolutionConfig::zero()
    /// };
    /// ```
    pub const fn zero() -> EvolutionConfig {
        EvolutionConfig {
            population_size: NonZeroUsize::MIN,
            threaded: false,
            selection: ParentSelection::Champion,
        }
    }
}
