use std::error::Error;
use std::fmt;

/// An error type indicating a network
/// was used inconsistently with its topology.
#[derive(Debug, Clone, PartialEq)]
pub enum NetworkError {
    /// The input sample's length does not match the
    /// size of the input layer.
    InvalidInput { expected: usize, actual: usize },
    /// Weights were inherited from a parent whose
    /// layer sizes differ from the child's.
    StructuralMismatch {
        expected: Vec<usize>,
        actual: Vec<usize>,
    },
    /// The number of weights supplied does not
    /// match the number of connections.
    WeightCount { expected: usize, actual: usize },
}

/// An error type indicating invalid network settings.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// The mutation rate is not a finite value in [0.0, 1.0].
    MutationRateOutOfRange(f64),
}

impl fmt::Display for NetworkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidInput { expected, actual } => write!(
                f,
                "input sample of size {} does not match input layer of size {}",
                actual, expected
            ),
            Self::StructuralMismatch { expected, actual } => write!(
                f,
                "parent network with layer sizes {:?} does not match child layer sizes {:?}",
                actual, expected
            ),
            Self::WeightCount { expected, actual } => write!(
                f,
                "{} weights supplied for a network with {} connections",
                actual, expected
            ),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MutationRateOutOfRange(rate) => {
                write!(f, "mutation rate {} is outside of [0, 1]", rate)
            }
        }
    }
}

impl Error for NetworkError {}
impl Error for ConfigError {}
