use crate::agents::{AgentError, ScoringError};
use crate::networks::{ConfigError, NetworkError};

use std::error::Error;
use std::fmt;

/// An error type indicating a failure to
/// set up or advance an evolution run.
#[derive(Debug)]
pub enum EvolutionError {
    /// The network settings are invalid.
    Config(ConfigError),
    /// The environment was rejected by the scorer.
    InvalidEnvironment(ScoringError),
    /// A network could not be built.
    Network(NetworkError),
    /// An agent could not be started.
    Agent(AgentError),
}

impl fmt::Display for EvolutionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "invalid network settings: {}", e),
            Self::InvalidEnvironment(e) => write!(f, "invalid environment: {}", e),
            Self::Network(e) => write!(f, "network construction failed: {}", e),
            Self::Agent(e) => write!(f, "generation could not be scored: {}", e),
        }
    }
}

impl Error for EvolutionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::InvalidEnvironment(e) => Some(e.as_ref()),
            Self::Network(e) => Some(e),
            Self::Agent(e) => Some(e),
        }
    }
}

impl From<ConfigError> for EvolutionError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<NetworkError> for EvolutionError {
    fn from(e: NetworkError) -> Self {
        Self::Network(e)
    }
}

impl From<AgentError> for EvolutionError {
    fn from(e: AgentError) -> Self {
        Self::Agent(e)
    }
}
