use std::error::Error;
use std::fmt;
use std::io;

/// An error type indicating an agent
/// could not be started.
#[derive(Debug)]
pub enum AgentError {
    /// The agent has already been started once.
    AlreadyStarted(String),
    /// The agent's worker thread could not be spawned.
    Spawn { name: String, source: io::Error },
}

impl fmt::Display for AgentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyStarted(name) => write!(f, "agent {} was already started", name),
            Self::Spawn { name, source } => {
                write!(f, "failed to spawn worker for agent {}: {}", name, source)
            }
        }
    }
}

impl Error for AgentError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::AlreadyStarted(_) => None,
            Self::Spawn { source, .. } => Some(source),
        }
    }
}
