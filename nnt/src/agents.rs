//! An Agent is the scoring subject of evolution: a network
//! plus the domain logic that turns the network's decisions
//! into a fitness value.
//!
//! Domain logic is supplied by implementing [`Scorable`].
//! Agents are scored exactly once, either inline or on a
//! worker thread of their own, and report completion through
//! a shared [`CompletionBarrier`].
mod barrier;
mod errors;

pub use barrier::CompletionBarrier;
pub use errors::AgentError;

use crate::networks::Network;

use log::{debug, error, warn};

use std::error::Error;
use std::panic::{self, AssertUnwindSafe};
use std::thread::{self, Scope};

/// Fitness assigned to agents whose scoring failed.
pub const WORST_FITNESS: f64 = f64::NEG_INFINITY;

/// Error type returned by scoring routines.
pub type ScoringError = Box<dyn Error + Send + Sync>;

/// An interface for domain logic that scores networks.
///
/// Each agent owns its own scorer, so implementors may
/// keep per-agent state (e.g. a record of the last run).
pub trait Scorable {
    /// Shared, read-only data every agent is scored against.
    type Environment;

    /// Drives `network` through the environment and
    /// returns its fitness. Higher is better.
    fn score(
        &mut self,
        network: &mut Network,
        environment: &Self::Environment,
    ) -> Result<f64, ScoringError>;

    /// Checks that `environment` can be scored against.
    /// Called before any generation is built.
    fn validate_environment(_environment: &Self::Environment) -> Result<(), ScoringError> {
        Ok(())
    }
}

/// Lifecycle of an agent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AgentState {
    /// Not yet started.
    Idle,
    /// Scoring is in progress.
    Running,
    /// Scoring has finished and the fitness is final.
    Done,
}

/// A network paired with the scorer that evaluates it.
#[derive(Clone, Debug)]
pub struct Agent<S> {
    name: String,
    network: Network,
    scorer: S,
    fitness: f64,
    state: AgentState,
}

impl<S: Scorable> Agent<S> {
    /// Creates an idle agent owning `network` and `scorer`.
    pub fn new(name: impl Into<String>, network: Network, scorer: S) -> Agent<S> {
        Agent {
            name: name.into(),
            network,
            scorer,
            fitness: WORST_FITNESS,
            state: AgentState::Idle,
        }
    }

    /// Scores the agent on the calling thread and
    /// returns its fitness.
    ///
    /// A scoring routine that fails, panics, or returns NaN
    /// doesn't propagate; the agent is given [`WORST_FITNESS`].
    ///
    /// # Errors
    /// Returns an error if the agent was already started.
    pub fn run(&mut self, environment: &S::Environment) -> Result<f64, AgentError> {
        self.claim()?;
        Ok(self.finish(environment))
    }

    /// Starts scoring the agent, and calls [`CompletionBarrier::arrive`]
    /// on `barrier` once finished.
    ///
    /// If `threaded`, scoring runs on a new worker thread of
    /// `scope`, named after the agent, and this returns
    /// immediately. Otherwise scoring runs inline and this
    /// returns once it is done.
    ///
    /// # Errors
    /// Returns an error if the agent was already started, or
    /// its worker thread could not be spawned. In both cases
    /// `barrier` is not arrived at. An agent whose worker could
    /// not be spawned is done, with [`WORST_FITNESS`].
    pub fn start<'scope, 'env: 'scope>(
        &'scope mut self,
        scope: &'scope Scope<'scope, 'env>,
        environment: &'scope S::Environment,
        barrier: &'scope CompletionBarrier,
        threaded: bool,
    ) -> Result<(), AgentError>
    where
        S: Send,
        S::Environment: Sync,
    {
        self.claim()?;
        if !threaded {
            self.finish(environment);
            barrier.arrive();
            return Ok(());
        }

        let name = self.name.clone();
        let claimed = Claimed(self);
        thread::Builder::new()
            .name(name.clone())
            .spawn_scoped(scope, move || {
                let mut claimed = claimed;
                claimed.0.finish(environment);
                barrier.arrive();
            })
            .map(drop)
            .map_err(|source| AgentError::Spawn { name, source })
    }

    fn claim(&mut self) -> Result<(), AgentError> {
        match self.state {
            AgentState::Idle => {
                self.state = AgentState::Running;
                Ok(())
            }
            _ => Err(AgentError::AlreadyStarted(self.name.clone())),
        }
    }

    fn finish(&mut self, environment: &S::Environment) -> f64 {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            self.scorer.score(&mut self.network, environment)
        }));
        self.fitness = match outcome {
            Ok(Ok(fitness)) if !fitness.is_nan() => fitness,
            Ok(Ok(_)) => {
                warn!("{} scored a NaN fitness", self.name);
                WORST_FITNESS
            }
            Ok(Err(e)) => {
                warn!("{} failed to score: {}", self.name, e);
                WORST_FITNESS
            }
            Err(_) => {
                error!("{} panicked while scoring", self.name);
                WORST_FITNESS
            }
        };
        self.state = AgentState::Done;
        debug!("{} done @ {:.2} fit", self.name, self.fitness);
        self.fitness
    }
}

/// A started agent, given up on with [`WORST_FITNESS`]
/// if dropped before it was scored.
struct Claimed<'a, S>(&'a mut Agent<S>);

impl<S> Drop for Claimed<'_, S> {
    fn drop(&mut self) {
        let agent = &mut *self.0;
        if agent.state == AgentState::Running {
            warn!("{} was never scored", agent.name);
            agent.fitness = WORST_FITNESS;
            agent.state = AgentState::Done;
        }
    }
}

impl<S> Agent<S> {
    /// Returns the agent's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the agent's network.
    pub fn network(&self) -> &Network {
        &self.network
    }

    /// Returns the agent's scorer.
    pub fn scorer(&self) -> &S {
        &self.scorer
    }

    /// Returns the agent's fitness, which is
    /// [`WORST_FITNESS`] until scoring is done.
    pub fn fitness(&self) -> f64 {
        self.fitness
    }

    /// Returns the agent's lifecycle state.
    pub fn state(&self) -> AgentState {
        self.state
    }

    /// Returns whether scoring has finished.
    pub fn is_done(&self) -> bool {
        self.state == AgentState::Done
    }
}
