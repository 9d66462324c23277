//! Mazers are networks steered through a maze, one step per
//! evaluation, and scored by how close they got to the goal.
//!
//! # Sensing
//! At every step the network receives [`INPUT_COUNT`] inputs:
//! whether each neighboring cell is blocked (walls and the maze's
//! edge both count), in [`Direction::ALL`] order, followed by the
//! horizontal and vertical offsets to the goal, divided by the
//! maze's width and height respectively.
//!
//! # Deciding
//! The network has [`OUTPUT_COUNT`] outputs, one per direction
//! in [`Direction::ALL`] order. The mazer moves in the direction
//! of the largest output; ties go to the earliest direction.
//!
//! # Walking
//! Mazers are deterministic, so a mazer that revisits a cell
//! would loop forever. A walk therefore ends as soon as the
//! mazer reaches the goal, revisits a cell (bumping into a wall
//! counts), or runs out of steps.
use crate::maze::{Direction, Maze, Position};

use ahash::RandomState;
use log::trace;
use nnt::agents::{Scorable, ScoringError};
use nnt::networks::{Network, NetworkError, NetworkSettings};
use serde::{Deserialize, Serialize};

use std::collections::HashSet;
use std::error::Error;
use std::fmt;
use std::num::NonZeroUsize;

/// Number of inputs a mazer's network must take.
pub const INPUT_COUNT: usize = 6;
/// Number of outputs a mazer's network must produce.
pub const OUTPUT_COUNT: usize = 4;

/// Configuration data for mazers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MazerConfig {
    /// Maximum number of steps in a walk.
    /// 0 means one step per cell of the maze.
    pub max_steps: usize,
}

impl MazerConfig {
    /// Returns a "zero-valued" default configuration,
    /// allowing one step per cell of the maze.
    pub const fn zero() -> MazerConfig {
        MazerConfig { max_steps: 0 }
    }

    /// Returns the maximum number of steps
    /// in a walk through `maze`.
    pub fn step_limit(&self, maze: &Maze) -> usize {
        match self.max_steps {
            0 => maze.width() * maze.height(),
            n => n,
        }
    }
}

impl Default for MazerConfig {
    fn default() -> MazerConfig {
        MazerConfig::zero()
    }
}

/// Reasons a walk ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WalkOutcome {
    /// The mazer stepped onto the goal.
    ReachedGoal,
    /// The mazer revisited a cell.
    Looped,
    /// The step limit was reached.
    OutOfSteps,
}

/// An error type indicating a network
/// unable to steer a mazer.
#[derive(Clone, Debug, PartialEq)]
pub enum WalkError {
    /// The network rejected the mazer's senses.
    Network(NetworkError),
    /// The network has the wrong number of outputs.
    OutputCount { expected: usize, actual: usize },
}

impl fmt::Display for WalkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Network(e) => write!(f, "network can't steer a mazer: {}", e),
            Self::OutputCount { expected, actual } => write!(
                f,
                "network has {} outputs, but mazers need {}",
                actual, expected
            ),
        }
    }
}

impl Error for WalkError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Network(e) => Some(e),
            Self::OutputCount { .. } => None,
        }
    }
}

impl From<NetworkError> for WalkError {
    fn from(e: NetworkError) -> Self {
        Self::Network(e)
    }
}

/// Returns the inputs a mazer at `position` feeds its network.
///
/// # Examples
/// ```
/// use nnt_maze::maze::{Maze, Position};
/// use nnt_maze::mazer::sense;
///
/// let maze: Maze = "S.#\n..G".parse().unwrap();
/// // Blocked above and to the left; the goal is 2 columns right and 1 row down.
/// assert_eq!(sense(&maze, maze.start()), [1.0, 0.0, 0.0, 1.0, 2.0 / 3.0, 0.5]);
/// assert_eq!(sense(&maze, Position::new(1, 0)), [1.0, 1.0, 0.0, 0.0, 1.0 / 3.0, 0.5]);
/// ```
pub fn sense(maze: &Maze, position: Position) -> [f64; INPUT_COUNT] {
    let mut inputs = [0.0; INPUT_COUNT];
    for (input, direction) in inputs.iter_mut().zip(Direction::ALL) {
        let open = maze
            .neighbor(position, direction)
            .map_or(false, |n| maze.is_open(n));
        *input = if open { 0.0 } else { 1.0 };
    }
    let goal = maze.goal();
    inputs[4] = (goal.x as f64 - position.x as f64) / maze.width() as f64;
    inputs[5] = (goal.y as f64 - position.y as f64) / maze.height() as f64;
    inputs
}

/// Returns the direction chosen by a network's outputs,
/// or `None` if there isn't one output per direction.
///
/// # Examples
/// ```
/// use nnt_maze::maze::Direction;
/// use nnt_maze::mazer::decide;
///
/// assert_eq!(decide(&[0.1, 0.7, 0.7, 0.2]), Some(Direction::Right));
/// assert_eq!(decide(&[0.1, 0.7]), None);
/// ```
pub fn decide(outputs: &[f64]) -> Option<Direction> {
    if outputs.len() != OUTPUT_COUNT {
        return None;
    }
    let mut best = 0;
    for (i, &output) in outputs.iter().enumerate().skip(1) {
        if output > outputs[best] {
            best = i;
        }
    }
    Some(Direction::ALL[best])
}

/// A mazer's walk through a maze, one step per iteration.
///
/// Yields the mazer's position after each step. Iteration
/// stops once the walk ends, or after the network fails
/// to steer.
pub struct Walk<'a> {
    network: &'a mut Network,
    maze: &'a Maze,
    position: Position,
    steps: usize,
    max_steps: usize,
    visited: HashSet<Position, RandomState>,
    outcome: Option<WalkOutcome>,
    failed: bool,
}

impl<'a> Walk<'a> {
    /// Starts a walk from `maze`'s start cell.
    pub fn new(network: &'a mut Network, maze: &'a Maze, max_steps: usize) -> Walk<'a> {
        let mut visited = HashSet::with_hasher(RandomState::new());
        visited.insert(maze.start());
        Walk {
            network,
            maze,
            position: maze.start(),
            steps: 0,
            max_steps,
            visited,
            outcome: None,
            failed: false,
        }
    }

    /// Returns the mazer's current position.
    pub fn position(&self) -> Position {
        self.position
    }

    /// Returns the number of steps taken so far.
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Returns why the walk ended, or `None`
    /// if it hasn't ended.
    pub fn outcome(&self) -> Option<WalkOutcome> {
        self.outcome
    }

    fn advance(&mut self) -> Result<Position, WalkError> {
        let outputs = self.network.evaluate(&sense(self.maze, self.position))?;
        let direction = decide(&outputs).ok_or(WalkError::OutputCount {
            expected: OUTPUT_COUNT,
            actual: outputs.len(),
        })?;

        let next = self.maze.step(self.position, direction);
        self.position = next;
        self.steps += 1;
        if next == self.maze.goal() {
            self.outcome = Some(WalkOutcome::ReachedGoal);
        } else if !self.visited.insert(next) {
            self.outcome = Some(WalkOutcome::Looped);
        } else if self.steps >= self.max_steps {
            self.outcome = Some(WalkOutcome::OutOfSteps);
        }
        Ok(next)
    }
}

impl Iterator for Walk<'_> {
    type Item = Result<Position, WalkError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.outcome.is_some() {
            return None;
        }
        if self.steps >= self.max_steps {
            self.outcome = Some(WalkOutcome::OutOfSteps);
            return None;
        }
        let step = self.advance();
        self.failed = step.is_err();
        Some(step)
    }
}

/// Scores a walk: in [1, 2) if the goal was reached, the
/// fewer steps the better; otherwise in [0, 1), the closer
/// the mazer ever got to the goal the better.
///
/// Closeness is measured in walking distance, or in taxicab
/// distance where the goal can't be walked to.
pub fn fitness(maze: &Maze, path: &[Position], outcome: WalkOutcome, max_steps: usize) -> f64 {
    if outcome == WalkOutcome::ReachedGoal {
        let steps = path.len().saturating_sub(1) as f64;
        return 2.0 - steps / max_steps.max(1) as f64;
    }
    let distances = maze.goal_distances();
    let distance = |p: Position| distances.get(p).unwrap_or_else(|| p.manhattan(maze.goal()));
    let initial = distance(maze.start()).max(1) as f64;
    let closest = path
        .iter()
        .map(|&p| distance(p))
        .min()
        .unwrap_or(initial as usize) as f64;
    (1.0 - closest / initial).clamp(0.0, 1.0)
}

/// A [`Scorable`] steering networks through a [`Maze`].
///
/// Keeps the path of the last walk it scored.
#[derive(Clone, Debug, Default)]
pub struct Mazer {
    config: MazerConfig,
    path: Vec<Position>,
    outcome: Option<WalkOutcome>,
}

impl Mazer {
    pub fn new(config: MazerConfig) -> Mazer {
        Mazer {
            config,
            path: vec![],
            outcome: None,
        }
    }

    /// Returns `template` with its input and output
    /// counts set to the ones mazers need.
    ///
    /// # Examples
    /// ```
    /// use nnt::networks::NetworkSettings;
    /// use nnt_maze::mazer::Mazer;
    ///
    /// let settings = Mazer::network_settings(NetworkSettings::zero());
    /// assert_eq!(settings.layer_sizes(), vec![6, 1, 4]);
    /// ```
    pub fn network_settings(template: NetworkSettings) -> NetworkSettings {
        NetworkSettings {
            input_count: NonZeroUsize::new(INPUT_COUNT).expect("mazers have inputs"),
            output_count: NonZeroUsize::new(OUTPUT_COUNT).expect("mazers have outputs"),
            ..template
        }
    }

    pub fn config(&self) -> &MazerConfig {
        &self.config
    }

    /// Returns the positions visited during the last
    /// scored walk, starting with the maze's start cell.
    pub fn path(&self) -> &[Position] {
        &self.path
    }

    /// Returns why the last scored walk ended.
    pub fn outcome(&self) -> Option<WalkOutcome> {
        self.outcome
    }
}

impl Scorable for Mazer {
    type Environment = Maze;

    fn score(&mut self, network: &mut Network, maze: &Maze) -> Result<f64, ScoringError> {
        let max_steps = self.config.step_limit(maze);
        self.path.clear();
        self.path.push(maze.start());
        self.outcome = None;

        let mut walk = Walk::new(network, maze, max_steps);
        for step in &mut walk {
            self.path.push(step?);
        }
        let outcome = walk.outcome().unwrap_or(WalkOutcome::OutOfSteps);
        self.outcome = Some(outcome);

        let fitness = fitness(maze, &self.path, outcome, max_steps);
        trace!("walk ended {:?} after {} steps @ {:.3} fit", outcome, walk.steps(), fitness);
        Ok(fitness)
    }

    fn validate_environment(maze: &Maze) -> Result<(), ScoringError> {
        Ok(maze.validate()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nnt::agents::WORST_FITNESS;
    use nnt::evolution::{Evolution, EvolutionConfig, EvolutionError};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::Arc;

    /// A network always choosing `direction`: the sigmoid
    /// hidden neuron is always positive, and only the chosen
    /// output has a positive weight from it.
    fn fixed(direction: Direction) -> Network {
        let settings = Arc::new(Mazer::network_settings(NetworkSettings::zero()));
        let mut weights = vec![0.0; INPUT_COUNT + OUTPUT_COUNT];
        let chosen = Direction::ALL.iter().position(|&d| d == direction).unwrap();
        weights[INPUT_COUNT + chosen] = 1.0;
        Network::from_weights(settings, &weights).unwrap()
    }

    #[test]
    fn decide_ties_go_first() {
        assert_eq!(decide(&[0.5, 0.5, 0.5, 0.5]), Some(Direction::Up));
        assert_eq!(decide(&[0.0, 0.0, 0.0, 0.1]), Some(Direction::Left));
        assert_eq!(decide(&[-1.0, -3.0, -0.5, -2.0]), Some(Direction::Down));
        assert_eq!(decide(&[0.0; 5]), None);
    }

    #[test]
    fn sense_edges_and_walls() {
        let maze: Maze = "#S#\n.G.".parse().unwrap();
        assert_eq!(sense(&maze, maze.start()), [1.0, 1.0, 0.0, 1.0, 0.0, 0.5]);
        assert_eq!(sense(&maze, Position::new(2, 1)), [1.0, 1.0, 1.0, 0.0, -1.0 / 3.0, 0.0]);
    }

    #[test]
    fn step_limit() {
        let maze: Maze = "S..\n..G".parse().unwrap();
        assert_eq!(MazerConfig::zero().step_limit(&maze), 6);
        assert_eq!(MazerConfig { max_steps: 2 }.step_limit(&maze), 2);
    }

    #[test]
    fn walk_reaches_goal() {
        let maze: Maze = "S...G".parse().unwrap();
        let mut network = fixed(Direction::Right);
        let mut walk = Walk::new(&mut network, &maze, 10);
        let path: Vec<_> = walk.by_ref().map(Result::unwrap).collect();
        assert_eq!(
            path,
            vec![
                Position::new(1, 0),
                Position::new(2, 0),
                Position::new(3, 0),
                Position::new(4, 0)
            ]
        );
        assert_eq!(walk.outcome(), Some(WalkOutcome::ReachedGoal));
        assert_eq!(walk.steps(), 4);
        assert!(walk.next().is_none());
    }

    #[test]
    fn walk_ends_on_wall_bump() {
        let maze: Maze = "S.#G".parse().unwrap();
        let mut network = fixed(Direction::Right);
        let mut walk = Walk::new(&mut network, &maze, 10);
        let path: Vec<_> = walk.by_ref().map(Result::unwrap).collect();
        assert_eq!(path, vec![Position::new(1, 0), Position::new(1, 0)]);
        assert_eq!(walk.outcome(), Some(WalkOutcome::Looped));
    }

    #[test]
    fn walk_runs_out_of_steps() {
        let maze: Maze = "S....G".parse().unwrap();
        let mut network = fixed(Direction::Right);
        let mut walk = Walk::new(&mut network, &maze, 2);
        assert_eq!(walk.by_ref().count(), 2);
        assert_eq!(walk.outcome(), Some(WalkOutcome::OutOfSteps));
        assert_eq!(walk.position(), Position::new(2, 0));

        let mut network = fixed(Direction::Right);
        let mut walk = Walk::new(&mut network, &maze, 0);
        assert!(walk.next().is_none());
        assert_eq!(walk.outcome(), Some(WalkOutcome::OutOfSteps));
    }

    #[test]
    fn walk_rejects_misshapen_networks() {
        let maze: Maze = "S.G".parse().unwrap();
        let mut network = Network::random(
            Arc::new(NetworkSettings {
                input_count: NonZeroUsize::new(INPUT_COUNT).unwrap(),
                ..NetworkSettings::zero()
            }),
            &mut StdRng::seed_from_u64(1),
        );
        let mut walk = Walk::new(&mut network, &maze, 5);
        assert_eq!(
            walk.next(),
            Some(Err(WalkError::OutputCount {
                expected: OUTPUT_COUNT,
                actual: 1
            }))
        );
        assert!(walk.next().is_none());

        let mut network = Network::random(Arc::new(NetworkSettings::zero()), &mut StdRng::seed_from_u64(2));
        let mut walk = Walk::new(&mut network, &maze, 5);
        assert!(matches!(walk.next(), Some(Err(WalkError::Network(_)))));
    }

    #[test]
    fn fitness_ranges() {
        let maze: Maze = "S...G".parse().unwrap();
        let reached: Vec<_> = (0..5).map(|x| Position::new(x, 0)).collect();
        assert_eq!(fitness(&maze, &reached, WalkOutcome::ReachedGoal, 8), 1.5);

        // Closest approach is 1 cell of an initial 4.
        let stuck: Vec<_> = (0..4).map(|x| Position::new(x, 0)).collect();
        assert_eq!(fitness(&maze, &stuck, WalkOutcome::OutOfSteps, 3), 0.75);
        assert_eq!(fitness(&maze, &[maze.start()], WalkOutcome::Looped, 3), 0.0);
    }

    #[test]
    fn fitness_uses_walking_distance() {
        // The goal is near the start as the crow flies, but far to walk.
        let maze: Maze = "\
S#G
.#.
...
"
        .parse()
        .unwrap();
        let path = [maze.start(), Position::new(0, 1), Position::new(0, 2), Position::new(1, 2)];
        // Walking distance from the start is 6; the path got to within 3.
        assert_eq!(fitness(&maze, &path, WalkOutcome::Looped, 9), 0.5);
    }

    #[test]
    fn fitness_falls_back_to_manhattan() {
        let maze: Maze = "S.#G".parse().unwrap();
        let path = [maze.start(), Position::new(1, 0)];
        // Taxicab distance from the start is 3; the path got to within 2.
        let expected = 1.0 - 2.0 / 3.0;
        assert!((fitness(&maze, &path, WalkOutcome::Looped, 4) - expected).abs() < 1e-12);
    }

    #[test]
    fn score_records_path() {
        let maze: Maze = "S..G".parse().unwrap();
        let mut mazer = Mazer::new(MazerConfig { max_steps: 6 });
        let mut network = fixed(Direction::Right);
        let fitness = mazer.score(&mut network, &maze).unwrap();
        assert_eq!(fitness, 1.5);
        assert_eq!(mazer.outcome(), Some(WalkOutcome::ReachedGoal));
        assert_eq!(mazer.path().len(), 4);
        assert_eq!(mazer.path()[0], maze.start());
        assert_eq!(mazer.path()[3], maze.goal());

        // Scoring again replaces the recorded path.
        let mut network = fixed(Direction::Left);
        let fitness = mazer.score(&mut network, &maze).unwrap();
        assert_eq!(fitness, 0.0);
        assert_eq!(mazer.path(), &[maze.start(), maze.start()]);
        assert_eq!(mazer.outcome(), Some(WalkOutcome::Looped));
    }

    #[test]
    fn evolution_rejects_invalid_mazes() {
        let maze: Maze = "S..G".parse().unwrap();
        let mut json = serde_json::to_value(&maze).unwrap();
        json["goal"] = serde_json::json!({ "x": 1, "y": 0 });
        let tampered: Maze = serde_json::from_value(json).unwrap();

        let result = Evolution::new(
            Mazer::network_settings(NetworkSettings::zero()),
            EvolutionConfig::zero(),
            Mazer::default(),
            tampered,
        );
        assert!(matches!(result, Err(EvolutionError::InvalidEnvironment(_))));
    }

    #[test]
    fn evolution_scores_every_mazer() {
        let maze: Maze = "\
S..#....
.#.#.##.
.#...#..
.####.#.
......#G
"
        .parse()
        .unwrap();
        let settings = Mazer::network_settings(NetworkSettings {
            hidden_layer_count: NonZeroUsize::new(2).unwrap(),
            hidden_layer_size: NonZeroUsize::new(5).unwrap(),
            mutation_rate: 0.3,
            ..NetworkSettings::zero()
        });
        let config = EvolutionConfig {
            population_size: NonZeroUsize::new(16).unwrap(),
            threaded: true,
            ..EvolutionConfig::zero()
        };
        let start = maze.start();
        let mut evolution = Evolution::new(settings, config, Mazer::default(), maze).unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        let mut best = WORST_FITNESS;
        for _ in 0..5 {
            let generation = evolution.advance_with(&mut rng).unwrap();
            for agent in generation.members() {
                assert!((0.0..2.0).contains(&agent.fitness()), "{}", agent.fitness());
                assert_eq!(agent.scorer().path()[0], start);
            }
            best = best.max(generation.champion().fitness());
        }
        assert!(best >= 0.0);
    }
}
