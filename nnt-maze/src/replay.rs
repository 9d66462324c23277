//! Step-by-step replay of a network's walk, for display.
//!
//! Replays run on a background thread of their own, one step
//! per interval, and can be stopped at any time. They don't
//! touch the network that was scored: each replay drives its
//! own copy.
use crate::maze::{Maze, Position};
use crate::mazer::{MazerConfig, Walk, WalkOutcome};

use log::{debug, warn};
use nnt::networks::Network;

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// A replay running on a background thread.
pub struct Playback {
    stop: Arc<AtomicBool>,
    handle: JoinHandle<Option<WalkOutcome>>,
}

impl Playback {
    /// Starts replaying `network`'s walk through `maze`,
    /// calling `on_step` with the mazer's position once per
    /// `interval`. The first call reports the start cell.
    ///
    /// # Errors
    /// Returns an error if the replay thread
    /// could not be spawned.
    ///
    /// # Examples
    /// ```
    /// use nnt::networks::{Network, NetworkSettings};
    /// use nnt_maze::maze::Maze;
    /// use nnt_maze::mazer::{Mazer, MazerConfig};
    /// use nnt_maze::replay::Playback;
    /// use std::sync::mpsc;
    /// use std::sync::Arc;
    /// use std::time::Duration;
    ///
    /// let maze: Arc<Maze> = Arc::new("S..\n.#G".parse().unwrap());
    /// let settings = Arc::new(Mazer::network_settings(NetworkSettings::zero()));
    /// let network = Network::random(settings, &mut rand::thread_rng());
    ///
    /// let (sender, receiver) = mpsc::channel();
    /// let playback = Playback::spawn(
    ///     network,
    ///     Arc::clone(&maze),
    ///     MazerConfig::zero(),
    ///     Duration::from_millis(1),
    ///     move |position| sender.send(position).unwrap(),
    /// )
    /// .unwrap();
    ///
    /// assert!(playback.join().unwrap().is_some());
    /// assert_eq!(receiver.iter().next(), Some(maze.start()));
    /// ```
    pub fn spawn<F>(
        network: Network,
        maze: Arc<Maze>,
        config: MazerConfig,
        interval: Duration,
        mut on_step: F,
    ) -> io::Result<Playback>
    where
        F: FnMut(Position) + Send + 'static,
    {
        let stop = Arc::new(AtomicBool::new(false));
        let stopped = Arc::clone(&stop);
        let handle = thread::Builder::new()
            .name("playback".to_owned())
            .spawn(move || {
                let mut network = network;
                let mut walk = Walk::new(&mut network, &maze, config.step_limit(&maze));
                on_step(maze.start());
                loop {
                    if !pause(interval, &stopped) {
                        debug!("playback stopped after {} steps", walk.steps());
                        return None;
                    }
                    match walk.next() {
                        Some(Ok(position)) => on_step(position),
                        Some(Err(e)) => {
                            warn!("playback aborted: {}", e);
                            return None;
                        }
                        None => return walk.outcome(),
                    }
                }
            })?;
        Ok(Playback { stop, handle })
    }

    /// Asks the replay to stop before its next step.
    pub fn stop(&self) {
        self.stop.store(true, Ordering::SeqCst);
        self.handle.thread().unpark();
    }

    /// Returns whether the replay thread has finished.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Waits for the replay to end, and returns why the walk
    /// ended, or `None` if the replay was stopped or the network
    /// couldn't steer.
    ///
    /// # Errors
    /// Returns the panic payload if `on_step` panicked.
    pub fn join(self) -> thread::Result<Option<WalkOutcome>> {
        self.handle.join()
    }
}

/// Sleeps for `interval`, waking early if `stop` is set.
/// Returns whether the replay should go on.
fn pause(interval: Duration, stop: &AtomicBool) -> bool {
    let deadline = Instant::now() + interval;
    loop {
        if stop.load(Ordering::SeqCst) {
            return false;
        }
        let now = Instant::now();
        if now >= deadline {
            return true;
        }
        thread::park_timeout(deadline - now);
    }
}
