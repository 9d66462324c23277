use super::ParentSelection;
use crate::agents::{Agent, AgentError, CompletionBarrier, Scorable};
use crate::networks::{Network, NetworkError, NetworkSettings};

use log::debug;
use rand::Rng;

use std::cmp::Ordering;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::thread;

/// A population of agents scored together.
///
/// Members keep their creation order; ranking
/// by fitness is done on request.
#[derive(Clone, Debug)]
pub struct Generation<S> {
    index: usize,
    members: Vec<Agent<S>>,
}

impl<S: Scorable + Clone> Generation<S> {
    /// Creates `size` idle agents, each with its own network
    /// and a clone of `scorer`.
    ///
    /// Without a `parent`, every network is independently
    /// randomized. Otherwise every network is independently
    /// mutated from `parent`.
    ///
    /// # Errors
    /// Returns an error if `parent`'s topology differs
    /// from `settings`.
    pub fn new<R: Rng>(
        index: usize,
        size: NonZeroUsize,
        settings: &Arc<NetworkSettings>,
        parent: Option<&Network>,
        scorer: &S,
        rng: &mut R,
    ) -> Result<Generation<S>, NetworkError> {
        let members = (0..size.get())
            .map(|i| {
                Network::init(Arc::clone(settings), parent, rng)
                    .map(|network| Agent::new(agent_name(index, i), network, scorer.clone()))
            })
            .collect::<Result<_, _>>()?;
        Ok(Generation { index, members })
    }
}

impl<S: Scorable> Generation<S> {
    /// Scores every member against `environment`, and
    /// returns once all of them are done.
    ///
    /// If `threaded`, every member is scored on a worker
    /// thread of its own, all running concurrently.
    ///
    /// # Errors
    /// Returns an error if a member was already started or
    /// its worker could not be spawned. The remaining members
    /// are still scored to completion before returning.
    pub fn start(&mut self, environment: &S::Environment, threaded: bool) -> Result<(), AgentError>
    where
        S: Send,
        S::Environment: Sync,
    {
        let barrier = CompletionBarrier::new(self.members.len());
        let mut first_error = None;
        debug!(
            "starting generation {} ({} members, threaded: {})",
            self.index,
            self.members.len(),
            threaded
        );
        thread::scope(|scope| {
            for agent in self.members.iter_mut() {
                if let Err(e) = agent.start(scope, environment, &barrier, threaded) {
                    // The agent will never arrive on its own.
                    barrier.arrive();
                    first_error.get_or_insert(e);
                }
            }
            barrier.wait();
        });
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Returns the member with the highest fitness.
    /// Ties go to the earliest-created member.
    pub fn champion(&self) -> &Agent<S> {
        self.members
            .iter()
            .reduce(|best, agent| match agent.fitness().total_cmp(&best.fitness()) {
                Ordering::Greater => agent,
                _ => best,
            })
            .expect("empty generation has no champion")
    }

    /// Returns the members sorted by decreasing fitness.
    /// Members with equal fitness keep their creation order.
    pub fn ranked(&self) -> Vec<&Agent<S>> {
        let mut ranked: Vec<_> = self.members.iter().collect();
        ranked.sort_by(|a, b| b.fitness().total_cmp(&a.fitness()));
        ranked
    }

    /// Picks the parent of the next generation.
    pub fn select_parent<R: Rng>(&self, selection: ParentSelection, rng: &mut R) -> &Agent<S> {
        match selection {
            ParentSelection::Champion => self.champion(),
            ParentSelection::Tournament { size } => (0..size.get())
                .map(|_| &self.members[rng.gen_range(0..self.members.len())])
                .reduce(|best, agent| match agent.fitness().total_cmp(&best.fitness()) {
                    Ordering::Greater => agent,
                    _ => best,
                })
                .unwrap_or_else(|| self.champion()),
        }
    }
}

impl<S> Generation<S> {
    /// Returns the generation's index, starting at 0.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Returns the members in creation order.
    pub fn members(&self) -> &[Agent<S>] {
        &self.members
    }

    /// Returns whether every member is done.
    pub fn is_done(&self) -> bool {
        self.members.iter().all(Agent::is_done)
    }
}

fn agent_name(generation: usize, member: usize) -> String {
    format!("gen {} #{}", generation, member)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::{ScoringError, WORST_FITNESS};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};
    use std::time::Duration;

    /// Scores networks by their output, sleeping a little so
    /// that threaded members overlap.
    #[derive(Clone, Debug, Default)]
    struct SlowOutput {
        thread: Option<thread::ThreadId>,
    }

    impl Scorable for SlowOutput {
        type Environment = AtomicUsize;

        fn score(&mut self, network: &mut Network, scored: &AtomicUsize) -> Result<f64, ScoringError> {
            thread::sleep(Duration::from_millis(10));
            self.thread = Some(thread::current().id());
            scored.fetch_add(1, AtomicOrdering::SeqCst);
            Ok(network.evaluate(&[1.0, -1.0])?[0])
        }
    }

    /// Fails to score members whose first weight is negative.
    #[derive(Clone, Debug)]
    struct Picky;

    impl Scorable for Picky {
        type Environment = ();

        fn score(&mut self, network: &mut Network, _: &()) -> Result<f64, ScoringError> {
            match network.weights().next() {
                Some(w) if w < 0.0 => panic!("negative first weight"),
                Some(w) => Ok(w),
                None => Err("no weights".into()),
            }
        }
    }

    fn settings(mutation_rate: f64) -> Arc<NetworkSettings> {
        Arc::new(NetworkSettings {
            input_count: NonZeroUsize::new(2).unwrap(),
            hidden_layer_size: NonZeroUsize::new(3).unwrap(),
            mutation_rate,
            ..NetworkSettings::zero()
        })
    }

    fn generation(size: usize, seed: u64) -> Generation<SlowOutput> {
        Generation::new(
            0,
            NonZeroUsize::new(size).unwrap(),
            &settings(0.1),
            None,
            &SlowOutput::default(),
            &mut StdRng::seed_from_u64(seed),
        )
        .unwrap()
    }

    #[test]
    fn new_generation_zero() {
        let g = generation(4, 0);
        assert_eq!(g.members().len(), 4);
        assert!(!g.is_done());
        for agent in g.members() {
            assert_eq!(agent.network().layer_sizes(), vec![2, 3, 1]);
            assert_eq!(agent.network().connection_count(), 9);
        }
        // Every member owns a distinct, independently initialized network.
        let addresses: HashSet<_> = g.members().iter().map(|a| a.network() as *const Network).collect();
        assert_eq!(addresses.len(), 4);
        let weights: Vec<Vec<f64>> = g.members().iter().map(|a| a.network().weights().collect()).collect();
        for i in 0..weights.len() {
            for j in i + 1..weights.len() {
                assert_ne!(weights[i], weights[j]);
            }
        }
        let names: Vec<_> = g.members().iter().map(Agent::name).collect();
        assert_eq!(names, vec!["gen 0 #0", "gen 0 #1", "gen 0 #2", "gen 0 #3"]);
    }

    #[test]
    fn start_waits_for_every_member() {
        for size in [1, 2, 24] {
            for threaded in [true, false] {
                let mut g = generation(size, size as u64);
                let scored = AtomicUsize::new(0);
                g.start(&scored, threaded).unwrap();
                assert!(g.is_done(), "size {} threaded {}", size, threaded);
                assert_eq!(scored.load(AtomicOrdering::SeqCst), size);
                assert!(g.members().iter().all(|a| a.fitness() != WORST_FITNESS));
            }
        }
    }

    #[test]
    fn threaded_members_run_on_their_own_threads() {
        let mut g = generation(6, 1);
        g.start(&AtomicUsize::new(0), true).unwrap();
        let threads: HashSet<_> = g.members().iter().map(|a| a.scorer().thread.unwrap()).collect();
        assert_eq!(threads.len(), 6);
        assert!(!threads.contains(&thread::current().id()));
    }

    #[test]
    fn restart_is_rejected() {
        let mut g = generation(3, 2);
        let scored = AtomicUsize::new(0);
        g.start(&scored, true).unwrap();
        assert!(matches!(g.start(&scored, true), Err(AgentError::AlreadyStarted(_))));
        assert_eq!(scored.load(AtomicOrdering::SeqCst), 3);
    }

    #[test]
    fn failing_members_do_not_block_siblings() {
        let mut g = Generation::new(
            0,
            NonZeroUsize::new(16).unwrap(),
            &settings(0.1),
            None,
            &Picky,
            &mut StdRng::seed_from_u64(3),
        )
        .unwrap();
        g.start(&(), true).unwrap();
        assert!(g.is_done());
        for agent in g.members() {
            let first = agent.network().weights().next().unwrap();
            if first < 0.0 {
                assert_eq!(agent.fitness(), WORST_FITNESS);
            } else {
                assert_eq!(agent.fitness(), first);
            }
        }
        assert!(g.champion().fitness() >= 0.0);
    }

    #[test]
    fn ranking() {
        let mut g = generation(8, 4);
        g.start(&AtomicUsize::new(0), false).unwrap();
        let ranked = g.ranked();
        assert_eq!(ranked.len(), 8);
        assert!(ranked.windows(2).all(|w| w[0].fitness() >= w[1].fitness()));
        assert_eq!(ranked[0].name(), g.champion().name());
        // Members keep creation order.
        assert_eq!(g.members()[0].name(), "gen 0 #0");
    }

    #[test]
    fn tournament_selects_a_member() {
        let mut g = generation(5, 5);
        g.start(&AtomicUsize::new(0), false).unwrap();
        let mut rng = StdRng::seed_from_u64(6);
        let selection = ParentSelection::Tournament {
            size: NonZeroUsize::new(1).unwrap(),
        };
        for _ in 0..20 {
            let parent = g.select_parent(selection, &mut rng);
            assert!(g.members().iter().any(|a| std::ptr::eq(a, parent)));
        }
        assert!(std::ptr::eq(
            g.select_parent(ParentSelection::Champion, &mut rng),
            g.champion()
        ));
    }

    #[test]
    fn zero_mutation_children_match_parent() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut parent = Network::random(settings(0.0), &mut rng);
        let children = Generation::new(
            1,
            NonZeroUsize::new(4).unwrap(),
            &settings(0.0),
            Some(&parent),
            &SlowOutput::default(),
            &mut rng,
        )
        .unwrap();
        let expected = parent.evaluate(&[0.3, 0.6]).unwrap();
        for agent in children.members() {
            let mut network = agent.network().clone();
            assert_eq!(network.evaluate(&[0.3, 0.6]).unwrap(), expected);
        }
    }

    #[test]
    fn mismatched_parent() {
        let mut rng = StdRng::seed_from_u64(8);
        let parent = Network::random(Arc::new(NetworkSettings::zero()), &mut rng);
        let result = Generation::new(
            1,
            NonZeroUsize::new(2).unwrap(),
            &settings(0.1),
            Some(&parent),
            &SlowOutput::default(),
            &mut rng,
        );
        assert!(matches!(result, Err(NetworkError::StructuralMismatch { .. })));
    }
}
