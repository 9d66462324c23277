use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

/// A counted completion latch.
///
/// Created with the number of participants; each
/// calls [`arrive`] exactly once when finished, and
/// [`wait`] blocks until all of them have.
///
/// [`arrive`]: CompletionBarrier::arrive
/// [`wait`]: CompletionBarrier::wait
#[derive(Debug)]
pub struct CompletionBarrier {
    remaining: Mutex<usize>,
    all_arrived: Condvar,
}

impl CompletionBarrier {
    /// Creates a barrier expecting `count` arrivals.
    ///
    /// # Examples
    /// ```
    /// use nnt::agents::CompletionBarrier;
    ///
    /// let barrier = CompletionBarrier::new(2);
    /// assert_eq!(barrier.remaining(), 2);
    /// ```
    pub fn new(count: usize) -> CompletionBarrier {
        CompletionBarrier {
            remaining: Mutex::new(count),
            all_arrived: Condvar::new(),
        }
    }

    /// Records one participant as finished, waking
    /// all waiters once the count reaches zero.
    /// Arrivals past zero are ignored.
    pub fn arrive(&self) {
        let mut remaining = self.lock();
        *remaining = remaining.saturating_sub(1);
        if *remaining == 0 {
            self.all_arrived.notify_all();
        }
    }

    /// Blocks the calling thread until every
    /// participant has arrived.
    ///
    /// # Examples
    /// ```
    /// use nnt::agents::CompletionBarrier;
    /// use std::thread;
    ///
    /// let barrier = CompletionBarrier::new(4);
    /// thread::scope(|s| {
    ///     for _ in 0..4 {
    ///         s.spawn(|| barrier.arrive());
    ///     }
    ///     barrier.wait();
    ///     assert_eq!(barrier.remaining(), 0);
    /// });
    /// ```
    pub fn wait(&self) {
        let guard = self.lock();
        let _guard = self
            .all_arrived
            .wait_while(guard, |remaining| *remaining > 0)
            .unwrap_or_else(PoisonError::into_inner);
    }

    /// Returns the number of participants yet to arrive.
    pub fn remaining(&self) -> usize {
        *self.lock()
    }

    // The counter stays consistent even if a holder panicked.
    fn lock(&self) -> MutexGuard<'_, usize> {
        self.remaining.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
