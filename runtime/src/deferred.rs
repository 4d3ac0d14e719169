//! Deferred action queue driven by virtual time.
//!
//! `Effect::Delay` does not spawn timers. The store parks delayed actions
//! here and the display layer advances the queue's clock, which releases
//! every action whose due time has been reached.
//!
//! # Ordering
//!
//! Released actions are ordered by due time; actions due at the same instant
//! keep the order in which they were scheduled.

use std::time::Duration;

/// A parked action with its due time
#[derive(Debug, Clone)]
struct Deferred<A> {
    due: Duration,
    seq: u64,
    action: A,
}

/// Bounded queue of delayed actions
#[derive(Debug, Clone)]
pub struct DeferredQueue<A> {
    now: Duration,
    next_seq: u64,
    capacity: usize,
    entries: Vec<Deferred<A>>,
}

impl<A> DeferredQueue<A> {
    /// Create an empty queue holding at most `capacity` pending actions
    #[must_use]
    pub const fn new(capacity: usize) -> Self {
        Self {
            now: Duration::ZERO,
            next_seq: 0,
            capacity,
            entries: Vec::new(),
        }
    }

    /// Virtual time elapsed since the queue was created
    #[must_use]
    pub const fn now(&self) -> Duration {
        self.now
    }

    /// Number of pending actions
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when nothing is pending
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Park `action` until `delay` has elapsed
    ///
    /// # Errors
    ///
    /// Hands the action back when the queue is full.
    pub fn schedule(&mut self, delay: Duration, action: A) -> Result<(), A> {
        if self.entries.len() >= self.capacity {
            return Err(action);
        }

        let due = self.now.saturating_add(delay);
        let seq = self.next_seq;
        self.next_seq += 1;

        // Entries stay sorted by (due, seq); a new entry goes after every
        // entry due at or before it.
        let at = self.entries.partition_point(|d| d.due <= due);
        self.entries.insert(at, Deferred { due, seq, action });
        Ok(())
    }

    /// Time until the earliest pending action is due
    #[must_use]
    pub fn next_due_in(&self) -> Option<Duration> {
        self.entries
            .first()
            .map(|d| d.due.saturating_sub(self.now))
    }

    /// Move the clock forward and release every action that is now due
    pub fn advance(&mut self, by: Duration) -> Vec<A> {
        self.now = self.now.saturating_add(by);
        let ready = self.entries.partition_point(|d| d.due <= self.now);
        let released: Vec<Deferred<A>> = self.entries.drain(..ready).collect();
        debug_assert!(released.windows(2).all(|w| (w[0].due, w[0].seq) < (w[1].due, w[1].seq)));
        released.into_iter().map(|d| d.action).collect()
    }
}

impl<A> Default for DeferredQueue<A> {
    fn default() -> Self {
        Self::new(64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn releases_in_due_order() {
        let mut queue = DeferredQueue::new(8);
        assert!(queue.schedule(Duration::from_millis(300), "late").is_ok());
        assert!(queue.schedule(Duration::from_millis(100), "early").is_ok());

        assert_eq!(queue.next_due_in(), Some(Duration::from_millis(100)));
        assert!(queue.advance(Duration::from_millis(99)).is_empty());
        assert_eq!(queue.advance(Duration::from_millis(1)), vec!["early"]);
        assert_eq!(queue.next_due_in(), Some(Duration::from_millis(200)));
        assert_eq!(queue.advance(Duration::from_secs(1)), vec!["late"]);
        assert!(queue.is_empty());
    }

    #[test]
    fn ties_keep_scheduling_order() {
        let mut queue = DeferredQueue::new(8);
        for name in ["a", "b", "c"] {
            assert!(queue.schedule(Duration::from_secs(1), name).is_ok());
        }
        assert_eq!(queue.advance(Duration::from_secs(1)), vec!["a", "b", "c"]);
    }

    #[test]
    fn delays_are_relative_to_current_time() {
        let mut queue = DeferredQueue::new(8);
        queue.advance(Duration::from_secs(10));
        assert!(queue.schedule(Duration::from_secs(2), 1).is_ok());
        assert_eq!(queue.next_due_in(), Some(Duration::from_secs(2)));
        assert_eq!(queue.now(), Duration::from_secs(10));
    }

    #[test]
    fn full_queue_hands_action_back() {
        let mut queue = DeferredQueue::new(1);
        assert!(queue.schedule(Duration::from_secs(1), 1).is_ok());
        assert_eq!(queue.schedule(Duration::from_secs(1), 2), Err(2));
        assert_eq!(queue.len(), 1);
    }
}
