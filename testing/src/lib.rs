//! # Little Lemon Testing
//!
//! Testing utilities and helpers for the Little Lemon state architecture.
//!
//! This crate provides:
//! - Deterministic clocks for environment injection
//! - A Given-When-Then harness for reducers ([`ReducerTest`])
//! - Listener recorders for store notification tests
//!
//! ## Example
//!
//! ```ignore
//! use little_lemon_testing::{test_clock, Recorder};
//!
//! let store = Store::new(CartState::default(), CartReducer::new(), env);
//! let (recorder, _subscription) = Recorder::attach(&store, |s: &CartState| s.item_count());
//!
//! store.send(CartAction::AddItem { id })?;
//! assert_eq!(recorder.values(), vec![1]);
//! ```

use chrono::{DateTime, Utc};
use little_lemon_core::environment::Clock;

/// Ergonomic testing utilities for reducers
pub mod reducer_test;

pub use reducer_test::{assertions, ReducerTest};

/// Mock implementations of Environment traits
pub mod mocks {
    use super::{Clock, DateTime, Utc};
    use std::sync::Mutex;

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use little_lemon_testing::mocks::FixedClock;
    /// use little_lemon_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// assert_eq!(clock.now(), clock.now());
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Clock that tests can move forward explicitly
    #[derive(Debug)]
    pub struct ManualClock {
        time: Mutex<DateTime<Utc>>,
    }

    impl ManualClock {
        /// Create a clock starting at `time`
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self {
                time: Mutex::new(time),
            }
        }

        /// Move the clock forward
        pub fn advance(&self, by: chrono::Duration) {
            if let Ok(mut time) = self.time.lock() {
                *time += by;
            }
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
                .lock()
                .map_or_else(|poisoned| *poisoned.into_inner(), |time| *time)
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    ///
    /// # Panics
    ///
    /// This function will panic if the hardcoded timestamp fails to parse,
    /// which should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
                .expect("hardcoded timestamp should always parse")
                .with_timezone(&Utc),
        )
    }
}

/// Store observation helpers
pub mod helpers {
    use little_lemon_core::reducer::Reducer;
    use little_lemon_runtime::{Store, Subscription};
    use std::cell::RefCell;
    use std::fmt::Display;
    use std::rc::Rc;

    /// Records a projection of every state a store's listeners see
    #[derive(Debug)]
    pub struct Recorder<T> {
        seen: Rc<RefCell<Vec<T>>>,
    }

    impl<T: Clone + 'static> Recorder<T> {
        /// Subscribe to `store`, recording `project(state)` on every notification
        ///
        /// Keep the returned subscription alive for as long as recording
        /// should continue.
        pub fn attach<S, A, E, R, F>(store: &Store<S, A, E, R>, project: F) -> (Self, Subscription)
        where
            R: Reducer<State = S, Action = A, Environment = E>,
            R::Error: Display,
            S: 'static,
            F: Fn(&S) -> T + 'static,
        {
            let seen = Rc::new(RefCell::new(Vec::new()));
            let sink = Rc::clone(&seen);
            let subscription = store.subscribe(move |state| sink.borrow_mut().push(project(state)));
            (Self { seen }, subscription)
        }

        /// Values recorded so far, oldest first
        #[must_use]
        pub fn values(&self) -> Vec<T> {
            self.seen.borrow().clone()
        }

        /// Number of notifications observed
        #[must_use]
        pub fn count(&self) -> usize {
            self.seen.borrow().len()
        }

        /// Most recent value, if any
        #[must_use]
        pub fn last(&self) -> Option<T> {
            self.seen.borrow().last().cloned()
        }
    }
}

/// Property-based testing utilities
pub mod properties {
    use proptest::prelude::*;
    use std::collections::BTreeSet;

    /// Strategy for a set of positions, some of which may be out of range
    /// for a sequence of length `len`
    pub fn positions(len: usize) -> impl Strategy<Value = BTreeSet<usize>> {
        prop::collection::btree_set(0..=len + 1, 0..=len.max(1))
    }
}

// Re-export commonly used items
pub use helpers::Recorder;
pub use mocks::{test_clock, FixedClock, ManualClock};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock() {
        let clock = test_clock();
        let time1 = clock.now();
        let time2 = clock.now();
        assert_eq!(time1, time2);
    }

    #[test]
    fn test_manual_clock_moves_forward() {
        let start = test_clock().now();
        let clock = ManualClock::new(start);
        clock.advance(chrono::Duration::minutes(5));
        assert_eq!(clock.now(), start + chrono::Duration::minutes(5));
    }
}
