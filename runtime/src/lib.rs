//! # Little Lemon Runtime
//!
//! Runtime implementation for the Little Lemon state architecture.
//!
//! This crate provides the [`Store`] that owns a piece of state, runs its
//! reducer for every action and tells observers about the result.
//!
//! ## Core Components
//!
//! - **Store**: Owns state, dispatches actions synchronously, notifies listeners
//! - **Subscription**: RAII handle for a registered listener
//! - **`DeferredQueue`**: Parks delayed actions until virtual time catches up
//!
//! ## Threading
//!
//! A store is single-threaded by construction (`Rc`/`RefCell` inside, so it
//! is neither `Send` nor `Sync`). Every mutation happens on the caller's
//! thread before `send` returns.
//!
//! ## Example
//!
//! ```ignore
//! use little_lemon_runtime::Store;
//!
//! let store = Store::new(initial_state, my_reducer, environment);
//!
//! // Observe
//! let _subscription = store.subscribe(|state| println!("{state:?}"));
//!
//! // Send an action
//! store.send(Action::DoSomething)?;
//!
//! // Read state
//! let value = store.state(|s| s.some_field);
//! ```

use little_lemon_core::{effect::Effect, reducer::Reducer};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

/// Deferred (delayed) action queue
pub mod deferred;

/// Listener registry and subscription handles
pub mod subscription;

pub use deferred::DeferredQueue;
pub use subscription::Subscription;

use subscription::{ListenerRegistry, Unsubscribe};

/// Error types for the Store runtime
pub mod error {
    use thiserror::Error;

    /// Errors that can occur during Store operations
    ///
    /// In both cases the store's state is unchanged and no listener ran.
    #[derive(Error, Debug, Clone, PartialEq, Eq)]
    pub enum StoreError<E> {
        /// The reducer rejected the action
        #[error("action rejected: {0}")]
        Rejected(E),

        /// `send` was called while the store was notifying its listeners
        #[error("store is busy notifying listeners; re-entrant dispatch rejected")]
        ReentrantDispatch,
    }

    impl<E> StoreError<E> {
        /// Returns the reducer's rejection, if that is what happened
        #[must_use]
        pub fn rejection(self) -> Option<E> {
            match self {
                Self::Rejected(error) => Some(error),
                Self::ReentrantDispatch => None,
            }
        }
    }
}

pub use error::StoreError;

/// Configuration for Store instances
///
/// # Example
///
/// ```
/// use little_lemon_runtime::StoreConfig;
///
/// let config = StoreConfig::named("cart").with_deferred_capacity(8);
/// assert_eq!(config.name, "cart");
/// ```
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Label attached to tracing spans and metrics
    pub name: &'static str,
    /// Maximum number of pending delayed actions
    pub deferred_capacity: usize,
    /// Upper bound on delayed actions dispatched by one `advance` call
    pub max_dispatch_per_advance: usize,
}

impl StoreConfig {
    /// Default configuration with a custom store name
    #[must_use]
    pub fn named(name: &'static str) -> Self {
        Self {
            name,
            ..Self::default()
        }
    }

    /// Set the deferred queue capacity
    #[must_use]
    pub const fn with_deferred_capacity(mut self, capacity: usize) -> Self {
        self.deferred_capacity = capacity;
        self
    }

    /// Set the per-advance dispatch limit
    #[must_use]
    pub const fn with_max_dispatch_per_advance(mut self, limit: usize) -> Self {
        self.max_dispatch_per_advance = limit;
        self
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            name: "store",
            deferred_capacity: 64,
            max_dispatch_per_advance: 1024,
        }
    }
}

/// Store module - The runtime for reducers
pub mod store {
    use super::{
        Duration, Effect, ListenerRegistry, Rc, RefCell, Reducer, StoreConfig, StoreError,
        Subscription, Unsubscribe,
    };
    use crate::deferred::DeferredQueue;
    use little_lemon_core::SmallVec;

    struct StoreInner<S, A, E, R> {
        state: RefCell<S>,
        reducer: R,
        environment: E,
        listeners: Rc<RefCell<ListenerRegistry<S>>>,
        deferred: RefCell<DeferredQueue<A>>,
        config: StoreConfig,
    }

    /// The Store - runtime coordinator for a reducer
    ///
    /// The Store manages:
    /// 1. State (behind a `RefCell`, single-threaded)
    /// 2. Reducer (business logic)
    /// 3. Environment (injected dependencies)
    /// 4. Listeners, notified after every successful action
    /// 5. Delayed actions produced by `Effect::Delay`
    ///
    /// Cloning a store yields another handle to the same state; screens
    /// share one store by holding clones.
    ///
    /// # Type Parameters
    ///
    /// - `S`: State type
    /// - `A`: Action type
    /// - `E`: Environment type
    /// - `R`: Reducer implementation
    pub struct Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        inner: Rc<StoreInner<S, A, E, R>>,
    }

    impl<S, A, E, R> Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
        R::Error: std::fmt::Display,
        S: 'static,
    {
        /// Create a new store with initial state, reducer, and environment
        #[must_use]
        pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
            Self::with_config(initial_state, reducer, environment, StoreConfig::default())
        }

        /// Create a new Store with custom configuration
        #[must_use]
        pub fn with_config(
            initial_state: S,
            reducer: R,
            environment: E,
            config: StoreConfig,
        ) -> Self {
            Self {
                inner: Rc::new(StoreInner {
                    state: RefCell::new(initial_state),
                    reducer,
                    environment,
                    listeners: Rc::new(RefCell::new(ListenerRegistry::new())),
                    deferred: RefCell::new(DeferredQueue::new(config.deferred_capacity)),
                    config,
                }),
            }
        }

        /// Configuration this store was built with
        #[must_use]
        pub fn config(&self) -> &StoreConfig {
            &self.inner.config
        }

        /// Injected environment
        #[must_use]
        pub fn environment(&self) -> &E {
            &self.inner.environment
        }

        /// Send an action through the reducer
        ///
        /// On success the state has been updated, delayed effects are
        /// queued, and every listener has been called once, in registration
        /// order, before this returns.
        ///
        /// # Errors
        ///
        /// - [`StoreError::Rejected`]: the reducer refused the action; state
        ///   is unchanged and no listener runs
        /// - [`StoreError::ReentrantDispatch`]: called from inside a listener
        ///   of this same store
        #[tracing::instrument(skip(self, action), fields(store = self.inner.config.name), name = "store_send")]
        pub fn send(&self, action: A) -> Result<(), StoreError<R::Error>> {
            let name = self.inner.config.name;
            metrics::counter!("store.actions.total", "store" => name).increment(1);

            let effects = {
                let Ok(mut state) = self.inner.state.try_borrow_mut() else {
                    tracing::warn!("Rejected re-entrant dispatch");
                    metrics::counter!("store.actions.reentrant", "store" => name).increment(1);
                    return Err(StoreError::ReentrantDispatch);
                };

                let start = std::time::Instant::now();
                let result = self
                    .inner
                    .reducer
                    .reduce(&mut state, action, &self.inner.environment);
                metrics::histogram!("store.reducer.duration_seconds", "store" => name)
                    .record(start.elapsed().as_secs_f64());

                match result {
                    Ok(effects) => effects,
                    Err(error) => {
                        tracing::debug!(%error, "Action rejected");
                        metrics::counter!("store.actions.rejected", "store" => name).increment(1);
                        return Err(StoreError::Rejected(error));
                    },
                }
            };

            tracing::trace!("Reducer completed, returned {} effects", effects.len());
            self.schedule(effects);
            self.notify();
            Ok(())
        }

        /// Read current state via a closure
        ///
        /// ```ignore
        /// let count = store.state(|s| s.lines.len());
        /// ```
        pub fn state<F, T>(&self, f: F) -> T
        where
            F: FnOnce(&S) -> T,
        {
            let state = self.inner.state.borrow();
            f(&state)
        }

        /// Register a listener called after every successful action
        ///
        /// The listener receives the new state. It may read other stores,
        /// subscribe or unsubscribe, but sending to this same store from
        /// inside the listener fails with [`StoreError::ReentrantDispatch`].
        pub fn subscribe<F>(&self, listener: F) -> Subscription
        where
            F: Fn(&S) + 'static,
        {
            let id = self.inner.listeners.borrow_mut().insert(Rc::new(listener));
            tracing::debug!(store = self.inner.config.name, id, "Listener subscribed");

            let registry: Rc<dyn Unsubscribe> = Rc::clone(&self.inner.listeners) as Rc<dyn Unsubscribe>;
            Subscription::new(id, Rc::downgrade(&registry))
        }

        /// Number of registered listeners
        #[must_use]
        pub fn listener_count(&self) -> usize {
            self.inner.listeners.borrow().len()
        }

        /// Number of delayed actions waiting to fire
        #[must_use]
        pub fn pending_deferred(&self) -> usize {
            self.inner.deferred.borrow().len()
        }

        /// Time until the next delayed action is due
        #[must_use]
        pub fn next_deferred_in(&self) -> Option<Duration> {
            self.inner.deferred.borrow().next_due_in()
        }

        /// Virtual time elapsed on this store's deferred clock
        #[must_use]
        pub fn elapsed(&self) -> Duration {
            self.inner.deferred.borrow().now()
        }

        /// Advance virtual time and dispatch every delayed action that falls due
        ///
        /// Time moves in steps from one due action to the next, so actions
        /// scheduled by a delayed action are timed from its due instant.
        /// Rejected delayed actions are logged and skipped.
        ///
        /// Returns the number of delayed actions successfully dispatched.
        pub fn advance(&self, by: Duration) -> usize {
            let limit = self.inner.config.max_dispatch_per_advance;
            let mut remaining = by;
            let mut released = 0usize;
            let mut dispatched = 0usize;

            loop {
                let step = match self.inner.deferred.borrow().next_due_in() {
                    Some(next) if next <= remaining => next,
                    _ => break,
                };
                if released >= limit {
                    tracing::warn!(
                        store = self.inner.config.name,
                        limit,
                        "Delayed dispatch limit reached; remaining actions stay queued"
                    );
                    return dispatched;
                }

                remaining -= step;
                let ready = self.inner.deferred.borrow_mut().advance(step);
                for action in ready {
                    released += 1;
                    match self.send(action) {
                        Ok(()) => dispatched += 1,
                        Err(error) => {
                            tracing::warn!(store = self.inner.config.name, %error, "Delayed action failed");
                        },
                    }
                }
            }

            self.inner.deferred.borrow_mut().advance(remaining);
            dispatched
        }

        fn schedule(&self, effects: SmallVec<[Effect<A>; 4]>) {
            let name = self.inner.config.name;
            for (duration, action) in effects.into_iter().filter_map(Effect::into_delay) {
                let outcome = self.inner.deferred.borrow_mut().schedule(duration, action);
                if outcome.is_err() {
                    tracing::warn!(store = name, ?duration, "Deferred queue full; delayed action dropped");
                    metrics::counter!("store.deferred.dropped", "store" => name).increment(1);
                }
            }
        }

        fn notify(&self) {
            let listeners = self.inner.listeners.borrow().snapshot();
            if listeners.is_empty() {
                return;
            }

            let Ok(state) = self.inner.state.try_borrow() else {
                tracing::warn!(store = self.inner.config.name, "State busy; listeners skipped");
                return;
            };
            for listener in &listeners {
                listener(&state);
            }

            tracing::trace!(count = listeners.len(), "Notified listeners");
            metrics::counter!("store.listeners.notified", "store" => self.inner.config.name)
                .increment(listeners.len() as u64);
        }
    }

    impl<S, A, E, R> Clone for Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        fn clone(&self) -> Self {
            Self {
                inner: Rc::clone(&self.inner),
            }
        }
    }

    impl<S, A, E, R> std::fmt::Debug for Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
        S: std::fmt::Debug,
    {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            let mut debug = f.debug_struct("Store");
            debug.field("name", &self.inner.config.name);
            match self.inner.state.try_borrow() {
                Ok(state) => debug.field("state", &*state),
                Err(_) => debug.field("state", &"<borrowed>"),
            };
            debug.finish_non_exhaustive()
        }
    }
}

pub use store::Store;
