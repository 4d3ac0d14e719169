//! # Little Lemon Core
//!
//! Core traits and types for the Little Lemon state architecture.
//!
//! Every piece of mutable application state (the cart, the active
//! reservation, the navigation shell) is owned by a store and changed only by
//! running a reducer over an action.
//!
//! ## Core Concepts
//!
//! - **State**: Domain state for a feature
//! - **Action**: All possible inputs to a reducer
//! - **Reducer**: `(State, Action, Environment) → Result<Effects, Error>`
//! - **Effect**: Side effect descriptions (not execution)
//! - **Environment**: Injected dependencies (catalog, clock, policies)
//!
//! ## Example
//!
//! ```
//! use little_lemon_core::{effect::Effect, reducer::Reducer, SmallVec};
//!
//! #[derive(Clone, Debug, Default)]
//! struct BadgeState {
//!     count: u32,
//! }
//!
//! #[derive(Clone, Debug)]
//! enum BadgeAction {
//!     Bump,
//!     Reset,
//! }
//!
//! struct BadgeReducer;
//!
//! impl Reducer for BadgeReducer {
//!     type State = BadgeState;
//!     type Action = BadgeAction;
//!     type Environment = ();
//!     type Error = std::convert::Infallible;
//!
//!     fn reduce(
//!         &self,
//!         state: &mut BadgeState,
//!         action: BadgeAction,
//!         _env: &(),
//!     ) -> Result<SmallVec<[Effect<BadgeAction>; 4]>, Self::Error> {
//!         match action {
//!             BadgeAction::Bump => state.count += 1,
//!             BadgeAction::Reset => state.count = 0,
//!         }
//!         Ok(SmallVec::new())
//!     }
//! }
//!
//! let mut state = BadgeState::default();
//! let effects = BadgeReducer.reduce(&mut state, BadgeAction::Bump, &()).unwrap_or_default();
//! assert_eq!(state.count, 1);
//! assert!(effects.is_empty());
//! ```

// Re-export commonly used types
pub use chrono::{DateTime, Utc};
pub use smallvec::{smallvec, SmallVec};

/// Declarative helpers for building effects
pub mod effect_macros;

/// Reducer module - The core trait for business logic
///
/// Reducers are pure functions: `(State, Action, Environment) → (State, Effects)`.
/// They may also reject an action, in which case the state must be left
/// exactly as it was.
pub mod reducer {
    use super::effect::Effect;
    use smallvec::SmallVec;

    /// The Reducer trait - core abstraction for business logic
    ///
    /// # Type Parameters
    ///
    /// - `State`: The domain state this reducer operates on
    /// - `Action`: The action type this reducer processes
    /// - `Environment`: The injected dependencies this reducer needs
    /// - `Error`: Why an action can be rejected
    ///
    /// # Atomicity
    ///
    /// Implementations validate first and mutate second. When `reduce`
    /// returns `Err`, `state` is unchanged.
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected dependencies
        type Environment;

        /// The rejection type for invalid actions
        type Error;

        /// Reduce an action into state changes and effects
        ///
        /// # Errors
        ///
        /// Returns `Self::Error` when the action is rejected. The state is
        /// left untouched in that case.
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> Result<SmallVec<[Effect<Self::Action>; 4]>, Self::Error>;
    }
}

/// Effect module - Side effect descriptions
///
/// Effects describe work for the store to do after a reducer has run. They
/// are values, not execution.
pub mod effect {
    use std::time::Duration;

    /// Effect type - describes a side effect to be executed
    ///
    /// # Type Parameters
    ///
    /// - `Action`: The action type that effects can produce (feedback loop)
    #[derive(Clone, PartialEq, Eq)]
    pub enum Effect<Action> {
        /// No-op effect
        None,

        /// Delayed action (splash timers, toast dismissal, carousel ticks)
        ///
        /// Each delay is timed from the instant the reducer returned it. To
        /// run one delay after another, dispatch the second from the
        /// reducer handling the first.
        Delay {
            /// How long to wait
            duration: Duration,
            /// Action to dispatch after delay
            action: Box<Action>,
        },
    }

    impl<Action> std::fmt::Debug for Effect<Action>
    where
        Action: std::fmt::Debug,
    {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                Effect::None => write!(f, "Effect::None"),
                Effect::Delay { duration, action } => f
                    .debug_struct("Effect::Delay")
                    .field("duration", duration)
                    .field("action", action)
                    .finish(),
            }
        }
    }

    impl<Action> Effect<Action> {
        /// Returns true if this effect does nothing
        #[must_use]
        pub const fn is_noop(&self) -> bool {
            matches!(self, Effect::None)
        }

        /// The delayed action this effect schedules, if any
        #[must_use]
        pub fn into_delay(self) -> Option<(Duration, Action)> {
            match self {
                Effect::None => None,
                Effect::Delay { duration, action } => Some((duration, *action)),
            }
        }
    }
}

/// Environment module - Dependency injection traits
///
/// All external dependencies are abstracted behind traits and injected via
/// the Environment parameter.
pub mod environment {
    use chrono::{DateTime, Utc};

    /// Clock trait - abstracts time operations for testability
    ///
    /// # Examples
    ///
    /// ```
    /// use little_lemon_core::environment::{Clock, SystemClock};
    ///
    /// let before = chrono::Utc::now();
    /// assert!(SystemClock.now() >= before);
    /// ```
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;
    }

    /// Production clock backed by the system time
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::effect::Effect;
    use std::time::Duration;

    #[derive(Clone, Debug, PartialEq, Eq)]
    enum Tick {
        First,
    }

    #[test]
    fn only_none_is_a_noop() {
        assert!(Effect::<Tick>::None.is_noop());

        let delayed = Effect::Delay {
            duration: Duration::from_secs(1),
            action: Box::new(Tick::First),
        };
        assert!(!delayed.is_noop());
    }

    #[test]
    fn delay_unwraps_into_duration_and_action() {
        let effect = Effect::Delay {
            duration: Duration::from_millis(20),
            action: Box::new(Tick::First),
        };
        assert_eq!(effect.into_delay(), Some((Duration::from_millis(20), Tick::First)));
        assert_eq!(Effect::<Tick>::None.into_delay(), None);
    }
}
