//! Table reservation: one optional active record per session.
//!
//! ```text
//! NoReservation  --submit(valid)-->  HasReservation
//! HasReservation --submit(valid)-->  HasReservation   (replaces the record)
//! HasReservation --cancel-------->   NoReservation
//! ```
//!
//! Submissions are checked by [`ReservationRecord::validate`] before they
//! reach the store; invalid ones report an error and leave the slot as it was.

use crate::error::{Error, InputProblem, Result};
use crate::locale::Locale;
use chrono::{DateTime, FixedOffset, Utc};
use little_lemon_core::{effect::Effect, environment::Clock, reducer::Reducer, SmallVec};
use little_lemon_runtime::{Store, StoreConfig, Subscription};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::sync::Arc;

/// A confirmed reservation
///
/// Only [`ReservationRecord::validate`] builds one, so every record held by
/// the store has passed the input checks.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ReservationRecord {
    customer_name: String,
    party_size: u32,
    requested_at: DateTime<FixedOffset>,
    description: String,
}

impl ReservationRecord {
    /// Checks a submission and renders its description in `env.locale`
    ///
    /// The name is trimmed before it is checked and stored.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidReservationInput`] for a blank name, a party of
    /// zero, or (when the policy says so) a time before the clock's "now".
    pub fn validate(
        name: &str,
        party_size: u32,
        requested_at: DateTime<FixedOffset>,
        env: &ReservationEnvironment,
    ) -> Result<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::InvalidReservationInput(InputProblem::EmptyName));
        }
        if party_size == 0 {
            return Err(Error::InvalidReservationInput(InputProblem::ZeroPartySize));
        }
        if env.policy.reject_past && requested_at.with_timezone(&Utc) < env.clock.now() {
            return Err(Error::InvalidReservationInput(InputProblem::InThePast));
        }

        Ok(Self {
            customer_name: name.to_string(),
            party_size,
            requested_at,
            description: env.locale.reservation_description(name, party_size, &requested_at),
        })
    }

    /// Name the table is held under (trimmed)
    #[must_use]
    pub fn customer_name(&self) -> &str {
        &self.customer_name
    }

    /// Number of guests, at least 1
    #[must_use]
    pub const fn party_size(&self) -> u32 {
        self.party_size
    }

    /// Requested date and time, in the requester's offset
    #[must_use]
    pub const fn requested_at(&self) -> DateTime<FixedOffset> {
        self.requested_at
    }

    /// Description rendered at submission time
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Renders the description again for another locale
    #[must_use]
    pub fn describe(&self, locale: Locale) -> String {
        locale.reservation_description(&self.customer_name, self.party_size, &self.requested_at)
    }
}

/// Whether a reservation is held
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReservationStatus {
    /// The slot is empty
    NoReservation,
    /// A record is active
    HasReservation,
}

/// Reservation slot
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ReservationState {
    /// The active record, if any
    pub active: Option<ReservationRecord>,
}

impl ReservationState {
    /// Current status
    #[must_use]
    pub const fn status(&self) -> ReservationStatus {
        if self.active.is_some() {
            ReservationStatus::HasReservation
        } else {
            ReservationStatus::NoReservation
        }
    }
}

/// Reservation actions
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReservationAction {
    /// Hold a validated record, replacing any active reservation
    Submit(ReservationRecord),
    /// Drop the active reservation, if there is one
    Cancel,
}

/// Which submissions are accepted beyond name and party size
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationPolicy {
    /// Refuse requested times earlier than the clock's "now"
    pub reject_past: bool,
}

impl Default for ReservationPolicy {
    fn default() -> Self {
        Self { reject_past: true }
    }
}

/// Dependencies of the reservation reducer
#[derive(Clone)]
pub struct ReservationEnvironment {
    /// Source of "now" for the past-date check
    pub clock: Arc<dyn Clock>,
    /// Locale of rendered descriptions
    pub locale: Locale,
    /// Acceptance rules
    pub policy: ReservationPolicy,
}

impl ReservationEnvironment {
    /// Creates an environment with the default policy
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>, locale: Locale) -> Self {
        Self {
            clock,
            locale,
            policy: ReservationPolicy::default(),
        }
    }

    /// Replaces the acceptance policy
    #[must_use]
    pub const fn with_policy(mut self, policy: ReservationPolicy) -> Self {
        self.policy = policy;
        self
    }
}

impl std::fmt::Debug for ReservationEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReservationEnvironment")
            .field("locale", &self.locale)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

/// Reservation business logic
#[derive(Clone, Copy, Debug, Default)]
pub struct ReservationReducer;

impl ReservationReducer {
    /// Creates the reservation reducer
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Reducer for ReservationReducer {
    type State = ReservationState;
    type Action = ReservationAction;
    type Environment = ReservationEnvironment;
    type Error = Infallible;

    fn reduce(
        &self,
        state: &mut ReservationState,
        action: ReservationAction,
        _env: &ReservationEnvironment,
    ) -> std::result::Result<SmallVec<[Effect<ReservationAction>; 4]>, Infallible> {
        match action {
            ReservationAction::Submit(record) => {
                let party_size = record.party_size;
                let replaced = state.active.replace(record).is_some();
                tracing::debug!(party_size, replaced, "Reservation stored");
            },
            ReservationAction::Cancel => {
                if state.active.take().is_some() {
                    tracing::debug!("Reservation cancelled");
                }
            },
        }

        Ok(SmallVec::new())
    }
}

/// Store type backing [`ReservationStore`]
pub type ReservationStoreInner =
    Store<ReservationState, ReservationAction, ReservationEnvironment, ReservationReducer>;

/// Shared reservation handle
#[derive(Clone, Debug)]
pub struct ReservationStore {
    store: ReservationStoreInner,
}

impl ReservationStore {
    /// Creates an empty reservation slot
    #[must_use]
    pub fn new(environment: ReservationEnvironment) -> Self {
        Self {
            store: Store::with_config(
                ReservationState::default(),
                ReservationReducer::new(),
                environment,
                StoreConfig::named("reservation"),
            ),
        }
    }

    /// Books a table, replacing any active reservation
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidReservationInput`] for a blank name, a party of
    ///   zero, or (when the policy says so) a time in the past
    /// - [`Error::StoreBusy`] when called from a reservation listener
    pub fn submit(
        &self,
        name: &str,
        party_size: u32,
        requested_at: DateTime<FixedOffset>,
    ) -> Result<ReservationRecord> {
        let record =
            ReservationRecord::validate(name, party_size, requested_at, self.store.environment())?;
        self.store.send(ReservationAction::Submit(record.clone()))?;
        Ok(record)
    }

    /// Clears the slot; succeeds when already empty
    ///
    /// # Errors
    ///
    /// Returns [`Error::StoreBusy`] when called from a reservation listener.
    pub fn cancel(&self) -> Result<()> {
        self.store.send(ReservationAction::Cancel).map_err(Error::from)
    }

    /// Returns true while a reservation is held
    #[must_use]
    pub fn has_active(&self) -> bool {
        self.store.state(|state| state.active.is_some())
    }

    /// Description of the active reservation, or an empty string
    #[must_use]
    pub fn active_description(&self) -> String {
        self.store.state(|state| {
            state
                .active
                .as_ref()
                .map(|record| record.description.clone())
                .unwrap_or_default()
        })
    }

    /// Copy of the active record
    #[must_use]
    pub fn active(&self) -> Option<ReservationRecord> {
        self.store.state(|state| state.active.clone())
    }

    /// Current status
    #[must_use]
    pub fn status(&self) -> ReservationStatus {
        self.store.state(ReservationState::status)
    }

    /// Calls `listener` with the new slot after every successful change
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&ReservationState) + 'static,
    {
        self.store.subscribe(listener)
    }

    /// The underlying store
    #[must_use]
    pub const fn store(&self) -> &ReservationStoreInner {
        &self.store
    }
}
