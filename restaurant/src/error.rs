//! Error types for the restaurant domain.

use crate::catalog::MenuItemId;
use little_lemon_runtime::StoreError;
use std::convert::Infallible;
use thiserror::Error;

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Why an operation on the catalog, cart or reservation was rejected
///
/// Every rejection leaves the targeted store unchanged.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The id is not in the menu catalog
    #[error("menu item not found: {id}")]
    ItemNotFound {
        /// Requested id
        id: MenuItemId,
    },

    /// A cart position does not exist (any more)
    #[error("cart line {index} is out of range (cart has {len} lines)")]
    IndexOutOfRange {
        /// First offending position
        index: usize,
        /// Cart length at call time
        len: usize,
    },

    /// The reservation form was submitted with unusable values
    #[error("invalid reservation input: {0}")]
    InvalidReservationInput(InputProblem),

    /// The catalog data is inconsistent
    #[error("invalid catalog: {0}")]
    InvalidCatalog(String),

    /// A listener tried to change the store that is notifying it
    #[error("store is busy notifying listeners")]
    StoreBusy,
}

/// What is wrong with a reservation submission
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputProblem {
    /// Name missing or whitespace only
    #[error("customer name is empty")]
    EmptyName,
    /// Party of zero
    #[error("party size must be at least 1")]
    ZeroPartySize,
    /// Requested time already passed
    #[error("requested time is in the past")]
    InThePast,
}

impl From<StoreError<Error>> for Error {
    fn from(error: StoreError<Error>) -> Self {
        match error {
            StoreError::Rejected(error) => error,
            StoreError::ReentrantDispatch => Self::StoreBusy,
        }
    }
}

impl From<StoreError<Infallible>> for Error {
    fn from(error: StoreError<Infallible>) -> Self {
        match error {
            StoreError::Rejected(never) => match never {},
            StoreError::ReentrantDispatch => Self::StoreBusy,
        }
    }
}
