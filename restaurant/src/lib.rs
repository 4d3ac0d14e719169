//! # Little Lemon
//!
//! State core of the Little Lemon restaurant app: menu browsing, a shopping
//! cart, a table reservation and the navigation shell around them.
//!
//! ## Architecture
//!
//! Each piece of mutable state lives in its own store:
//!
//! - [`CartStore`]: ordered cart lines and the derived total
//! - [`ReservationStore`]: zero or one active reservation
//! - [`ShellStore`]: splash, tabs, toast banner and carousel timers
//!
//! The [`MenuCatalog`] is immutable and shared as an `Arc`. A [`Session`]
//! builds all of the above from an [`AppConfig`] and hands out the handles.
//!
//! ## Example
//!
//! ```
//! use little_lemon::{AppConfig, Session};
//! use little_lemon_core::environment::SystemClock;
//! use std::sync::Arc;
//!
//! let session = Session::new(&AppConfig::default(), Arc::new(SystemClock));
//! session.add_to_cart(&"lasagna".into())?;
//! session.add_to_cart(&"lasagna".into())?;
//!
//! assert_eq!(session.cart().item_count(), 2);
//! assert_eq!(session.cart().total_price().to_string(), "31.98");
//! # Ok::<(), little_lemon::Error>(())
//! ```

pub mod cart;
pub mod catalog;
pub mod config;
pub mod error;
pub mod locale;
pub mod reservation;
pub mod screens;
pub mod session;
pub mod shell;

pub use cart::{CartLine, CartState, CartStore};
pub use catalog::{MenuCatalog, MenuItem, MenuItemId};
pub use config::AppConfig;
pub use error::{Error, InputProblem, Result};
pub use locale::Locale;
pub use reservation::{ReservationPolicy, ReservationRecord, ReservationStatus, ReservationStore};
pub use session::Session;
pub use shell::{Screen, ShellStore, ShellTimings, Tab};
