//! Session wiring: owns the catalog and every store for one app run.
//!
//! Screens get their handles from here. Nothing is looked up globally.

use crate::cart::CartStore;
use crate::catalog::{MenuCatalog, MenuItemId};
use crate::config::AppConfig;
use crate::error::Result;
use crate::locale::Locale;
use crate::reservation::{ReservationEnvironment, ReservationRecord, ReservationStore};
use crate::shell::{ShellEnvironment, ShellStore};
use chrono::{DateTime, FixedOffset};
use little_lemon_core::environment::Clock;
use std::sync::Arc;
use std::time::Duration;

/// Dependency root for one running app
#[derive(Clone, Debug)]
pub struct Session {
    catalog: Arc<MenuCatalog>,
    cart: CartStore,
    reservations: ReservationStore,
    shell: ShellStore,
    locale: Locale,
}

impl Session {
    /// Builds a session over the house menu
    #[must_use]
    pub fn new(config: &AppConfig, clock: Arc<dyn Clock>) -> Self {
        Self::with_catalog(MenuCatalog::reference(), config, clock)
    }

    /// Builds a session over a custom menu
    #[must_use]
    pub fn with_catalog(catalog: MenuCatalog, config: &AppConfig, clock: Arc<dyn Clock>) -> Self {
        let catalog = Arc::new(catalog);
        let reservation_env = ReservationEnvironment::new(clock, config.locale)
            .with_policy(config.reservation_policy());

        tracing::info!(
            items = catalog.len(),
            locale = %config.locale,
            "Session created"
        );

        Self {
            cart: CartStore::new(Arc::clone(&catalog)),
            reservations: ReservationStore::new(reservation_env),
            shell: ShellStore::new(ShellEnvironment::new(config.shell_timings())),
            locale: config.locale,
            catalog,
        }
    }

    /// Shared menu
    #[must_use]
    pub const fn catalog(&self) -> &Arc<MenuCatalog> {
        &self.catalog
    }

    /// Shared cart
    #[must_use]
    pub const fn cart(&self) -> &CartStore {
        &self.cart
    }

    /// Shared reservation slot
    #[must_use]
    pub const fn reservations(&self) -> &ReservationStore {
        &self.reservations
    }

    /// Navigation state
    #[must_use]
    pub const fn shell(&self) -> &ShellStore {
        &self.shell
    }

    /// Display locale
    #[must_use]
    pub const fn locale(&self) -> Locale {
        self.locale
    }

    /// Shows the splash and starts its timer
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::StoreBusy`] when called from a shell listener.
    pub fn launch(&self) -> Result<()> {
        self.shell.launch()
    }

    /// Adds one unit of `id` to the cart and confirms with a toast
    ///
    /// # Errors
    ///
    /// Propagates the cart's rejection; no toast is shown in that case.
    #[tracing::instrument(skip(self, id), fields(item = %id))]
    pub fn add_to_cart(&self, id: &MenuItemId) -> Result<()> {
        self.cart.add_item(id)?;
        self.shell.show_toast(self.locale.item_added_message())?;
        tracing::info!(count = self.cart.item_count(), "Item added to cart");
        Ok(())
    }

    /// Books a table and shows the confirmation as a toast
    ///
    /// # Errors
    ///
    /// Propagates the reservation store's rejection.
    #[tracing::instrument(skip(self, name))]
    pub fn reserve(
        &self,
        name: &str,
        party_size: u32,
        requested_at: DateTime<FixedOffset>,
    ) -> Result<ReservationRecord> {
        let record = self.reservations.submit(name, party_size, requested_at)?;
        self.shell.show_toast(record.description())?;
        tracing::info!("Reservation confirmed");
        Ok(record)
    }

    /// Moves every store's virtual clock forward
    ///
    /// Returns the number of timers that fired.
    pub fn advance(&self, by: Duration) -> usize {
        self.shell.advance(by)
            + self.cart.store().advance(by)
            + self.reservations.store().advance(by)
    }

    /// Time until the next timer of any store
    #[must_use]
    pub fn next_timer_in(&self) -> Option<Duration> {
        [
            self.shell.next_timer_in(),
            self.cart.store().next_deferred_in(),
            self.reservations.store().next_deferred_in(),
        ]
        .into_iter()
        .flatten()
        .min()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shell::Screen;
    use little_lemon_testing::test_clock;

    fn session() -> Session {
        Session::new(&AppConfig::default(), Arc::new(test_clock()))
    }

    #[test]
    fn add_to_cart_shows_toast() {
        let session = session();
        assert!(session.add_to_cart(&"pizza".into()).is_ok());
        assert_eq!(session.cart().item_count(), 1);
        assert_eq!(session.shell().toast_message().as_deref(), Some("Item added to cart!"));

        session.advance(Duration::from_secs(2));
        assert_eq!(session.shell().toast_message(), None);
    }

    #[test]
    fn failed_add_shows_no_toast() {
        let session = session();
        assert!(session.add_to_cart(&"tiramisu".into()).is_err());
        assert_eq!(session.shell().toast_message(), None);
        assert_eq!(session.next_timer_in(), None);
    }

    #[test]
    fn launch_then_advance_reaches_main() {
        let session = session();
        assert!(session.launch().is_ok());
        assert_eq!(session.next_timer_in(), Some(Duration::from_secs(3)));
        assert_eq!(session.advance(Duration::from_secs(3)), 1);
        assert_eq!(session.shell().screen(), Screen::Main);
    }

    #[test]
    fn spanish_session_uses_spanish_toast() {
        let config = AppConfig {
            locale: Locale::EsMx,
            ..AppConfig::default()
        };
        let session = Session::new(&config, Arc::new(test_clock()));
        assert!(session.add_to_cart(&"lasagna".into()).is_ok());
        assert_eq!(
            session.shell().toast_message().as_deref(),
            Some("¡Item agregado al carrito!")
        );
    }
}
