//! Shopping cart: reducer, state and the shared [`CartStore`] handle.
//!
//! Lines keep insertion order and there is at most one line per menu item.
//! Adding an item already in the cart bumps that line's quantity.

use crate::catalog::{MenuCatalog, MenuItemId};
use crate::error::{Error, Result};
use little_lemon_core::{effect::Effect, reducer::Reducer, SmallVec};
use little_lemon_runtime::{Store, StoreConfig, Subscription};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;

/// One row of the cart
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    /// Catalog item this line refers to
    pub item: MenuItemId,
    /// Unit price copied from the catalog when the line was created
    pub unit_price: Decimal,
    /// Always at least 1
    pub quantity: u32,
}

impl CartLine {
    /// `unit_price × quantity`
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// Cart contents
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartState {
    lines: Vec<CartLine>,
}

impl CartState {
    /// Lines in insertion order
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Number of distinct lines
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Returns true when the cart has no lines
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Sum of line subtotals, computed on every call
    #[must_use]
    pub fn total_price(&self) -> Decimal {
        self.lines.iter().map(CartLine::subtotal).sum()
    }

    /// Sum of quantities (the tab badge)
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines
            .iter()
            .fold(0u32, |count, line| count.saturating_add(line.quantity))
    }

    /// The line for `id`, if the item is in the cart
    #[must_use]
    pub fn line_for(&self, id: &MenuItemId) -> Option<&CartLine> {
        self.lines.iter().find(|line| &line.item == id)
    }

    /// Quantity of `id` in the cart (0 when absent)
    #[must_use]
    pub fn quantity_of(&self, id: &MenuItemId) -> u32 {
        self.line_for(id).map_or(0, |line| line.quantity)
    }
}

/// Cart actions
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CartAction {
    /// Add one unit of a catalog item
    AddItem {
        /// Item to add
        id: MenuItemId,
    },
    /// Remove the lines at these positions
    RemoveLines {
        /// Positions, validated against the cart length at dispatch time
        indices: BTreeSet<usize>,
    },
    /// Empty the cart
    Clear,
}

/// Dependencies of the cart reducer
#[derive(Clone, Debug)]
pub struct CartEnvironment {
    /// Menu used to resolve ids and prices
    pub catalog: Arc<MenuCatalog>,
}

impl CartEnvironment {
    /// Creates a cart environment over `catalog`
    #[must_use]
    pub const fn new(catalog: Arc<MenuCatalog>) -> Self {
        Self { catalog }
    }
}

/// Cart business logic
#[derive(Clone, Copy, Debug, Default)]
pub struct CartReducer;

impl CartReducer {
    /// Creates the cart reducer
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Reducer for CartReducer {
    type State = CartState;
    type Action = CartAction;
    type Environment = CartEnvironment;
    type Error = Error;

    fn reduce(
        &self,
        state: &mut CartState,
        action: CartAction,
        env: &CartEnvironment,
    ) -> std::result::Result<SmallVec<[Effect<CartAction>; 4]>, Error> {
        match action {
            CartAction::AddItem { id } => {
                let item = env.catalog.find(&id)?;
                if let Some(line) = state.lines.iter_mut().find(|line| line.item == id) {
                    line.quantity = line.quantity.saturating_add(1);
                    tracing::debug!(item = %id, quantity = line.quantity, "Cart line incremented");
                } else {
                    state.lines.push(CartLine {
                        item: id,
                        unit_price: item.unit_price,
                        quantity: 1,
                    });
                    tracing::debug!(item = %item.id, "Cart line added");
                }
            },
            CartAction::RemoveLines { indices } => {
                let len = state.lines.len();
                if let Some(&index) = indices.range(len..).next() {
                    return Err(Error::IndexOutOfRange { index, len });
                }
                for &index in indices.iter().rev() {
                    state.lines.remove(index);
                }
                tracing::debug!(removed = indices.len(), "Cart lines removed");
            },
            CartAction::Clear => {
                state.lines.clear();
                tracing::debug!("Cart cleared");
            },
        }

        Ok(SmallVec::new())
    }
}

/// Store type backing [`CartStore`]
pub type CartStoreInner = Store<CartState, CartAction, CartEnvironment, CartReducer>;

/// Shared cart handle
///
/// Clones refer to the same cart, so every screen holding one sees every
/// change.
#[derive(Clone, Debug)]
pub struct CartStore {
    store: CartStoreInner,
}

impl CartStore {
    /// Creates an empty cart over `catalog`
    #[must_use]
    pub fn new(catalog: Arc<MenuCatalog>) -> Self {
        Self {
            store: Store::with_config(
                CartState::default(),
                CartReducer::new(),
                CartEnvironment::new(catalog),
                StoreConfig::named("cart"),
            ),
        }
    }

    /// Adds one unit of `id`
    ///
    /// # Errors
    ///
    /// - [`Error::ItemNotFound`] when `id` is not on the menu
    /// - [`Error::StoreBusy`] when called from a cart listener
    pub fn add_item(&self, id: &MenuItemId) -> Result<()> {
        self.store
            .send(CartAction::AddItem { id: id.clone() })
            .map_err(Error::from)
    }

    /// Removes the lines at `indices`, all or nothing
    ///
    /// # Errors
    ///
    /// - [`Error::IndexOutOfRange`] when any position is past the end; the
    ///   cart is left unchanged
    /// - [`Error::StoreBusy`] when called from a cart listener
    pub fn remove_lines<I>(&self, indices: I) -> Result<()>
    where
        I: IntoIterator<Item = usize>,
    {
        let indices = indices.into_iter().collect();
        self.store
            .send(CartAction::RemoveLines { indices })
            .map_err(Error::from)
    }

    /// Empties the cart
    ///
    /// # Errors
    ///
    /// Returns [`Error::StoreBusy`] when called from a cart listener.
    pub fn clear(&self) -> Result<()> {
        self.store.send(CartAction::Clear).map_err(Error::from)
    }

    /// Current total price
    #[must_use]
    pub fn total_price(&self) -> Decimal {
        self.store.state(CartState::total_price)
    }

    /// Current sum of quantities
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.store.state(CartState::item_count)
    }

    /// Snapshot of the lines
    #[must_use]
    pub fn lines(&self) -> Vec<CartLine> {
        self.store.state(|state| state.lines.clone())
    }

    /// Quantity of `id` in the cart
    #[must_use]
    pub fn quantity_of(&self, id: &MenuItemId) -> u32 {
        self.store.state(|state| state.quantity_of(id))
    }

    /// Returns true when the cart has no lines
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.store.state(CartState::is_empty)
    }

    /// Calls `listener` with the new cart after every successful change
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&CartState) + 'static,
    {
        self.store.subscribe(listener)
    }

    /// The underlying store
    #[must_use]
    pub const fn store(&self) -> &CartStoreInner {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use little_lemon_testing::{assertions, ReducerTest};

    fn env() -> CartEnvironment {
        CartEnvironment::new(Arc::new(MenuCatalog::reference()))
    }

    fn line(id: &str, cents: i64, quantity: u32) -> CartLine {
        CartLine {
            item: MenuItemId::new(id),
            unit_price: Decimal::new(cents, 2),
            quantity,
        }
    }

    fn cart(lines: Vec<CartLine>) -> CartState {
        CartState { lines }
    }

    #[test]
    fn first_add_appends_a_line() {
        ReducerTest::new(CartReducer::new())
            .with_env(env())
            .given_state(CartState::default())
            .when_action(CartAction::AddItem { id: "lasagna".into() })
            .then_state(|state| {
                assert_eq!(state.lines(), &[line("lasagna", 1599, 1)]);
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn repeat_add_increments_quantity() {
        ReducerTest::new(CartReducer::new())
            .with_env(env())
            .given_state(cart(vec![line("pizza", 1799, 1), line("lasagna", 1599, 1)]))
            .when_action(CartAction::AddItem { id: "lasagna".into() })
            .then_state(|state| {
                assert_eq!(state.len(), 2);
                assert_eq!(state.lines()[1].quantity, 2);
                assert_eq!(state.item_count(), 3);
            })
            .run();
    }

    #[test]
    fn unknown_item_is_rejected() {
        ReducerTest::new(CartReducer::new())
            .with_env(env())
            .given_state(cart(vec![line("pizza", 1799, 1)]))
            .when_action(CartAction::AddItem { id: "tiramisu".into() })
            .then_state(|state| assert_eq!(state.lines(), &[line("pizza", 1799, 1)]))
            .then_error(|error| {
                assert_eq!(*error, Error::ItemNotFound { id: "tiramisu".into() });
            })
            .run();
    }

    #[test]
    fn remove_lines_keeps_remaining_order() {
        ReducerTest::new(CartReducer::new())
            .with_env(env())
            .given_state(cart(vec![
                line("lasagna", 1599, 1),
                line("pizza", 1799, 2),
                line("spaghetti", 1299, 1),
            ]))
            .when_action(CartAction::RemoveLines { indices: BTreeSet::from([0, 2]) })
            .then_state(|state| assert_eq!(state.lines(), &[line("pizza", 1799, 2)]))
            .run();
    }

    #[test]
    fn out_of_range_removal_changes_nothing() {
        let before = cart(vec![line("lasagna", 1599, 1), line("pizza", 1799, 1)]);
        let expected = before.clone();
        ReducerTest::new(CartReducer::new())
            .with_env(env())
            .given_state(before)
            .when_action(CartAction::RemoveLines { indices: BTreeSet::from([0, 2, 5]) })
            .then_state(move |state| assert_eq!(*state, expected))
            .then_error(|error| assert_eq!(*error, Error::IndexOutOfRange { index: 2, len: 2 }))
            .run();
    }

    #[test]
    fn clear_empties_any_cart() {
        ReducerTest::new(CartReducer::new())
            .with_env(env())
            .given_state(cart(vec![line("pizza", 1799, 4)]))
            .when_action(CartAction::Clear)
            .then_state(|state| {
                assert!(state.is_empty());
                assert_eq!(state.total_price(), Decimal::ZERO);
            })
            .run();
    }

    #[test]
    fn totals_are_exact_decimals() {
        let state = cart(vec![line("lasagna", 1599, 2), line("avocado-toast", 999, 3)]);
        assert_eq!(state.total_price(), Decimal::new(6195, 2));
        assert_eq!(state.lines()[1].subtotal(), Decimal::new(2997, 2));
        assert_eq!(state.quantity_of(&"avocado-toast".into()), 3);
        assert_eq!(state.quantity_of(&"pizza".into()), 0);
    }

    #[test]
    fn store_handle_notifies_on_success_only() {
        let cart = CartStore::new(Arc::new(MenuCatalog::reference()));
        let (recorder, _subscription) =
            little_lemon_testing::Recorder::attach(cart.store(), CartState::item_count);

        assert!(cart.add_item(&"pizza".into()).is_ok());
        assert!(cart.add_item(&"tiramisu".into()).is_err());
        assert!(cart.remove_lines([4]).is_err());
        assert!(cart.clear().is_ok());

        assert_eq!(recorder.values(), vec![1, 0]);
    }

    #[test]
    fn clones_share_one_cart() {
        let cart = CartStore::new(Arc::new(MenuCatalog::reference()));
        let menu_screen = cart.clone();
        assert!(menu_screen.add_item(&"spaghetti".into()).is_ok());
        assert_eq!(cart.item_count(), 1);
        assert_eq!(cart.total_price(), Decimal::new(1299, 2));
    }

    #[test]
    fn cart_lines_serialize_prices_as_strings() {
        let json = serde_json::to_value(line("pizza", 1799, 2)).unwrap_or_default();
        assert_eq!(json["unit_price"], "17.99");
        assert_eq!(json["quantity"], 2);
    }
}
