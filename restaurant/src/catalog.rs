//! Static menu catalog.
//!
//! The catalog is built once per session and never changes afterwards, so it
//! is shared between stores and screens as an `Arc<MenuCatalog>`.

use crate::error::{Error, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Stable identifier of a menu item (a slug such as `lasagna`)
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MenuItemId(String);

impl MenuItemId {
    /// Creates an id from a slug
    #[must_use]
    pub fn new(slug: impl Into<String>) -> Self {
        Self(slug.into())
    }

    /// Returns the slug
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for MenuItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MenuItemId {
    fn from(slug: &str) -> Self {
        Self::new(slug)
    }
}

/// An orderable dish
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    /// Unique identifier
    pub id: MenuItemId,
    /// Display name
    pub name: String,
    /// One-line description
    pub description: String,
    /// Opaque image asset key
    pub image: String,
    /// Price of one unit
    pub unit_price: Decimal,
}

impl MenuItem {
    /// Creates a menu item
    #[must_use]
    pub fn new(
        id: impl Into<MenuItemId>,
        name: impl Into<String>,
        description: impl Into<String>,
        image: impl Into<String>,
        unit_price: Decimal,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            image: image.into(),
            unit_price,
        }
    }
}

/// Read-only, ordered list of menu items
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MenuCatalog {
    items: Vec<MenuItem>,
}

impl MenuCatalog {
    /// Builds a catalog, checking that ids are unique, names non-empty and
    /// prices non-negative
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCatalog`] describing the first bad item.
    pub fn new(items: Vec<MenuItem>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(items.len());
        for item in &items {
            if item.name.trim().is_empty() {
                return Err(Error::InvalidCatalog(format!("item {} has an empty name", item.id)));
            }
            if item.unit_price.is_sign_negative() {
                return Err(Error::InvalidCatalog(format!(
                    "item {} has a negative price",
                    item.id
                )));
            }
            if !seen.insert(&item.id) {
                return Err(Error::InvalidCatalog(format!("duplicate item id {}", item.id)));
            }
        }
        Ok(Self { items })
    }

    /// The restaurant's house menu
    #[must_use]
    pub fn reference() -> Self {
        Self {
            items: vec![
                MenuItem::new(
                    "lasagna",
                    "Lasagna",
                    "Classic Italian lasagna with bolognese sauce.",
                    "lasagna",
                    Decimal::new(1599, 2),
                ),
                MenuItem::new(
                    "fettuccine-alfredo",
                    "Fettuccine Alfredo",
                    "Creamy pasta in a rich Alfredo sauce.",
                    "fettuccini",
                    Decimal::new(1349, 2),
                ),
                MenuItem::new(
                    "spaghetti",
                    "Spaghetti",
                    "Spaghetti al dente with marinara sauce.",
                    "spaghetti",
                    Decimal::new(1299, 2),
                ),
                MenuItem::new(
                    "avocado-toast",
                    "Avocado Toast",
                    "Toasted bread with fresh avocado and spices.",
                    "avocado_toast",
                    Decimal::new(999, 2),
                ),
                MenuItem::new(
                    "tortellini",
                    "Tortellini",
                    "Cheese-filled pasta tossed in pesto.",
                    "tortellini",
                    Decimal::new(1449, 2),
                ),
                MenuItem::new(
                    "pizza",
                    "Pizza",
                    "Classic margherita pizza with fresh basil.",
                    "pizza",
                    Decimal::new(1799, 2),
                ),
            ],
        }
    }

    /// All items in menu order
    #[must_use]
    pub fn list_items(&self) -> &[MenuItem] {
        &self.items
    }

    /// Looks up an item by id
    ///
    /// # Errors
    ///
    /// Returns [`Error::ItemNotFound`] for ids outside the catalog.
    pub fn find(&self, id: &MenuItemId) -> Result<&MenuItem> {
        self.get(id).ok_or_else(|| Error::ItemNotFound { id: id.clone() })
    }

    /// Looks up an item by id
    #[must_use]
    pub fn get(&self, id: &MenuItemId) -> Option<&MenuItem> {
        self.items.iter().find(|item| &item.id == id)
    }

    /// Item ids in menu order
    pub fn ids(&self) -> impl Iterator<Item = &MenuItemId> {
        self.items.iter().map(|item| &item.id)
    }

    /// Number of items
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true for an empty menu
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Default for MenuCatalog {
    fn default() -> Self {
        Self::reference()
    }
}
