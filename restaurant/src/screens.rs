//! Plain-text renderings of each screen.
//!
//! These read from the shared stores and never mutate them. The demo binary
//! prints them; tests compare them.

use crate::cart::CartStore;
use crate::catalog::{MenuCatalog, MenuItem};
use crate::locale::Locale;
use crate::reservation::ReservationStore;
use crate::shell::{ShellStore, Tab};
use rust_decimal::Decimal;
use std::fmt::Write as _;

struct Strings {
    welcome: &'static str,
    tagline: &'static str,
    featured: &'static str,
    empty_cart: &'static str,
    total: &'static str,
    active_reservation: &'static str,
    no_reservation: &'static str,
}

const fn strings(locale: Locale) -> &'static Strings {
    const EN_US: Strings = Strings {
        welcome: "Welcome to Little Lemon",
        tagline: "Enjoy the best Italian dishes from the comfort of your home.",
        featured: "You might like",
        empty_cart: "Your cart is empty.",
        total: "Total:",
        active_reservation: "You have an active reservation:",
        no_reservation: "You have no active reservation.",
    };
    const ES_MX: Strings = Strings {
        welcome: "Bienvenido a Little Lemon",
        tagline: "Disfruta de los mejores platillos italianos desde la comodidad de tu hogar.",
        featured: "Opciones que te pueden gustar",
        empty_cart: "Tu carrito está vacío.",
        total: "Total:",
        active_reservation: "Tienes una reservación activa:",
        no_reservation: "No tienes una reservación activa.",
    };
    match locale {
        Locale::EnUs => &EN_US,
        Locale::EsMx => &ES_MX,
    }
}

/// `$` followed by the amount rounded to cents, e.g. `$31.98`
#[must_use]
pub fn format_price(amount: Decimal) -> String {
    format!("${:.2}", amount.round_dp(2))
}

/// Launch screen
#[must_use]
pub fn splash() -> String {
    "Little Lemon\nTomato Tortellini, Bottarga and Carbonara\n".to_string()
}

/// Home tab with the current carousel image
#[must_use]
pub fn home(shell: &ShellStore, locale: Locale) -> String {
    let text = strings(locale);
    let mut out = format!("{}\n{}\n\n{}:", text.welcome, text.tagline, text.featured);
    if let Some(image) = shell.featured_image() {
        let _ = write!(out, " [{image}]");
    }
    out.push('\n');
    out
}

/// Menu tab: one `name  $price` row per item
#[must_use]
pub fn menu(catalog: &MenuCatalog) -> String {
    let width = catalog
        .list_items()
        .iter()
        .map(|item| item.name.chars().count())
        .max()
        .unwrap_or(0);

    catalog.list_items().iter().fold(String::new(), |mut out, item| {
        let _ = writeln!(out, "{:<width$}  {}", item.name, format_price(item.unit_price));
        out
    })
}

/// Detail page of one item
#[must_use]
pub fn item_detail(item: &MenuItem) -> String {
    format!(
        "{}\n{}\n{}\n",
        item.name,
        item.description,
        format_price(item.unit_price)
    )
}

/// Cart tab: `name (qty)  $subtotal` rows and the total
#[must_use]
pub fn cart(cart: &CartStore, catalog: &MenuCatalog, locale: Locale) -> String {
    let text = strings(locale);
    let lines = cart.lines();
    if lines.is_empty() {
        return format!("{}\n", text.empty_cart);
    }

    let mut out = String::new();
    for line in &lines {
        let name = catalog
            .get(&line.item)
            .map_or_else(|| line.item.to_string(), |item| item.name.clone());
        let _ = writeln!(
            out,
            "{name} ({})  {}",
            line.quantity,
            format_price(line.subtotal())
        );
    }
    let _ = writeln!(out, "{} {}", text.total, format_price(cart.total_price()));
    out
}

/// Reservation tab status block
#[must_use]
pub fn reservation_status(reservations: &ReservationStore, locale: Locale) -> String {
    let text = strings(locale);
    if reservations.has_active() {
        format!(
            "{}\n{}\n",
            text.active_reservation,
            reservations.active_description()
        )
    } else {
        format!("{}\n", text.no_reservation)
    }
}

/// Tab bar with the selected tab bracketed and the cart badge
#[must_use]
pub fn tab_bar(shell: &ShellStore, cart: &CartStore, locale: Locale) -> String {
    let selected = shell.tab();
    let badge = cart.item_count();
    Tab::ALL
        .iter()
        .map(|&tab| {
            let label = match tab {
                Tab::Cart => format!("{} ({badge})", tab.label(locale)),
                _ => tab.label(locale).to_string(),
            };
            if tab == selected {
                format!("[{label}]")
            } else {
                label
            }
        })
        .collect::<Vec<_>>()
        .join(" | ")
}
