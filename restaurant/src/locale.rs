//! Display locale for reservation descriptions and confirmation messages.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Session display locale
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Locale {
    /// United States English
    #[default]
    #[serde(rename = "en-US")]
    EnUs,
    /// Mexican Spanish
    #[serde(rename = "es-MX")]
    EsMx,
}

/// Unrecognised locale tag
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unsupported locale {0:?} (expected en-US or es-MX)")]
pub struct ParseLocaleError(String);

impl FromStr for Locale {
    type Err = ParseLocaleError;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        match tag.trim().replace('_', "-").to_ascii_lowercase().as_str() {
            "en" | "en-us" => Ok(Self::EnUs),
            "es" | "es-mx" => Ok(Self::EsMx),
            _ => Err(ParseLocaleError(tag.to_string())),
        }
    }
}

impl std::fmt::Display for Locale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::EnUs => "en-US",
            Self::EsMx => "es-MX",
        })
    }
}

impl Locale {
    /// Long date, e.g. `October 18, 2026` or `18 de octubre de 2026`
    #[must_use]
    pub fn long_date(self, at: &DateTime<FixedOffset>) -> String {
        match self {
            Self::EnUs => at.format("%B %-d, %Y").to_string(),
            Self::EsMx => at
                .format_localized("%-d de %B de %Y", chrono::Locale::es_MX)
                .to_string(),
        }
    }

    /// Short time, e.g. `7:30 PM` or `19:30`
    #[must_use]
    pub fn short_time(self, at: &DateTime<FixedOffset>) -> String {
        match self {
            Self::EnUs => at.format("%-I:%M %p").to_string(),
            Self::EsMx => at.format("%H:%M").to_string(),
        }
    }

    /// One-sentence summary of a reservation
    #[must_use]
    pub fn reservation_description(
        self,
        name: &str,
        party_size: u32,
        at: &DateTime<FixedOffset>,
    ) -> String {
        let date = self.long_date(at);
        let time = self.short_time(at);
        match self {
            Self::EnUs => format!(
                "Reservation under the name of: {name}, for {party_size} person(s) on {date} at {time}."
            ),
            Self::EsMx => format!(
                "Reservación a nombre de: {name}, para {party_size} persona(s) el {date} a las {time}"
            ),
        }
    }

    /// Toast shown after adding to the cart
    #[must_use]
    pub const fn item_added_message(self) -> &'static str {
        match self {
            Self::EnUs => "Item added to cart!",
            Self::EsMx => "¡Item agregado al carrito!",
        }
    }
}
