//! Configuration management for the Little Lemon app.
//!
//! Loads configuration from environment variables with sensible defaults.
//! Unparseable values are logged and replaced by their default.

use crate::locale::Locale;
use crate::reservation::ReservationPolicy;
use crate::shell::ShellTimings;
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Splash auto-advance delay in milliseconds (default: 3000)
    pub splash_delay_ms: u64,
    /// Toast auto-dismiss delay in milliseconds (default: 2000)
    pub toast_ms: u64,
    /// Carousel rotation interval in milliseconds (default: 2500)
    pub carousel_ms: u64,
    /// Locale of reservation descriptions and messages (default: en-US)
    pub locale: Locale,
    /// Refuse reservations for times already passed (default: true)
    pub reject_past_reservations: bool,
    /// Tracing filter directives
    pub log_filter: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            splash_delay_ms: 3000,
            toast_ms: 2000,
            carousel_ms: 2500,
            locale: Locale::EnUs,
            reject_past_reservations: true,
            log_filter: "little_lemon=info,little_lemon_runtime=info".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from any key/value source
    ///
    /// `lookup` returns `None` for unset keys.
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            splash_delay_ms: millis_or(&lookup, "LITTLE_LEMON_SPLASH_DELAY_MS", defaults.splash_delay_ms),
            toast_ms: millis_or(&lookup, "LITTLE_LEMON_TOAST_MS", defaults.toast_ms),
            carousel_ms: millis_or(&lookup, "LITTLE_LEMON_CAROUSEL_MS", defaults.carousel_ms),
            locale: parse_or(&lookup, "LITTLE_LEMON_LOCALE", defaults.locale),
            reject_past_reservations: parse_or(
                &lookup,
                "LITTLE_LEMON_REJECT_PAST_RESERVATIONS",
                defaults.reject_past_reservations,
            ),
            log_filter: lookup("RUST_LOG").unwrap_or(defaults.log_filter),
        }
    }

    /// Shell delays derived from the millisecond settings
    #[must_use]
    pub const fn shell_timings(&self) -> ShellTimings {
        ShellTimings {
            splash_delay: Duration::from_millis(self.splash_delay_ms),
            toast_duration: Duration::from_millis(self.toast_ms),
            carousel_interval: Duration::from_millis(self.carousel_ms),
        }
    }

    /// Reservation acceptance rules
    #[must_use]
    pub const fn reservation_policy(&self) -> ReservationPolicy {
        ReservationPolicy {
            reject_past: self.reject_past_reservations,
        }
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + std::fmt::Debug,
    T::Err: std::fmt::Display,
{
    let Some(raw) = lookup(key) else {
        return default;
    };
    match raw.trim().parse() {
        Ok(value) => value,
        Err(error) => {
            tracing::warn!(key, value = %raw, %error, ?default, "Invalid configuration value, using default");
            default
        },
    }
}

/// Timer settings must be positive; a zero interval would fire forever
fn millis_or<F>(lookup: &F, key: &str, default: u64) -> u64
where
    F: Fn(&str) -> Option<String>,
{
    match parse_or(lookup, key, default) {
        0 => {
            tracing::warn!(key, default, "Timer interval must be positive, using default");
            default
        },
        millis => millis,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        assert_eq!(AppConfig::from_lookup(|_| None), AppConfig::default());
        assert_eq!(AppConfig::default().shell_timings(), ShellTimings::default());
    }

    #[test]
    fn reads_overrides() {
        let config = AppConfig::from_lookup(lookup(&[
            ("LITTLE_LEMON_SPLASH_DELAY_MS", "500"),
            ("LITTLE_LEMON_LOCALE", "es-MX"),
            ("LITTLE_LEMON_REJECT_PAST_RESERVATIONS", "false"),
            ("RUST_LOG", "debug"),
        ]));
        assert_eq!(config.shell_timings().splash_delay, Duration::from_millis(500));
        assert_eq!(config.locale, Locale::EsMx);
        assert!(!config.reservation_policy().reject_past);
        assert_eq!(config.log_filter, "debug");
    }

    #[test]
    fn invalid_values_fall_back() {
        let config = AppConfig::from_lookup(lookup(&[
            ("LITTLE_LEMON_TOAST_MS", "soon"),
            ("LITTLE_LEMON_LOCALE", "klingon"),
            ("LITTLE_LEMON_REJECT_PAST_RESERVATIONS", "maybe"),
        ]));
        assert_eq!(config.toast_ms, 2000);
        assert_eq!(config.locale, Locale::EnUs);
        assert!(config.reject_past_reservations);
    }

    #[test]
    fn zero_intervals_fall_back() {
        let config = AppConfig::from_lookup(lookup(&[
            ("LITTLE_LEMON_SPLASH_DELAY_MS", "0"),
            ("LITTLE_LEMON_TOAST_MS", " 0 "),
            ("LITTLE_LEMON_CAROUSEL_MS", "0"),
        ]));
        assert_eq!(config.splash_delay_ms, 3000);
        assert_eq!(config.toast_ms, 2000);
        assert_eq!(config.carousel_ms, 2500);
        assert!(!config.shell_timings().carousel_interval.is_zero());
    }
}
