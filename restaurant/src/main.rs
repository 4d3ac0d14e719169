//! Little Lemon demo binary
//!
//! Walks through one app session in the terminal: splash, menu, cart and a
//! reservation, with the timers running in real time.

use anyhow::Context;
use chrono::{Duration as ChronoDuration, Timelike, Utc};
use little_lemon::{screens, AppConfig, Screen, Session, Tab};
use little_lemon_core::environment::SystemClock;
use std::cell::Cell;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    let config = AppConfig::from_env();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(EnvFilter::try_new(&config.log_filter).unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(?config, "Starting Little Lemon");
    let session = Session::new(&config, Arc::new(SystemClock));
    let locale = session.locale();

    let _badge = {
        let shell = session.shell().clone();
        session.cart().subscribe(move |cart| {
            if shell.screen() == Screen::Main {
                println!("  (cart badge: {})", cart.item_count());
            }
        })
    };
    let last_toast = Cell::new(0);
    let _toasts = session.shell().subscribe(move |shell| {
        if let Some(toast) = shell.toast.as_ref().filter(|t| t.id != last_toast.get()) {
            last_toast.set(toast.id);
            println!("  >> {}", toast.message);
        }
    });

    session.launch()?;
    println!("{}", screens::splash());
    run_timers(&session, config.shell_timings().splash_delay).await;

    println!("{}", screens::home(session.shell(), locale));

    session.shell().select_tab(Tab::Menu)?;
    println!("{}", screens::tab_bar(session.shell(), session.cart(), locale));
    println!("{}", screens::menu(session.catalog()));

    let lasagna = session.catalog().find(&"lasagna".into())?.clone();
    println!("{}", screens::item_detail(&lasagna));
    session.add_to_cart(&lasagna.id)?;
    session.add_to_cart(&lasagna.id)?;
    session.add_to_cart(&"avocado-toast".into())?;
    run_timers(&session, config.shell_timings().toast_duration).await;

    session.shell().select_tab(Tab::Cart)?;
    println!("{}", screens::tab_bar(session.shell(), session.cart(), locale));
    println!("{}", screens::cart(session.cart(), session.catalog(), locale));

    session.cart().remove_lines([1])?;
    println!("{}", screens::cart(session.cart(), session.catalog(), locale));

    session.shell().select_tab(Tab::Reservations)?;
    println!("{}", screens::tab_bar(session.shell(), session.cart(), locale));
    println!("{}", screens::reservation_status(session.reservations(), locale));

    let tomorrow_evening = (Utc::now() + ChronoDuration::days(1))
        .with_hour(19)
        .and_then(|at| at.with_minute(30))
        .context("19:30 is a valid time of day")?
        .fixed_offset();
    session.reserve("Ana", 4, tomorrow_evening)?;
    println!("{}", screens::reservation_status(session.reservations(), locale));
    run_timers(&session, config.shell_timings().toast_duration).await;

    session.reservations().cancel()?;
    println!("{}", screens::reservation_status(session.reservations(), locale));

    session.cart().clear()?;
    println!("{}", screens::cart(session.cart(), session.catalog(), locale));

    tracing::info!("Demo complete");
    Ok(())
}

/// Sleeps for `total`, firing session timers as they fall due
async fn run_timers(session: &Session, total: Duration) {
    let mut remaining = total;
    while !remaining.is_zero() {
        let step = session
            .next_timer_in()
            .map_or(remaining, |next| next.min(remaining));
        tokio::time::sleep(step).await;
        session.advance(step);
        remaining -= step;
    }
}
