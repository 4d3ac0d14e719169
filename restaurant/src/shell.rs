//! Navigation shell: splash screen, tab selection, toast banner and the home
//! carousel.
//!
//! All timing goes through `Effect::Delay`, so the shell is driven by the
//! store's virtual clock and tests never sleep.

use crate::error::{Error, Result};
use crate::locale::Locale;
use little_lemon_core::{delay, effect::Effect, reducer::Reducer, smallvec, SmallVec};
use little_lemon_runtime::{Store, StoreConfig, Subscription};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::time::Duration;

/// Top-level screen
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Screen {
    /// Branded launch screen
    #[default]
    Splash,
    /// Tabbed main interface
    Main,
}

/// Main interface tabs, in display order
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tab {
    /// Welcome page with the carousel
    #[default]
    Home,
    /// Menu list
    Menu,
    /// Reservation form and status
    Reservations,
    /// Cart contents
    Cart,
}

impl Tab {
    /// Every tab, left to right
    pub const ALL: [Self; 4] = [Self::Home, Self::Menu, Self::Reservations, Self::Cart];

    /// Tab title without the cart badge
    #[must_use]
    pub const fn label(self, locale: Locale) -> &'static str {
        match (self, locale) {
            (Self::Home, Locale::EnUs) => "Home",
            (Self::Home, Locale::EsMx) => "Página Principal",
            (Self::Menu, Locale::EnUs) => "Menu",
            (Self::Menu, Locale::EsMx) => "Menú",
            (Self::Reservations, Locale::EnUs) => "Reservations",
            (Self::Reservations, Locale::EsMx) => "Reservaciones",
            (Self::Cart, Locale::EnUs) => "Cart",
            (Self::Cart, Locale::EsMx) => "Carrito",
        }
    }
}

/// Transient confirmation banner
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Toast {
    /// Sequence number, unique per session
    pub id: u64,
    /// Text shown to the user
    pub message: String,
}

/// View state of the shell
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShellState {
    /// Current screen
    pub screen: Screen,
    /// Selected tab (meaningful on [`Screen::Main`])
    pub tab: Tab,
    /// Banner currently shown
    pub toast: Option<Toast>,
    /// Index into the featured images
    pub featured_index: usize,
    launched: bool,
    last_toast_id: u64,
}

/// Shell actions
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ShellAction {
    /// The app started; schedules the end of the splash
    Launched,
    /// The splash delay ran out
    SplashElapsed,
    /// The user picked a tab
    SelectTab(Tab),
    /// Show a banner, replacing any current one
    ShowToast(String),
    /// Hide the banner with this id, if it is still shown
    DismissToast {
        /// Sequence number of the toast to hide
        id: u64,
    },
    /// Rotate the home carousel
    CarouselTick,
}

/// Delays used by the shell
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShellTimings {
    /// Time on the splash screen
    pub splash_delay: Duration,
    /// Time a toast stays visible
    pub toast_duration: Duration,
    /// Time between carousel images
    pub carousel_interval: Duration,
}

impl Default for ShellTimings {
    fn default() -> Self {
        Self {
            splash_delay: Duration::from_millis(3000),
            toast_duration: Duration::from_millis(2000),
            carousel_interval: Duration::from_millis(2500),
        }
    }
}

/// Dependencies of the shell reducer
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShellEnvironment {
    /// Delays
    pub timings: ShellTimings,
    /// Image keys shown by the home carousel
    pub featured: Vec<String>,
}

impl ShellEnvironment {
    /// Creates an environment with the house carousel images
    #[must_use]
    pub fn new(timings: ShellTimings) -> Self {
        Self {
            timings,
            featured: ["pizza", "lasagna", "tortellini"].map(String::from).to_vec(),
        }
    }

    /// The carousel ticks only with two or more images and a positive interval
    #[must_use]
    pub fn rotates_carousel(&self) -> bool {
        self.featured.len() >= 2 && !self.timings.carousel_interval.is_zero()
    }
}

impl Default for ShellEnvironment {
    fn default() -> Self {
        Self::new(ShellTimings::default())
    }
}

/// Navigation logic
#[derive(Clone, Copy, Debug, Default)]
pub struct ShellReducer;

impl ShellReducer {
    /// Creates the shell reducer
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Reducer for ShellReducer {
    type State = ShellState;
    type Action = ShellAction;
    type Environment = ShellEnvironment;
    type Error = Infallible;

    fn reduce(
        &self,
        state: &mut ShellState,
        action: ShellAction,
        env: &ShellEnvironment,
    ) -> std::result::Result<SmallVec<[Effect<ShellAction>; 4]>, Infallible> {
        match action {
            ShellAction::Launched => {
                if state.launched || state.screen == Screen::Main {
                    return Ok(SmallVec::new());
                }
                state.launched = true;
                tracing::debug!(delay = ?env.timings.splash_delay, "Splash shown");
                Ok(smallvec![delay! {
                    duration: env.timings.splash_delay,
                    action: ShellAction::SplashElapsed
                }])
            },
            ShellAction::SplashElapsed => {
                if state.screen == Screen::Main {
                    return Ok(SmallVec::new());
                }
                state.screen = Screen::Main;
                tracing::debug!("Entered main screen");
                if !env.rotates_carousel() {
                    return Ok(SmallVec::new());
                }
                Ok(smallvec![delay! {
                    duration: env.timings.carousel_interval,
                    action: ShellAction::CarouselTick
                }])
            },
            ShellAction::SelectTab(tab) => {
                if state.screen == Screen::Main {
                    state.tab = tab;
                } else {
                    tracing::debug!(?tab, "Tab selection ignored during splash");
                }
                Ok(SmallVec::new())
            },
            ShellAction::ShowToast(message) => {
                state.last_toast_id += 1;
                let id = state.last_toast_id;
                state.toast = Some(Toast { id, message });
                Ok(smallvec![delay! {
                    duration: env.timings.toast_duration,
                    action: ShellAction::DismissToast { id }
                }])
            },
            ShellAction::DismissToast { id } => {
                if state.toast.as_ref().is_some_and(|toast| toast.id == id) {
                    state.toast = None;
                }
                Ok(SmallVec::new())
            },
            ShellAction::CarouselTick => {
                if env.featured.is_empty() {
                    return Ok(SmallVec::new());
                }
                state.featured_index = (state.featured_index + 1) % env.featured.len();
                if !env.rotates_carousel() {
                    return Ok(SmallVec::new());
                }
                Ok(smallvec![delay! {
                    duration: env.timings.carousel_interval,
                    action: ShellAction::CarouselTick
                }])
            },
        }
    }
}

/// Store type backing [`ShellStore`]
pub type ShellStoreInner = Store<ShellState, ShellAction, ShellEnvironment, ShellReducer>;

/// Shared navigation handle
#[derive(Clone, Debug)]
pub struct ShellStore {
    store: ShellStoreInner,
}

impl ShellStore {
    /// Creates a shell sitting on the splash screen
    #[must_use]
    pub fn new(environment: ShellEnvironment) -> Self {
        Self {
            store: Store::with_config(
                ShellState::default(),
                ShellReducer::new(),
                environment,
                StoreConfig::named("shell"),
            ),
        }
    }

    /// Starts the splash timer
    ///
    /// # Errors
    ///
    /// Returns [`Error::StoreBusy`] when called from a shell listener.
    pub fn launch(&self) -> Result<()> {
        self.store.send(ShellAction::Launched).map_err(Error::from)
    }

    /// Selects a tab (ignored during the splash)
    ///
    /// # Errors
    ///
    /// Returns [`Error::StoreBusy`] when called from a shell listener.
    pub fn select_tab(&self, tab: Tab) -> Result<()> {
        self.store.send(ShellAction::SelectTab(tab)).map_err(Error::from)
    }

    /// Shows a banner that hides itself after the toast duration
    ///
    /// # Errors
    ///
    /// Returns [`Error::StoreBusy`] when called from a shell listener.
    pub fn show_toast(&self, message: impl Into<String>) -> Result<()> {
        self.store
            .send(ShellAction::ShowToast(message.into()))
            .map_err(Error::from)
    }

    /// Current screen
    #[must_use]
    pub fn screen(&self) -> Screen {
        self.store.state(|state| state.screen)
    }

    /// Selected tab
    #[must_use]
    pub fn tab(&self) -> Tab {
        self.store.state(|state| state.tab)
    }

    /// Message of the visible toast
    #[must_use]
    pub fn toast_message(&self) -> Option<String> {
        self.store
            .state(|state| state.toast.as_ref().map(|toast| toast.message.clone()))
    }

    /// Image key the carousel is showing
    #[must_use]
    pub fn featured_image(&self) -> Option<String> {
        let featured = &self.store.environment().featured;
        self.store
            .state(|state| featured.get(state.featured_index).cloned())
    }

    /// Calls `listener` with the new view state after every action
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&ShellState) + 'static,
    {
        self.store.subscribe(listener)
    }

    /// Moves the shell's virtual clock forward, firing due timers
    pub fn advance(&self, by: Duration) -> usize {
        self.store.advance(by)
    }

    /// Time until the next shell timer
    #[must_use]
    pub fn next_timer_in(&self) -> Option<Duration> {
        self.store.next_deferred_in()
    }

    /// The underlying store
    #[must_use]
    pub const fn store(&self) -> &ShellStoreInner {
        &self.store
    }
}
