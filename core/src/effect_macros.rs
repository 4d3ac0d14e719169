//! Declarative macros for ergonomic effect construction

/// Create an `Effect::Delay` for scheduling delayed actions
///
/// # Example
///
/// ```
/// use little_lemon_core::{delay, effect::Effect};
/// use std::time::Duration;
///
/// #[derive(Debug)]
/// enum ShellAction {
///     SplashElapsed,
/// }
///
/// let effect = delay! {
///     duration: Duration::from_secs(3),
///     action: ShellAction::SplashElapsed
/// };
/// assert!(matches!(effect, Effect::Delay { .. }));
/// ```
#[macro_export]
macro_rules! delay {
    (
        duration: $duration:expr,
        action: $action:expr
    ) => {
        $crate::effect::Effect::Delay {
            duration: $duration,
            action: ::std::boxed::Box::new($action),
        }
    };
}
