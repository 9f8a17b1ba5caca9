//! Event log for timing the notebook under load, built only with the
//! `profiling` feature.
//!
//! Store access, scoring, SM-2 updates, review session builds and handler
//! entry each append one JSON line to a file under `{DATA_DIR}/profiles`.
//! A default build swaps in the stand-ins from `noop`, and both macros
//! reduce to their input.

#[cfg(feature = "profiling")]
mod event;
#[cfg(feature = "profiling")]
mod logger;

#[cfg(feature = "profiling")]
pub use event::*;
#[cfg(feature = "profiling")]
pub use logger::*;

#[cfg(not(feature = "profiling"))]
mod noop;
#[cfg(not(feature = "profiling"))]
pub use noop::*;

/// Append an `EventType` to the profile log.
///
/// ```ignore
/// profile_log!(EventType::StoreOp {
///     operation: "save".into(),
///     key: STREAK_KEY.into(),
/// });
/// ```
#[cfg(feature = "profiling")]
#[macro_export]
macro_rules! profile_log {
    ($event:expr) => {
        $crate::profiling::log_event($event)
    };
}

#[cfg(not(feature = "profiling"))]
#[macro_export]
macro_rules! profile_log {
    ($($args:tt)*) => {};
}

/// Evaluate `$body` and log how long it took under `$name`. Yields the
/// body's value either way.
#[cfg(feature = "profiling")]
#[macro_export]
macro_rules! profile_scope {
    ($name:expr, $body:block) => {{
        let started = std::time::Instant::now();
        let value = $body;
        $crate::profiling::log_timed($name, started.elapsed());
        value
    }};
}

#[cfg(not(feature = "profiling"))]
#[macro_export]
macro_rules! profile_scope {
    ($name:expr, $body:block) => {
        $body
    };
}
