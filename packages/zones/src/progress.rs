//! Assignment progress hooks.
//!
//! Matching every eligible commune against the zone centers is the one
//! step of a formation run whose duration grows with the table. The
//! analyzer announces how many communes it will assign, moves the position
//! forward every few hundred communes and clears the indicator when done.
//! Terminal rendering lives in the CLI utilities crate.

use std::sync::Arc;

/// Receiver for assignment progress events.
///
/// A single analyzer may run formations from several threads at once, so
/// receivers are shared behind an `Arc` and must be `Send + Sync`.
pub trait ProgressCallback: Send + Sync {
    /// Number of communes about to be assigned.
    fn set_total(&self, total: u64);

    /// Communes processed so far in the current run.
    fn set_position(&self, pos: u64);

    /// Label for the running step.
    fn set_message(&self, msg: String);

    /// Called once assignment finishes, whether or not anything matched.
    fn finish_and_clear(&self);
}

/// Ignores every event. Used when no indicator is attached.
pub struct NullProgress;

impl ProgressCallback for NullProgress {
    fn set_total(&self, _total: u64) {}
    fn set_position(&self, _pos: u64) {}
    fn set_message(&self, _msg: String) {}
    fn finish_and_clear(&self) {}
}

#[must_use]
pub fn null_progress() -> Arc<dyn ProgressCallback> {
    Arc::new(NullProgress)
}
