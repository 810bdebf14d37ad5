//! Progress reporting for loads and catalogue builds.
//!
//! [`ProgressCallback`] keeps the loader and the analytics crate independent
//! of any terminal rendering. The CLI plugs in `indicatif` bars; library
//! callers and tests use [`NullProgress`].

use std::sync::Arc;

/// Receives progress updates from long-running work.
///
/// Implementations must be `Send + Sync` because catalogue tables are built
/// on worker threads that share one callback.
pub trait ProgressCallback: Send + Sync {
    /// Sets the total expected units of work.
    fn set_total(&self, total: u64);

    /// Advances progress by `delta` units.
    fn inc(&self, delta: u64);

    /// Updates the message shown alongside the indicator.
    fn set_message(&self, msg: String);

    /// Marks the work as complete with a final message.
    fn finish(&self, msg: String);
}

/// Discards every update.
pub struct NullProgress;

impl ProgressCallback for NullProgress {
    fn set_total(&self, _total: u64) {}
    fn inc(&self, _delta: u64) {}
    fn set_message(&self, _msg: String) {}
    fn finish(&self, _msg: String) {}
}

/// Returns a shared [`NullProgress`].
#[must_use]
pub fn null_progress() -> Arc<dyn ProgressCallback> {
    Arc::new(NullProgress)
}
