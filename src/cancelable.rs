//! Cooperative cancellation for chained continuations

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Handle guarding a continuation body.
///
/// Cancelling flips a shared "discarded" bit; [`Cancelable::run`] checks it
/// before the body executes, so a continuation whose underlying future has
/// already settled still becomes a no-op.
#[derive(Clone, Debug, Default)]
pub struct Cancelable {
    discarded: Arc<AtomicBool>,
}

impl Cancelable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.discarded.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.discarded.load(Ordering::SeqCst)
    }

    /// Runs `body` unless the handle was cancelled.
    pub fn run<T>(&self, body: impl FnOnce() -> T) -> Option<T> {
        if self.is_cancelled() {
            return None;
        }
        Some(body())
    }
}
