//! A cloneable handle for cancelling a session from another task.

use parking_lot::Mutex;
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use tokio_util::sync::CancellationToken;

/// A cloneable handle for poking the session from external code.
///
/// All fields are `Arc`-wrapped, so cloning is cheap. A fresh token is armed
/// for every request, so a cancel issued while idle never leaks into the next
/// exchange.
#[derive(Clone)]
pub struct SessionHandle {
    cancel: Arc<Mutex<CancellationToken>>,
    is_running: Arc<AtomicBool>,
}

impl Default for SessionHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionHandle {
    pub(crate) fn new() -> Self {
        Self {
            cancel: Arc::new(Mutex::new(CancellationToken::new())),
            is_running: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Cancel the in-flight request, if any.
    ///
    /// Returns whether a request was live.
    pub fn cancel(&self) -> bool {
        if !self.is_running() {
            return false;
        }
        tracing::info!("Cancelling in-flight request");
        self.cancel.lock().cancel();
        true
    }

    /// Whether a request is currently in flight.
    pub fn is_running(&self) -> bool {
        self.is_running.load(Ordering::Acquire)
    }

    /// Arm a fresh token and mark the session busy.
    pub(crate) fn begin(&self) -> CancellationToken {
        let token = CancellationToken::new();
        *self.cancel.lock() = token.clone();
        self.is_running.store(true, Ordering::Release);
        token
    }

    /// Mark the session idle.
    pub(crate) fn finish(&self) {
        self.is_running.store(false, Ordering::Release);
    }
}
