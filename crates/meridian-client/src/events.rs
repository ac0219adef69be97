//! # Session Events
//!
//! The data layer never shows UI. When the session changes it emits a
//! [`SessionEvent`] and the app decides what to do (navigate to login,
//! show "You have been logged out", refresh menus).

use meridian_core::SessionEvent;

/// Receives session lifecycle events (implemented by the app shell).
pub trait SessionEventEmitter: Send + Sync {
    fn emit(&self, event: &SessionEvent);
}

/// No-op event emitter for headless use and tests.
pub struct NoOpEmitter;

impl SessionEventEmitter for NoOpEmitter {
    fn emit(&self, _event: &SessionEvent) {}
}
