use crate::core::{Callback, TimeT, TimerId, TimerService};
use std::cell::Cell;

/// Restartable one-shot timer bound to a fixed callback and default delay.
///
/// At most one platform timer is pending per handle: arming always cancels
/// the previous arm first, and dropping the handle cancels any pending fire.
/// The pending id is private to the handle.
pub struct TimeoutHandle {
    service: TimerService,
    callback: Callback,
    duration_ms: TimeT,
    pending: Cell<Option<TimerId>>,
}

impl TimeoutHandle {
    /// A `duration_ms` of 0 fires on the event loop's next due pass.
    pub fn new(service: &TimerService, callback: Callback, duration_ms: TimeT) -> Self {
        Self {
            service: service.clone(),
            callback,
            duration_ms,
            pending: Cell::new(None),
        }
    }

    /// Arm the timer for the default delay, superseding any pending arm.
    pub fn start(&self) {
        self.arm(self.duration_ms);
    }

    /// Arm the timer for `override_ms` instead of the default. The override
    /// applies to this arm only; it is never remembered.
    pub fn start_with(&self, override_ms: TimeT) {
        self.arm(override_ms);
    }

    /// Cancel the pending fire. No-op when nothing is pending.
    pub fn stop(&self) {
        if let Some(id) = self.pending.take() {
            self.service.clear_timeout(&id);
        }
    }

    /// `stop` then `start`. Always the default delay, even when the previous
    /// arm used an override.
    pub fn restart(&self) {
        self.stop();
        self.start();
    }

    fn arm(&self, duration_ms: TimeT) {
        self.stop();
        let id = self.service.set_timeout(self.callback.clone(), duration_ms);
        self.pending.set(Some(id));
    }
}

impl Drop for TimeoutHandle {
    fn drop(&mut self) {
        self.stop();
    }
}
