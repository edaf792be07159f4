use crate::core::{Callback, TimeT, TimerId, TimerService};
use std::cell::Cell;

/// Restartable repeating timer bound to a fixed callback and default period.
///
/// Same contract as [`TimeoutHandle`](crate::handle::TimeoutHandle) with
/// repeating semantics: once started the callback fires every period until
/// the handle is stopped or dropped.
pub struct IntervalHandle {
    service: TimerService,
    callback: Callback,
    period_ms: TimeT,
    pending: Cell<Option<TimerId>>,
}

impl IntervalHandle {
    pub fn new(service: &TimerService, callback: Callback, period_ms: TimeT) -> Self {
        Self {
            service: service.clone(),
            callback,
            period_ms,
            pending: Cell::new(None),
        }
    }

    /// Arm the timer at the default period, superseding any pending arm.
    pub fn start(&self) {
        self.arm(self.period_ms);
    }

    /// Arm the timer at `override_ms` instead of the default. The override
    /// governs this arm only; it is never remembered.
    pub fn start_with(&self, override_ms: TimeT) {
        self.arm(override_ms);
    }

    /// Cancel all future recurrences. No-op when nothing is pending.
    pub fn stop(&self) {
        if let Some(id) = self.pending.take() {
            self.service.clear_interval(&id);
        }
    }

    /// `stop` then `start`. Always the default period, even when the previous
    /// arm used an override.
    pub fn restart(&self) {
        self.stop();
        self.start();
    }

    fn arm(&self, period_ms: TimeT) {
        self.stop();
        let id = self.service.set_interval(self.callback.clone(), period_ms);
        self.pending.set(Some(id));
    }
}

impl Drop for IntervalHandle {
    fn drop(&mut self) {
        self.stop();
    }
}
