use crate::core::{
    clock::{Clock, TimeT},
    timer::{Scheduled, TimerId},
    wheel::{Bucket, FarHeap, Wheel},
};
use std::{collections::HashMap, sync::Arc};

/// Pending-deadline store: two timing wheels plus a far-future heap.
///
/// Deadlines within the short span live in the fine wheel, the next tier in
/// the long wheel, anything further in the heap. Draining advances the
/// internal tick to the clock reading and cascades entries inward at span
/// boundaries. A deadline fires no earlier than its timestamp and no later
/// than one short-wheel resolution past it.
pub struct Store {
    clock: Arc<dyn Clock>,
    tick: TimeT,
    lookup: HashMap<TimerId, TimeT>,
    short_wheel: Wheel,
    long_wheel: Wheel,
    overdue: Bucket,
    far: FarHeap,
}

impl Store {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        let short_wheel = Wheel::short();
        let tick = short_wheel.align(clock.now());
        Self {
            clock,
            tick,
            lookup: HashMap::new(),
            short_wheel,
            long_wheel: Wheel::long(),
            overdue: Bucket::new(),
            far: FarHeap::new(),
        }
    }

    /// Track `id` to fire at the absolute timestamp `due`.
    pub fn schedule(&mut self, id: TimerId, due: TimeT) {
        let previous = self.lookup.insert(id, due);
        debug_assert!(previous.is_none(), "timer id scheduled twice");

        let entry = Scheduled::new(id, due);
        if due < self.tick {
            self.overdue.push(entry);
        } else if self.short_wheel.covers(self.tick, due) {
            self.short_wheel.insert(entry);
        } else if self.long_wheel.covers(self.tick, due) {
            self.long_wheel.insert(entry);
        } else {
            self.far.push(entry);
        }
    }

    /// Forget a pending timer. Returns whether it was still tracked.
    pub fn cancel(&mut self, id: &TimerId) -> bool {
        let Some(due) = self.lookup.remove(id) else {
            return false;
        };

        // Mirror the placement rule in `schedule`: entries cascade inward at
        // the same boundaries, so the rule still locates the current home.
        if due < self.tick {
            match self.overdue.iter().position(|entry| entry.id == *id) {
                Some(position) => {
                    self.overdue.swap_remove(position);
                    true
                }
                None => false,
            }
        } else if self.short_wheel.covers(self.tick, due) {
            self.short_wheel.remove(id, due)
        } else if self.long_wheel.covers(self.tick, due) {
            self.long_wheel.remove(id, due)
        } else {
            self.far.remove(id)
        }
    }

    /// Ids of every timer due at the current clock reading.
    ///
    /// Overdue entries pop regardless of whether any new tick has elapsed.
    pub fn drain_due(&mut self) -> Vec<TimerId> {
        let mut due: Vec<TimerId> = self.overdue.drain(..).map(|entry| entry.id).collect();

        let now = self.clock.now();
        let steps = now.saturating_sub(self.tick) / self.short_wheel.resolution;
        for _ in 0..steps {
            for entry in self.short_wheel.take(self.tick) {
                due.push(entry.id);
            }
            self.tick += self.short_wheel.resolution;
            self.cascade();
        }

        for id in &due {
            self.lookup.remove(id);
        }
        due
    }

    /// Earliest pending deadline, if any timer is tracked.
    pub fn next_due(&self) -> Option<TimeT> {
        let overdue = self.overdue.iter().map(Scheduled::due).min();
        [
            overdue,
            self.short_wheel.min_due(),
            self.long_wheel.min_due(),
            self.far.min_due(),
        ]
        .into_iter()
        .flatten()
        .min()
    }

    pub fn is_empty(&self) -> bool {
        self.lookup.is_empty()
    }

    fn cascade(&mut self) {
        // Long wheel refills first so far entries can keep moving inward
        // through the long wheel on a shared boundary.
        if self.tick.is_multiple_of(self.long_wheel.span) {
            self.refill_long_wheel();
        }
        if self.tick.is_multiple_of(self.short_wheel.span) {
            self.refill_short_wheel();
        }
    }

    fn refill_long_wheel(&mut self) {
        while let Some(next) = self.far.peek() {
            if next.due() >= self.tick + self.long_wheel.span {
                break;
            }
            if let Some(entry) = self.far.pop() {
                self.long_wheel.insert(entry);
            }
        }
    }

    fn refill_short_wheel(&mut self) {
        for entry in self.long_wheel.take(self.tick) {
            self.short_wheel.insert(entry);
        }
    }
}
