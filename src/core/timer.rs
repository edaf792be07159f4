use crate::core::clock::TimeT;
use std::cmp::Ordering;
use std::fmt;
use uuid::Uuid;

/// Opaque cancelable identifier for a scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(Uuid);

impl TimerId {
    pub fn new() -> Self {
        TimerId(Uuid::new_v4())
    }
}

impl Default for TimerId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TimerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// A pending deadline tracked by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scheduled {
    pub id: TimerId,
    due: TimeT,
}

impl Scheduled {
    pub fn new(id: TimerId, due: TimeT) -> Self {
        Self { id, due }
    }

    /// Absolute timestamp this entry fires at.
    pub fn due(&self) -> TimeT {
        self.due
    }
}

// Reversed so the soonest deadline sits at the top of a max-heap.
impl Ord for Scheduled {
    fn cmp(&self, other: &Self) -> Ordering {
        other.due.cmp(&self.due).then_with(|| other.id.cmp(&self.id))
    }
}

impl PartialOrd for Scheduled {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
