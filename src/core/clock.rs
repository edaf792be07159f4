use chrono::Utc;

/// Milliseconds since the Unix epoch, the engine's single time unit.
pub type TimeT = usize;

/// Time source seam. Everything in the crate reads time through this trait so
/// tests can drive the engine with a manually advanced clock.
pub trait Clock {
    /// Current time in milliseconds.
    fn now(&self) -> TimeT;
}

/// Wall clock.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> TimeT {
        Utc::now().timestamp_millis() as TimeT
    }
}

#[cfg(test)]
pub mod tests {
    use super::{Clock, TimeT};
    use parking_lot::Mutex;

    /// Manually advanced clock for deterministic tests.
    pub struct FakeClock {
        current: Mutex<TimeT>,
    }

    impl FakeClock {
        pub fn new(start: TimeT) -> Self {
            Self {
                current: Mutex::new(start),
            }
        }

        pub fn advance(&self, duration: TimeT) {
            *self.current.lock() += duration;
        }
    }

    impl Clock for FakeClock {
        fn now(&self) -> TimeT {
            *self.current.lock()
        }
    }
}
