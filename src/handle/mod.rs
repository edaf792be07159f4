mod interval;
pub use interval::IntervalHandle;

mod timeout;
pub use timeout::TimeoutHandle;
