//! Restartable one-shot and repeating timer handles for component scopes,
//! backed by a timing-wheel timer service and an async event-loop driver.

pub mod component;
pub mod core;
pub mod handle;
pub mod infra;
pub mod utils;

pub use crate::component::{Memo, Scope, interval_handle, timeout_handle};
pub use crate::core::{Callback, Clock, SystemClock, TimeT, TimerId, TimerService};
pub use crate::handle::{IntervalHandle, TimeoutHandle};
pub use crate::infra::TimerDriver;
pub use crate::utils::{App, Lifecycle, LogLevel, Logger, StdoutLogger};
