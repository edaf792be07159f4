mod app;
pub use app::App;

mod lifecycle;
pub use lifecycle::Lifecycle;

mod logger;
pub use logger::{LogLevel, Logger, StdoutLogger};
