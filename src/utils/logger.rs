use chrono::Utc;
use parking_lot::Mutex;

#[derive(Debug, Clone, Copy)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        }
    }
}

pub trait Logger: Send + Sync {
    fn log(&self, level: LogLevel, message: &str);

    fn debug(&self, msg: &str) {
        self.log(LogLevel::Debug, msg);
    }
    fn info(&self, msg: &str) {
        self.log(LogLevel::Info, msg);
    }
    fn warn(&self, msg: &str) {
        self.log(LogLevel::Warn, msg);
    }
    fn error(&self, msg: &str) {
        self.log(LogLevel::Error, msg);
    }
}

/// Timestamped stdout logger with an optional capture buffer for tests.
pub struct StdoutLogger {
    captured: Option<Mutex<Vec<String>>>,
}

impl StdoutLogger {
    pub fn new() -> Self {
        Self { captured: None }
    }

    pub fn with_capture() -> Self {
        Self {
            captured: Some(Mutex::new(Vec::new())),
        }
    }

    /// Whether any captured line contains `needle`. Always false without a
    /// capture buffer.
    pub fn contains(&self, needle: &str) -> bool {
        match &self.captured {
            Some(lines) => lines.lock().iter().any(|line| line.contains(needle)),
            None => false,
        }
    }
}

impl Default for StdoutLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl Logger for StdoutLogger {
    fn log(&self, level: LogLevel, message: &str) {
        let timestamp = Utc::now().format("%Y-%m-%d %H:%M:%S%.3f");
        let line = format!("[{}] {}: {}", timestamp, level.as_str(), message);

        println!("{line}");

        if let Some(lines) = &self.captured {
            lines.lock().push(line);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capture_records_every_level() {
        let logger = StdoutLogger::with_capture();

        logger.debug("foo");
        logger.info("bar");
        logger.warn("baz");
        logger.error("qux");

        assert!(logger.contains("DEBUG"));
        assert!(logger.contains("INFO"));
        assert!(logger.contains("WARN"));
        assert!(logger.contains("ERROR"));
        assert!(logger.contains("qux"));
        assert!(!logger.contains("quux"));
    }

    #[test]
    fn contains_is_false_without_capture() {
        let logger = StdoutLogger::new();
        logger.info("bar");
        assert!(!logger.contains("bar"));
    }
}
