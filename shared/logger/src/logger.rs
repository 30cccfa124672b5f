//! Cloneable logger handle.

use crate::error::Result;
use crate::log_level::LogLevel;
use crate::log_message::LogMessage;
use crate::log_writer::spawn_writer_thread;
use std::path::Path;
use std::sync::mpsc::{Sender, channel};

/// Thread-safe, non-blocking logger.
///
/// Clones and component loggers share one writer thread, so every line of a
/// session lands in the same file in send order.
///
/// # Examples
///
/// ```no_run
/// use logging::{LogLevel, Logger};
///
/// let logger = Logger::new("camloop.log".as_ref(), LogLevel::Info).unwrap();
/// let engine_logger = logger.for_component("Engine");
/// engine_logger.info("Loop started");
/// ```
#[derive(Clone)]
pub struct Logger {
    sender: Option<Sender<LogMessage>>,
    level: LogLevel,
    component: Option<String>,
    console_output: bool,
}

impl Logger {
    /// Creates a file logger with its own writer thread.
    ///
    /// # Errors
    ///
    /// Returns error if the log file cannot be created or the writer thread
    /// cannot be spawned.
    pub fn new(log_path: &Path, level: LogLevel) -> Result<Self> {
        Self::with_component(log_path, level, None, false)
    }

    /// Creates a file logger tagged with a component name, optionally echoing
    /// every record to stderr.
    pub fn with_component(
        log_path: &Path,
        level: LogLevel,
        component: Option<&str>,
        console_output: bool,
    ) -> Result<Self> {
        let (sender, receiver) = channel();
        spawn_writer_thread(log_path, receiver)?;
        Ok(Logger {
            sender: Some(sender),
            level,
            component: component.map(str::to_string),
            console_output,
        })
    }

    /// Creates a logger that only writes to stderr.
    pub fn console(level: LogLevel) -> Self {
        Logger {
            sender: None,
            level,
            component: None,
            console_output: true,
        }
    }

    /// Creates a logger that drops everything. Handy for tests.
    pub fn disabled() -> Self {
        Logger {
            sender: None,
            level: LogLevel::Error,
            component: None,
            console_output: false,
        }
    }

    /// Returns a logger for another component writing to the same sink.
    pub fn for_component(&self, component: &str) -> Self {
        Logger {
            sender: self.sender.clone(),
            level: self.level,
            component: Some(component.to_string()),
            console_output: self.console_output,
        }
    }

    /// Minimum level this logger records.
    pub fn level(&self) -> LogLevel {
        self.level
    }

    /// Whether a record at `level` would be emitted.
    pub fn enabled(&self, level: LogLevel) -> bool {
        level >= self.level && (self.sender.is_some() || self.console_output)
    }

    pub fn debug(&self, message: &str) {
        self.log(LogLevel::Debug, message);
    }

    pub fn info(&self, message: &str) {
        self.log(LogLevel::Info, message);
    }

    pub fn warn(&self, message: &str) {
        self.log(LogLevel::Warn, message);
    }

    pub fn error(&self, message: &str) {
        self.log(LogLevel::Error, message);
    }

    fn log(&self, level: LogLevel, message: &str) {
        if !self.enabled(level) {
            return;
        }
        let msg = LogMessage::new(level, self.component.as_deref(), message);

        if self.console_output {
            eprint!("{}", msg.format());
        }

        if let Some(sender) = &self.sender {
            // Writer gone means the process is shutting down.
            let _ = sender.send(msg);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::thread;
    use std::time::Duration;
    use tempfile::tempdir;

    fn wait_for_write() {
        thread::sleep(Duration::from_millis(50));
    }

    #[test]
    fn test_logger_creates_file() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("test.log");

        let logger = Logger::new(&log_path, LogLevel::Debug).unwrap();
        logger.info("Test message");
        wait_for_write();

        let content = fs::read_to_string(log_path).unwrap();
        assert!(content.contains("Test message"));
    }

    #[test]
    fn test_logger_respects_level() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("test.log");

        let logger = Logger::new(&log_path, LogLevel::Warn).unwrap();
        logger.debug("Debug message");
        logger.info("Info message");
        logger.warn("Warn message");
        wait_for_write();

        let content = fs::read_to_string(log_path).unwrap();
        assert!(!content.contains("Debug message"));
        assert!(!content.contains("Info message"));
        assert!(content.contains("Warn message"));
    }

    #[test]
    fn test_component_loggers_share_file() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("test.log");

        let logger = Logger::new(&log_path, LogLevel::Info).unwrap();
        let engine = logger.for_component("Engine");
        let camera = logger.for_component("Camera");

        let handle = thread::spawn(move || engine.info("from engine"));
        camera.info("from camera");
        handle.join().unwrap();
        wait_for_write();

        let content = fs::read_to_string(log_path).unwrap();
        assert!(content.contains("[Engine"));
        assert!(content.contains("[Camera"));
        assert!(content.contains("from engine"));
        assert!(content.contains("from camera"));
    }

    #[test]
    fn test_disabled_logger_emits_nothing() {
        let logger = Logger::disabled();
        assert!(!logger.enabled(LogLevel::Error));
        logger.error("dropped");
    }

    #[test]
    fn test_console_logger_filters_by_level() {
        let logger = Logger::console(LogLevel::Warn);
        assert!(!logger.enabled(LogLevel::Info));
        assert!(logger.enabled(LogLevel::Error));
    }
}
