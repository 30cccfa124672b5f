//! Internal log record.

use crate::log_level::LogLevel;
use chrono::Local;

/// A single formatted-on-demand log record.
#[derive(Debug, Clone)]
pub(crate) struct LogMessage {
    pub timestamp: String,
    pub level: LogLevel,
    pub component: Option<String>,
    pub thread: Option<String>,
    pub message: String,
}

impl LogMessage {
    /// Stamps a new record with the local time and the calling thread's name.
    pub fn new(level: LogLevel, component: Option<&str>, message: &str) -> Self {
        Self {
            timestamp: Local::now().format("%Y-%m-%d %H:%M:%S%.3f").to_string(),
            level,
            component: component.map(str::to_string),
            thread: std::thread::current().name().map(str::to_string),
            message: message.to_string(),
        }
    }

    /// `[timestamp] LEVEL [component@thread]: message\n`
    pub fn format(&self) -> String {
        let origin = match (&self.component, &self.thread) {
            (Some(c), Some(t)) => format!(" [{}@{}]", c, t),
            (Some(c), None) => format!(" [{}]", c),
            (None, Some(t)) => format!(" [@{}]", t),
            (None, None) => String::new(),
        };
        format!(
            "[{}] {}{}: {}\n",
            self.timestamp,
            self.level.as_str(),
            origin,
            self.message
        )
    }
}
