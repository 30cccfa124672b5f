//! Application Configuration
//!
//! Session parameters plus logging settings, read from a `.conf` file.

use super::session_config::SessionConfig;
use super::{parse_bool, parse_value};
use config_loader::{ConfigError, find_and_load, load_config_file, parse_key_values};
use logging::LogLevel;
use std::path::{Path, PathBuf};

/// File name searched for when no path is given
pub const CONFIG_FILE_NAME: &str = "camloop.conf";

/// Application configuration structure
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub session: SessionConfig,
    /// Log file; `None` disables file logging
    pub log_path: Option<PathBuf>,
    pub log_level: LogLevel,
    /// Echo log lines to stderr
    pub log_console: bool,
    /// Problems that did not stop the load (unknown keys). Logged once a
    /// logger exists.
    pub warnings: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            session: SessionConfig::default(),
            log_path: Some(PathBuf::from("camloop.log")),
            log_level: LogLevel::Info,
            log_console: false,
            warnings: Vec::new(),
        }
    }
}

impl AppConfig {
    /// Parses a `key=value` document on top of the defaults.
    ///
    /// Format:
    /// ```text
    /// input_device=/dev/video0
    /// output_device=/dev/video2
    /// width=640
    /// height=480
    /// fps=15
    /// window_seconds=2
    /// gather_on_start=true
    /// log_path=camloop.log
    /// log_level=info
    /// log_console=false
    /// ```
    ///
    /// `input_device`/`output_device` set to `auto` (or left empty) are
    /// detected at startup; an empty `log_path` disables file logging.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        for entry in parse_key_values(content)? {
            let key = entry.key.as_str();
            let value = entry.value.as_str();
            let session = &mut config.session;

            match key {
                "input_device" => session.input_device = device_value(value),
                "output_device" => session.output_device = device_value(value),
                "width" => session.width = parse_value(key, value)?,
                "height" => session.height = parse_value(key, value)?,
                "fps" => session.fps = parse_value(key, value)?,
                "window_seconds" => session.window_seconds = parse_value(key, value)?,
                "gather_on_start" => session.gather_on_start = parse_bool(key, value)?,
                "log_path" => {
                    config.log_path = if value.is_empty() {
                        None
                    } else {
                        Some(PathBuf::from(value))
                    };
                }
                "log_level" => config.log_level = parse_value(key, value)?,
                "log_console" => config.log_console = parse_bool(key, value)?,
                _ => config.warnings.push(format!(
                    "Unknown configuration key '{}' on line {} ignored",
                    key, entry.line
                )),
            }
        }

        config.session.validate()?;
        Ok(config)
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = load_config_file(path)?;
        Self::parse(&content)
    }

    /// Searches the standard locations for `camloop.conf`.
    pub fn find_and_load() -> Result<Self, ConfigError> {
        let content = find_and_load(CONFIG_FILE_NAME)?;
        Self::parse(&content)
    }
}

fn device_value(value: &str) -> Option<String> {
    if value.is_empty() || value.eq_ignore_ascii_case("auto") {
        None
    } else {
        Some(value.to_string())
    }
}
