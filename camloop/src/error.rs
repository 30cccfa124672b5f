//! Application-level errors.

use config_loader::ConfigError;
use logging::LoggingError;
use media::{DeviceFailure, MediaError};
use std::fmt;

pub type Result<T> = std::result::Result<T, LoopError>;

#[derive(Debug)]
pub enum LoopError {
    /// Device or frame processing failure
    Media(MediaError),
    /// Configuration file could not be found, read or parsed
    Config(ConfigError),
    /// Logger could not be set up
    Logging(LoggingError),
    /// Replay was attempted with nothing buffered
    EmptyBuffer,
    /// The frame loop thread could not be started
    Spawn(String),
}

impl LoopError {
    /// One-line message for the person at the keyboard.
    ///
    /// Missing devices and devices that refuse to open need different
    /// remedies, so they get different wording.
    pub fn user_message(&self) -> String {
        match self {
            LoopError::Media(MediaError::DeviceUnavailable { device, reason, .. }) => {
                match reason {
                    DeviceFailure::NotFound => format!(
                        "No such device: {}. Check that it is plugged in (or that v4l2loopback is loaded).",
                        device
                    ),
                    DeviceFailure::Busy => format!(
                        "Device {} is busy. Close other programs using it and try again.",
                        device
                    ),
                    DeviceFailure::Unsupported => format!(
                        "Device {} does not support the requested format.",
                        device
                    ),
                }
            }
            other => other.to_string(),
        }
    }
}

impl fmt::Display for LoopError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoopError::Media(err) => write!(f, "{}", err),
            LoopError::Config(err) => write!(f, "Config error: {}", err),
            LoopError::Logging(err) => write!(f, "Logging error: {}", err),
            LoopError::EmptyBuffer => write!(f, "Replay requested on an empty frame buffer"),
            LoopError::Spawn(msg) => write!(f, "Failed to start frame loop: {}", msg),
        }
    }
}

impl std::error::Error for LoopError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoopError::Media(err) => Some(err),
            LoopError::Config(err) => Some(err),
            LoopError::Logging(err) => Some(err),
            _ => None,
        }
    }
}

impl From<MediaError> for LoopError {
    fn from(err: MediaError) -> Self {
        LoopError::Media(err)
    }
}

impl From<ConfigError> for LoopError {
    fn from(err: ConfigError) -> Self {
        LoopError::Config(err)
    }
}

impl From<LoggingError> for LoopError {
    fn from(err: LoggingError) -> Self {
        LoopError::Logging(err)
    }
}
