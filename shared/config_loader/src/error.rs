use std::fmt;

/// Result type used throughout the crate
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors raised while locating, reading or parsing a configuration file
#[derive(Debug)]
pub enum ConfigError {
    /// No configuration file at the given path (or any searched location)
    FileNotFound(String),

    /// The file exists but could not be read
    ReadError(String),

    /// A line could not be parsed as `key=value`
    Syntax { line: usize, content: String },

    /// A key was present but its value was rejected
    InvalidValue { key: String, message: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::FileNotFound(path) => {
                write!(f, "Configuration file not found: {}", path)
            }
            ConfigError::ReadError(msg) => {
                write!(f, "Failed to read configuration file: {}", msg)
            }
            ConfigError::Syntax { line, content } => {
                write!(f, "Line {}: expected key=value, got '{}'", line, content)
            }
            ConfigError::InvalidValue { key, message } => {
                write!(f, "Invalid value for '{}': {}", key, message)
            }
        }
    }
}

impl std::error::Error for ConfigError {}
