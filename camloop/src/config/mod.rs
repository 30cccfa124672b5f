//! Configuration Module
//!
//! Loads the `camloop.conf` key=value file into typed settings.

mod app_config;
mod session_config;

pub use app_config::{AppConfig, CONFIG_FILE_NAME};
pub use session_config::SessionConfig;

use config_loader::ConfigError;
use std::str::FromStr;

/// Parses `value` as `T`, naming `key` in the error.
pub(crate) fn parse_value<T>(key: &str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.parse::<T>().map_err(|e| ConfigError::InvalidValue {
        key: key.to_string(),
        message: format!("'{}': {}", value, e),
    })
}

/// Accepts true/false, yes/no, on/off and 1/0.
pub(crate) fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.to_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            message: format!("'{}' is not a boolean", value),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bool_variants() {
        assert!(parse_bool("k", "yes").unwrap());
        assert!(parse_bool("k", "ON").unwrap());
        assert!(!parse_bool("k", "0").unwrap());
        assert!(parse_bool("k", "maybe").is_err());
    }

    #[test]
    fn test_parse_value_names_key() {
        let err = parse_value::<u32>("width", "wide").unwrap_err();
        assert!(err.to_string().contains("width"));
    }
}
