//! # Config Loader
//!
//! Locates configuration files on disk and splits `key=value` documents.
//!
//! ```no_run
//! use config_loader::{find_and_load, parse_key_values};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let content = find_and_load("camloop.conf")?;
//!     for entry in parse_key_values(&content)? {
//!         println!("{} = {}", entry.key, entry.value);
//!     }
//!     Ok(())
//! }
//! ```

pub mod error;

pub use error::{ConfigError, Result};

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable checked first by [`find_config_file`].
pub const CONFIG_ENV_VAR: &str = "CAMLOOP_CONFIG";

/// One `key=value` pair with the line it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigEntry {
    pub line: usize,
    pub key: String,
    pub value: String,
}

/// Reads a configuration file into a String.
///
/// The content is not interpreted; see [`parse_key_values`].
pub fn load_config_file<P: AsRef<Path>>(path: P) -> Result<String> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }

    fs::read_to_string(path).map_err(|e| ConfigError::ReadError(e.to_string()))
}

/// Searches for a configuration file in the usual places.
///
/// Order:
/// 1. `CAMLOOP_CONFIG` environment variable (if it points to an existing file)
/// 2. `./config/{filename}`
/// 3. `./{filename}`
pub fn find_config_file(filename: &str) -> Result<PathBuf> {
    if let Ok(path) = env::var(CONFIG_ENV_VAR) {
        let path_buf = PathBuf::from(&path);
        if path_buf.exists() {
            return Ok(path_buf);
        }
    }

    let config_dir = PathBuf::from("./config").join(filename);
    if config_dir.exists() {
        return Ok(config_dir);
    }

    let current_dir = PathBuf::from("./").join(filename);
    if current_dir.exists() {
        return Ok(current_dir);
    }

    Err(ConfigError::FileNotFound(format!(
        "'{}' not found. Searched: {} env var, ./config/{}, ./{}",
        filename, CONFIG_ENV_VAR, filename, filename
    )))
}

/// Finds and reads a configuration file in one step.
pub fn find_and_load(filename: &str) -> Result<String> {
    let path = find_config_file(filename)?;
    load_config_file(path)
}

/// Splits a `key=value` document.
///
/// Blank lines and lines starting with `#` are skipped. Keys and values are
/// trimmed; a value may itself contain `=`. Line numbers are 1-based.
pub fn parse_key_values(content: &str) -> Result<Vec<ConfigEntry>> {
    let mut entries = Vec::new();

    for (index, raw) in content.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((key, value)) = line.split_once('=') else {
            return Err(ConfigError::Syntax {
                line: index + 1,
                content: line.to_string(),
            });
        };

        let key = key.trim();
        if key.is_empty() {
            return Err(ConfigError::Syntax {
                line: index + 1,
                content: line.to_string(),
            });
        }

        entries.push(ConfigEntry {
            line: index + 1,
            key: key.to_string(),
            value: value.trim().to_string(),
        });
    }

    Ok(entries)
}
