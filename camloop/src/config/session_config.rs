//! Parameters of one relay session.

use crate::engine::EngineSettings;
use config_loader::ConfigError;
use media::common::constants::{defaults, limits};
use media::{CameraConfig, OutputConfig};

/// Devices, frame geometry and timing for a session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    /// Capture device (`/dev/videoN`, index, or `pattern`). `None` picks the
    /// first camera that is not a loopback device.
    pub input_device: Option<String>,
    /// Loopback device to write to. `None` picks the first loopback node.
    pub output_device: Option<String>,
    pub width: u32,
    pub height: u32,
    pub fps: f64,
    pub window_seconds: f64,
    pub gather_on_start: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            input_device: None,
            output_device: None,
            width: defaults::WIDTH,
            height: defaults::HEIGHT,
            fps: defaults::FPS,
            window_seconds: defaults::WINDOW_SECONDS,
            gather_on_start: true,
        }
    }
}

impl SessionConfig {
    /// Checks ranges. FPS outside 1-240 is clamped later, not rejected.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (key, value) in [("width", self.width), ("height", self.height)] {
            if !(limits::MIN_DIMENSION..=limits::MAX_DIMENSION).contains(&value) {
                return Err(ConfigError::InvalidValue {
                    key: key.to_string(),
                    message: format!(
                        "{} is outside {}..={}",
                        value,
                        limits::MIN_DIMENSION,
                        limits::MAX_DIMENSION
                    ),
                });
            }
        }

        // YUYV packs two pixels per macropixel.
        if !self.width.is_multiple_of(2) {
            return Err(ConfigError::InvalidValue {
                key: "width".to_string(),
                message: format!("{} must be even", self.width),
            });
        }

        if !self.fps.is_finite() || self.fps <= 0.0 {
            return Err(ConfigError::InvalidValue {
                key: "fps".to_string(),
                message: format!("{} is not a positive number", self.fps),
            });
        }

        if !self.window_seconds.is_finite() || self.window_seconds <= 0.0 {
            return Err(ConfigError::InvalidValue {
                key: "window_seconds".to_string(),
                message: format!("{} is not a positive number", self.window_seconds),
            });
        }

        if self.window_seconds > limits::MAX_WINDOW_SECONDS {
            return Err(ConfigError::InvalidValue {
                key: "window_seconds".to_string(),
                message: format!(
                    "{} exceeds the {} second limit",
                    self.window_seconds,
                    limits::MAX_WINDOW_SECONDS
                ),
            });
        }

        Ok(())
    }

    pub fn camera_config(&self, device: &str) -> media::Result<CameraConfig> {
        CameraConfig::new(device, self.fps)?.with_resolution(self.width, self.height)
    }

    pub fn output_config(&self, device: &str) -> media::Result<OutputConfig> {
        OutputConfig::new(device, self.width, self.height)
    }

    pub fn engine_settings(&self) -> media::Result<EngineSettings> {
        Ok(EngineSettings::new(self.fps, self.window_seconds)?.with_gathering(self.gather_on_start))
    }
}
