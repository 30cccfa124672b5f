//! Camera configuration types.

use crate::common::constants::{defaults, limits};
use crate::error::{MediaError, Result};

/// Camera capture configuration
#[derive(Debug, Clone, PartialEq)]
pub struct CameraConfig {
    /// Device identifier: an index (`"0"`), a node (`"/dev/video0"`) or a
    /// file/stream URL understood by OpenCV
    pub device: String,
    /// Frame width delivered to the loop
    pub width: u32,
    /// Frame height delivered to the loop
    pub height: u32,
    /// Requested capture rate
    pub fps: f64,
}

impl CameraConfig {
    /// Creates a configuration at the default resolution.
    ///
    /// `fps` is clamped to 1.0-240.0; NaN and infinities are rejected.
    pub fn new(device: impl Into<String>, fps: f64) -> Result<Self> {
        let device = device.into();
        if device.trim().is_empty() {
            return Err(MediaError::Config("Camera device must not be empty".to_string()));
        }
        if !fps.is_finite() {
            return Err(MediaError::Config(
                "FPS must be a finite number (not NaN or infinite)".to_string(),
            ));
        }

        Ok(Self {
            device,
            width: defaults::WIDTH,
            height: defaults::HEIGHT,
            fps: fps.clamp(limits::MIN_FPS, limits::MAX_FPS),
        })
    }

    /// Sets the frame size, each dimension within 1-7680.
    pub fn with_resolution(mut self, width: u32, height: u32) -> Result<Self> {
        check_dimension("Width", width)?;
        check_dimension("Height", height)?;
        self.width = width;
        self.height = height;
        Ok(self)
    }

    pub fn resolution(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

pub(crate) fn check_dimension(name: &str, value: u32) -> Result<()> {
    if (limits::MIN_DIMENSION..=limits::MAX_DIMENSION).contains(&value) {
        Ok(())
    } else {
        Err(MediaError::Config(format!(
            "{} must be between {} and {}, got {}",
            name,
            limits::MIN_DIMENSION,
            limits::MAX_DIMENSION,
            value
        )))
    }
}

/// Device 0, 640x480 @ 15 FPS
impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            device: "0".to_string(),
            width: defaults::WIDTH,
            height: defaults::HEIGHT,
            fps: defaults::FPS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CameraConfig::default();
        assert_eq!(config.device, "0");
        assert_eq!(config.fps, 15.0);
        assert_eq!(config.resolution(), (640, 480));
    }

    #[test]
    fn test_config_with_resolution() {
        let config = CameraConfig::new("/dev/video0", 30.0)
            .unwrap()
            .with_resolution(1280, 720)
            .unwrap();
        assert_eq!(config.device, "/dev/video0");
        assert_eq!(config.resolution(), (1280, 720));
    }

    #[test]
    fn test_fps_clamping() {
        assert_eq!(CameraConfig::new("0", 0.5).unwrap().fps, 1.0);
        assert_eq!(CameraConfig::new("0", 300.0).unwrap().fps, 240.0);
        assert_eq!(CameraConfig::new("0", 15.0).unwrap().fps, 15.0);
    }

    #[test]
    fn test_fps_not_finite() {
        assert!(CameraConfig::new("0", f64::NAN).is_err());
        assert!(CameraConfig::new("0", f64::INFINITY).is_err());
    }

    #[test]
    fn test_empty_device_rejected() {
        assert!(CameraConfig::new("  ", 15.0).is_err());
    }

    #[test]
    fn test_invalid_resolution() {
        let base = CameraConfig::default();
        assert!(base.clone().with_resolution(0, 480).is_err());
        assert!(base.clone().with_resolution(640, 10_000).is_err());
        assert!(base.with_resolution(7680, 1).is_ok());
    }
}
