//! Virtual output configuration.

use crate::common::constants::defaults;
use crate::error::{MediaError, Result};
use crate::video::camera::config::check_dimension;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputConfig {
    /// Loopback node, e.g. `/dev/video2`
    pub device: String,
    pub width: u32,
    pub height: u32,
}

impl OutputConfig {
    /// Validates the size. YUYV packs pixel pairs, so `width` must be even.
    pub fn new(device: impl Into<String>, width: u32, height: u32) -> Result<Self> {
        let device = device.into();
        if device.trim().is_empty() {
            return Err(MediaError::Config("Output device must not be empty".to_string()));
        }
        check_dimension("Width", width)?;
        check_dimension("Height", height)?;
        if width % 2 != 0 {
            return Err(MediaError::Config(format!(
                "Output width must be even, got {}",
                width
            )));
        }
        Ok(Self {
            device,
            width,
            height,
        })
    }

    /// Bytes in one YUYV frame.
    pub fn frame_size(&self) -> usize {
        self.width as usize * self.height as usize * 2
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            device: "/dev/video2".to_string(),
            width: defaults::WIDTH,
            height: defaults::HEIGHT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_config() {
        let config = OutputConfig::new("/dev/video10", 1280, 720).unwrap();
        assert_eq!(config.frame_size(), 1280 * 720 * 2);
    }

    #[test]
    fn test_odd_width_rejected() {
        assert!(OutputConfig::new("/dev/video10", 641, 480).is_err());
    }

    #[test]
    fn test_out_of_range_rejected() {
        assert!(OutputConfig::new("/dev/video10", 0, 480).is_err());
        assert!(OutputConfig::new("/dev/video10", 640, 9000).is_err());
        assert!(OutputConfig::new("", 640, 480).is_err());
    }
}
