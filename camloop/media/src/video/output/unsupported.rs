//! Placeholder for platforms without v4l2loopback.

use super::config::OutputConfig;
use crate::error::{DeviceFailure, MediaError, Result};
use crate::video::frame::Frame;
use crate::video::traits::FrameSink;
use logging::Logger;

pub struct VirtualOutput {
    config: OutputConfig,
}

impl VirtualOutput {
    pub fn open(config: OutputConfig, logger: Logger) -> Result<Self> {
        logger.error("Virtual output requires Linux with v4l2loopback");
        Err(MediaError::device_unavailable(
            &config.device,
            DeviceFailure::Unsupported,
            "virtual output is only available on Linux",
        ))
    }

    pub fn config(&self) -> &OutputConfig {
        &self.config
    }
}

impl FrameSink for VirtualOutput {
    fn write(&mut self, _frame: &Frame) -> Result<()> {
        Err(MediaError::Processing(
            "virtual output is only available on Linux".to_string(),
        ))
    }
}
