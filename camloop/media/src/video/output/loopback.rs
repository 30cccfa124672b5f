//! v4l2loopback writer.

use super::config::OutputConfig;
use crate::common::constants::logging::OUTPUT_LOG_INTERVAL;
use crate::error::{DeviceFailure, MediaError, Result};
use crate::video::converters::rgb_to_yuyv;
use crate::video::frame::Frame;
use crate::video::traits::FrameSink;
use logging::Logger;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use v4l::video::Output;
use v4l::{Device, Format, FourCC};

const PIXEL_FORMAT: &[u8; 4] = b"YUYV";

/// Virtual webcam backed by a v4l2loopback device.
///
/// The format is negotiated once at open; frames are converted to YUYV and
/// written with plain `write(2)` calls.
pub struct VirtualOutput {
    // Holds the negotiated format for as long as we write.
    _device: Device,
    file: File,
    config: OutputConfig,
    logger: Logger,
    scratch: Vec<u8>,
    frame_count: u64,
}

impl VirtualOutput {
    pub fn open(config: OutputConfig, logger: Logger) -> Result<Self> {
        logger.info(&format!(
            "Opening virtual output '{}' at {}x{}",
            config.device, config.width, config.height
        ));

        if !Path::new(&config.device).exists() {
            return Err(MediaError::device_unavailable(
                &config.device,
                DeviceFailure::NotFound,
                "no such device node (is the v4l2loopback module loaded?)",
            ));
        }

        let device = Device::with_path(&config.device)
            .map_err(|e| open_failure(&config.device, &e))?;

        let requested = Format::new(config.width, config.height, FourCC::new(PIXEL_FORMAT));
        let applied = device.set_format(&requested).map_err(|e| {
            MediaError::device_unavailable(
                &config.device,
                DeviceFailure::Unsupported,
                format!("cannot set YUYV format: {}", e),
            )
        })?;

        if applied.width != config.width
            || applied.height != config.height
            || applied.fourcc != requested.fourcc
        {
            return Err(MediaError::device_unavailable(
                &config.device,
                DeviceFailure::Unsupported,
                format!(
                    "driver negotiated {}x{} {} instead of {}x{} YUYV",
                    applied.width, applied.height, applied.fourcc, config.width, config.height
                ),
            ));
        }

        let file = OpenOptions::new()
            .write(true)
            .open(&config.device)
            .map_err(|e| open_failure(&config.device, &e))?;

        logger.info("Virtual output ready");

        Ok(Self {
            _device: device,
            file,
            scratch: Vec::with_capacity(config.frame_size()),
            config,
            logger,
            frame_count: 0,
        })
    }

    pub fn config(&self) -> &OutputConfig {
        &self.config
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

fn open_failure(device: &str, err: &io::Error) -> MediaError {
    let reason = match err.kind() {
        io::ErrorKind::NotFound => DeviceFailure::NotFound,
        _ => DeviceFailure::Busy,
    };
    MediaError::device_unavailable(device, reason, err.to_string())
}

impl FrameSink for VirtualOutput {
    fn write(&mut self, frame: &Frame) -> Result<()> {
        if frame.dimensions() != (self.config.width, self.config.height) {
            return Err(MediaError::Processing(format!(
                "Frame is {}x{}, output expects {}x{}",
                frame.width(),
                frame.height(),
                self.config.width,
                self.config.height
            )));
        }

        rgb_to_yuyv(
            frame.data(),
            frame.width(),
            frame.height(),
            &mut self.scratch,
        )?;
        self.file.write_all(&self.scratch)?;

        self.frame_count += 1;
        if self.frame_count.is_multiple_of(OUTPUT_LOG_INTERVAL) {
            self.logger
                .debug(&format!("Frames written: {}", self.frame_count));
        }
        Ok(())
    }
}

impl Drop for VirtualOutput {
    fn drop(&mut self) {
        self.logger.info(&format!(
            "Closing virtual output '{}'. Frames written: {}",
            self.config.device, self.frame_count
        ));
    }
}
