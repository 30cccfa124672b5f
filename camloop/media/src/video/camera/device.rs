//! Camera device management.
//!
//! OpenCV `VideoCapture` wrapped as a [`FrameSource`].

use crate::common::constants::logging::CAMERA_LOG_INTERVAL;
use crate::error::{DeviceFailure, MediaError, Result};
use crate::video::converters::mat_to_frame;
use crate::video::frame::Frame;
use crate::video::traits::{FrameSource, RecentFrame};
use logging::Logger;
use opencv::prelude::*;
use opencv::videoio::{CAP_ANY, VideoCapture};
use std::path::Path;
use std::sync::Arc;

use super::config::CameraConfig;

/// How a device string maps onto OpenCV's open calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum DeviceSpec {
    /// Camera index; `/dev/videoN` also resolves here
    Index(i32),
    /// Anything else: a file, a stream URL, a GStreamer pipeline
    Location(String),
}

impl DeviceSpec {
    pub(crate) fn parse(device: &str) -> Self {
        let device = device.trim();
        if let Ok(index) = device.parse::<i32>() {
            return DeviceSpec::Index(index);
        }
        if let Some(index) = device
            .strip_prefix("/dev/video")
            .and_then(|n| n.parse::<i32>().ok())
        {
            return DeviceSpec::Index(index);
        }
        DeviceSpec::Location(device.to_string())
    }

    /// Fails fast with `NotFound` when a device node is known to be missing.
    fn check_exists(&self, device: &str) -> Result<()> {
        let node = match self {
            DeviceSpec::Index(index) if cfg!(target_os = "linux") => {
                Some(format!("/dev/video{}", index))
            }
            DeviceSpec::Location(path) if path.starts_with("/dev/") => Some(path.clone()),
            _ => None,
        };

        match node {
            Some(node) if !Path::new(&node).exists() => Err(MediaError::device_unavailable(
                device,
                DeviceFailure::NotFound,
                format!("{} does not exist", node),
            )),
            _ => Ok(()),
        }
    }

    fn open(&self) -> opencv::Result<VideoCapture> {
        match self {
            DeviceSpec::Index(index) => VideoCapture::new(*index, CAP_ANY),
            DeviceSpec::Location(location) => VideoCapture::from_file(location, CAP_ANY),
        }
    }
}

/// Video capture device
///
/// Frames are converted to RGB and resized to the configured size, so the
/// loop never sees a frame of the wrong shape. The device is released on drop.
pub struct Camera {
    capture: VideoCapture,
    config: CameraConfig,
    logger: Logger,
    recent: Arc<RecentFrame>,
    frame_count: u64,
    dropped_count: u64,
    actual_width: u32,
    actual_height: u32,
    actual_fps: f64,
}

/// Settings the driver actually applied
struct CameraSettings {
    width: u32,
    height: u32,
    fps: f64,
}

impl Camera {
    /// Opens and configures the camera.
    ///
    /// # Errors
    /// * `DeviceUnavailable(NotFound)` - no such device node
    /// * `DeviceUnavailable(Busy)` - the device exists but refused to open
    /// * `DeviceUnavailable(Unsupported)` - the device cannot be configured
    pub fn open(config: CameraConfig, logger: Logger) -> Result<Self> {
        logger.info(&format!(
            "Opening camera '{}' at {}x{} @ {:.1} fps",
            config.device, config.width, config.height, config.fps
        ));

        let location = DeviceSpec::parse(&config.device);
        location.check_exists(&config.device)?;

        let mut capture = location.open().map_err(|e| {
            MediaError::device_unavailable(&config.device, DeviceFailure::Busy, e.to_string())
        })?;

        if !capture.is_opened().unwrap_or(false) {
            return Err(MediaError::device_unavailable(
                &config.device,
                DeviceFailure::Busy,
                "device exists but could not be opened (in use by another program?)",
            ));
        }

        let settings = Self::configure(&mut capture, &config, &logger).map_err(|e| {
            MediaError::device_unavailable(
                &config.device,
                DeviceFailure::Unsupported,
                e.to_string(),
            )
        })?;

        logger.info("Camera opened successfully");

        Ok(Camera {
            capture,
            config,
            logger,
            recent: Arc::new(RecentFrame::new()),
            frame_count: 0,
            dropped_count: 0,
            actual_width: settings.width,
            actual_height: settings.height,
            actual_fps: settings.fps,
        })
    }

    /// Discards `n` frames, e.g. to let auto-exposure settle.
    ///
    /// Returns how many frames were actually grabbed.
    pub fn skip(&mut self, n: usize) -> usize {
        (0..n)
            .take_while(|_| self.capture.grab().unwrap_or(false))
            .count()
    }

    /// Total number of frames delivered
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Reads that produced no frame
    pub fn dropped_count(&self) -> u64 {
        self.dropped_count
    }

    pub fn config(&self) -> &CameraConfig {
        &self.config
    }

    /// Resolution the driver captures at (before resizing)
    pub fn actual_resolution(&self) -> (u32, u32) {
        (self.actual_width, self.actual_height)
    }

    pub fn actual_fps(&self) -> f64 {
        self.actual_fps
    }

    fn configure(
        capture: &mut VideoCapture,
        config: &CameraConfig,
        logger: &Logger,
    ) -> Result<CameraSettings> {
        use opencv::videoio::{CAP_PROP_FPS, CAP_PROP_FRAME_HEIGHT, CAP_PROP_FRAME_WIDTH};

        // Drivers silently ignore settings they cannot honor; read back below.
        let _ = capture.set(CAP_PROP_FRAME_WIDTH, f64::from(config.width));
        let _ = capture.set(CAP_PROP_FRAME_HEIGHT, f64::from(config.height));
        let _ = capture.set(CAP_PROP_FPS, config.fps);

        let settings = CameraSettings {
            width: capture.get(CAP_PROP_FRAME_WIDTH)? as u32,
            height: capture.get(CAP_PROP_FRAME_HEIGHT)? as u32,
            fps: capture.get(CAP_PROP_FPS)?,
        };

        if settings.width == 0 || settings.height == 0 {
            return Err(MediaError::Processing(
                "Device reports no frame size".to_string(),
            ));
        }

        Self::log_configuration(&settings, config, logger);
        Ok(settings)
    }

    fn log_configuration(settings: &CameraSettings, config: &CameraConfig, logger: &Logger) {
        logger.info(&format!(
            "Camera configured: {}x{} @ {:.1} FPS",
            settings.width, settings.height, settings.fps
        ));

        if (settings.width, settings.height) != config.resolution() {
            logger.warn(&format!(
                "Resolution mismatch (got: {}x{}, requested: {}x{}); frames will be resized",
                settings.width, settings.height, config.width, config.height
            ));
        }

        if settings.fps > 0.0 && (settings.fps - config.fps).abs() > 1.0 {
            logger.warn(&format!(
                "FPS mismatch (got: {:.1}, requested: {:.1})",
                settings.fps, config.fps
            ));
        }
    }

    fn note_dropped(&mut self, reason: &str) {
        self.dropped_count += 1;
        if self.dropped_count == 1 || self.dropped_count.is_multiple_of(CAMERA_LOG_INTERVAL) {
            self.logger.warn(&format!(
                "No frame from camera ({} dropped so far): {}",
                self.dropped_count, reason
            ));
        }
    }
}

impl FrameSource for Camera {
    fn read(&mut self) -> Option<Frame> {
        let mut mat = Mat::default();

        match self.capture.read(&mut mat) {
            Ok(true) => {}
            Ok(false) => {
                self.note_dropped("device returned no image");
                return None;
            }
            Err(e) => {
                self.note_dropped(&e.to_string());
                return None;
            }
        }

        let frame = match mat_to_frame(&mat, self.config.width, self.config.height) {
            Ok(frame) => frame,
            Err(e) => {
                self.note_dropped(&e.to_string());
                return None;
            }
        };

        self.recent.store(frame.clone());
        self.frame_count += 1;

        if self.frame_count.is_multiple_of(CAMERA_LOG_INTERVAL) {
            self.logger
                .debug(&format!("Frames captured: {}", self.frame_count));
        }

        Some(frame)
    }

    fn recent_frames(&self) -> Arc<RecentFrame> {
        Arc::clone(&self.recent)
    }

    fn dimensions(&self) -> (u32, u32) {
        self.config.resolution()
    }
}

impl Drop for Camera {
    fn drop(&mut self) {
        self.logger.info(&format!(
            "Closing camera '{}'. Frames captured: {}, dropped: {}",
            self.config.device, self.frame_count, self.dropped_count
        ));

        self.recent.clear();

        if let Err(e) = self.capture.release() {
            self.logger.error(&format!("Error releasing camera: {}", e));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_index() {
        assert_eq!(DeviceSpec::parse("0"), DeviceSpec::Index(0));
        assert_eq!(DeviceSpec::parse(" 2 "), DeviceSpec::Index(2));
    }

    #[test]
    fn test_parse_video_node() {
        assert_eq!(DeviceSpec::parse("/dev/video4"), DeviceSpec::Index(4));
    }

    #[test]
    fn test_parse_location() {
        assert_eq!(
            DeviceSpec::parse("rtsp://camera.local/stream"),
            DeviceSpec::Location("rtsp://camera.local/stream".to_string())
        );
        assert_eq!(
            DeviceSpec::parse("/dev/v4l/by-id/usb-cam"),
            DeviceSpec::Location("/dev/v4l/by-id/usb-cam".to_string())
        );
    }

    #[test]
    fn test_missing_node_is_not_found() {
        let config = CameraConfig::new("/dev/v4l/by-id/definitely-missing", 15.0).unwrap();
        let err = Camera::open(config, Logger::disabled()).err().unwrap();
        assert_eq!(err.device_failure(), Some(DeviceFailure::NotFound));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_missing_index_is_not_found() {
        let config = CameraConfig::new("999", 15.0).unwrap();
        let err = Camera::open(config, Logger::disabled()).err().unwrap();
        assert_eq!(err.device_failure(), Some(DeviceFailure::NotFound));
    }
}
