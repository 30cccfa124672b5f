//! Error types for media operations.

use std::fmt;
use std::io;

pub type Result<T> = std::result::Result<T, MediaError>;

/// Why a device could not be acquired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceFailure {
    /// No such device node / index.
    NotFound,
    /// The device exists but refused to open (usually held by another process).
    Busy,
    /// The device opened but cannot deliver the requested format.
    Unsupported,
}

impl DeviceFailure {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceFailure::NotFound => "not found",
            DeviceFailure::Busy => "busy",
            DeviceFailure::Unsupported => "unsupported",
        }
    }
}

/// Error type for media operations
#[derive(Debug)]
pub enum MediaError {
    /// A capture or output device could not be acquired
    DeviceUnavailable {
        device: String,
        reason: DeviceFailure,
        detail: String,
    },
    /// Configuration error
    Config(String),
    /// I/O error
    Io(io::Error),
    /// OpenCV error
    OpenCv(opencv::Error),
    /// Frame processing error
    Processing(String),
}

impl MediaError {
    pub fn device_unavailable(
        device: impl Into<String>,
        reason: DeviceFailure,
        detail: impl Into<String>,
    ) -> Self {
        MediaError::DeviceUnavailable {
            device: device.into(),
            reason,
            detail: detail.into(),
        }
    }

    /// The failure class when this is a device acquisition error.
    pub fn device_failure(&self) -> Option<DeviceFailure> {
        match self {
            MediaError::DeviceUnavailable { reason, .. } => Some(*reason),
            _ => None,
        }
    }
}

impl fmt::Display for MediaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaError::DeviceUnavailable {
                device,
                reason,
                detail,
            } => write!(
                f,
                "Device '{}' unavailable ({}): {}",
                device,
                reason.as_str(),
                detail
            ),
            MediaError::Config(msg) => write!(f, "Config error: {}", msg),
            MediaError::Io(err) => write!(f, "I/O error: {}", err),
            MediaError::OpenCv(err) => write!(f, "OpenCV error: {}", err),
            MediaError::Processing(msg) => write!(f, "Processing error: {}", msg),
        }
    }
}

impl std::error::Error for MediaError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MediaError::Io(err) => Some(err),
            MediaError::OpenCv(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for MediaError {
    fn from(err: io::Error) -> Self {
        MediaError::Io(err)
    }
}

impl From<opencv::Error> for MediaError {
    fn from(err: opencv::Error) -> Self {
        MediaError::OpenCv(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_device_not_found() {
        let err = MediaError::device_unavailable(
            "/dev/video9",
            DeviceFailure::NotFound,
            "no such device node",
        );
        assert_eq!(
            err.to_string(),
            "Device '/dev/video9' unavailable (not found): no such device node"
        );
    }

    #[test]
    fn test_device_failure_classification() {
        let busy = MediaError::device_unavailable("0", DeviceFailure::Busy, "in use");
        assert_eq!(busy.device_failure(), Some(DeviceFailure::Busy));

        let config = MediaError::Config("bad fps".to_string());
        assert_eq!(config.device_failure(), None);
    }

    #[test]
    fn test_error_display_config() {
        let err = MediaError::Config("Invalid setting".to_string());
        assert_eq!(err.to_string(), "Config error: Invalid setting");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let media_err: MediaError = io_err.into();
        assert!(matches!(media_err, MediaError::Io(_)));
    }
}
