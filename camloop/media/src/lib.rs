//! Media Module
//!
//! Frame type, capture/output device abstractions and their concrete
//! drivers: an OpenCV camera, a synthetic test pattern and a V4L2
//! loopback output.

pub mod common;
pub mod error;
pub mod init;
pub mod video;

pub use error::{DeviceFailure, MediaError, Result};

pub use video::{
    Camera, CameraConfig, DeviceDetection, DeviceInfo, Frame, FrameSink, FrameSource,
    OutputConfig, PatternSource, RecentFrame, VirtualOutput,
};
