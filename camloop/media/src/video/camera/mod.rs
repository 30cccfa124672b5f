//! Camera capture module
//!
//! Device discovery, configuration and OpenCV-backed capture.

pub mod config;
pub mod detection;
pub mod device;

pub use config::CameraConfig;
pub use detection::{DeviceDetection, DeviceInfo};
pub use device::Camera;
