//! Virtual webcam output
//!
//! Writes frames to a v4l2loopback device so other programs see them as a
//! camera.

pub mod config;
#[cfg(target_os = "linux")]
mod loopback;
#[cfg(not(target_os = "linux"))]
mod unsupported;

pub use config::OutputConfig;
#[cfg(target_os = "linux")]
pub use loopback::VirtualOutput;
#[cfg(not(target_os = "linux"))]
pub use unsupported::VirtualOutput;
