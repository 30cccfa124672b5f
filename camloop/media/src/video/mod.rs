//! Video module
//!
//! Frame representation, device traits, capture sources and output sinks.

pub mod camera;
pub mod converters;
pub mod frame;
pub mod output;
pub mod pattern;
pub mod traits;

pub use camera::{Camera, CameraConfig, DeviceDetection, DeviceInfo};
pub use frame::Frame;
pub use output::{OutputConfig, VirtualOutput};
pub use pattern::PatternSource;
pub use traits::{FrameSink, FrameSource, RecentFrame};
