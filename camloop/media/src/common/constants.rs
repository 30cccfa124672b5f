//! Constants shared across media modules

/// Logging intervals for frame processing
pub mod logging {
    /// Log progress every N frames (camera capture)
    pub const CAMERA_LOG_INTERVAL: u64 = 1000;
    /// Log progress every N frames (virtual output)
    pub const OUTPUT_LOG_INTERVAL: u64 = 1000;
}

/// Session defaults
pub mod defaults {
    pub const FPS: f64 = 15.0;
    pub const WINDOW_SECONDS: f64 = 2.0;
    pub const WIDTH: u32 = 640;
    pub const HEIGHT: u32 = 480;
}

/// Accepted ranges for capture parameters
pub mod limits {
    pub const MIN_FPS: f64 = 1.0;
    pub const MAX_FPS: f64 = 240.0;
    /// Longest replay window; the buffer holds `fps * window` full frames.
    pub const MAX_WINDOW_SECONDS: f64 = 60.0;
    pub const MIN_DIMENSION: u32 = 1;
    /// 8K
    pub const MAX_DIMENSION: u32 = 7680;
}
