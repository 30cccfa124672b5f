//! One-time capture subsystem setup.
//!
//! Must run before the first [`Camera`](crate::Camera) is opened. Repeated
//! calls are no-ops that return the outcome of the first call.

use crate::error::{MediaError, Result};
use logging::Logger;
use std::sync::OnceLock;

static INIT: OnceLock<std::result::Result<(), String>> = OnceLock::new();

/// Initializes OpenCV process-wide state.
pub fn initialize(logger: &Logger) -> Result<()> {
    INIT.get_or_init(|| {
        logger.info("Initializing capture subsystem");
        configure_opencv().map_err(|e| e.to_string())
    })
    .clone()
    .map_err(|msg| MediaError::Processing(format!("Subsystem initialization failed: {}", msg)))
}

/// Whether [`initialize`] has completed successfully.
pub fn is_initialized() -> bool {
    matches!(INIT.get(), Some(Ok(())))
}

fn configure_opencv() -> opencv::Result<()> {
    opencv::core::set_use_optimized(true)?;
    // Frames are small; one OpenCV worker keeps the capture thread predictable.
    opencv::core::set_num_threads(1)?;
    Ok(())
}
