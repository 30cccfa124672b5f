//! Timing and buffering parameters of the loop.

use crate::ring_buffer::FrameRingBuffer;
use media::common::constants::{defaults, limits};
use media::MediaError;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub struct EngineSettings {
    /// Output frame rate
    pub fps: f64,
    /// Seconds of history kept for replay
    pub window_seconds: f64,
    /// Whether live frames are buffered from the first tick
    pub gather_on_start: bool,
}

impl EngineSettings {
    /// `fps` is clamped to 1.0-240.0; `window_seconds` must be positive and
    /// at most [`limits::MAX_WINDOW_SECONDS`].
    pub fn new(fps: f64, window_seconds: f64) -> Result<Self, MediaError> {
        if !fps.is_finite() {
            return Err(MediaError::Config(
                "FPS must be a finite number (not NaN or infinite)".to_string(),
            ));
        }
        if !window_seconds.is_finite() || window_seconds <= 0.0 {
            return Err(MediaError::Config(format!(
                "Replay window must be a positive number of seconds, got {}",
                window_seconds
            )));
        }
        if window_seconds > limits::MAX_WINDOW_SECONDS {
            return Err(MediaError::Config(format!(
                "Replay window of {}s exceeds the {}s limit",
                window_seconds,
                limits::MAX_WINDOW_SECONDS
            )));
        }
        Ok(Self {
            fps: fps.clamp(limits::MIN_FPS, limits::MAX_FPS),
            window_seconds,
            gather_on_start: true,
        })
    }

    pub fn with_gathering(mut self, gather_on_start: bool) -> Self {
        self.gather_on_start = gather_on_start;
        self
    }

    /// Target time between two output frames, `1 / fps`.
    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.fps)
    }

    /// Ring buffer capacity, `ceil(fps * window_seconds)`.
    pub fn capacity(&self) -> usize {
        FrameRingBuffer::capacity_for(self.fps, self.window_seconds)
    }
}

/// 15 fps, 2 second window, gathering on
impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            fps: defaults::FPS,
            window_seconds: defaults::WINDOW_SECONDS,
            gather_on_start: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = EngineSettings::default();
        assert_eq!(settings.capacity(), 30);
        let interval = settings.frame_interval().as_secs_f64();
        assert!((interval - 1.0 / 15.0).abs() < 1e-9);
    }

    #[test]
    fn test_fps_clamped() {
        assert_eq!(EngineSettings::new(0.2, 2.0).unwrap().fps, 1.0);
        assert_eq!(EngineSettings::new(1000.0, 2.0).unwrap().fps, 240.0);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(EngineSettings::new(f64::NAN, 2.0).is_err());
        assert!(EngineSettings::new(15.0, 0.0).is_err());
        assert!(EngineSettings::new(15.0, -1.0).is_err());
        assert!(EngineSettings::new(15.0, f64::INFINITY).is_err());
    }

    #[test]
    fn test_window_limit() {
        let longest = EngineSettings::new(240.0, limits::MAX_WINDOW_SECONDS).unwrap();
        assert_eq!(longest.capacity(), 14_400);

        assert!(EngineSettings::new(15.0, limits::MAX_WINDOW_SECONDS + 1.0).is_err());
        assert!(EngineSettings::new(15.0, 3600.0).is_err());
        assert!(EngineSettings::new(15.0, 1e18).is_err());
    }

    #[test]
    fn test_with_gathering() {
        let settings = EngineSettings::default().with_gathering(false);
        assert!(!settings.gather_on_start);
    }
}
