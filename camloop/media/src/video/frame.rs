//! RGB frame representation.
//!
//! Pixels are stored row-major, three bytes per pixel (R, G, B): pixel
//! `(x, y)` starts at byte `(y * width + x) * 3`.

use crate::error::{MediaError, Result};
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Immutable RGB frame.
///
/// The pixel buffer is shared, so clones are cheap and a clone held by
/// another thread always sees a complete frame.
#[derive(Clone)]
pub struct Frame {
    data: Arc<[u8]>,
    width: u32,
    height: u32,
    timestamp: Instant,
}

impl Frame {
    /// Bytes per pixel
    pub const CHANNELS: usize = 3;

    /// Wraps an RGB buffer, checking it matches `width * height * 3`.
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        let expected = Self::byte_len_for(width, height).ok_or_else(|| {
            MediaError::Config(format!("Frame dimensions {}x{} are invalid", width, height))
        })?;

        if data.len() != expected {
            return Err(MediaError::Config(format!(
                "Frame buffer holds {} bytes, {}x{} RGB needs {}",
                data.len(),
                width,
                height,
                expected
            )));
        }

        Ok(Frame {
            data: data.into(),
            width,
            height,
            timestamp: Instant::now(),
        })
    }

    /// Builds a frame of one solid color.
    pub fn filled(width: u32, height: u32, rgb: [u8; 3]) -> Result<Self> {
        let len = Self::byte_len_for(width, height).ok_or_else(|| {
            MediaError::Config(format!("Frame dimensions {}x{} are invalid", width, height))
        })?;
        let data = rgb.iter().copied().cycle().take(len).collect();
        Self::new(width, height, data)
    }

    /// Buffer size for an RGB frame, `None` for empty or overflowing sizes.
    pub fn byte_len_for(width: u32, height: u32) -> Option<usize> {
        if width == 0 || height == 0 {
            return None;
        }
        (width as usize)
            .checked_mul(height as usize)?
            .checked_mul(Self::CHANNELS)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Capture timestamp
    pub fn timestamp(&self) -> Instant {
        self.timestamp
    }

    /// Time since capture
    pub fn age(&self) -> Duration {
        self.timestamp.elapsed()
    }

    /// Raw row-major RGB bytes
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Returns the pixel at `(x, y)`, or `None` outside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = (y as usize * self.width as usize + x as usize) * Self::CHANNELS;
        Some([
            self.data[offset],
            self.data[offset + 1],
            self.data[offset + 2],
        ])
    }

    /// True when both frames share one pixel buffer.
    pub fn shares_buffer(&self, other: &Frame) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
    }
}

/// Equality compares dimensions and pixels; timestamps are ignored.
impl PartialEq for Frame {
    fn eq(&self, other: &Self) -> bool {
        self.width == other.width && self.height == other.height && self.data == other.data
    }
}

impl Eq for Frame {}

impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Frame")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("first_pixel", &self.pixel(0, 0))
            .field("age", &self.age())
            .finish()
    }
}
