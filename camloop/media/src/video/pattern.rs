//! Synthetic capture source.
//!
//! Produces solid-color frames whose color encodes the sequence number, so
//! the frame order is visible on the output device. Used as `input_device =
//! pattern` when no camera is attached, and as a stand-in camera in tests.

use super::frame::Frame;
use super::traits::{FrameSource, RecentFrame};
use crate::error::Result;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Device identifier that selects the pattern source.
pub const PATTERN_DEVICE: &str = "pattern";

pub struct PatternSource {
    width: u32,
    height: u32,
    sequence: u64,
    latency: Duration,
    dropout_every: Option<u64>,
    recent: Arc<RecentFrame>,
}

impl PatternSource {
    pub fn new(width: u32, height: u32) -> Result<Self> {
        // Validates the dimensions once up front.
        Frame::filled(width, height, [0, 0, 0])?;
        Ok(Self {
            width,
            height,
            sequence: 0,
            latency: Duration::ZERO,
            dropout_every: None,
            recent: Arc::new(RecentFrame::new()),
        })
    }

    /// Simulated capture cost of every [`read`](FrameSource::read).
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Makes every `n`th read fail (n >= 1), as a flaky camera would.
    pub fn with_dropouts(mut self, every: u64) -> Self {
        self.dropout_every = Some(every.max(1));
        self
    }

    /// Reads attempted so far, including dropped ones.
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Color encoding sequence number `n`.
    pub fn color_for(n: u64) -> [u8; 3] {
        [(n & 0xFF) as u8, ((n >> 8) & 0xFF) as u8, ((n >> 16) & 0xFF) as u8]
    }

    /// Inverse of [`color_for`](Self::color_for), read from the top-left pixel.
    pub fn sequence_of(frame: &Frame) -> Option<u64> {
        let [r, g, b] = frame.pixel(0, 0)?;
        Some(u64::from(r) | (u64::from(g) << 8) | (u64::from(b) << 16))
    }
}

impl FrameSource for PatternSource {
    fn read(&mut self) -> Option<Frame> {
        if !self.latency.is_zero() {
            thread::sleep(self.latency);
        }

        self.sequence += 1;
        let n = self.sequence;

        if self.dropout_every.is_some_and(|every| n % every == 0) {
            return None;
        }

        let frame = Frame::filled(self.width, self.height, Self::color_for(n)).ok()?;
        self.recent.store(frame.clone());
        Some(frame)
    }

    fn recent_frames(&self) -> Arc<RecentFrame> {
        Arc::clone(&self.recent)
    }

    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

impl Drop for PatternSource {
    fn drop(&mut self) {
        self.recent.clear();
    }
}
