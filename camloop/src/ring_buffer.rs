//! Bounded frame history with cyclic playback.

use crate::error::{LoopError, Result};
use media::Frame;
use std::collections::VecDeque;
use std::time::Duration;

/// FIFO of the most recent frames.
///
/// Pushing onto a full buffer evicts the oldest frame. [`read_cycle`]
/// replays the buffered frames oldest-first, wrapping around at the
/// current length.
///
/// [`read_cycle`]: FrameRingBuffer::read_cycle
#[derive(Debug)]
pub struct FrameRingBuffer {
    frames: VecDeque<Frame>,
    capacity: usize,
    cursor: usize,
}

impl FrameRingBuffer {
    /// Creates an empty buffer; a capacity of 0 is raised to 1.
    ///
    /// Storage grows as frames arrive, nothing is reserved up front.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            frames: VecDeque::new(),
            capacity,
            cursor: 0,
        }
    }

    /// Buffer holding `window_seconds` of video at `fps`.
    pub fn with_window(fps: f64, window_seconds: f64) -> Self {
        Self::new(Self::capacity_for(fps, window_seconds))
    }

    /// `ceil(fps * window_seconds)`, at least 1.
    pub fn capacity_for(fps: f64, window_seconds: f64) -> usize {
        let frames = (fps * window_seconds).ceil();
        if frames.is_finite() && frames >= 1.0 {
            frames as usize
        } else {
            1
        }
    }

    /// Appends a frame, returning the evicted one when the buffer was full.
    pub fn push(&mut self, frame: Frame) -> Option<Frame> {
        let evicted = if self.frames.len() == self.capacity {
            self.frames.pop_front()
        } else {
            None
        };
        self.frames.push_back(frame);
        evicted
    }

    /// Returns the frame under the cursor and advances it modulo `len()`.
    ///
    /// # Errors
    /// [`LoopError::EmptyBuffer`] when nothing is buffered.
    pub fn read_cycle(&mut self) -> Result<Frame> {
        let len = self.frames.len();
        if len == 0 {
            return Err(LoopError::EmptyBuffer);
        }
        if self.cursor >= len {
            self.cursor %= len;
        }
        let frame = self.frames[self.cursor].clone();
        self.cursor = (self.cursor + 1) % len;
        Ok(frame)
    }

    pub fn is_full(&self) -> bool {
        self.frames.len() == self.capacity
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Index the next [`read_cycle`](Self::read_cycle) will return.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Capture time between the oldest and newest buffered frame.
    pub fn span(&self) -> Duration {
        match (self.frames.front(), self.frames.back()) {
            (Some(oldest), Some(newest)) => newest
                .timestamp()
                .saturating_duration_since(oldest.timestamp()),
            _ => Duration::ZERO,
        }
    }

    /// Drops every frame and rewinds the cursor.
    pub fn clear(&mut self) {
        self.frames.clear();
        self.cursor = 0;
    }

    /// Buffered frames, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Frame> {
        self.frames.iter()
    }
}
