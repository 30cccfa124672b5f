//! Device traits for the frame loop.
//!
//! The loop only ever talks to a [`FrameSource`] and a [`FrameSink`];
//! concrete drivers (OpenCV camera, V4L2 loopback, test pattern) live
//! behind them.

use super::frame::Frame;
use crate::error::Result;
use std::sync::{Arc, Mutex, PoisonError};

/// Live capture device.
pub trait FrameSource {
    /// Captures one frame, blocking for at most one device frame period.
    ///
    /// `None` is a transient failure: the caller skips this tick.
    fn read(&mut self) -> Option<Frame>;

    /// Handle to the most-recent-frame cache.
    ///
    /// The handle outlives any move of the source into another thread, so a
    /// preview consumer can keep peeking while the loop owns the source.
    fn recent_frames(&self) -> Arc<RecentFrame>;

    /// Latest successfully captured frame, without waiting on [`read`](Self::read).
    fn read_recent(&self) -> Option<Frame> {
        self.recent_frames().latest()
    }

    /// Size of the frames this source yields.
    fn dimensions(&self) -> (u32, u32);
}

/// Output device.
pub trait FrameSink {
    /// Displays/streams a single frame.
    fn write(&mut self, frame: &Frame) -> Result<()>;
}

impl<T: FrameSource + ?Sized> FrameSource for Box<T> {
    fn read(&mut self) -> Option<Frame> {
        (**self).read()
    }

    fn recent_frames(&self) -> Arc<RecentFrame> {
        (**self).recent_frames()
    }

    fn read_recent(&self) -> Option<Frame> {
        (**self).read_recent()
    }

    fn dimensions(&self) -> (u32, u32) {
        (**self).dimensions()
    }
}

impl<T: FrameSink + ?Sized> FrameSink for Box<T> {
    fn write(&mut self, frame: &Frame) -> Result<()> {
        (**self).write(frame)
    }
}

/// Single-slot cache of the last captured frame.
///
/// Guarded by its own mutex, held only long enough to swap a reference
/// count, so a reader never waits on a device read in progress.
#[derive(Debug, Default)]
pub struct RecentFrame {
    slot: Mutex<Option<Frame>>,
}

impl RecentFrame {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the cached frame.
    pub fn store(&self, frame: Frame) {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(frame);
    }

    /// Returns the cached frame, if any.
    pub fn latest(&self) -> Option<Frame> {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Empties the cache. Called when the source is released.
    pub fn clear(&self) {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }
}
