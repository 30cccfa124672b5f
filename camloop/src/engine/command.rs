//! Messages crossing the engine thread boundary.

use super::mode::Mode;
use super::stats::EngineStats;

/// Control requests, applied at the start of the next iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineCommand {
    SetGathering(bool),
    /// Ignored while the buffer is not yet full.
    SetLooping(bool),
    /// Discard the recorded window (drops back to live if replaying).
    ClearBuffer,
}

/// Notifications emitted by the engine, only when something changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineEvent {
    /// Replay became available (buffer filled) or unavailable.
    CanLoopChanged(bool),
    ModeChanged(Mode),
    GatheringChanged(bool),
    /// The loop has exited; devices are released right after.
    Stopped(EngineStats),
}
