use std::fmt;

/// Running counters for one session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EngineStats {
    pub iterations: u64,
    pub live_frames: u64,
    pub replayed_frames: u64,
    /// Live reads that returned no frame
    pub dropped_reads: u64,
    pub sink_errors: u64,
}

impl fmt::Display for EngineStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} iterations, {} live, {} replayed, {} dropped reads, {} sink errors",
            self.iterations,
            self.live_frames,
            self.replayed_frames,
            self.dropped_reads,
            self.sink_errors
        )
    }
}
