use std::fmt;

/// What the loop writes to the sink each tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Pass camera frames straight through.
    #[default]
    Live,
    /// Replay the buffered window in a loop instead of reading the camera.
    Replay,
}

impl Mode {
    pub fn is_replay(self) -> bool {
        self == Mode::Replay
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Live => f.write_str("live"),
            Mode::Replay => f.write_str("replay"),
        }
    }
}
