//! Camera frame loop.
//!
//! Relays frames from a capture device to a virtual output and can swap the
//! live feed for a replay of the last few seconds, at a fixed frame rate.

pub mod cancel;
pub mod config;
pub mod console;
pub mod controller;
pub mod engine;
pub mod error;
pub mod ring_buffer;

pub use cancel::StopToken;
pub use config::{AppConfig, SessionConfig};
pub use controller::LoopController;
pub use engine::{
    EngineCommand, EngineEvent, EngineHandle, EngineSettings, EngineStats, LoopEngine, Mode,
};
pub use error::{LoopError, Result};
pub use ring_buffer::FrameRingBuffer;
