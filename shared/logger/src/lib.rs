//! Non-blocking logger shared by every camloop component.
//!
//! Messages are formatted on the calling thread and handed to a writer
//! thread over a channel, so the frame loop never waits on disk I/O.

pub mod error;
mod log_level;
mod log_message;
mod log_writer;
mod logger;

pub use error::{LoggingError, Result};
pub use log_level::LogLevel;
pub use logger::Logger;
