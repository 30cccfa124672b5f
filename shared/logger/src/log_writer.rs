//! Log file writer running on its own thread.

use crate::error::{LoggingError, Result};
use crate::log_message::LogMessage;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::mpsc::Receiver;

pub(crate) struct LogWriter {
    file: BufWriter<File>,
}

impl LogWriter {
    /// Opens (or creates) the log file in append mode.
    pub fn open(log_path: &Path) -> Result<Self> {
        if let Some(parent) = log_path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_path)?;
        Ok(Self {
            file: BufWriter::new(file),
        })
    }

    fn write_message(&mut self, message: &LogMessage) {
        if let Err(e) = self.file.write_all(message.format().as_bytes()) {
            eprintln!("Error writing log: {}", e);
        }
    }

    /// Drains the channel until every sender is gone.
    ///
    /// Flushes whenever the channel runs dry, so bursts cost one flush.
    pub fn run(mut self, receiver: Receiver<LogMessage>) {
        while let Ok(message) = receiver.recv() {
            self.write_message(&message);
            for queued in receiver.try_iter() {
                self.write_message(&queued);
            }
            if let Err(e) = self.file.flush() {
                eprintln!("Error flushing log: {}", e);
            }
        }
    }
}

pub(crate) fn spawn_writer_thread(log_path: &Path, receiver: Receiver<LogMessage>) -> Result<()> {
    let writer = LogWriter::open(log_path)?;
    std::thread::Builder::new()
        .name("log-writer".to_string())
        .spawn(move || writer.run(receiver))
        .map_err(|e| LoggingError::Spawn(e.to_string()))?;
    Ok(())
}
