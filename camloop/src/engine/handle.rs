//! Cross-thread view of a running engine.

use super::command::EngineCommand;
use super::mode::Mode;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::mpsc::Sender;

/// State the engine publishes after every iteration.
#[derive(Debug, Default)]
pub(crate) struct SharedStatus {
    can_loop: AtomicBool,
    looping: AtomicBool,
    gathering: AtomicBool,
    buffered: AtomicUsize,
    capacity: AtomicUsize,
}

impl SharedStatus {
    pub(crate) fn publish(
        &self,
        can_loop: bool,
        mode: Mode,
        gathering: bool,
        buffered: usize,
        capacity: usize,
    ) {
        self.can_loop.store(can_loop, Ordering::Release);
        self.looping.store(mode.is_replay(), Ordering::Release);
        self.gathering.store(gathering, Ordering::Release);
        self.buffered.store(buffered, Ordering::Release);
        self.capacity.store(capacity, Ordering::Release);
    }
}

/// Cloneable control handle for an engine owned by another thread.
///
/// Setters enqueue a request and return immediately; the engine applies it
/// at its next iteration boundary. Getters read the last published state.
#[derive(Clone)]
pub struct EngineHandle {
    commands: Sender<EngineCommand>,
    status: Arc<SharedStatus>,
}

impl EngineHandle {
    pub(crate) fn new(commands: Sender<EngineCommand>, status: Arc<SharedStatus>) -> Self {
        Self { commands, status }
    }

    /// Sends a request. Returns `false` once the engine is gone.
    pub fn send(&self, command: EngineCommand) -> bool {
        self.commands.send(command).is_ok()
    }

    pub fn set_gathering(&self, gathering: bool) -> bool {
        self.send(EngineCommand::SetGathering(gathering))
    }

    /// Requests replay on or off. A replay request on a buffer that is not
    /// yet full is dropped by the engine.
    pub fn set_looping(&self, looping: bool) -> bool {
        self.send(EngineCommand::SetLooping(looping))
    }

    pub fn clear_buffer(&self) -> bool {
        self.send(EngineCommand::ClearBuffer)
    }

    /// Whether the buffer holds a full window.
    pub fn can_loop(&self) -> bool {
        self.status.can_loop.load(Ordering::Acquire)
    }

    pub fn is_looping(&self) -> bool {
        self.status.looping.load(Ordering::Acquire)
    }

    pub fn is_gathering(&self) -> bool {
        self.status.gathering.load(Ordering::Acquire)
    }

    /// `(buffered frames, capacity)`
    pub fn buffer_fill(&self) -> (usize, usize) {
        (
            self.status.buffered.load(Ordering::Acquire),
            self.status.capacity.load(Ordering::Acquire),
        )
    }
}
