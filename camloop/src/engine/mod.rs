//! Frame Loop Engine
//!
//! Pulls a frame from the source, pushes it to the sink and optionally keeps
//! it in the ring buffer, once per frame interval. In replay mode the pull
//! step reads the buffer cyclically instead of the camera.
//!
//! The engine is single-threaded. Other threads steer it through an
//! [`EngineHandle`]: requests are queued on a channel and applied at the
//! start of the next iteration, and status comes back through atomics.

mod command;
mod handle;
mod mode;
mod settings;
mod stats;

pub use command::{EngineCommand, EngineEvent};
pub use handle::EngineHandle;
pub use mode::Mode;
pub use settings::EngineSettings;
pub use stats::EngineStats;

use crate::cancel::StopToken;
use crate::ring_buffer::FrameRingBuffer;
use handle::SharedStatus;
use logging::{LogLevel, Logger};
use media::{FrameSink, FrameSource, RecentFrame};
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::time::{Duration, Instant};

/// Log a progress line every N iterations
const LOG_INTERVAL: u64 = 1000;
/// Log sink failures on the first one and then every N
const SINK_ERROR_LOG_INTERVAL: u64 = 100;

pub struct LoopEngine<S, K> {
    source: S,
    sink: K,
    buffer: FrameRingBuffer,
    mode: Mode,
    gathering: bool,
    can_loop: bool,
    frame_interval: Duration,
    commands: Receiver<EngineCommand>,
    command_tx: Sender<EngineCommand>,
    status: Arc<SharedStatus>,
    events: Option<Sender<EngineEvent>>,
    stats: EngineStats,
    logger: Logger,
}

impl<S: FrameSource, K: FrameSink> LoopEngine<S, K> {
    pub fn new(source: S, sink: K, settings: &EngineSettings, logger: Logger) -> Self {
        let (command_tx, commands) = mpsc::channel();
        let buffer = FrameRingBuffer::new(settings.capacity());
        let status = Arc::new(SharedStatus::default());
        status.publish(
            false,
            Mode::Live,
            settings.gather_on_start,
            0,
            buffer.capacity(),
        );

        Self {
            source,
            sink,
            buffer,
            mode: Mode::Live,
            gathering: settings.gather_on_start,
            can_loop: false,
            frame_interval: settings.frame_interval(),
            commands,
            command_tx,
            status,
            events: None,
            stats: EngineStats::default(),
            logger,
        }
    }

    /// Routes engine notifications to `events`.
    pub fn with_events(mut self, events: Sender<EngineEvent>) -> Self {
        self.events = Some(events);
        self
    }

    /// Control handle usable from other threads.
    pub fn handle(&self) -> EngineHandle {
        EngineHandle::new(self.command_tx.clone(), Arc::clone(&self.status))
    }

    /// Preview cache of the source, valid after the engine moves threads.
    pub fn recent_frames(&self) -> Arc<RecentFrame> {
        self.source.recent_frames()
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn is_gathering(&self) -> bool {
        self.gathering
    }

    /// Replay is only possible on a full buffer.
    pub fn can_loop(&self) -> bool {
        self.buffer.is_full()
    }

    pub fn buffer(&self) -> &FrameRingBuffer {
        &self.buffer
    }

    pub fn stats(&self) -> EngineStats {
        self.stats
    }

    pub fn frame_interval(&self) -> Duration {
        self.frame_interval
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn sink(&self) -> &K {
        &self.sink
    }

    pub fn set_gathering(&mut self, gathering: bool) {
        if self.gathering == gathering {
            return;
        }
        self.gathering = gathering;
        self.logger.info(if gathering {
            "Gathering enabled"
        } else {
            "Gathering paused"
        });
        self.emit(EngineEvent::GatheringChanged(gathering));
    }

    /// Switches between live and replay, returning the resulting mode.
    ///
    /// Entering replay requires a full buffer; otherwise the request is
    /// ignored and the engine stays live. The replay cursor is kept across
    /// switches.
    pub fn set_looping(&mut self, looping: bool) -> Mode {
        let target = if looping { Mode::Replay } else { Mode::Live };
        if target == self.mode {
            return self.mode;
        }

        if target == Mode::Replay && !self.buffer.is_full() {
            self.logger.debug(&format!(
                "Replay refused: buffer holds {} / {} frames",
                self.buffer.len(),
                self.buffer.capacity()
            ));
            return self.mode;
        }

        if target == Mode::Replay {
            self.logger.info(&format!(
                "Replaying {} frame(s) captured over {:.2}s",
                self.buffer.len(),
                self.buffer.span().as_secs_f64()
            ));
        }
        self.change_mode(target);
        self.mode
    }

    /// Drops every buffered frame. Replay falls back to live.
    pub fn clear_buffer(&mut self) {
        self.buffer.clear();
        self.logger.info("Frame buffer cleared");
        if self.mode == Mode::Replay {
            self.change_mode(Mode::Live);
        }
    }

    /// Runs one iteration without sleeping.
    ///
    /// Returns how long the caller should wait before the next iteration.
    pub fn tick(&mut self) -> Duration {
        self.apply_commands();
        self.stats.iterations += 1;

        let delay = match self.mode {
            Mode::Replay => self.replay_frame(),
            Mode::Live => self.live_frame(),
        };

        self.publish_status();

        if self.stats.iterations.is_multiple_of(LOG_INTERVAL) {
            self.logger.info(&format!(
                "Iteration {} ({} mode, buffer {} / {}): {}",
                self.stats.iterations,
                self.mode,
                self.buffer.len(),
                self.buffer.capacity(),
                self.stats
            ));
        }

        delay
    }

    /// One paced iteration. Returns `false` when a stop cut the wait short.
    pub fn step(&mut self, stop: &StopToken) -> bool {
        let delay = self.tick();
        stop.sleep(delay)
    }

    /// Loops until `stop` fires, then releases the devices.
    pub fn run(mut self, stop: &StopToken) -> EngineStats {
        self.logger.info(&format!(
            "Frame loop started: interval {:.1} ms, replay window {} frames, gathering {}",
            self.frame_interval.as_secs_f64() * 1000.0,
            self.buffer.capacity(),
            if self.gathering { "on" } else { "off" }
        ));

        while !stop.is_stopped() {
            if !self.step(stop) {
                break;
            }
        }

        let stats = self.stats;
        self.logger
            .info(&format!("Frame loop stopped after {}", stats));
        self.emit(EngineEvent::Stopped(stats));
        stats
    }

    fn apply_commands(&mut self) {
        loop {
            match self.commands.try_recv() {
                Ok(EngineCommand::SetGathering(gathering)) => self.set_gathering(gathering),
                Ok(EngineCommand::SetLooping(looping)) => {
                    self.set_looping(looping);
                }
                Ok(EngineCommand::ClearBuffer) => self.clear_buffer(),
                // The engine holds a sender itself, so the queue never disconnects.
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
    }

    fn replay_frame(&mut self) -> Duration {
        match self.buffer.read_cycle() {
            Ok(frame) => {
                self.write(&frame);
                self.stats.replayed_frames += 1;
            }
            Err(e) => {
                self.logger
                    .warn(&format!("{}, falling back to live frames", e));
                self.change_mode(Mode::Live);
            }
        }
        self.frame_interval
    }

    fn live_frame(&mut self) -> Duration {
        let started = Instant::now();
        let frame = self.source.read();
        let read_cost = started.elapsed();

        match frame {
            Some(frame) => {
                self.write(&frame);
                self.stats.live_frames += 1;

                if self.gathering {
                    self.buffer.push(frame);
                    if self.logger.enabled(LogLevel::Debug) {
                        self.logger.debug(&format!(
                            "Gathered frame {} / {}",
                            self.buffer.len(),
                            self.buffer.capacity()
                        ));
                    }
                }
            }
            None => self.stats.dropped_reads += 1,
        }

        self.frame_interval.saturating_sub(read_cost)
    }

    fn write(&mut self, frame: &media::Frame) {
        if let Err(e) = self.sink.write(frame) {
            self.stats.sink_errors += 1;
            let count = self.stats.sink_errors;
            if count == 1 || count.is_multiple_of(SINK_ERROR_LOG_INTERVAL) {
                self.logger
                    .warn(&format!("Output write failed ({} so far): {}", count, e));
            }
        }
    }

    fn change_mode(&mut self, mode: Mode) {
        self.mode = mode;
        self.logger.info(&format!("Switched to {} mode", mode));
        self.emit(EngineEvent::ModeChanged(mode));
    }

    fn publish_status(&mut self) {
        let can_loop = self.buffer.is_full();
        self.status.publish(
            can_loop,
            self.mode,
            self.gathering,
            self.buffer.len(),
            self.buffer.capacity(),
        );

        if can_loop != self.can_loop {
            self.can_loop = can_loop;
            if can_loop {
                self.logger.info("Replay window is full, looping available");
            } else {
                self.logger.info("Replay window no longer full");
            }
            self.emit(EngineEvent::CanLoopChanged(can_loop));
        }
    }

    fn emit(&self, event: EngineEvent) {
        if let Some(events) = &self.events {
            // Nobody listening is fine.
            let _ = events.send(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use media::{Frame, MediaError, PatternSource};
    use std::sync::Mutex;

    /// Sink that remembers the sequence number of every frame it gets.
    #[derive(Clone, Default)]
    struct RecordingSink {
        written: Arc<Mutex<Vec<u64>>>,
        fail: bool,
    }

    impl RecordingSink {
        fn failing() -> Self {
            Self {
                fail: true,
                ..Self::default()
            }
        }

        fn sequences(&self) -> Vec<u64> {
            self.written.lock().unwrap().clone()
        }
    }

    impl FrameSink for RecordingSink {
        fn write(&mut self, frame: &Frame) -> media::Result<()> {
            if self.fail {
                return Err(MediaError::Processing("sink offline".to_string()));
            }
            let n = PatternSource::sequence_of(frame).unwrap();
            self.written.lock().unwrap().push(n);
            Ok(())
        }
    }

    fn engine_with_capacity(
        capacity_frames: f64,
        sink: RecordingSink,
    ) -> LoopEngine<PatternSource, RecordingSink> {
        // 1 second window at `capacity_frames` fps
        let settings = EngineSettings::new(capacity_frames, 1.0).unwrap();
        let source = PatternSource::new(4, 2).unwrap();
        LoopEngine::new(source, sink, &settings, Logger::disabled())
    }

    #[test]
    fn test_live_frames_pass_through_and_fill_buffer() {
        let sink = RecordingSink::default();
        let mut engine = engine_with_capacity(3.0, sink.clone());

        for _ in 0..4 {
            engine.tick();
        }

        assert_eq!(sink.sequences(), vec![1, 2, 3, 4]);
        let buffered: Vec<u64> = engine
            .buffer()
            .iter()
            .map(|f| PatternSource::sequence_of(f).unwrap())
            .collect();
        assert_eq!(buffered, vec![2, 3, 4]);
        assert_eq!(engine.stats().live_frames, 4);
    }

    #[test]
    fn test_replay_cycles_buffer_without_reading_source() {
        let sink = RecordingSink::default();
        let mut engine = engine_with_capacity(3.0, sink.clone());
        for _ in 0..3 {
            engine.tick();
        }

        assert_eq!(engine.set_looping(true), Mode::Replay);
        for _ in 0..5 {
            engine.tick();
        }

        assert_eq!(sink.sequences(), vec![1, 2, 3, 1, 2, 3, 1, 2]);
        assert_eq!(engine.source().sequence(), 3);
        assert_eq!(engine.stats().replayed_frames, 5);
    }

    #[test]
    fn test_looping_refused_until_full() {
        let mut engine = engine_with_capacity(30.0, RecordingSink::default());
        for _ in 0..5 {
            engine.tick();
        }

        assert!(!engine.can_loop());
        assert_eq!(engine.set_looping(true), Mode::Live);
        assert_eq!(engine.mode(), Mode::Live);
    }

    #[test]
    fn test_no_gathering_keeps_buffer_empty() {
        let settings = EngineSettings::new(3.0, 1.0).unwrap().with_gathering(false);
        let source = PatternSource::new(4, 2).unwrap();
        let sink = RecordingSink::default();
        let mut engine = LoopEngine::new(source, sink.clone(), &settings, Logger::disabled());

        for _ in 0..5 {
            engine.tick();
        }

        assert!(engine.buffer().is_empty());
        assert_eq!(sink.sequences().len(), 5);
    }

    #[test]
    fn test_loop_round_trip_keeps_cursor() {
        let sink = RecordingSink::default();
        let mut engine = engine_with_capacity(3.0, sink.clone());
        for _ in 0..3 {
            engine.tick();
        }

        engine.set_looping(true);
        engine.tick();
        assert_eq!(engine.buffer().cursor(), 1);

        engine.set_gathering(false);
        assert_eq!(engine.set_looping(false), Mode::Live);
        engine.tick();
        assert_eq!(engine.buffer().cursor(), 1);
        assert_eq!(engine.buffer().len(), 3);

        engine.set_looping(true);
        engine.tick();
        // Replay resumes where it left off: frame 2.
        assert_eq!(sink.sequences().last(), Some(&2));
    }

    #[test]
    fn test_commands_apply_on_next_tick() {
        let mut engine = engine_with_capacity(2.0, RecordingSink::default());
        let handle = engine.handle();

        engine.tick();
        engine.tick();
        assert!(handle.can_loop());

        assert!(handle.set_looping(true));
        assert!(!handle.is_looping());
        assert_eq!(engine.mode(), Mode::Live);

        engine.tick();
        assert_eq!(engine.mode(), Mode::Replay);
        assert!(handle.is_looping());
    }

    #[test]
    fn test_handle_reports_gathering_and_fill() {
        let mut engine = engine_with_capacity(4.0, RecordingSink::default());
        let handle = engine.handle();
        assert!(handle.is_gathering());
        assert_eq!(handle.buffer_fill(), (0, 4));

        engine.tick();
        handle.set_gathering(false);
        engine.tick();

        assert!(!handle.is_gathering());
        assert_eq!(handle.buffer_fill(), (1, 4));
    }

    #[test]
    fn test_can_loop_event_fires_on_edges_only() {
        let (tx, rx) = mpsc::channel();
        let mut engine = engine_with_capacity(2.0, RecordingSink::default()).with_events(tx);

        for _ in 0..5 {
            engine.tick();
        }
        engine.clear_buffer();
        engine.tick();

        let edges: Vec<EngineEvent> = rx
            .try_iter()
            .filter(|e| matches!(e, EngineEvent::CanLoopChanged(_)))
            .collect();
        // Full after two ticks, then 1 / 2 once cleared.
        assert_eq!(
            edges,
            vec![
                EngineEvent::CanLoopChanged(true),
                EngineEvent::CanLoopChanged(false)
            ]
        );
    }

    #[test]
    fn test_clear_while_replaying_returns_to_live() {
        let (tx, rx) = mpsc::channel();
        let mut engine = engine_with_capacity(2.0, RecordingSink::default()).with_events(tx);
        engine.tick();
        engine.tick();
        engine.set_looping(true);

        engine.handle().clear_buffer();
        engine.tick();

        assert_eq!(engine.mode(), Mode::Live);
        let modes: Vec<EngineEvent> = rx
            .try_iter()
            .filter(|e| matches!(e, EngineEvent::ModeChanged(_)))
            .collect();
        assert_eq!(
            modes,
            vec![
                EngineEvent::ModeChanged(Mode::Replay),
                EngineEvent::ModeChanged(Mode::Live)
            ]
        );
    }

    #[test]
    fn test_dropped_reads_are_skipped() {
        let settings = EngineSettings::new(10.0, 1.0).unwrap();
        let source = PatternSource::new(4, 2).unwrap().with_dropouts(2);
        let sink = RecordingSink::default();
        let mut engine = LoopEngine::new(source, sink.clone(), &settings, Logger::disabled());

        for _ in 0..6 {
            engine.tick();
        }

        assert_eq!(sink.sequences(), vec![1, 3, 5]);
        assert_eq!(engine.stats().dropped_reads, 3);
        assert_eq!(engine.buffer().len(), 3);
    }

    #[test]
    fn test_sink_errors_are_counted_not_fatal() {
        let mut engine = engine_with_capacity(3.0, RecordingSink::failing());

        for _ in 0..4 {
            engine.tick();
        }

        assert_eq!(engine.stats().sink_errors, 4);
        // Frames are still gathered even when the output is down.
        assert!(engine.can_loop());
    }

    #[test]
    fn test_live_delay_subtracts_read_time() {
        let settings = EngineSettings::new(10.0, 1.0).unwrap();
        let source = PatternSource::new(4, 2)
            .unwrap()
            .with_latency(Duration::from_millis(40));
        let mut engine =
            LoopEngine::new(source, RecordingSink::default(), &settings, Logger::disabled());

        let delay = engine.tick();

        assert!(delay <= Duration::from_millis(60));
        assert!(delay < engine.frame_interval());
    }

    #[test]
    fn test_replay_delay_is_full_interval() {
        let mut engine = engine_with_capacity(2.0, RecordingSink::default());
        engine.tick();
        engine.tick();
        engine.set_looping(true);

        assert_eq!(engine.tick(), engine.frame_interval());
    }

    #[test]
    fn test_run_exits_when_stopped() {
        let (tx, rx) = mpsc::channel();
        let engine = engine_with_capacity(50.0, RecordingSink::default()).with_events(tx);
        let stop = StopToken::new();
        stop.stop();

        let stats = engine.run(&stop);

        assert_eq!(stats.iterations, 0);
        assert!(
            rx.try_iter()
                .any(|e| matches!(e, EngineEvent::Stopped(s) if s == stats))
        );
    }
}
