//! Integration tests for the frame loop engine
//!
//! Drives a `LoopEngine` with the synthetic pattern source and a recording
//! sink:
//! - Fixed-rate pacing that absorbs capture latency
//! - Replay order and the full-buffer requirement
//! - Switching back and forth without losing the replay position

use camloop::{EngineSettings, LoopEngine, Mode, StopToken};
use logging::Logger;
use media::{Frame, FrameSink, PatternSource};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

#[derive(Clone, Default)]
struct RecordingSink {
    written: Arc<Mutex<Vec<u64>>>,
}

impl RecordingSink {
    fn sequences(&self) -> Vec<u64> {
        self.written.lock().unwrap().clone()
    }
}

impl FrameSink for RecordingSink {
    fn write(&mut self, frame: &Frame) -> media::Result<()> {
        let n = PatternSource::sequence_of(frame).unwrap();
        self.written.lock().unwrap().push(n);
        Ok(())
    }
}

fn engine(
    fps: f64,
    window_seconds: f64,
) -> (LoopEngine<PatternSource, RecordingSink>, RecordingSink) {
    let settings = EngineSettings::new(fps, window_seconds).unwrap();
    let sink = RecordingSink::default();
    let source = PatternSource::new(8, 6).unwrap();
    let engine = LoopEngine::new(source, sink.clone(), &settings, Logger::disabled());
    (engine, sink)
}

#[test]
fn test_pacing_absorbs_read_latency() {
    let settings = EngineSettings::new(15.0, 2.0).unwrap();
    let source = PatternSource::new(8, 6)
        .unwrap()
        .with_latency(Duration::from_millis(20));
    let mut engine =
        LoopEngine::new(source, RecordingSink::default(), &settings, Logger::disabled());
    let stop = StopToken::new();

    let started = Instant::now();
    for _ in 0..100 {
        assert!(engine.step(&stop));
    }
    let elapsed = started.elapsed().as_secs_f64();

    // 100 / 15 = 6.67s. Adding the read time on top would give 8.67s.
    assert!(elapsed >= 6.4, "loop ran too fast: {:.2}s", elapsed);
    assert!(elapsed < 7.6, "read latency not absorbed: {:.2}s", elapsed);
    assert_eq!(engine.stats().live_frames, 100);
}

#[test]
fn test_replay_after_eviction_starts_at_oldest() {
    // Capacity 3, frames A..D: the buffer keeps B, C, D.
    let (mut engine, sink) = engine(3.0, 1.0);
    for _ in 0..4 {
        engine.tick();
    }

    assert_eq!(engine.set_looping(true), Mode::Replay);
    for _ in 0..4 {
        engine.tick();
    }

    assert_eq!(sink.sequences(), vec![1, 2, 3, 4, 2, 3, 4, 2]);
}

#[test]
fn test_looping_refused_with_partial_buffer() {
    let (mut engine, sink) = engine(15.0, 2.0);
    assert_eq!(engine.buffer().capacity(), 30);

    for _ in 0..5 {
        engine.tick();
    }
    assert_eq!(engine.set_looping(true), Mode::Live);

    engine.tick();
    // Still reading the camera.
    assert_eq!(sink.sequences().last(), Some(&6));
    assert!(!engine.can_loop());
}

#[test]
fn test_loop_round_trip_preserves_buffer_and_cursor() {
    let (mut engine, _sink) = engine(4.0, 1.0);
    for _ in 0..4 {
        engine.tick();
    }
    engine.set_gathering(false);
    engine.set_looping(true);
    engine.tick();
    engine.tick();

    let before: Vec<Frame> = engine.buffer().iter().cloned().collect();
    let cursor = engine.buffer().cursor();

    assert_eq!(engine.set_looping(false), Mode::Live);
    assert_eq!(engine.set_looping(true), Mode::Replay);

    let after: Vec<Frame> = engine.buffer().iter().cloned().collect();
    assert_eq!(before, after);
    assert_eq!(engine.buffer().cursor(), cursor);
}

#[test]
fn test_every_buffered_frame_replayed_once_per_cycle() {
    let (mut engine, sink) = engine(5.0, 1.0);
    for _ in 0..12 {
        engine.tick();
    }
    engine.set_looping(true);

    let live = sink.sequences().len();
    for _ in 0..5 {
        engine.tick();
    }

    let mut cycle = sink.sequences()[live..].to_vec();
    cycle.sort_unstable();
    assert_eq!(cycle, vec![8, 9, 10, 11, 12]);
}

#[test]
fn test_unlooping_resumes_live_capture() {
    let (mut engine, sink) = engine(2.0, 1.0);
    engine.tick();
    engine.tick();
    engine.set_looping(true);
    engine.tick();

    engine.set_looping(false);
    engine.tick();

    assert_eq!(sink.sequences(), vec![1, 2, 1, 3]);
}
