//! Session controller.
//!
//! Opens the devices, runs a [`LoopEngine`] on its own thread and exposes
//! the runtime controls to the rest of the program.

use crate::cancel::StopToken;
use crate::config::SessionConfig;
use crate::engine::{EngineEvent, EngineHandle, EngineStats, LoopEngine};
use crate::error::{LoopError, Result};
use logging::Logger;
use media::video::pattern::PATTERN_DEVICE;
use media::{
    Camera, DeviceDetection, Frame, FrameSink, FrameSource, PatternSource, RecentFrame,
    VirtualOutput,
};
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver};
use std::thread::{self, JoinHandle};

/// Frames discarded right after opening a camera
const WARMUP_FRAMES: usize = 5;

pub type BoxedSource = Box<dyn FrameSource + Send>;
pub type BoxedSink = Box<dyn FrameSink + Send>;

/// Owner of a running frame loop.
///
/// Dropping the controller stops the loop and waits for it, which releases
/// both devices.
pub struct LoopController {
    handle: EngineHandle,
    recent: Arc<RecentFrame>,
    stop: StopToken,
    events: Option<Receiver<EngineEvent>>,
    thread: Option<JoinHandle<EngineStats>>,
    logger: Logger,
}

impl LoopController {
    /// Opens the configured devices and starts the loop.
    ///
    /// Unset devices are auto-detected: the first v4l2loopback node for the
    /// output and the first other camera for the input. `pattern` as input
    /// selects the synthetic test source.
    ///
    /// # Errors
    /// `DeviceUnavailable` when either device cannot be acquired. Nothing
    /// stays open in that case.
    pub fn start(config: &SessionConfig, logger: &Logger) -> Result<Self> {
        let logger = logger.for_component("Controller");
        config.validate()?;
        media::init::initialize(&logger)?;

        let output_device = match &config.output_device {
            Some(device) => device.clone(),
            None => DeviceDetection::default_output_device(&logger)?,
        };
        let input_device = match &config.input_device {
            Some(device) => device.clone(),
            None => DeviceDetection::default_capture_device(Some(&output_device), &logger)?,
        };
        logger.info(&format!("Relaying {} -> {}", input_device, output_device));

        let source = open_source(&input_device, config, &logger)?;
        let (source, sink) = attach_output(
            source,
            || {
                VirtualOutput::open(
                    config.output_config(&output_device)?,
                    logger.for_component("Output"),
                )
            },
            &logger,
        )?;

        let settings = config.engine_settings()?;
        let engine = LoopEngine::new(
            source,
            Box::new(sink) as BoxedSink,
            &settings,
            logger.for_component("Engine"),
        );
        Self::spawn(engine, &logger)
    }

    /// Runs an already built engine on a new `frame-loop` thread.
    pub fn spawn<S, K>(engine: LoopEngine<S, K>, logger: &Logger) -> Result<Self>
    where
        S: FrameSource + Send + 'static,
        K: FrameSink + Send + 'static,
    {
        let (event_tx, event_rx) = mpsc::channel();
        let engine = engine.with_events(event_tx);
        let handle = engine.handle();
        let recent = engine.recent_frames();
        let stop = StopToken::new();

        let thread_stop = stop.clone();
        let thread = thread::Builder::new()
            .name("frame-loop".to_string())
            .spawn(move || engine.run(&thread_stop))
            .map_err(|e| LoopError::Spawn(e.to_string()))?;

        Ok(Self {
            handle,
            recent,
            stop,
            events: Some(event_rx),
            thread: Some(thread),
            logger: logger.clone(),
        })
    }

    pub fn set_gathering(&self, gathering: bool) {
        self.handle.set_gathering(gathering);
    }

    /// Requests replay on or off; see [`LoopEngine::set_looping`].
    pub fn set_looping(&self, looping: bool) {
        self.handle.set_looping(looping);
    }

    pub fn clear_buffer(&self) {
        self.handle.clear_buffer();
    }

    pub fn can_loop(&self) -> bool {
        self.handle.can_loop()
    }

    pub fn is_looping(&self) -> bool {
        self.handle.is_looping()
    }

    pub fn is_gathering(&self) -> bool {
        self.handle.is_gathering()
    }

    /// `(buffered frames, capacity)`
    pub fn buffer_fill(&self) -> (usize, usize) {
        self.handle.buffer_fill()
    }

    /// Last captured camera frame, without waiting on the loop.
    pub fn recent_frame(&self) -> Option<Frame> {
        self.recent.latest()
    }

    pub fn recent_frames(&self) -> Arc<RecentFrame> {
        Arc::clone(&self.recent)
    }

    /// Engine notifications. Available once; later calls return `None`.
    pub fn take_events(&mut self) -> Option<Receiver<EngineEvent>> {
        self.events.take()
    }

    pub fn is_running(&self) -> bool {
        self.thread
            .as_ref()
            .is_some_and(|thread| !thread.is_finished())
    }

    /// Stops the loop and waits for it to release the devices.
    ///
    /// Returns the session counters the first time; later calls are no-ops
    /// returning `None`.
    pub fn stop(&mut self) -> Option<EngineStats> {
        self.stop.stop();
        let thread = self.thread.take()?;

        match thread.join() {
            Ok(stats) => Some(stats),
            Err(_) => {
                self.logger.error("Frame loop thread panicked");
                None
            }
        }
    }
}

impl Drop for LoopController {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Pairs an opened input with its output. When the output cannot be
/// opened the input is dropped, releasing its device, before the error is
/// returned.
fn attach_output<S, K, F>(source: S, open_output: F, logger: &Logger) -> Result<(S, K)>
where
    F: FnOnce() -> media::Result<K>,
{
    match open_output() {
        Ok(sink) => Ok((source, sink)),
        Err(e) => {
            logger.error(&format!("Output unavailable, releasing input: {}", e));
            drop(source);
            Err(e.into())
        }
    }
}

fn open_source(device: &str, config: &SessionConfig, logger: &Logger) -> Result<BoxedSource> {
    if device == PATTERN_DEVICE {
        logger.info("Using the synthetic test pattern as input");
        let source = PatternSource::new(config.width, config.height)?;
        return Ok(Box::new(source));
    }

    let mut camera = Camera::open(
        config.camera_config(device)?,
        logger.for_component("Camera"),
    )?;
    let skipped = camera.skip(WARMUP_FRAMES);
    logger.debug(&format!("Skipped {} warm-up frame(s)", skipped));
    Ok(Box::new(camera))
}
