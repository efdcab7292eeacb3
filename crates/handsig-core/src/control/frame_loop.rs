//! Threaded frame loop
//!
//! Owns a [`FrameOrchestrator`] on a dedicated thread and feeds it from a
//! [`FrameConsumer`]. The loop is paced by the detector rather than by a
//! timer: it wakes when a frame arrives, skips to the newest queued frame,
//! processes it and hands the output to a callback.

use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use super::{FrameOrchestrator, SignalOutput};
use crate::comm::FrameConsumer;
use crate::{Error, Result};

/// Configuration for a frame loop
#[derive(Debug, Clone)]
pub struct FrameLoopConfig {
    /// Name for logging
    pub name: Arc<str>,
    /// How long to wait for a frame before re-checking the stop flag
    pub poll_timeout: Duration,
    /// Processing time above which a frame counts as an overrun
    pub frame_budget: Duration,
    /// Whether to warn on overruns
    pub warn_on_overrun: bool,
}

impl Default for FrameLoopConfig {
    fn default() -> Self {
        Self {
            name: "frame_loop".into(),
            poll_timeout: Duration::from_millis(50),
            frame_budget: Duration::from_secs_f64(1.0 / 30.0),
            warn_on_overrun: true,
        }
    }
}

impl FrameLoopConfig {
    /// Config with the overrun budget derived from the camera frame rate
    pub fn new(camera_fps: f64) -> Result<Self> {
        if !(camera_fps.is_finite() && camera_fps > 0.0) {
            return Err(Error::Config(format!(
                "camera_fps must be finite and > 0, got {camera_fps}"
            )));
        }
        Ok(Self {
            frame_budget: Duration::from_secs_f64(1.0 / camera_fps),
            ..Default::default()
        })
    }

    pub fn with_name(mut self, name: impl Into<Arc<str>>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_poll_timeout(mut self, timeout: Duration) -> Self {
        self.poll_timeout = timeout;
        self
    }
}

/// Per-frame processing statistics
///
/// Mean and variance of the processing time are kept with Welford's online
/// update, so no per-frame history is stored.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameLoopStats {
    /// Frames run through the orchestrator
    pub frames_processed: u64,
    /// Queued frames skipped in favour of a newer one
    pub frames_superseded: u64,
    /// Frames whose processing exceeded the budget
    pub overruns: u64,
    pub min_processing_time: Duration,
    pub max_processing_time: Duration,
    mean_secs: f64,
    m2: f64,
}

impl FrameLoopStats {
    /// Record one processed frame
    pub fn record(&mut self, processing_time: Duration, budget: Duration) {
        self.frames_processed += 1;
        if self.frames_processed == 1 {
            self.min_processing_time = processing_time;
            self.max_processing_time = processing_time;
        } else {
            self.min_processing_time = self.min_processing_time.min(processing_time);
            self.max_processing_time = self.max_processing_time.max(processing_time);
        }

        let secs = processing_time.as_secs_f64();
        let delta = secs - self.mean_secs;
        self.mean_secs += delta / self.frames_processed as f64;
        self.m2 += delta * (secs - self.mean_secs);

        if processing_time > budget {
            self.overruns += 1;
        }
    }

    pub fn avg_processing_time(&self) -> Duration {
        Duration::from_secs_f64(self.mean_secs)
    }

    /// Sample standard deviation of processing time in seconds
    pub fn jitter_std_dev(&self) -> f64 {
        match self.frames_processed {
            0 | 1 => 0.0,
            n => (self.m2 / (n - 1) as f64).sqrt(),
        }
    }
}

/// Handle to a running frame loop
pub struct FrameLoopHandle {
    running: Arc<AtomicBool>,
    stats: Arc<Mutex<FrameLoopStats>>,
    latest: Arc<Mutex<Option<SignalOutput>>>,
    thread: JoinHandle<Result<FrameOrchestrator>>,
}

impl FrameLoopHandle {
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }

    pub fn stats(&self) -> FrameLoopStats {
        *self.stats.lock()
    }

    /// Output of the most recently processed frame
    pub fn latest_output(&self) -> Option<SignalOutput> {
        *self.latest.lock()
    }

    /// Ask the loop to stop; it exits within one poll timeout
    pub fn stop(&self) {
        self.running.store(false, Ordering::Relaxed);
    }

    /// Stop, wait for the loop to finish and take back the orchestrator
    pub fn join(self) -> Result<FrameOrchestrator> {
        self.stop();
        self.thread
            .join()
            .map_err(|_| Error::InvalidState("frame loop thread panicked".into()))?
    }
}

/// Detector-paced frame loop
///
/// # Example
/// ```no_run
/// use handsig_core::comm::{frame_queue, SignalWriter};
/// use handsig_core::control::{FrameLoop, FrameLoopConfig, FrameOrchestrator};
///
/// let (producer, consumer) = frame_queue(4);
/// let mut writer = SignalWriter::new(std::io::stdout());
///
/// let handle = FrameLoop::spawn(
///     FrameLoopConfig::new(30.0).unwrap().with_name("hands"),
///     FrameOrchestrator::default(),
///     consumer,
///     move |output| writer.write_line(output),
/// );
///
/// // detector thread: producer.push(frame) for every camera frame
/// drop(producer);
/// handle.join().unwrap();
/// ```
pub struct FrameLoop;

impl FrameLoop {
    /// Spawn the loop on a new thread
    ///
    /// Runs until [`FrameLoopHandle::stop`] is called, every producer is
    /// dropped, or `on_output` returns an error.
    pub fn spawn<F>(
        config: FrameLoopConfig,
        orchestrator: FrameOrchestrator,
        consumer: FrameConsumer,
        on_output: F,
    ) -> FrameLoopHandle
    where
        F: FnMut(&SignalOutput) -> Result<()> + Send + 'static,
    {
        let running = Arc::new(AtomicBool::new(true));
        let stats = Arc::new(Mutex::new(FrameLoopStats::default()));
        let latest = Arc::new(Mutex::new(None));

        let running_clone = running.clone();
        let stats_clone = stats.clone();
        let latest_clone = latest.clone();

        let thread = thread::spawn(move || {
            let mut orchestrator = orchestrator;
            let mut consumer = consumer;
            let result = drive(
                &config,
                &mut orchestrator,
                &mut consumer,
                on_output,
                &running_clone,
                &stats_clone,
                &latest_clone,
            );
            running_clone.store(false, Ordering::Relaxed);
            result.map(|()| orchestrator)
        });

        FrameLoopHandle {
            running,
            stats,
            latest,
            thread,
        }
    }

    /// Run the loop on the current thread until every producer is dropped
    pub fn run<F>(
        config: FrameLoopConfig,
        orchestrator: &mut FrameOrchestrator,
        mut consumer: FrameConsumer,
        on_output: F,
    ) -> Result<FrameLoopStats>
    where
        F: FnMut(&SignalOutput) -> Result<()>,
    {
        let running = AtomicBool::new(true);
        let stats = Mutex::new(FrameLoopStats::default());
        let latest = Mutex::new(None);
        drive(
            &config,
            orchestrator,
            &mut consumer,
            on_output,
            &running,
            &stats,
            &latest,
        )?;
        let stats = *stats.lock();
        Ok(stats)
    }
}

fn drive<F>(
    config: &FrameLoopConfig,
    orchestrator: &mut FrameOrchestrator,
    consumer: &mut FrameConsumer,
    mut on_output: F,
    running: &AtomicBool,
    stats: &Mutex<FrameLoopStats>,
    latest: &Mutex<Option<SignalOutput>>,
) -> Result<()>
where
    F: FnMut(&SignalOutput) -> Result<()>,
{
    tracing::debug!("{}: started", config.name);

    while running.load(Ordering::Relaxed) {
        let frame = match consumer.next_latest(config.poll_timeout) {
            Ok(Some(frame)) => frame,
            Ok(None) => continue,
            Err(Error::ChannelClosed) => {
                tracing::debug!("{}: frame source closed", config.name);
                break;
            }
            Err(e) => return Err(e),
        };

        let start = Instant::now();
        let output = orchestrator.process_frame(&frame);
        let processing_time = start.elapsed();

        {
            let mut stats = stats.lock();
            stats.record(processing_time, config.frame_budget);
            stats.frames_superseded = consumer.superseded();
        }
        *latest.lock() = Some(output);

        if processing_time > config.frame_budget && config.warn_on_overrun {
            tracing::warn!(
                "{}: frame took {:?}, budget {:?}",
                config.name,
                processing_time,
                config.frame_budget
            );
        }

        if let Err(e) = on_output(&output) {
            tracing::warn!("{}: output failed: {}", config.name, e);
            return Err(e);
        }
    }

    tracing::debug!("{}: stopped", config.name);
    Ok(())
}
