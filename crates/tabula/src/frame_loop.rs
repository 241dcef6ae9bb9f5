//! # TABULA Frame Loop
//!
//! ```text
//! Frame N:
//! ┌───────────────────────────────────────────────────────────────┐
//! │ 1. CLAMP STEP    dt → [0, max_frame_step], advance the clock  │
//! │ 2. DRAIN INPUT   queued InputEvents → engine.handle_event     │
//! │ 3. UPDATE        hover / drop tracking, threshold transitions │
//! │ 4. WORK          per-widget tween jobs on the pool (barrier)  │
//! │ 5. DRAW          zones, pieces, frames, controls → Painter    │
//! └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! Platform threads hold an [`EventSender`]; only the loop's thread touches
//! the engine.

use std::time::Instant;

use crossbeam_channel::{Receiver, Sender, TrySendError};
use tabula_ui::{InputEvent, InteractionEngine, Painter, ScopedPool, WorkerPool};
use thiserror::Error;

/// Input queue failures.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueError {
    /// The queue is at capacity; the event was dropped.
    #[error("input queue full ({capacity} events)")]
    Full {
        /// Queue capacity.
        capacity: usize,
    },

    /// The frame loop is gone.
    #[error("frame loop closed")]
    Closed,
}

/// Configuration for the frame loop.
#[derive(Clone, Debug)]
pub struct FrameLoopConfig {
    /// Input queue capacity.
    pub event_capacity: usize,
    /// Log per-frame timings at debug level.
    pub enable_timing_logs: bool,
}

impl Default for FrameLoopConfig {
    fn default() -> Self {
        Self {
            event_capacity: 1024,
            enable_timing_logs: false,
        }
    }
}

/// Frame timing statistics.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameStats {
    /// Frame number, starting at 1.
    pub frame: u64,
    /// Clock after this frame, in seconds.
    pub now: f64,
    /// Step actually taken, after clamping.
    pub step: f64,
    /// Input events handled.
    pub events_processed: u32,
    /// Widget jobs run.
    pub jobs: usize,
    /// Widget jobs that failed.
    pub job_errors: usize,
    /// Input and state machine time in microseconds.
    pub update_us: u64,
    /// Work batch time in microseconds.
    pub work_us: u64,
    /// Draw time in microseconds.
    pub draw_us: u64,
    /// Total frame time in microseconds.
    pub total_us: u64,
}

/// Cloneable handle for queueing input from any thread.
#[derive(Clone, Debug)]
pub struct EventSender {
    sender: Sender<InputEvent>,
    capacity: usize,
}

impl EventSender {
    /// Queues an event without blocking.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::Full`] when the queue is at capacity and
    /// [`QueueError::Closed`] when the loop has been dropped.
    pub fn send(&self, event: InputEvent) -> Result<(), QueueError> {
        self.sender.try_send(event).map_err(|e| match e {
            TrySendError::Full(_) => QueueError::Full {
                capacity: self.capacity,
            },
            TrySendError::Disconnected(_) => QueueError::Closed,
        })
    }
}

/// Owns the engine and drives it once per frame.
pub struct FrameLoop<P: WorkerPool = ScopedPool> {
    engine: InteractionEngine,
    pool: P,
    sender: Sender<InputEvent>,
    receiver: Receiver<InputEvent>,
    config: FrameLoopConfig,
    now: f64,
    frame: u64,
    last: FrameStats,
}

impl FrameLoop<ScopedPool> {
    /// Creates a loop running work on a machine-sized scoped pool.
    #[must_use]
    pub fn new(engine: InteractionEngine, config: FrameLoopConfig) -> Self {
        Self::with_pool(engine, ScopedPool::available(), config)
    }
}

impl<P: WorkerPool> FrameLoop<P> {
    /// Creates a loop running work on `pool`.
    #[must_use]
    pub fn with_pool(engine: InteractionEngine, pool: P, config: FrameLoopConfig) -> Self {
        let capacity = config.event_capacity.max(1);
        let (sender, receiver) = crossbeam_channel::bounded(capacity);
        let now = engine.now();
        Self {
            engine,
            pool,
            sender,
            receiver,
            config,
            now,
            frame: 0,
            last: FrameStats::default(),
        }
    }

    /// A handle for queueing input.
    #[must_use]
    pub fn sender(&self) -> EventSender {
        EventSender {
            sender: self.sender.clone(),
            capacity: self.config.event_capacity.max(1),
        }
    }

    /// The engine.
    #[must_use]
    pub const fn engine(&self) -> &InteractionEngine {
        &self.engine
    }

    /// The engine, for scene construction between frames.
    pub fn engine_mut(&mut self) -> &mut InteractionEngine {
        &mut self.engine
    }

    /// Consumes the loop, returning the engine.
    #[must_use]
    pub fn into_engine(self) -> InteractionEngine {
        self.engine
    }

    /// Statistics of the last frame.
    #[must_use]
    pub const fn last_stats(&self) -> &FrameStats {
        &self.last
    }

    /// Clock in seconds.
    #[must_use]
    pub const fn now(&self) -> f64 {
        self.now
    }

    /// Runs one frame `dt` seconds after the last and draws it into `painter`.
    pub fn tick(&mut self, dt: f64, painter: &mut dyn Painter) -> FrameStats {
        let start = Instant::now();

        let max_step = self.engine.config().max_frame_step;
        let step = if dt.is_finite() { dt.clamp(0.0, max_step) } else { 0.0 };
        if step < dt {
            tracing::debug!("frame step {dt:.4}s clamped to {step:.4}s");
        }
        self.now += step;
        self.frame += 1;
        self.engine.begin_frame(self.now);

        let mut events_processed = 0u32;
        while let Ok(event) = self.receiver.try_recv() {
            self.engine.handle_event(&event);
            events_processed += 1;
        }
        self.engine.update();
        let update_done = Instant::now();

        let report = self.engine.step_work(&self.pool);
        let work_done = Instant::now();

        self.engine.draw(painter);
        let draw_done = Instant::now();

        let stats = FrameStats {
            frame: self.frame,
            now: self.now,
            step,
            events_processed,
            jobs: report.completed,
            job_errors: report.errors.len(),
            update_us: micros(update_done - start),
            work_us: micros(work_done - update_done),
            draw_us: micros(draw_done - work_done),
            total_us: micros(draw_done - start),
        };
        if self.config.enable_timing_logs {
            tracing::debug!(
                "frame {}: {}us (update {}us, work {}us, draw {}us)",
                stats.frame,
                stats.total_us,
                stats.update_us,
                stats.work_us,
                stats.draw_us
            );
        }
        self.last = stats;
        stats
    }
}

#[allow(clippy::cast_possible_truncation)]
fn micros(duration: std::time::Duration) -> u64 {
    duration.as_micros() as u64
}
