//! # Parallel Work Batch
//!
//! Each frame the engine hands every widget's tween update (plus its custom
//! update) to a [`WorkerPool`] as one independent job, then waits for the
//! whole batch:
//!
//! ```text
//!   enumerate_work ──► [job, job, job, ...] ──► pool.run ──► barrier ──► report
//!                         │    │    │
//!                       own widget state only; no scene mutation
//! ```
//!
//! There is no mid-batch cancellation and no timeout.

use std::num::NonZeroUsize;

use crossbeam_channel::unbounded;
use parking_lot::Mutex;

use crate::error::WidgetError;

/// One unit of work touching a single widget.
pub type Job<'a> = Box<dyn FnOnce() -> Result<(), WidgetError> + Send + 'a>;

/// Independent jobs produced for one frame.
#[derive(Default)]
pub struct WorkBatch<'a> {
    jobs: Vec<Job<'a>>,
}

impl<'a> WorkBatch<'a> {
    /// Creates an empty batch.
    #[must_use]
    pub fn new() -> Self {
        Self { jobs: Vec::new() }
    }

    /// Creates an empty batch with room for `capacity` jobs.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            jobs: Vec::with_capacity(capacity),
        }
    }

    /// Adds a job.
    pub fn push(&mut self, job: Job<'a>) {
        self.jobs.push(job);
    }

    /// Number of jobs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    /// Returns true when there is nothing to run.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Consumes the batch.
    #[must_use]
    pub fn into_jobs(self) -> Vec<Job<'a>> {
        self.jobs
    }
}

impl std::fmt::Debug for WorkBatch<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkBatch").field("jobs", &self.jobs.len()).finish()
    }
}

/// Outcome of a completed batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Jobs that ran.
    pub completed: usize,
    /// Failures, in no particular order.
    pub errors: Vec<WidgetError>,
}

impl BatchReport {
    /// Returns true if every job succeeded.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Something that runs a batch to completion.
pub trait WorkerPool {
    /// Runs every job and returns once all have finished.
    fn run(&self, batch: WorkBatch<'_>) -> BatchReport;
}

/// Runs jobs one after another on the calling thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct InlinePool;

impl WorkerPool for InlinePool {
    fn run(&self, batch: WorkBatch<'_>) -> BatchReport {
        let mut report = BatchReport::default();
        for job in batch.into_jobs() {
            if let Err(e) = job() {
                report.errors.push(e);
            }
            report.completed += 1;
        }
        report
    }
}

/// Runs jobs on scoped worker threads fed by a channel.
#[derive(Debug, Clone, Copy)]
pub struct ScopedPool {
    threads: NonZeroUsize,
}

impl ScopedPool {
    /// Creates a pool with `threads` workers.
    #[must_use]
    pub const fn new(threads: NonZeroUsize) -> Self {
        Self { threads }
    }

    /// Creates a pool sized to the machine.
    #[must_use]
    pub fn available() -> Self {
        Self::new(std::thread::available_parallelism().unwrap_or(NonZeroUsize::MIN))
    }

    /// Worker count.
    #[must_use]
    pub const fn threads(&self) -> usize {
        self.threads.get()
    }
}

impl Default for ScopedPool {
    fn default() -> Self {
        Self::available()
    }
}

impl WorkerPool for ScopedPool {
    fn run(&self, batch: WorkBatch<'_>) -> BatchReport {
        let total = batch.len();
        if total == 0 {
            return BatchReport::default();
        }

        let (tx, rx) = unbounded();
        for job in batch.into_jobs() {
            // The receiver is alive until the scope below ends.
            let _ = tx.send(job);
        }
        drop(tx);

        let errors = Mutex::new(Vec::new());
        let workers = self.threads.get().min(total);
        std::thread::scope(|scope| {
            for _ in 0..workers {
                let rx = rx.clone();
                let errors = &errors;
                scope.spawn(move || {
                    for job in rx.iter() {
                        if let Err(e) = job() {
                            errors.lock().push(e);
                        }
                    }
                });
            }
        });

        BatchReport {
            completed: total,
            errors: errors.into_inner(),
        }
    }
}
