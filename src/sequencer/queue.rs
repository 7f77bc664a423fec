/// FIFO announcement queue with a single-flight drain
///
/// Holds jobs in arrival order and guarantees that at most one job is ever
/// executing: overlapping voice announcements are unintelligible, so the
/// drain serializes them end to end.
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;

use super::job::AnnouncementJob;
use super::runner::JobRunner;

/// Ordered queue of pending announcement jobs
///
/// Unbounded by design: a display shows tens of counters, not millions, so
/// backpressure buys nothing. Jobs are never reordered or deduplicated.
pub struct JobQueue {
    jobs: Mutex<VecDeque<AnnouncementJob>>,
    draining: AtomicBool,
}

impl JobQueue {
    pub fn new() -> Self {
        Self {
            jobs: Mutex::new(VecDeque::new()),
            draining: AtomicBool::new(false),
        }
    }

    /// Append a job to the tail. Total; never rejects.
    pub fn push(&self, job: AnnouncementJob) {
        self.jobs.lock().push_back(job);
    }

    pub fn len(&self) -> usize {
        self.jobs.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.lock().is_empty()
    }

    /// True while some caller is inside [`JobQueue::drain`]
    pub fn is_draining(&self) -> bool {
        self.draining.load(Ordering::SeqCst)
    }

    fn pop(&self) -> Option<AnnouncementJob> {
        self.jobs.lock().pop_front()
    }

    /// Process queued jobs head-first until the queue is empty.
    ///
    /// Idempotent trigger: if another drain is active this returns `None`
    /// immediately and that drain picks up whatever was pushed meanwhile.
    /// Otherwise runs every job to completion in FIFO order and returns how
    /// many were announced.
    ///
    /// A push that lands between the final empty check and the flag reset
    /// waits for the next trigger; callers wake the drain once per push, so
    /// no job is stranded.
    pub fn drain(&self, runner: &JobRunner) -> Option<usize> {
        if self.draining.swap(true, Ordering::SeqCst) {
            tracing::trace!("Drain already in progress, ignoring trigger");
            return None;
        }

        let mut announced = 0;
        while let Some(job) = self.pop() {
            runner.run(job);
            announced += 1;
        }

        self.draining.store(false, Ordering::SeqCst);
        Some(announced)
    }
}

impl Default for JobQueue {
    fn default() -> Self {
        Self::new()
    }
}
