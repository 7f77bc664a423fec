/// Announcement sequencer
///
/// Ties detection, queueing and running together behind one object. Feeding
/// it counter snapshots is the only input; the displayed-call slot and the
/// event bus are the only outputs.
pub mod job;
pub mod queue;
pub mod runner;

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{unbounded, Receiver, Sender};
use parking_lot::{Mutex, RwLock};

use crate::detection::ChangeDetector;
use crate::messaging::{Event, EventBus, SubscriberId};
use crate::model::Counter;
use crate::speech::SpeechCapability;

pub use job::{AnnouncementJob, JobPhase, JobTiming};
pub use queue::JobQueue;
pub use runner::{ActiveCall, DisplaySlot, JobRunner};

/// One sequencer per display session
///
/// Owns the fingerprint map, the job queue and the drain state explicitly;
/// nothing lives in ambient module state. `ingest` may be called from any
/// thread; announcements play on a dedicated drain worker so ingestion never
/// waits on audio.
pub struct AnnouncementSequencer {
    detector: Mutex<ChangeDetector>,
    queue: Arc<JobQueue>,
    display: DisplaySlot,
    bus: EventBus,
    wake_tx: Option<Sender<()>>,
    worker: Option<JoinHandle<()>>,
}

impl AnnouncementSequencer {
    pub fn new(timing: JobTiming, speech: Arc<dyn SpeechCapability>) -> Self {
        let bus = EventBus::new();
        let display: DisplaySlot = Arc::new(RwLock::new(None));
        let queue = Arc::new(JobQueue::new());
        let runner = Arc::new(JobRunner::new(speech, Arc::clone(&display), bus.clone()));

        let (wake_tx, wake_rx) = unbounded::<()>();
        let worker = spawn_drain_worker(wake_rx, Arc::clone(&queue), runner, bus.clone());

        Self {
            detector: Mutex::new(ChangeDetector::new(timing)),
            queue,
            display,
            bus,
            wake_tx: Some(wake_tx),
            worker: Some(worker),
        }
    }

    /// Accept a fresh counters snapshot: detect changes, enqueue one job per
    /// change, and wake the drain worker. Returns immediately.
    pub fn ingest(&self, counters: &[Counter]) {
        let jobs = self.detector.lock().scan(counters);
        self.bus.publish(Event::SnapshotScanned {
            counters: counters.len(),
            changes: jobs.len(),
        });

        if jobs.is_empty() {
            return;
        }

        for job in jobs {
            let counter_id = job.counter_id.clone();
            self.queue.push(job);
            self.bus.publish(Event::JobQueued { counter_id });
        }

        if let Some(tx) = &self.wake_tx {
            let _ = tx.send(());
        }
    }

    /// The call currently shown in the pop-up, if any
    pub fn current_call(&self) -> Option<ActiveCall> {
        self.display.read().clone()
    }

    /// Jobs queued but not yet announced
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Subscribe to sequencer events (display changes, queue activity)
    pub fn subscribe(&self) -> (Receiver<Event>, SubscriberId) {
        self.bus.subscribe()
    }

    /// Stop accepting work and wait for already-queued announcements to
    /// finish. Dropping without calling this detaches the worker instead,
    /// which still completes its current drain.
    pub fn shutdown(mut self) {
        self.wake_tx = None;
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                tracing::error!("Drain worker panicked");
            }
        }
        tracing::debug!("Sequencer shut down");
    }
}

fn spawn_drain_worker(
    wake_rx: Receiver<()>,
    queue: Arc<JobQueue>,
    runner: Arc<JobRunner>,
    bus: EventBus,
) -> JoinHandle<()> {
    thread::spawn(move || {
        tracing::debug!("Drain worker started");

        // One wake per ingest; a wake arriving mid-drain re-checks afterwards,
        // so nothing pushed during a drain is ever stranded.
        while wake_rx.recv().is_ok() {
            if let Some(announced) = queue.drain(&runner) {
                if announced > 0 {
                    bus.publish(Event::QueueDrained { announced });
                }
            }
        }

        tracing::debug!("Drain worker stopped");
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CallCode, Patient};
    use crate::speech::NullSpeech;
    use std::time::Duration;

    fn fast_timing() -> JobTiming {
        JobTiming {
            speech_timeout: Duration::from_millis(20),
            settle: Duration::from_millis(1),
            silent_display: Duration::from_millis(5),
        }
    }

    fn snapshot(code: u32, name: &str) -> Vec<Counter> {
        vec![Counter::new("c1", "Radiology - Room 1")
            .with_current(Patient::new(name, CallCode::numbered("R", code)))]
    }

    #[test]
    fn test_fresh_sequencer_is_idle() {
        let sequencer = AnnouncementSequencer::new(fast_timing(), Arc::new(NullSpeech));
        assert!(sequencer.current_call().is_none());
        assert_eq!(sequencer.pending(), 0);
        sequencer.shutdown();
    }

    #[test]
    fn test_first_snapshot_announces_nothing() {
        let sequencer = AnnouncementSequencer::new(fast_timing(), Arc::new(NullSpeech));
        let (events, _) = sequencer.subscribe();

        sequencer.ingest(&snapshot(101, "Ahmed"));
        sequencer.shutdown();

        let seen: Vec<Event> = events.try_iter().collect();
        assert!(seen
            .iter()
            .all(|e| matches!(e, Event::SnapshotScanned { changes: 0, .. })));
    }

    #[test]
    fn test_shutdown_finishes_queued_work() {
        let sequencer = AnnouncementSequencer::new(fast_timing(), Arc::new(NullSpeech));
        let (events, _) = sequencer.subscribe();

        sequencer.ingest(&snapshot(101, "Ahmed"));
        sequencer.ingest(&snapshot(102, "Mohammed"));

        // Joins the worker, so the queued announcement must have run
        sequencer.shutdown();

        let seen: Vec<Event> = events.try_iter().collect();
        assert!(seen
            .iter()
            .any(|e| matches!(e, Event::AnnouncementStarted { .. })));
        assert!(seen
            .iter()
            .any(|e| matches!(e, Event::AnnouncementCleared { .. })));
    }
}
