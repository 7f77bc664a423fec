/// Announcement job runner
///
/// Executes one job end to end: show the pop-up, speak (or wait out the
/// silent fallback), clear the pop-up, settle. Speech is best-effort and the
/// display is guaranteed; a job that starts always finishes.
use std::sync::Arc;
use std::thread;

use crossbeam_channel::{after, select};
use parking_lot::RwLock;

use crate::messaging::events::SpeechIncompleteReason;
use crate::messaging::{Event, EventBus};
use crate::model::{CounterId, Patient};
use crate::speech::voices::{self, Voice};
use crate::speech::{SpeechCapability, SpeechOutcome, SpeechRequest};

use super::job::{AnnouncementJob, JobPhase};

/// The call currently shown in the pop-up overlay, if any
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveCall {
    pub counter_id: CounterId,
    pub counter_name: String,
    pub patient: Patient,
}

/// Shared slot for the displayed call: the runner writes, everyone else reads
pub type DisplaySlot = Arc<RwLock<Option<ActiveCall>>>;

/// Runs announcement jobs one at a time
pub struct JobRunner {
    speech: Arc<dyn SpeechCapability>,
    /// Voice list snapshot, taken once at construction
    voices: Vec<Voice>,
    display: DisplaySlot,
    bus: EventBus,
}

impl JobRunner {
    pub fn new(speech: Arc<dyn SpeechCapability>, display: DisplaySlot, bus: EventBus) -> Self {
        let voices = speech.voices();
        tracing::debug!(voices = voices.len(), "Job runner ready");
        Self {
            speech,
            voices,
            display,
            bus,
        }
    }

    /// Execute one job through all of its phases.
    ///
    /// Blocks the calling thread for the job's full duration; the queue's
    /// single-flight drain is what keeps announcements from overlapping.
    pub fn run(&self, job: AnnouncementJob) {
        let mut phase = JobPhase::Queued;

        phase = phase.next();
        debug_assert_eq!(phase, JobPhase::Announcing);
        *self.display.write() = Some(ActiveCall {
            counter_id: job.counter_id.clone(),
            counter_name: job.counter_name.clone(),
            patient: job.patient.clone(),
        });
        self.bus.publish(Event::AnnouncementStarted {
            counter_id: job.counter_id.clone(),
            phrase: job.phrase.clone(),
        });
        tracing::info!(counter = %job.counter_id, phrase = %job.phrase, "Announcing");

        if let Some(reason) = self.speak_and_wait(&job) {
            tracing::debug!(counter = %job.counter_id, ?reason, "Speech incomplete");
            self.bus.publish(Event::SpeechIncomplete {
                counter_id: job.counter_id.clone(),
                reason,
            });
        }

        phase = phase.next();
        debug_assert_eq!(phase, JobPhase::Clearing);
        *self.display.write() = None;
        self.bus.publish(Event::AnnouncementCleared {
            counter_id: job.counter_id.clone(),
        });

        phase = phase.next();
        debug_assert_eq!(phase, JobPhase::Settling);
        thread::sleep(job.timing.settle);

        phase = phase.next();
        tracing::trace!(counter = %job.counter_id, done = phase.is_done(), "Job finished");
    }

    /// Start speech and wait for outcome, error, or timeout, whichever comes
    /// first. Returns why speech did not complete, or `None` when it did.
    fn speak_and_wait(&self, job: &AnnouncementJob) -> Option<SpeechIncompleteReason> {
        let voice = voices::preferred(&self.voices, job.lang()).cloned();
        let request = SpeechRequest::new(job.phrase.clone(), job.lang()).with_voice(voice);

        match self.speech.speak(request) {
            Ok(outcome_rx) => {
                select! {
                    recv(outcome_rx) -> msg => match msg {
                        Ok(SpeechOutcome::Completed) => None,
                        Ok(SpeechOutcome::Errored) => Some(SpeechIncompleteReason::Errored),
                        // Engine dropped the channel without answering
                        Err(_) => Some(SpeechIncompleteReason::Errored),
                    },
                    recv(after(job.timing.speech_timeout)) -> _ => {
                        Some(SpeechIncompleteReason::TimedOut)
                    }
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "Speech unavailable, showing silently");
                thread::sleep(job.timing.silent_display);
                Some(SpeechIncompleteReason::Unavailable)
            }
        }
    }

    /// Read-only view of the displayed call
    pub fn current_call(&self) -> Option<ActiveCall> {
        self.display.read().clone()
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use crossbeam_channel::{bounded, Receiver, Sender};
    use parking_lot::Mutex;

    use super::*;
    use crate::error::SpeechError;
    use crate::model::{CallCode, Counter};
    use crate::sequencer::job::JobTiming;
    use crate::speech::NullSpeech;

    /// Test engine with a scripted outcome per call
    struct ScriptedSpeech {
        voices: Vec<Voice>,
        outcome: Option<SpeechOutcome>, // None = never resolves
        requests: Mutex<Vec<SpeechRequest>>,
    }

    impl ScriptedSpeech {
        fn new(outcome: Option<SpeechOutcome>, voices: Vec<Voice>) -> Self {
            Self {
                voices,
                outcome,
                requests: Mutex::new(Vec::new()),
            }
        }
    }

    impl SpeechCapability for ScriptedSpeech {
        fn voices(&self) -> Vec<Voice> {
            self.voices.clone()
        }

        fn speak(&self, request: SpeechRequest) -> Result<Receiver<SpeechOutcome>, SpeechError> {
            self.requests.lock().push(request);
            let (tx, rx): (Sender<SpeechOutcome>, _) = bounded(1);
            if let Some(outcome) = self.outcome {
                let _ = tx.send(outcome);
            } else {
                // Leak the sender so the channel stays open but silent
                std::mem::forget(tx);
            }
            Ok(rx)
        }
    }

    fn timing(speech_timeout_ms: u64) -> JobTiming {
        JobTiming {
            speech_timeout: Duration::from_millis(speech_timeout_ms),
            settle: Duration::from_millis(5),
            silent_display: Duration::from_millis(20),
        }
    }

    fn job_for(timing: JobTiming) -> AnnouncementJob {
        let counter = Counter::new("c1", "Radiology - Room 1");
        let patient = Patient::new("Ahmed", CallCode::numbered("R", 101));
        AnnouncementJob::new(&counter, patient, timing)
    }

    fn runner_with(speech: Arc<dyn SpeechCapability>) -> (JobRunner, Receiver<Event>) {
        let bus = EventBus::new();
        let (rx, _) = bus.subscribe();
        let runner = JobRunner::new(speech, Arc::new(RwLock::new(None)), bus);
        (runner, rx)
    }

    #[test]
    fn test_completed_speech_runs_clean() {
        let speech = Arc::new(ScriptedSpeech::new(Some(SpeechOutcome::Completed), vec![]));
        let (runner, events) = runner_with(speech);

        runner.run(job_for(timing(500)));

        assert!(runner.current_call().is_none(), "display cleared after job");
        assert!(matches!(
            events.try_recv().unwrap(),
            Event::AnnouncementStarted { .. }
        ));
        assert!(matches!(
            events.try_recv().unwrap(),
            Event::AnnouncementCleared { .. }
        ));
        assert!(events.try_recv().is_err(), "no speech-incomplete event");
    }

    #[test]
    fn test_errored_speech_still_completes_job() {
        let speech = Arc::new(ScriptedSpeech::new(Some(SpeechOutcome::Errored), vec![]));
        let (runner, events) = runner_with(speech);

        runner.run(job_for(timing(500)));

        let kinds: Vec<Event> = events.try_iter().collect();
        assert!(kinds.iter().any(|e| matches!(
            e,
            Event::SpeechIncomplete {
                reason: SpeechIncompleteReason::Errored,
                ..
            }
        )));
        assert!(kinds
            .iter()
            .any(|e| matches!(e, Event::AnnouncementCleared { .. })));
    }

    #[test]
    fn test_timeout_when_speech_never_resolves() {
        let speech = Arc::new(ScriptedSpeech::new(None, vec![]));
        let (runner, events) = runner_with(speech);

        let started = Instant::now();
        runner.run(job_for(timing(60)));
        let elapsed = started.elapsed();

        // Timeout plus settle, with generous epsilon for slow machines
        assert!(elapsed >= Duration::from_millis(60));
        assert!(elapsed < Duration::from_millis(600), "took {:?}", elapsed);

        let kinds: Vec<Event> = events.try_iter().collect();
        assert!(kinds.iter().any(|e| matches!(
            e,
            Event::SpeechIncomplete {
                reason: SpeechIncompleteReason::TimedOut,
                ..
            }
        )));
    }

    #[test]
    fn test_unavailable_engine_uses_silent_display() {
        let (runner, events) = runner_with(Arc::new(NullSpeech));

        let started = Instant::now();
        runner.run(job_for(timing(500)));
        let elapsed = started.elapsed();

        // Silent fallback (20ms) applies, not the speech timeout (500ms)
        assert!(elapsed >= Duration::from_millis(20));
        assert!(elapsed < Duration::from_millis(400), "took {:?}", elapsed);

        let kinds: Vec<Event> = events.try_iter().collect();
        assert!(kinds.iter().any(|e| matches!(
            e,
            Event::SpeechIncomplete {
                reason: SpeechIncompleteReason::Unavailable,
                ..
            }
        )));
    }

    #[test]
    fn test_display_set_while_announcing() {
        let speech = Arc::new(ScriptedSpeech::new(None, vec![]));
        let display: DisplaySlot = Arc::new(RwLock::new(None));
        let runner = JobRunner::new(speech, display.clone(), EventBus::new());

        let probe = Arc::clone(&display);
        let watcher = std::thread::spawn(move || {
            // Poll until the pop-up shows, then report what it held
            for _ in 0..200 {
                if let Some(call) = probe.read().clone() {
                    return Some(call);
                }
                thread::sleep(Duration::from_millis(1));
            }
            None
        });

        runner.run(job_for(timing(80)));

        let seen = watcher.join().unwrap().expect("pop-up never appeared");
        assert_eq!(seen.counter_id, "c1".into());
        assert_eq!(seen.patient.name, "Ahmed");
        assert!(runner.current_call().is_none());
    }

    #[test]
    fn test_preferred_voice_passed_through() {
        let voices = vec![Voice::new("en-1", "en-US"), Voice::new("ar-1", "ar-SA")];
        let speech = Arc::new(ScriptedSpeech::new(Some(SpeechOutcome::Completed), voices));
        let (runner, _events) = runner_with(Arc::clone(&speech) as Arc<dyn SpeechCapability>);

        runner.run(job_for(timing(100)));

        let requests = speech.requests.lock();
        assert_eq!(requests.len(), 1);
        // Default-language (Arabic) job picks the ar-SA voice
        assert_eq!(
            requests[0].voice.as_ref().map(|v| v.id.as_str()),
            Some("ar-1")
        );
    }
}
