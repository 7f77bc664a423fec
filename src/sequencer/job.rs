/// Announcement jobs and their lifecycle
///
/// One job describes a single patient-change announcement: the counter, the
/// patient, the spoken phrase, and the timing the runner applies. Jobs are
/// immutable value objects created by the detector and consumed exactly once.
use std::time::Duration;

use crate::model::{Counter, CounterId, Language, Patient};

/// Per-job timing applied by the runner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JobTiming {
    /// Upper bound on waiting for a speech outcome
    pub speech_timeout: Duration,
    /// Pause after clearing the pop-up so consecutive calls stay distinct
    pub settle: Duration,
    /// Display time used when the speech capability is unavailable outright
    pub silent_display: Duration,
}

impl Default for JobTiming {
    fn default() -> Self {
        Self {
            speech_timeout: Duration::from_millis(1600),
            settle: Duration::from_millis(200),
            silent_display: Duration::from_millis(1200),
        }
    }
}

/// One unit of announcement work
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnouncementJob {
    pub counter_id: CounterId,
    pub counter_name: String,
    pub patient: Patient,
    /// Spoken as-is by the speech capability
    pub phrase: String,
    pub timing: JobTiming,
}

impl AnnouncementJob {
    /// Build a job for a newly called patient at a counter.
    ///
    /// The phrase reads name, then ticket code, then counter name, matching
    /// what the overhead speakers have always announced.
    pub fn new(counter: &Counter, patient: Patient, timing: JobTiming) -> Self {
        let phrase = format!("{} {} {}", patient.name, patient.code, counter.name);
        Self {
            counter_id: counter.id.clone(),
            counter_name: counter.name.clone(),
            patient,
            phrase,
            timing,
        }
    }

    pub fn lang(&self) -> Language {
        self.patient.lang
    }
}

/// Lifecycle of a job inside the runner
///
/// Every job walks the full sequence; there is no error state and no
/// early exit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobPhase {
    /// Waiting in the queue
    Queued,
    /// Pop-up shown, speech in flight (or timing out)
    Announcing,
    /// Pop-up being cleared
    Clearing,
    /// Post-clear settle delay
    Settling,
    /// Finished; the next job may start
    Done,
}

impl JobPhase {
    /// The phase that follows this one; `Done` is terminal
    pub fn next(&self) -> JobPhase {
        match self {
            JobPhase::Queued => JobPhase::Announcing,
            JobPhase::Announcing => JobPhase::Clearing,
            JobPhase::Clearing => JobPhase::Settling,
            JobPhase::Settling => JobPhase::Done,
            JobPhase::Done => JobPhase::Done,
        }
    }

    pub fn is_done(&self) -> bool {
        matches!(self, JobPhase::Done)
    }
}
