/// Snapshot change detector
///
/// Compares each counter's current-patient fingerprint against the last one
/// recorded for that counter id and emits one announcement job per change.
/// Detection is decoupled from execution: jobs are returned to the caller,
/// never enqueued here.
use std::collections::HashMap;

use crate::model::{Counter, CounterId};
use crate::sequencer::job::{AnnouncementJob, JobTiming};

use super::fingerprint::Fingerprint;

/// Detects current-patient changes across counter snapshots
///
/// The fingerprint map is append-only per key: entries are overwritten on
/// change but never removed, even when a counter disappears from later
/// snapshots.
pub struct ChangeDetector {
    seen: HashMap<CounterId, Fingerprint>,
    timing: JobTiming,
}

impl ChangeDetector {
    pub fn new(timing: JobTiming) -> Self {
        Self {
            seen: HashMap::new(),
            timing,
        }
    }

    /// Scan one snapshot and return jobs for every changed counter.
    ///
    /// Runs synchronously over the whole snapshot in iteration order, so two
    /// changes arriving together are emitted in the snapshot's counter order.
    ///
    /// The first time a counter id is observed its fingerprint is recorded
    /// without comparison and nothing is emitted; that observation reflects
    /// initial load, not a call. A change to an empty slot (patient cleared)
    /// is likewise recorded silently since there is nobody to announce.
    pub fn scan(&mut self, counters: &[Counter]) -> Vec<AnnouncementJob> {
        let mut jobs = Vec::new();

        for counter in counters {
            let fingerprint = Fingerprint::of(counter.current.as_ref());

            match self.seen.get(&counter.id) {
                None => {
                    tracing::debug!(
                        counter = %counter.id,
                        fingerprint = %fingerprint,
                        "First observation, recording without announcing"
                    );
                    self.seen.insert(counter.id.clone(), fingerprint);
                }
                Some(prev) if *prev != fingerprint => {
                    tracing::debug!(
                        counter = %counter.id,
                        from = %prev,
                        to = %fingerprint,
                        "Current patient changed"
                    );
                    self.seen.insert(counter.id.clone(), fingerprint);

                    if let Some(patient) = &counter.current {
                        jobs.push(AnnouncementJob::new(counter, patient.clone(), self.timing));
                    }
                }
                Some(_) => {}
            }
        }

        jobs
    }

    /// Number of counter ids observed so far
    pub fn observed(&self) -> usize {
        self.seen.len()
    }

    /// Last recorded fingerprint for a counter, if any
    pub fn fingerprint(&self, id: &CounterId) -> Option<&Fingerprint> {
        self.seen.get(id)
    }
}
