/// Event types broadcast by the sequencer
///
/// Events report things that have happened (past tense). Subscribers render
/// pop-ups or log from them; nothing feeds back into the sequencer.
use crate::model::CounterId;

/// Sequencer events
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A snapshot was scanned for changes
    SnapshotScanned {
        counters: usize,
        changes: usize,
    },

    /// A job was appended to the announcement queue
    JobQueued { counter_id: CounterId },

    /// A call is now displayed and being spoken
    AnnouncementStarted {
        counter_id: CounterId,
        phrase: String,
    },

    /// Speech did not finish on its own for this call; the display
    /// proceeded on schedule regardless
    SpeechIncomplete {
        counter_id: CounterId,
        reason: SpeechIncompleteReason,
    },

    /// The call's pop-up was cleared
    AnnouncementCleared { counter_id: CounterId },

    /// The queue ran dry and the drain finished
    QueueDrained { announced: usize },
}

/// Why an announcement went without (full) speech
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeechIncompleteReason {
    /// The capability reported an error mid-utterance
    Errored,
    /// Neither completion nor error arrived before the job timeout
    TimedOut,
    /// The capability could not speak at all
    Unavailable,
}

impl Event {
    /// Get a human-readable description of the event
    pub fn description(&self) -> String {
        match self {
            Event::SnapshotScanned { counters, changes } => {
                format!("Scanned {} counters, {} changed", counters, changes)
            }
            Event::JobQueued { counter_id } => {
                format!("Announcement queued for {}", counter_id)
            }
            Event::AnnouncementStarted { counter_id, phrase } => {
                format!("Announcing at {}: {}", counter_id, phrase)
            }
            Event::SpeechIncomplete { counter_id, reason } => {
                format!("Speech incomplete at {} ({:?})", counter_id, reason)
            }
            Event::AnnouncementCleared { counter_id } => {
                format!("Announcement cleared for {}", counter_id)
            }
            Event::QueueDrained { announced } => {
                format!("Queue drained after {} announcements", announced)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_description() {
        let event = Event::JobQueued {
            counter_id: "c1".into(),
        };
        assert_eq!(event.description(), "Announcement queued for c1");

        let event = Event::QueueDrained { announced: 3 };
        assert_eq!(event.description(), "Queue drained after 3 announcements");
    }
}
