//! TV queue announcement sequencer.
//!
//! Waiting-room displays show which patient each counter is serving. When a
//! counter calls the next patient, the display pops up a highlight and reads
//! the call out loud. Calls from different counters arrive unpredictably and
//! must never talk over each other, so announcements run through a FIFO
//! queue drained one job at a time.
//!
//! The pipeline: a [`detection::ChangeDetector`] fingerprints each counter's
//! current patient and emits one [`sequencer::AnnouncementJob`] per change;
//! the [`sequencer::AnnouncementSequencer`] queues jobs and a single drain
//! worker runs them through pop-up, speech (or timeout), clear and settle.
//! Speech goes through the [`speech::SpeechCapability`] boundary and is
//! best-effort; the visual display is guaranteed.

pub mod config;
pub mod detection;
pub mod error;
pub mod messaging;
pub mod model;
pub mod sequencer;
pub mod speech;

pub use config::Config;
pub use detection::{ChangeDetector, Fingerprint};
pub use error::{AppResult, ConfigError, SpeechError};
pub use messaging::{Event, EventBus};
pub use model::{CallCode, Counter, CounterId, Language, Patient};
pub use sequencer::{ActiveCall, AnnouncementJob, AnnouncementSequencer, JobTiming};
pub use speech::{ChimeSpeech, NullSpeech, SpeechCapability, SpeechOutcome, SpeechRequest, Voice};
