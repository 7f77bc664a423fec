/// Speech capability boundary
///
/// The sequencer never talks to a concrete text-to-speech engine; it goes
/// through this trait. Outcomes arrive asynchronously on a channel and may
/// never arrive at all, in which case the runner's own timeout applies.
pub mod chime;
pub mod voices;

use crossbeam_channel::Receiver;

use crate::error::SpeechError;
use crate::model::Language;

pub use chime::ChimeSpeech;
pub use voices::Voice;

/// Terminal outcome of one utterance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeechOutcome {
    /// The engine finished speaking
    Completed,
    /// The engine gave up partway; treated the same as completion
    Errored,
}

/// One utterance request
#[derive(Debug, Clone)]
pub struct SpeechRequest {
    pub text: String,
    pub lang: Language,
    /// Preferred voice, if one matched the language; engines without voice
    /// selection ignore this
    pub voice: Option<Voice>,
}

impl SpeechRequest {
    pub fn new(text: impl Into<String>, lang: Language) -> Self {
        Self {
            text: text.into(),
            lang,
            voice: None,
        }
    }

    pub fn with_voice(mut self, voice: Option<Voice>) -> Self {
        self.voice = voice;
        self
    }
}

/// Abstract announcement engine
///
/// `speak` hands back a receiver that fires at most once. Returning
/// `Err(SpeechError::Unavailable)` means the engine cannot speak at all;
/// the caller then falls back to silent display.
pub trait SpeechCapability: Send + Sync {
    /// Voices the engine offers, queried once at runner construction
    fn voices(&self) -> Vec<Voice>;

    /// Start speaking; the utterance outcome arrives on the returned channel
    fn speak(&self, request: SpeechRequest) -> Result<Receiver<SpeechOutcome>, SpeechError>;
}

/// Engine for displays with no audio output
///
/// Always unavailable, so every job runs its silent-display fallback. The
/// visual pop-up is unaffected; announcements degrade, the display does not.
pub struct NullSpeech;

impl SpeechCapability for NullSpeech {
    fn voices(&self) -> Vec<Voice> {
        Vec::new()
    }

    fn speak(&self, _request: SpeechRequest) -> Result<Receiver<SpeechOutcome>, SpeechError> {
        Err(SpeechError::Unavailable)
    }
}
