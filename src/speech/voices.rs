/// Voice listing and preference
///
/// Engines expose whatever voices the platform has installed; the runner
/// prefers one whose locale prefix matches the announcement language and
/// proceeds without an override when nothing matches.
use crate::model::Language;

/// One installed voice
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Voice {
    /// Engine-specific identifier
    pub id: String,
    /// BCP 47 locale, e.g. "ar-SA" or "en-GB"
    pub locale: String,
}

impl Voice {
    pub fn new(id: impl Into<String>, locale: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            locale: locale.into(),
        }
    }
}

/// Pick the first voice whose locale prefix matches the language.
///
/// "ar" matches "ar-SA" and "ar-EG" alike; an empty list yields `None` and
/// the engine's platform default applies.
pub fn preferred(voices: &[Voice], lang: Language) -> Option<&Voice> {
    voices.iter().find(|v| v.locale.starts_with(lang.code()))
}
