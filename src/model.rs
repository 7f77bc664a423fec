/// Display data model for the queue screens
///
/// The sequencer only reads these records; they are owned by whatever
/// feeds it counter snapshots (REST poller, demo script, tests).
use serde::{Deserialize, Serialize};

/// Stable identity of a service point (room or window)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CounterId(pub String);

impl CounterId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl std::fmt::Display for CounterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for CounterId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Ticket call code shown on screen and read out loud
///
/// Departments issue either prefix+number tickets ("R101") or free-form
/// codes ("GM124"); both render the same way.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CallCode {
    /// Prefixed sequential ticket, e.g. prefix "R" number 101
    Numbered { prefix: String, number: u32 },
    /// Free-form code string, e.g. "GM124"
    Free(String),
}

impl CallCode {
    pub fn numbered(prefix: impl Into<String>, number: u32) -> Self {
        Self::Numbered {
            prefix: prefix.into(),
            number,
        }
    }

    pub fn free(code: impl Into<String>) -> Self {
        Self::Free(code.into())
    }
}

impl std::fmt::Display for CallCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CallCode::Numbered { prefix, number } => write!(f, "{}{}", prefix, number),
            CallCode::Free(code) => write!(f, "{}", code),
        }
    }
}

/// Announcement language for a patient
///
/// Drives voice selection and the speech locale. Arabic is the default
/// for records that carry no tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Arabic,
    English,
}

impl Language {
    /// ISO 639-1 code, also the voice locale prefix to match on
    pub fn code(&self) -> &'static str {
        match self {
            Language::Arabic => "ar",
            Language::English => "en",
        }
    }

    /// Full speech locale passed to the capability
    pub fn locale(&self) -> &'static str {
        match self {
            Language::Arabic => "ar-SA",
            Language::English => "en-US",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A patient as shown on the display
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patient {
    pub name: String,
    pub code: CallCode,
    #[serde(default)]
    pub lang: Language,
}

impl Patient {
    pub fn new(name: impl Into<String>, code: CallCode) -> Self {
        Self {
            name: name.into(),
            code,
            lang: Language::default(),
        }
    }

    pub fn with_lang(mut self, lang: Language) -> Self {
        self.lang = lang;
        self
    }
}

/// One service point and its queue as of the latest snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counter {
    pub id: CounterId,
    pub name: String,
    pub current: Option<Patient>,
    #[serde(default)]
    pub upcoming: Vec<Patient>,
}

impl Counter {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: CounterId::new(id),
            name: name.into(),
            current: None,
            upcoming: Vec::new(),
        }
    }

    pub fn with_current(mut self, patient: Patient) -> Self {
        self.current = Some(patient);
        self
    }

    pub fn with_upcoming(mut self, patients: Vec<Patient>) -> Self {
        self.upcoming = patients;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_call_code_display() {
        let code = CallCode::numbered("R", 101);
        assert_eq!(code.to_string(), "R101");

        let code = CallCode::free("GM124");
        assert_eq!(code.to_string(), "GM124");
    }

    #[test]
    fn test_language_defaults_to_arabic() {
        let patient = Patient::new("أحمد علي", CallCode::numbered("R", 101));
        assert_eq!(patient.lang, Language::Arabic);
        assert_eq!(patient.lang.locale(), "ar-SA");
    }

    #[test]
    fn test_language_codes() {
        assert_eq!(Language::Arabic.code(), "ar");
        assert_eq!(Language::English.code(), "en");
        assert_eq!(Language::English.locale(), "en-US");
    }

    #[test]
    fn test_patient_serde_roundtrip() {
        let patient = Patient::new("Aisha Saeed", CallCode::numbered("R", 103))
            .with_lang(Language::English);
        let json = serde_json::to_string(&patient).unwrap();
        let back: Patient = serde_json::from_str(&json).unwrap();
        assert_eq!(patient, back);
    }

    #[test]
    fn test_counter_builder() {
        let counter = Counter::new("c1", "Radiology - Room 1")
            .with_current(Patient::new("أحمد علي", CallCode::numbered("R", 101)))
            .with_upcoming(vec![Patient::new("محمد سالم", CallCode::numbered("R", 102))]);

        assert_eq!(counter.id, CounterId::from("c1"));
        assert!(counter.current.is_some());
        assert_eq!(counter.upcoming.len(), 1);
    }
}
