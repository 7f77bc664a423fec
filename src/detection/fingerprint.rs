/// Fingerprints for current-patient change comparison
///
/// A fingerprint identifies "which patient is currently being served" at a
/// counter. Comparing the latest fingerprint against the last recorded one
/// is the whole detection mechanism; the actual patient fields are never
/// compared directly.
use crate::model::Patient;

/// Sentinel recorded when a counter has no current patient
const EMPTY: &str = "none";

/// Derived key for one counter's current patient
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Compute the fingerprint for an optional current patient.
    ///
    /// Code and name together identify the call; two patients sharing a
    /// ticket code still produce distinct fingerprints.
    pub fn of(current: Option<&Patient>) -> Self {
        match current {
            Some(p) => Self(format!("{}::{}", p.code, p.name)),
            None => Self(EMPTY.to_string()),
        }
    }

    /// True when this fingerprint stands for "no current patient"
    pub fn is_empty_slot(&self) -> bool {
        self.0 == EMPTY
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
