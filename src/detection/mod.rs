/// Change detection over counter snapshots
///
/// Watches the "currently serving" patient per counter and decides which
/// counters need an announcement.
pub mod change_detector;
pub mod fingerprint;

pub use change_detector::ChangeDetector;
pub use fingerprint::Fingerprint;
