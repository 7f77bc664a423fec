/// Pub/sub notifications from the sequencer
///
/// The presentation layer subscribes here to learn when the displayed call
/// changes; it owns no sequencer state of its own.
pub mod bus;
pub mod events;

pub use bus::{EventBus, SubscriberId};
pub use events::Event;
