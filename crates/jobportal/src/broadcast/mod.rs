//! Broadcasting of workflow events to in-process subscribers.
//!
//! The server subscribes a notifier that delivers them; tests subscribe to
//! assert on them.

pub mod lifecycle_events;

pub use lifecycle_events::{EventKind, LifecycleBroadcaster, LifecycleEvent};
