//! Event-Typen des Sync-Kerns: Nachrichten-Umschlag und typisierte Edits.

pub mod edit;
pub mod message;

pub use edit::{EditDelta, EditEvent, EditItem, EditKind};
pub use message::{EventKind, EventMessage, EventPayload};
