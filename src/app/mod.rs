//! Application-Layer: Bus, Events, Root-Handler, Undo/Redo und Zustand.

pub mod bus;
pub mod event_log;
pub mod events;
pub mod handlers;
pub mod history;
/// Selektions-, Ansichts- und Dokument-Zustand
///
/// Dieses Modul verwaltet den geteilten Zustand des Baums (Selektion,
/// Edit-Modus, Ansicht, Dokument).
pub mod state;

pub use bus::{EventHandler, NodeRole, NullHandler, Outcome, SignalBus};
pub use event_log::{EventLog, EventLogEntry};
pub use events::{EditDelta, EditEvent, EditItem, EditKind, EventKind, EventMessage, EventPayload};
pub use history::UndoRedoLog;
pub use state::{DocumentState, EditMode, SelectionState, ViewState};
