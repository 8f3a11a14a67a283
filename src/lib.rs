//! NeuroStack Sync Core.
//! Selektions- und Event-Synchronisation zwischen Map- und Stack-Fenstern
//! als Library exportiert für Tests und Einbettung in Frontends.

pub mod app;
pub mod core;
pub mod shared;

pub use app::{
    EditDelta, EditEvent, EditKind, EditMode, EventHandler, EventKind, EventMessage, EventPayload,
    NodeRole, NullHandler, Outcome, SelectionState, SignalBus, UndoRedoLog, ViewState,
};
pub use app::{DocumentState, EventLog, EventLogEntry};
pub use core::{AnnotationBackend, AnnotationKind, AnnotationRow, AnnotationTable};
pub use core::{EventId, NodeId, PointId, SegmentId, SessionId};
pub use shared::SyncOptions;
