//! Core-Domänentypen: IDs, Annotations-Backend und In-Memory-Tabelle.

pub mod annotation;
pub mod ids;
pub mod table;

pub use annotation::{AnnotationBackend, AnnotationKind};
pub use ids::{EventId, NodeId, PointId, SegmentId, SessionId};
pub use table::{AnnotationRow, AnnotationTable};
