//! ID-Aliase der Domäne. Alle IDs sind für den Sync-Kern opak.

/// ID einer Punkt-Annotation (Spine oder Segment-Punkt).
pub type PointId = u64;
/// ID eines Dendriten-Segments.
pub type SegmentId = u64;
/// Session = ein Imaging-Zeitpunkt; eine Map aggregiert mehrere Sessions.
pub type SessionId = usize;
/// ID eines registrierten Nodes im Propagations-Baum.
pub type NodeId = u64;
/// Eindeutige Event-ID, vergeben vom Bus beim Emit.
pub type EventId = u64;
