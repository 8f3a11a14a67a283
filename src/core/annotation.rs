//! Capability-Schnittstelle zum Annotations-Backend.
//!
//! Der Sync-Kern berührt niemals Dateien oder Bildpuffer direkt: jede
//! Mutation in einem Handler läuft über diese Schnittstelle. Geometrie-
//! und Bildverarbeitung (z.B. die Wahl des hellsten Segment-Punkts beim
//! Auto-Connect) liegen vollständig beim Backend.

use glam::Vec3;

use super::{PointId, SegmentId, SessionId};

/// Art einer Annotation. Handler verzweigen auf diese Daten,
/// nie auf konkrete Backend-Typen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnotationKind {
    /// Punkt-Annotation auf einem Dendriten
    Spine,
    /// Stützpunkt der Segment-Mittellinie
    SegmentPoint,
    /// Dendriten-Mittellinien-Segment
    Segment,
}

/// Backend-Schnittstelle für Annotations-Zugriffe.
///
/// Unbekannte Spalten oder IDs sind nie ein Fehler: Lesezugriffe liefern
/// `None`, Schreibzugriffe `false`, jeweils mit Log-Eintrag beim Backend.
pub trait AnnotationBackend {
    /// Liest einen Spaltenwert einer Annotation.
    fn get_value(&self, column: &str, id: PointId) -> Option<f64>;
    /// Schreibt einen Spaltenwert einer Annotation.
    fn set_value(&mut self, column: &str, id: PointId, value: f64) -> bool;

    /// Legt einen neuen Spine auf einem Segment an.
    fn add_spine(&mut self, position: Vec3, segment: SegmentId, session: SessionId)
        -> Option<PointId>;
    /// Löscht eine Punkt-Annotation (Spine oder Segment-Punkt).
    fn delete_annotation(&mut self, id: PointId) -> bool;
    /// Verschiebt eine Punkt-Annotation.
    fn move_annotation(&mut self, id: PointId, position: Vec3) -> bool;
    /// Wählt den Verbindungs-Zielpunkt eines Spines automatisch und setzt
    /// dessen `brightestIndex`. Gibt den gewählten Segment-Punkt zurück.
    fn auto_connect_spine(&mut self, id: PointId) -> Option<PointId>;

    /// Legt ein neues Segment für eine Session an.
    fn add_segment(&mut self, session: SessionId) -> Option<SegmentId>;
    /// Löscht ein Segment samt Mittellinien-Punkten.
    fn delete_segment(&mut self, id: SegmentId) -> bool;
    /// Fügt einen Mittellinien-Punkt an ein Segment an.
    fn add_segment_point(&mut self, segment: SegmentId, position: Vec3) -> Option<PointId>;
    /// Löscht einen Mittellinien-Punkt.
    fn delete_segment_point(&mut self, id: PointId) -> bool;
    /// Setzt den Pivot-Punkt eines Segments.
    fn set_segment_pivot(&mut self, segment: SegmentId, position: Vec3) -> bool;
    /// Liest den Pivot-Punkt eines Segments.
    fn segment_pivot(&self, segment: SegmentId) -> Option<Vec3>;
    /// Alle Mittellinien-Punkte eines Segments, in Reihenfolge.
    fn segment_points(&self, segment: SegmentId) -> Vec<PointId>;

    /// Art einer Annotation.
    fn kind_of(&self, id: PointId) -> Option<AnnotationKind>;
    /// Session einer Annotation.
    fn session_of(&self, id: PointId) -> Option<SessionId>;
    /// Segment-Zugehörigkeit einer Punkt-Annotation.
    fn segment_of(&self, id: PointId) -> Option<SegmentId>;
    /// Position einer Punkt-Annotation.
    fn position_of(&self, id: PointId) -> Option<Vec3>;
}
