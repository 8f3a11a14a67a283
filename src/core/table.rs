//! In-Memory-Referenz-Backend für Annotationen.
//!
//! `AnnotationTable` hält Punkt-Annotationen als Zeilen mit dynamischen
//! numerischen Spalten, indexiert nach ID. Tests und Embedder ohne eigenes
//! Backend nutzen diese Implementierung; der Sync-Kern selbst spricht nur
//! das `AnnotationBackend`-Trait.

use glam::Vec3;
use indexmap::IndexMap;

use super::{AnnotationBackend, AnnotationKind, PointId, SegmentId, SessionId};
use crate::shared::DEFAULT_SPINE_RADIUS;

/// Eine Punkt-Annotation als Tabellenzeile.
#[derive(Debug, Clone)]
pub struct AnnotationRow {
    /// Art der Annotation
    pub kind: AnnotationKind,
    /// Zugehörige Session (Imaging-Zeitpunkt)
    pub session: SessionId,
    /// Segment-Zugehörigkeit (Spines und Segment-Punkte)
    pub segment: Option<SegmentId>,
    /// Position in Bildkoordinaten (x, y, z = Slice)
    pub position: Vec3,
    /// Dynamische numerische Spalten
    pub columns: IndexMap<String, f64>,
}

/// Segment-Zeile: Session-Bindung plus optionaler Pivot.
#[derive(Debug, Clone)]
struct SegmentRow {
    session: SessionId,
    pivot: Option<Vec3>,
}

/// Id-indexierter Container für alle Annotationen eines Dokuments.
#[derive(Default)]
pub struct AnnotationTable {
    rows: IndexMap<PointId, AnnotationRow>,
    segments: IndexMap<SegmentId, SegmentRow>,
    next_id: u64,
}

impl AnnotationTable {
    /// Erstellt eine leere Tabelle.
    pub fn new() -> Self {
        Self {
            rows: IndexMap::new(),
            segments: IndexMap::new(),
            next_id: 1,
        }
    }

    fn alloc_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Anzahl der Punkt-Annotationen (für Tests und UI-Anzeige).
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Anzahl der Segmente.
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Read-only Zugriff auf eine Zeile.
    pub fn row(&self, id: PointId) -> Option<&AnnotationRow> {
        self.rows.get(&id)
    }

    /// Alle Spine-IDs einer Session, in Einfüge-Reihenfolge.
    pub fn spines_of_session(&self, session: SessionId) -> Vec<PointId> {
        self.rows
            .iter()
            .filter(|(_, r)| r.kind == AnnotationKind::Spine && r.session == session)
            .map(|(id, _)| *id)
            .collect()
    }
}

impl AnnotationBackend for AnnotationTable {
    fn get_value(&self, column: &str, id: PointId) -> Option<f64> {
        let Some(row) = self.rows.get(&id) else {
            log::warn!("get_value: Annotation {id} unbekannt");
            return None;
        };
        match column {
            "x" => Some(row.position.x as f64),
            "y" => Some(row.position.y as f64),
            "z" => Some(row.position.z as f64),
            _ => match row.columns.get(column) {
                Some(v) => Some(*v),
                None => {
                    log::warn!("get_value: Spalte '{column}' unbekannt (Annotation {id})");
                    None
                }
            },
        }
    }

    fn set_value(&mut self, column: &str, id: PointId, value: f64) -> bool {
        let Some(row) = self.rows.get_mut(&id) else {
            log::warn!("set_value: Annotation {id} unbekannt");
            return false;
        };
        match column {
            "x" => {
                row.position.x = value as f32;
                true
            }
            "y" => {
                row.position.y = value as f32;
                true
            }
            "z" => {
                row.position.z = value as f32;
                true
            }
            _ => match row.columns.get_mut(column) {
                Some(slot) => {
                    *slot = value;
                    true
                }
                None => {
                    log::warn!("set_value: Spalte '{column}' unbekannt (Annotation {id})");
                    false
                }
            },
        }
    }

    fn add_spine(
        &mut self,
        position: Vec3,
        segment: SegmentId,
        session: SessionId,
    ) -> Option<PointId> {
        if !self.segments.contains_key(&segment) {
            log::warn!("add_spine: Segment {segment} unbekannt");
            return None;
        }
        let id = self.alloc_id();
        let mut columns = IndexMap::new();
        columns.insert("brightestIndex".to_string(), -1.0);
        columns.insert("radius".to_string(), DEFAULT_SPINE_RADIUS as f64);
        columns.insert("userType".to_string(), 0.0);
        self.rows.insert(
            id,
            AnnotationRow {
                kind: AnnotationKind::Spine,
                session,
                segment: Some(segment),
                position,
                columns,
            },
        );
        Some(id)
    }

    fn delete_annotation(&mut self, id: PointId) -> bool {
        self.rows.shift_remove(&id).is_some()
    }

    fn move_annotation(&mut self, id: PointId, position: Vec3) -> bool {
        let Some(row) = self.rows.get_mut(&id) else {
            log::warn!("move_annotation: Annotation {id} unbekannt");
            return false;
        };
        row.position = position;
        true
    }

    fn auto_connect_spine(&mut self, id: PointId) -> Option<PointId> {
        let (segment, position) = {
            let row = self.rows.get(&id)?;
            (row.segment?, row.position)
        };
        // Nächstgelegener Mittellinien-Punkt als Verbindungs-Ziel
        let target = self
            .segment_points(segment)
            .into_iter()
            .min_by(|a, b| {
                let da = self.rows[a].position.distance_squared(position);
                let db = self.rows[b].position.distance_squared(position);
                da.total_cmp(&db)
            })?;
        self.set_value("brightestIndex", id, target as f64);
        Some(target)
    }

    fn add_segment(&mut self, session: SessionId) -> Option<SegmentId> {
        let id = self.alloc_id();
        self.segments.insert(
            id,
            SegmentRow {
                session,
                pivot: None,
            },
        );
        Some(id)
    }

    fn delete_segment(&mut self, id: SegmentId) -> bool {
        if !self.segments.contains_key(&id) {
            log::warn!("delete_segment: Segment {id} unbekannt");
            return false;
        }
        let attached_spines = self
            .rows
            .values()
            .any(|r| r.kind == AnnotationKind::Spine && r.segment == Some(id));
        if attached_spines {
            log::warn!("delete_segment: Segment {id} hat noch Spines");
            return false;
        }
        self.rows
            .retain(|_, r| !(r.kind == AnnotationKind::SegmentPoint && r.segment == Some(id)));
        self.segments.shift_remove(&id).is_some()
    }

    fn add_segment_point(&mut self, segment: SegmentId, position: Vec3) -> Option<PointId> {
        let session = match self.segments.get(&segment) {
            Some(seg) => seg.session,
            None => {
                log::warn!("add_segment_point: Segment {segment} unbekannt");
                return None;
            }
        };
        let id = self.alloc_id();
        self.rows.insert(
            id,
            AnnotationRow {
                kind: AnnotationKind::SegmentPoint,
                session,
                segment: Some(segment),
                position,
                columns: IndexMap::new(),
            },
        );
        Some(id)
    }

    fn delete_segment_point(&mut self, id: PointId) -> bool {
        match self.rows.get(&id) {
            Some(row) if row.kind == AnnotationKind::SegmentPoint => {
                self.rows.shift_remove(&id).is_some()
            }
            Some(_) => {
                log::warn!("delete_segment_point: Annotation {id} ist kein Segment-Punkt");
                false
            }
            None => {
                log::warn!("delete_segment_point: Annotation {id} unbekannt");
                false
            }
        }
    }

    fn set_segment_pivot(&mut self, segment: SegmentId, position: Vec3) -> bool {
        let Some(seg) = self.segments.get_mut(&segment) else {
            log::warn!("set_segment_pivot: Segment {segment} unbekannt");
            return false;
        };
        seg.pivot = Some(position);
        true
    }

    fn segment_pivot(&self, segment: SegmentId) -> Option<Vec3> {
        self.segments.get(&segment).and_then(|s| s.pivot)
    }

    fn segment_points(&self, segment: SegmentId) -> Vec<PointId> {
        self.rows
            .iter()
            .filter(|(_, r)| r.kind == AnnotationKind::SegmentPoint && r.segment == Some(segment))
            .map(|(id, _)| *id)
            .collect()
    }

    fn kind_of(&self, id: PointId) -> Option<AnnotationKind> {
        if self.segments.contains_key(&id) {
            return Some(AnnotationKind::Segment);
        }
        self.rows.get(&id).map(|r| r.kind)
    }

    fn session_of(&self, id: PointId) -> Option<SessionId> {
        if let Some(seg) = self.segments.get(&id) {
            return Some(seg.session);
        }
        self.rows.get(&id).map(|r| r.session)
    }

    fn segment_of(&self, id: PointId) -> Option<SegmentId> {
        self.rows.get(&id).and_then(|r| r.segment)
    }

    fn position_of(&self, id: PointId) -> Option<Vec3> {
        self.rows.get(&id).map(|r| r.position)
    }
}
