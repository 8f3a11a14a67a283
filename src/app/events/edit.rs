//! Typisierte Edit-Ereignisse für Anzeige, Undo-Benennung und Replay.
//!
//! Ein `EditEvent` besitzt eine geordnete Liste von `EditDelta`-Einträgen
//! (Batch-Edits, z.B. "userType für alle markierten Spines setzen").
//! Die `prior_*`-Felder werden zum Mutationszeitpunkt aufgezeichnet,
//! damit Undo die Gegen-Aktion ohne Snapshots abspielen kann.

use glam::Vec3;

use crate::core::{PointId, SegmentId, SessionId};

/// Ein einzelner Änderungs-Eintrag.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EditDelta {
    /// Betroffene Annotation (oder Segment bei Segment-Edits)
    pub entity_id: PointId,
    /// Session des Auslösers
    pub session: SessionId,
    /// Segment-Zugehörigkeit, falls relevant
    pub segment_id: Option<SegmentId>,
    /// Neue Position
    pub position: Option<Vec3>,
    /// Position vor der Mutation
    pub prior_position: Option<Vec3>,
    /// Betroffene Spalte
    pub column: Option<String>,
    /// Neuer Spaltenwert
    pub value: Option<f64>,
    /// Spaltenwert vor der Mutation
    pub prior_value: Option<f64>,
}

impl EditDelta {
    /// Basis-Eintrag für eine Annotation.
    pub fn entity(entity_id: PointId, session: SessionId) -> Self {
        Self {
            entity_id,
            session,
            ..Self::default()
        }
    }

    /// Segment-Zugehörigkeit ergänzen.
    pub fn with_segment(mut self, segment: SegmentId) -> Self {
        self.segment_id = Some(segment);
        self
    }

    /// Neue Position ergänzen.
    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = Some(position);
        self
    }

    /// Vorherige Position ergänzen.
    pub fn with_prior_position(mut self, position: Vec3) -> Self {
        self.prior_position = Some(position);
        self
    }

    /// Spalten-Edit ergänzen (neuer + vorheriger Wert).
    pub fn with_column_value(
        mut self,
        column: impl Into<String>,
        value: f64,
        prior: Option<f64>,
    ) -> Self {
        self.column = Some(column.into());
        self.value = Some(value);
        self.prior_value = prior;
        self
    }
}

/// Art eines typisierten Edit-Ereignisses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditKind {
    AddSpine,
    DeleteSpine,
    MoveSpine,
    ManualConnectSpine,
    EditSpineProperty,
    AddSegment,
    DeleteSegment,
    AddSegmentPoint,
    DeleteSegmentPoint,
    SetSegmentPivot,
}

impl EditKind {
    /// Menü-Beschriftung für Undo/Redo.
    pub fn label(&self) -> &'static str {
        match self {
            EditKind::AddSpine => "Spine hinzufügen",
            EditKind::DeleteSpine => "Spine löschen",
            EditKind::MoveSpine => "Spine verschieben",
            EditKind::ManualConnectSpine => "Spine verbinden",
            EditKind::EditSpineProperty => "Spine-Eigenschaft ändern",
            EditKind::AddSegment => "Segment hinzufügen",
            EditKind::DeleteSegment => "Segment löschen",
            EditKind::AddSegmentPoint => "Segment-Punkt hinzufügen",
            EditKind::DeleteSegmentPoint => "Segment-Punkt löschen",
            EditKind::SetSegmentPivot => "Segment-Pivot setzen",
        }
    }

    fn targets_segment(&self) -> bool {
        matches!(
            self,
            EditKind::AddSegment
                | EditKind::DeleteSegment
                | EditKind::AddSegmentPoint
                | EditKind::DeleteSegmentPoint
                | EditKind::SetSegmentPivot
        )
    }
}

/// Artspezifische Feld-Projektion eines Deltas (reine Spaltenauswahl).
#[derive(Debug, Clone, PartialEq)]
pub enum EditItem<'a> {
    /// Spine-Referenz (Add/Delete)
    Spine { id: PointId, session: SessionId },
    /// Spine mit Zielposition (Move)
    SpineAt { id: PointId, position: Vec3 },
    /// Spalten-Edit (Connect/Property)
    Property {
        id: PointId,
        column: &'a str,
        value: f64,
    },
    /// Segment-Referenz (Add/Delete Segment)
    Segment { id: SegmentId, session: SessionId },
    /// Mittellinien-Punkt mit Position
    SegmentPointAt {
        segment: Option<SegmentId>,
        id: PointId,
        position: Vec3,
    },
    /// Pivot-Position eines Segments
    Pivot {
        segment: Option<SegmentId>,
        position: Vec3,
    },
}

/// Typisiertes Edit-Ereignis: Art plus geordnete Delta-Liste.
#[derive(Debug, Clone, PartialEq)]
pub struct EditEvent {
    kind: EditKind,
    deltas: Vec<EditDelta>,
}

impl EditEvent {
    /// Erstellt ein leeres Edit-Ereignis.
    pub fn new(kind: EditKind) -> Self {
        Self {
            kind,
            deltas: Vec::new(),
        }
    }

    /// Art des Ereignisses.
    pub fn kind(&self) -> EditKind {
        self.kind
    }

    /// Hängt einen Änderungs-Eintrag an (Reihenfolge bleibt erhalten).
    pub fn add_edit(&mut self, delta: EditDelta) {
        self.deltas.push(delta);
    }

    /// Read-only Sicht auf alle Deltas.
    pub fn deltas(&self) -> &[EditDelta] {
        &self.deltas
    }

    /// Mutable Sicht auf alle Deltas (ID-Korrektur beim Replay).
    pub fn deltas_mut(&mut self) -> &mut [EditDelta] {
        &mut self.deltas
    }

    /// `true` wenn keine Deltas vorhanden sind (reiner Refresh).
    pub fn is_empty(&self) -> bool {
        self.deltas.is_empty()
    }

    /// Menü-Beschriftung für Undo/Redo.
    pub fn name(&self) -> &'static str {
        self.kind.label()
    }

    /// Betroffene Spine-/Punkt-IDs (leer bei Segment-Ereignissen).
    pub fn spines(&self) -> Vec<PointId> {
        if self.kind.targets_segment() {
            return Vec::new();
        }
        self.deltas.iter().map(|d| d.entity_id).collect()
    }

    /// Betroffene Segment-IDs.
    pub fn segments(&self) -> Vec<SegmentId> {
        self.deltas.iter().filter_map(|d| d.segment_id).collect()
    }

    /// Artspezifische Projektion aller Deltas.
    pub fn items(&self) -> impl Iterator<Item = EditItem<'_>> {
        self.deltas.iter().map(move |d| match self.kind {
            EditKind::AddSpine | EditKind::DeleteSpine => EditItem::Spine {
                id: d.entity_id,
                session: d.session,
            },
            EditKind::MoveSpine => EditItem::SpineAt {
                id: d.entity_id,
                position: d.position.unwrap_or_default(),
            },
            EditKind::ManualConnectSpine | EditKind::EditSpineProperty => EditItem::Property {
                id: d.entity_id,
                column: d.column.as_deref().unwrap_or(""),
                value: d.value.unwrap_or_default(),
            },
            EditKind::AddSegment | EditKind::DeleteSegment => EditItem::Segment {
                id: d.entity_id,
                session: d.session,
            },
            EditKind::AddSegmentPoint | EditKind::DeleteSegmentPoint => EditItem::SegmentPointAt {
                segment: d.segment_id,
                id: d.entity_id,
                position: d.position.unwrap_or_default(),
            },
            EditKind::SetSegmentPivot => EditItem::Pivot {
                segment: d.segment_id,
                position: d.position.unwrap_or_default(),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_edit_keeps_order_and_session_stamp() {
        let mut event = EditEvent::new(EditKind::EditSpineProperty);
        event.add_edit(EditDelta::entity(7, 1).with_column_value("userType", 2.0, Some(0.0)));
        event.add_edit(EditDelta::entity(9, 1).with_column_value("userType", 2.0, Some(1.0)));

        assert_eq!(event.spines(), vec![7, 9]);
        assert_eq!(event.deltas()[0].session, 1);
        assert_eq!(event.deltas()[1].prior_value, Some(1.0));
    }

    #[test]
    fn spines_is_empty_for_segment_events() {
        let mut event = EditEvent::new(EditKind::AddSegment);
        event.add_edit(EditDelta::entity(3, 0).with_segment(3));

        assert!(event.spines().is_empty());
        assert_eq!(event.segments(), vec![3]);
    }

    #[test]
    fn items_project_kind_specific_columns() {
        let mut event = EditEvent::new(EditKind::ManualConnectSpine);
        event.add_edit(EditDelta::entity(7, 1).with_column_value("brightestIndex", 42.0, Some(-1.0)));

        let items: Vec<_> = event.items().collect();
        assert_eq!(
            items,
            vec![EditItem::Property {
                id: 7,
                column: "brightestIndex",
                value: 42.0
            }]
        );
    }

    #[test]
    fn move_items_carry_target_position() {
        let mut event = EditEvent::new(EditKind::MoveSpine);
        event.add_edit(
            EditDelta::entity(5, 0)
                .with_position(Vec3::new(1.0, 2.0, 3.0))
                .with_prior_position(Vec3::ZERO),
        );

        let item = event.items().next().expect("ein Item");
        match item {
            EditItem::SpineAt { id, position } => {
                assert_eq!(id, 5);
                assert_eq!(position, Vec3::new(1.0, 2.0, 3.0));
            }
            other => panic!("Unerwartete Projektion: {other:?}"),
        }
    }

    #[test]
    fn name_uses_kind_label() {
        assert_eq!(EditEvent::new(EditKind::AddSpine).name(), "Spine hinzufügen");
        assert_eq!(
            EditEvent::new(EditKind::SetSegmentPivot).name(),
            "Segment-Pivot setzen"
        );
    }
}
