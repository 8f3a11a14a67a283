//! Nachrichten-Umschlag des Propagations-Baums.
//!
//! `EventPayload` ist die geschlossene Vereinigung aller Event-Arten;
//! jede Variante trägt nur ihre relevanten Felder. Der Dispatch über die
//! Vereinigung ist erschöpfend — einen "unbekannte Art"-Fallback zur
//! Laufzeit gibt es nicht.

use glam::Vec3;
use indexmap::IndexSet;

use crate::app::state::{EditMode, SelectionState};
use crate::app::EditEvent;
use crate::core::{EventId, NodeId, PointId, SessionId};

/// Geschlossene Aufzählung aller Event-Arten (Diskriminante von
/// `EventPayload`, für Logging und Tests).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Select,
    Add,
    Delete,
    Edit,
    StateChange,
    MoveAnnotation,
    ManualConnectSpine,
    AutoConnectSpine,
    SetSlice,
    SetColorChannel,
    SetRadius,
    RefreshSpine,
    Undo,
    Redo,
    AddSegment,
    DeleteSegment,
    AddSegmentPoint,
    DeleteSegmentPoint,
    SetSegmentPivot,
}

/// Event-Nutzlast: eine Variante pro Art, nur relevante Felder.
#[derive(Debug, Clone, PartialEq)]
pub enum EventPayload {
    /// Selektion geändert (Träger ist `EventMessage::selection`)
    Select,
    /// Neuen Spine an Position anlegen
    Add { position: Vec3 },
    /// Selektierte Spines löschen
    Delete,
    /// Eigenschafts-Edit (Batch über `EditEvent`-Deltas; leer = Refresh)
    Edit { edit: EditEvent },
    /// Edit-Modus wechseln
    StateChange { mode: EditMode },
    /// Punkt-Annotation an neue Position verschieben
    MoveAnnotation { position: Vec3 },
    /// Manuelles Verbinden: gewählter Segment-Punkt
    ManualConnectSpine { segment_point: PointId },
    /// Automatisches Verbinden des selektierten Spines
    AutoConnectSpine,
    /// Angezeigte Bild-Ebene wechseln
    SetSlice { slice: u32 },
    /// Angezeigten Farbkanal wechseln
    SetColorChannel { channel: u32 },
    /// Radius des selektierten Spines setzen
    SetRadius { radius: f32 },
    /// Anzeige-Refresh ohne Zustandsänderung
    RefreshSpine,
    /// Letzte Aktion rückgängig machen
    Undo,
    /// Rückgängig gemachte Aktion wiederherstellen
    Redo,
    /// Neues Segment für die Session des Roots anlegen
    AddSegment,
    /// Selektiertes Segment löschen
    DeleteSegment,
    /// Mittellinien-Punkt an das selektierte Segment anfügen
    AddSegmentPoint { position: Vec3 },
    /// Selektierten Mittellinien-Punkt löschen
    DeleteSegmentPoint,
    /// Pivot des selektierten Segments setzen
    SetSegmentPivot { position: Vec3 },
}

impl EventPayload {
    /// Diskriminante der Nutzlast.
    pub fn kind(&self) -> EventKind {
        match self {
            EventPayload::Select => EventKind::Select,
            EventPayload::Add { .. } => EventKind::Add,
            EventPayload::Delete => EventKind::Delete,
            EventPayload::Edit { .. } => EventKind::Edit,
            EventPayload::StateChange { .. } => EventKind::StateChange,
            EventPayload::MoveAnnotation { .. } => EventKind::MoveAnnotation,
            EventPayload::ManualConnectSpine { .. } => EventKind::ManualConnectSpine,
            EventPayload::AutoConnectSpine => EventKind::AutoConnectSpine,
            EventPayload::SetSlice { .. } => EventKind::SetSlice,
            EventPayload::SetColorChannel { .. } => EventKind::SetColorChannel,
            EventPayload::SetRadius { .. } => EventKind::SetRadius,
            EventPayload::RefreshSpine => EventKind::RefreshSpine,
            EventPayload::Undo => EventKind::Undo,
            EventPayload::Redo => EventKind::Redo,
            EventPayload::AddSegment => EventKind::AddSegment,
            EventPayload::DeleteSegment => EventKind::DeleteSegment,
            EventPayload::AddSegmentPoint { .. } => EventKind::AddSegmentPoint,
            EventPayload::DeleteSegmentPoint => EventKind::DeleteSegmentPoint,
            EventPayload::SetSegmentPivot { .. } => EventKind::SetSegmentPivot,
        }
    }
}

/// Die vom Bus transportierte Nachricht.
///
/// `visited` ist die Besucht-Menge der Zyklen-Vermeidung: jeder Node
/// verarbeitet ein logisches Event höchstens einmal, unabhängig von der
/// Topologie. `crossed_stack`/`crossed_map` markieren überschrittene
/// Baum-Grenzen; der Ursprungs-Root (beide Flags ungesetzt) ist der
/// einzige Ort für Backend-Mutationen und Undo-Einträge.
#[derive(Debug, Clone)]
pub struct EventMessage {
    /// Eindeutige Event-ID, vergeben vom Bus beim Emit
    pub id: EventId,
    /// Node, der das Event ausgelöst hat
    pub sender: NodeId,
    /// Alt-Taste beim Auslösen gedrückt (additive Selektion)
    pub alt: bool,
    /// Selektions-Träger (wird pro Stack-Root reduziert)
    pub selection: SelectionState,
    /// Typisierte Nutzlast
    pub payload: EventPayload,
    /// Bereits beliefernde Nodes (Anti-Echo)
    pub visited: IndexSet<NodeId>,
    /// Event hat bereits eine Stack-Grenze überschritten
    pub crossed_stack: bool,
    /// Event hat bereits die Map-Grenze überschritten
    pub crossed_map: bool,
}

impl EventMessage {
    /// Erstellt eine Nachricht ohne Selektions-Träger.
    pub fn new(payload: EventPayload) -> Self {
        Self::with_selection(payload, SelectionState::default())
    }

    /// Erstellt eine Nachricht mit explizitem Selektions-Träger.
    pub fn with_selection(payload: EventPayload, selection: SelectionState) -> Self {
        Self {
            id: 0,
            sender: 0,
            alt: false,
            selection,
            payload,
            visited: IndexSet::new(),
            crossed_stack: false,
            crossed_map: false,
        }
    }

    /// Komfort: Punkt-Selektion innerhalb einer Session.
    pub fn select_points(ids: Vec<PointId>, session: SessionId) -> Self {
        let mut selection = SelectionState::new(Some(session));
        selection.set_point_selection(ids, None);
        Self::with_selection(EventPayload::Select, selection)
    }

    /// Setzt das Alt-Flag (Builder-Stil).
    pub fn with_alt(mut self, alt: bool) -> Self {
        self.alt = alt;
        self
    }

    /// Art der Nachricht.
    pub fn kind(&self) -> EventKind {
        self.payload.kind()
    }

    /// `true` solange das Event keine Baum-Grenze überschritten hat.
    pub fn at_origin(&self) -> bool {
        !self.crossed_stack && !self.crossed_map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_matches_payload_variant() {
        assert_eq!(EventMessage::new(EventPayload::Undo).kind(), EventKind::Undo);
        assert_eq!(
            EventMessage::new(EventPayload::Add {
                position: Vec3::ZERO
            })
            .kind(),
            EventKind::Add
        );
        assert_eq!(
            EventMessage::new(EventPayload::StateChange {
                mode: EditMode::View
            })
            .kind(),
            EventKind::StateChange
        );
    }

    #[test]
    fn clone_is_an_independent_copy() {
        let mut original = EventMessage::select_points(vec![7], 1);
        let copy = original.clone();

        original.selection.set_point_selection(vec![8, 9], None);
        original.crossed_stack = true;

        assert_eq!(copy.selection.point_selection(), &[7]);
        assert!(!copy.crossed_stack);
    }

    #[test]
    fn select_points_stamps_session_on_every_id() {
        let event = EventMessage::select_points(vec![1, 2, 3], 4);
        assert_eq!(event.selection.point_sessions(), &[4, 4, 4]);
        assert!(event.at_origin());
    }
}
