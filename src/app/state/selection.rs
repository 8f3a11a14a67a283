//! Auswahlbezogener Zustand eines Root-Nodes.

use crate::core::{PointId, SegmentId, SessionId};

/// Edit-Modus der Bildansicht. Genau einer ist aktiv; Wechsel laufen
/// ausschließlich über ein StateChange-Event. Die Zulässigkeit von
/// Übergängen prüfen die Root-Handler, nicht dieser Speicher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditMode {
    /// Nur ansehen, keine Mutationen
    View,
    /// Standard: selektieren und editieren
    #[default]
    Edit,
    /// Punkt-Annotation wird per Drag verschoben
    MovingPoint,
    /// Quell-Spine wartet auf manuellen Verbindungs-Klick
    ManualConnectSpine,
    /// Segment-Mittellinie wird nachgezeichnet
    TracingSegment,
    /// Pivot-Punkt eines Segments wird gesetzt
    SettingSegmentPivot,
}

/// Selektions- und Modus-Zustand eines Roots; dient zugleich als
/// Selektions-Träger in `EventMessage`.
///
/// `point_ids` und `point_sessions` sind parallele Arrays gleicher Länge.
/// Bei den Segment-Selektionen bedeutet `None` "bei Merge unberührt
/// lassen" und `Some(vec![])` "explizit geleert".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionState {
    point_ids: Vec<PointId>,
    point_sessions: Vec<SessionId>,
    segment_ids: Option<Vec<SegmentId>>,
    segment_point_ids: Option<Vec<PointId>>,
    edit_mode: EditMode,
    /// Quell-Spine eines laufenden manuellen Verbindens
    pub connect_source: Option<PointId>,
    /// Backing-Store-Referenz: None = map-weit, Some = Stack einer Session
    pub session: Option<SessionId>,
}

impl SelectionState {
    /// Erstellt einen leeren Zustand mit Store-Bindung.
    pub fn new(session: Option<SessionId>) -> Self {
        Self {
            session,
            ..Self::default()
        }
    }

    /// Ersetzt die Punkt-Selektion.
    ///
    /// Ohne `sessions` wird jede ID mit der eigenen Session gestempelt.
    /// Ungleiche Array-Längen sind ein geloggter No-Op.
    pub fn set_point_selection(&mut self, ids: Vec<PointId>, sessions: Option<Vec<SessionId>>) {
        match sessions {
            Some(s) if s.len() != ids.len() => {
                log::warn!(
                    "Punkt-Selektion verworfen: {} IDs vs. {} Sessions",
                    ids.len(),
                    s.len()
                );
            }
            Some(s) => {
                self.point_ids = ids;
                self.point_sessions = s;
            }
            None => {
                let session = self.session.unwrap_or(0);
                self.point_sessions = vec![session; ids.len()];
                self.point_ids = ids;
            }
        }
    }

    /// Aktuelle Punkt-Selektion, ungefiltert.
    pub fn point_selection(&self) -> &[PointId] {
        &self.point_ids
    }

    /// Sessions parallel zur Punkt-Selektion.
    pub fn point_sessions(&self) -> &[SessionId] {
        &self.point_sessions
    }

    /// `true` wenn mindestens ein Punkt selektiert ist.
    pub fn has_point_selection(&self) -> bool {
        !self.point_ids.is_empty()
    }

    /// Erster selektierter Punkt.
    pub fn first_point_selection(&self) -> Option<PointId> {
        self.point_ids.first().copied()
    }

    /// Leert die Punkt-Selektion.
    pub fn clear_points(&mut self) {
        self.point_ids.clear();
        self.point_sessions.clear();
    }

    /// Setzt die Segment-Selektion (`None` = unberührt lassen).
    pub fn set_segment_selection(&mut self, ids: Option<Vec<SegmentId>>) {
        self.segment_ids = ids;
    }

    /// Aktuelle Segment-Selektion.
    pub fn segment_selection(&self) -> Option<&[SegmentId]> {
        self.segment_ids.as_deref()
    }

    /// Erstes selektiertes Segment.
    pub fn first_selected_segment(&self) -> Option<SegmentId> {
        self.segment_ids.as_ref().and_then(|v| v.first().copied())
    }

    /// Setzt die Segment-Punkt-Selektion (`None` = unberührt lassen).
    pub fn set_segment_point_selection(&mut self, ids: Option<Vec<PointId>>) {
        self.segment_point_ids = ids;
    }

    /// Aktuelle Segment-Punkt-Selektion.
    pub fn segment_point_selection(&self) -> Option<&[PointId]> {
        self.segment_point_ids.as_deref()
    }

    /// Erster selektierter Segment-Punkt.
    pub fn first_selected_segment_point(&self) -> Option<PointId> {
        self.segment_point_ids
            .as_ref()
            .and_then(|v| v.first().copied())
    }

    /// Setzt den Edit-Modus (roher FSM-Speicher).
    pub fn set_state(&mut self, mode: EditMode) {
        self.edit_mode = mode;
    }

    /// Aktueller Edit-Modus.
    pub fn state(&self) -> EditMode {
        self.edit_mode
    }

    /// Projiziert einen map-weiten Zustand auf eine Session.
    ///
    /// Behält nur Punkte mit passendem Session-Stempel und bindet den
    /// Zustand an den Stack der Ziel-Session. Das ist das map→stack
    /// Fan-Out-Primitiv; Getter filtern nie.
    pub fn reduce_to_session(&self, session: SessionId) -> SelectionState {
        let mut out = self.clone();
        out.session = Some(session);
        let keep: Vec<bool> = self
            .point_sessions
            .iter()
            .map(|s| *s == session)
            .collect();
        out.point_ids = self
            .point_ids
            .iter()
            .zip(&keep)
            .filter(|(_, k)| **k)
            .map(|(id, _)| *id)
            .collect();
        out.point_sessions = self
            .point_sessions
            .iter()
            .zip(&keep)
            .filter(|(_, k)| **k)
            .map(|(s, _)| *s)
            .collect();
        out
    }

    /// Übernimmt eine eingehende Selektion.
    ///
    /// Punkt-Arrays werden ersetzt; Segment-Selektionen nur, wenn der
    /// Eingang sie explizit trägt (`None` lässt Bestehendes unberührt).
    /// Modus, Verbindungs-Quelle und Store-Bindung bleiben erhalten.
    pub fn apply_selection(&mut self, incoming: &SelectionState) {
        self.point_ids = incoming.point_ids.clone();
        self.point_sessions = incoming.point_sessions.clone();
        if let Some(segments) = incoming.segment_ids.clone() {
            self.segment_ids = Some(segments);
        }
        if let Some(points) = incoming.segment_point_ids.clone() {
            self.segment_point_ids = Some(points);
        }
    }

    /// Hängt eine eingehende Selektion additiv an (Alt-Klick).
    pub fn extend_selection(&mut self, incoming: &SelectionState) {
        for (id, session) in incoming.point_ids.iter().zip(&incoming.point_sessions) {
            if !self.point_ids.contains(id) {
                self.point_ids.push(*id);
                self.point_sessions.push(*session);
            }
        }
        if let Some(segments) = &incoming.segment_ids {
            let own = self.segment_ids.get_or_insert_with(Vec::new);
            for segment in segments {
                if !own.contains(segment) {
                    own.push(*segment);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_point_selection_returns_exactly_the_ids() {
        let mut selection = SelectionState::new(Some(2));
        selection.set_point_selection(vec![5, 7, 9], None);

        assert_eq!(selection.point_selection(), &[5, 7, 9]);
        assert_eq!(selection.point_sessions(), &[2, 2, 2]);
        assert!(selection.has_point_selection());
        assert_eq!(selection.first_point_selection(), Some(5));
    }

    #[test]
    fn empty_selection_has_no_points() {
        let mut selection = SelectionState::new(Some(0));
        selection.set_point_selection(Vec::new(), None);

        assert!(!selection.has_point_selection());
        assert_eq!(selection.first_point_selection(), None);
    }

    #[test]
    fn mismatched_session_array_is_a_noop() {
        let mut selection = SelectionState::new(Some(0));
        selection.set_point_selection(vec![1], None);

        selection.set_point_selection(vec![2, 3], Some(vec![0]));

        // Alte Selektion bleibt stehen
        assert_eq!(selection.point_selection(), &[1]);
    }

    #[test]
    fn segment_selection_distinguishes_untouched_from_cleared() {
        let mut selection = SelectionState::new(Some(0));
        assert_eq!(selection.segment_selection(), None);

        selection.set_segment_selection(Some(Vec::new()));
        assert_eq!(selection.segment_selection(), Some(&[][..]));
        assert_eq!(selection.first_selected_segment(), None);

        selection.set_segment_selection(Some(vec![11]));
        assert_eq!(selection.first_selected_segment(), Some(11));
    }

    #[test]
    fn reduce_to_session_filters_parallel_arrays() {
        let mut selection = SelectionState::new(None);
        selection.set_point_selection(vec![10, 11, 12, 13], Some(vec![0, 1, 2, 1]));

        let reduced = selection.reduce_to_session(1);

        assert_eq!(reduced.point_selection(), &[11, 13]);
        assert_eq!(reduced.point_sessions(), &[1, 1]);
        assert_eq!(
            reduced.point_selection().len(),
            reduced.point_sessions().len()
        );
        assert_eq!(reduced.session, Some(1));
    }

    #[test]
    fn getters_do_not_session_filter() {
        // Filterung gehört ausschließlich in reduce_to_session
        let mut selection = SelectionState::new(Some(0));
        selection.set_point_selection(vec![1, 2], Some(vec![0, 5]));

        assert_eq!(selection.point_selection(), &[1, 2]);
        assert_eq!(selection.point_sessions(), &[0, 5]);
    }

    #[test]
    fn apply_selection_leaves_untouched_segments_alone() {
        let mut own = SelectionState::new(Some(0));
        own.set_segment_selection(Some(vec![4]));
        own.set_state(EditMode::MovingPoint);

        let mut incoming = SelectionState::new(Some(0));
        incoming.set_point_selection(vec![8], None);

        own.apply_selection(&incoming);

        assert_eq!(own.point_selection(), &[8]);
        assert_eq!(own.first_selected_segment(), Some(4));
        // Modus wird nicht vom Träger überschrieben
        assert_eq!(own.state(), EditMode::MovingPoint);
    }

    #[test]
    fn apply_selection_honours_explicit_clear() {
        let mut own = SelectionState::new(Some(0));
        own.set_segment_selection(Some(vec![4]));

        let mut incoming = SelectionState::new(Some(0));
        incoming.set_segment_selection(Some(Vec::new()));

        own.apply_selection(&incoming);

        assert_eq!(own.segment_selection(), Some(&[][..]));
    }

    #[test]
    fn extend_selection_appends_without_duplicates() {
        let mut own = SelectionState::new(Some(0));
        own.set_point_selection(vec![1, 2], None);

        let mut incoming = SelectionState::new(Some(0));
        incoming.set_point_selection(vec![2, 3], None);

        own.extend_selection(&incoming);

        assert_eq!(own.point_selection(), &[1, 2, 3]);
        assert_eq!(own.point_sessions().len(), 3);
    }
}
