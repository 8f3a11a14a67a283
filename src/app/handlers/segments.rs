//! Segment-Mutationen an Root-Nodes (Dendriten-Mittellinien).

use glam::Vec3;

use crate::app::bus::Outcome;
use crate::app::events::{EditDelta, EditEvent, EditKind, EventMessage, EventPayload};
use crate::app::handlers::RootCtx;
use crate::app::state::{EditMode, SelectionState};
use crate::core::SegmentId;

fn select_segment_followup(
    out: &mut Vec<EventMessage>,
    segment: Option<SegmentId>,
    session: usize,
) {
    let mut selection = SelectionState::new(Some(session));
    selection.set_segment_selection(Some(segment.into_iter().collect()));
    out.push(EventMessage::with_selection(
        EventPayload::Select,
        selection,
    ));
}

/// Legt ein leeres Segment an und selektiert es.
pub(crate) fn added_segment(
    ctx: &mut RootCtx,
    event: &EventMessage,
    out: &mut Vec<EventMessage>,
) -> Outcome {
    if !ctx.originating_stack(event) {
        return Outcome::Accept;
    }
    let session = ctx.session.unwrap_or(0);
    let Some(segment) = ctx.doc.backend.add_segment(session) else {
        return Outcome::Veto("Segment konnte nicht angelegt werden".into());
    };

    let mut edit = EditEvent::new(EditKind::AddSegment);
    edit.add_edit(EditDelta::entity(segment, session).with_segment(segment));
    ctx.doc.history.record(edit);

    ctx.selection.set_segment_selection(Some(vec![segment]));
    log::info!("Segment {segment} angelegt (Session {session})");
    select_segment_followup(out, Some(segment), session);
    Outcome::Accept
}

/// Löscht das selektierte Segment samt Mittellinien-Punkten.
///
/// Das Backend verweigert das Löschen, solange Spines am Segment hängen;
/// der Konflikt wird als Veto mit Begründung nach außen gereicht. Die
/// Punkt-Positionen werden vor dem Löschen für das Undo-Replay gesichert.
pub(crate) fn deleted_segment(
    ctx: &mut RootCtx,
    event: &EventMessage,
    out: &mut Vec<EventMessage>,
) -> Outcome {
    if !ctx.originating_stack(event) {
        return Outcome::Accept;
    }
    let session = ctx.session.unwrap_or(0);
    let target = event
        .selection
        .first_selected_segment()
        .or_else(|| ctx.selection.first_selected_segment());
    let Some(segment) = target else {
        return Outcome::Veto("Kein Segment selektiert zum Löschen".into());
    };

    let seg_session = ctx.doc.backend.session_of(segment).unwrap_or(session);
    let pivot = ctx.doc.backend.segment_pivot(segment);
    let points = ctx.doc.backend.segment_points(segment);

    let mut edit = EditEvent::new(EditKind::DeleteSegment);
    let mut head = EditDelta::entity(segment, seg_session).with_segment(segment);
    if let Some(pos) = pivot {
        head = head.with_prior_position(pos);
    }
    edit.add_edit(head);
    for point in points {
        let mut delta = EditDelta::entity(point, seg_session).with_segment(segment);
        if let Some(pos) = ctx.doc.backend.position_of(point) {
            delta = delta.with_prior_position(pos);
        }
        edit.add_edit(delta);
    }

    if !ctx.doc.backend.delete_segment(segment) {
        return Outcome::Veto(format!(
            "Segment {segment} kann nicht gelöscht werden, solange Spines daran hängen"
        ));
    }

    log::info!("Segment {segment} gelöscht ({} Punkt(e))", edit.deltas().len() - 1);
    ctx.doc.history.record(edit);
    ctx.selection.set_segment_selection(Some(Vec::new()));
    ctx.selection.set_segment_point_selection(Some(Vec::new()));
    select_segment_followup(out, None, session);
    Outcome::Accept
}

/// Hängt einen Mittellinien-Punkt an das selektierte Segment.
pub(crate) fn added_segment_point(
    ctx: &mut RootCtx,
    event: &EventMessage,
    position: Vec3,
) -> Outcome {
    if !ctx.originating_stack(event) {
        return Outcome::Accept;
    }
    let session = ctx.session.unwrap_or(0);
    let Some(segment) = ctx.selection.first_selected_segment() else {
        return Outcome::Veto("Kein Segment selektiert für neuen Mittellinien-Punkt".into());
    };
    let Some(id) = ctx.doc.backend.add_segment_point(segment, position) else {
        return Outcome::Veto(format!("Segment {segment} nimmt keinen Punkt an"));
    };

    let mut edit = EditEvent::new(EditKind::AddSegmentPoint);
    edit.add_edit(
        EditDelta::entity(id, session)
            .with_segment(segment)
            .with_position(position),
    );
    ctx.doc.history.record(edit);

    ctx.selection.set_segment_point_selection(Some(vec![id]));
    Outcome::Accept
}

/// Löscht den selektierten Mittellinien-Punkt.
pub(crate) fn deleted_segment_point(ctx: &mut RootCtx, event: &EventMessage) -> Outcome {
    if !ctx.originating_stack(event) {
        return Outcome::Accept;
    }
    let session = ctx.session.unwrap_or(0);
    let target = event
        .selection
        .first_selected_segment_point()
        .or_else(|| ctx.selection.first_selected_segment_point());
    let Some(id) = target else {
        return Outcome::Veto("Kein Mittellinien-Punkt selektiert zum Löschen".into());
    };

    let segment = ctx.doc.backend.segment_of(id);
    let prior = ctx.doc.backend.position_of(id);
    if !ctx.doc.backend.delete_segment_point(id) {
        return Outcome::Veto(format!("Mittellinien-Punkt {id} unbekannt"));
    }

    let mut edit = EditEvent::new(EditKind::DeleteSegmentPoint);
    let mut delta = EditDelta::entity(id, session);
    if let Some(seg) = segment {
        delta = delta.with_segment(seg);
    }
    if let Some(pos) = prior {
        delta = delta.with_prior_position(pos);
    }
    edit.add_edit(delta);
    ctx.doc.history.record(edit);

    ctx.selection.set_segment_point_selection(Some(Vec::new()));
    Outcome::Accept
}

/// Setzt den Pivot des selektierten Segments und beendet die Geste.
pub(crate) fn set_segment_pivot(
    ctx: &mut RootCtx,
    event: &EventMessage,
    position: Vec3,
    out: &mut Vec<EventMessage>,
) -> Outcome {
    if !ctx.originating_stack(event) {
        return Outcome::Accept;
    }
    if ctx.selection.state() != EditMode::SettingSegmentPivot {
        return Outcome::Veto("Pivot-Modus nicht aktiv".into());
    }
    let session = ctx.session.unwrap_or(0);
    let Some(segment) = ctx.selection.first_selected_segment() else {
        return Outcome::Veto("Kein Segment selektiert für Pivot".into());
    };

    let prior = ctx.doc.backend.segment_pivot(segment);
    if !ctx.doc.backend.set_segment_pivot(segment, position) {
        return Outcome::Veto(format!("Pivot von Segment {segment} lässt sich nicht setzen"));
    }

    let mut edit = EditEvent::new(EditKind::SetSegmentPivot);
    let mut delta = EditDelta::entity(segment, session)
        .with_segment(segment)
        .with_position(position);
    if let Some(pos) = prior {
        delta = delta.with_prior_position(pos);
    }
    edit.add_edit(delta);
    ctx.doc.history.record(edit);

    // Abgeschlossene Geste: zurück in den Edit-Modus.
    ctx.selection.set_state(EditMode::Edit);
    out.push(EventMessage::new(EventPayload::StateChange {
        mode: EditMode::Edit,
    }));
    Outcome::Accept
}
