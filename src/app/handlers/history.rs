//! Undo/Redo an Root-Nodes: typisiertes Event-Replay statt Snapshots.
//!
//! Undo spielt die Gegen-Aktion des obersten Undo-Eintrags direkt gegen
//! das Backend ab, Redo die ursprüngliche Aktion des obersten
//! Redo-Eintrags. Erzeugt ein Replay Zeilen neu (Undo eines Löschens,
//! Redo eines Anlegens), vergibt das Backend frische IDs; die Deltas im
//! Eintrag werden darauf umgeschrieben, damit der nächste Durchlauf die
//! neuen Zeilen trifft. Nach dem Replay gehen nur nicht-mutierende
//! Notifikationen (`select`, `refreshSpine`) auf die Reise, damit kein
//! zweiter Undo-Eintrag entsteht.

use crate::app::bus::Outcome;
use crate::app::events::{EditEvent, EditKind, EventMessage, EventPayload};
use crate::app::handlers::RootCtx;
use crate::app::state::SelectionState;
use crate::core::{PointId, SegmentId, SessionId};

/// Macht den obersten Undo-Eintrag rückgängig.
pub(crate) fn undo(ctx: &mut RootCtx, event: &EventMessage, out: &mut Vec<EventMessage>) -> Outcome {
    if !ctx.first_root(event) {
        return Outcome::Accept;
    }
    let Some(mut edit) = ctx.doc.history.pop_undo() else {
        return Outcome::Accept;
    };
    log::info!("Undo: {}", edit.name());

    replay_inverse(ctx, &mut edit, out);
    ctx.doc.history.stash_redo(edit);
    out.push(EventMessage::new(EventPayload::RefreshSpine));
    Outcome::Accept
}

/// Wiederholt den obersten Redo-Eintrag.
pub(crate) fn redo(ctx: &mut RootCtx, event: &EventMessage, out: &mut Vec<EventMessage>) -> Outcome {
    if !ctx.first_root(event) {
        return Outcome::Accept;
    }
    let Some(mut edit) = ctx.doc.history.pop_redo() else {
        return Outcome::Accept;
    };
    log::info!("Redo: {}", edit.name());

    replay_forward(ctx, &mut edit, out);
    ctx.doc.history.stash_undo(edit);
    out.push(EventMessage::new(EventPayload::RefreshSpine));
    Outcome::Accept
}

fn notify_points(
    ctx: &mut RootCtx,
    out: &mut Vec<EventMessage>,
    ids: Vec<PointId>,
    sessions: Vec<SessionId>,
) {
    ctx.selection
        .set_point_selection(ids.clone(), Some(sessions.clone()));
    let mut selection = SelectionState::new(ctx.session);
    selection.set_point_selection(ids, Some(sessions));
    out.push(EventMessage::with_selection(
        EventPayload::Select,
        selection,
    ));
}

fn notify_segment(ctx: &mut RootCtx, out: &mut Vec<EventMessage>, segment: Option<SegmentId>) {
    ctx.selection
        .set_segment_selection(Some(segment.into_iter().collect()));
    let mut selection = SelectionState::new(ctx.session);
    selection.set_segment_selection(Some(segment.into_iter().collect()));
    out.push(EventMessage::with_selection(
        EventPayload::Select,
        selection,
    ));
}

/// Spielt die Gegen-Aktion eines Eintrags gegen das Backend ab.
fn replay_inverse(ctx: &mut RootCtx, edit: &mut EditEvent, out: &mut Vec<EventMessage>) {
    match edit.kind() {
        EditKind::AddSpine => {
            for delta in edit.deltas() {
                if !ctx.doc.backend.delete_annotation(delta.entity_id) {
                    log::warn!("Undo: Annotation {} fehlt bereits", delta.entity_id);
                }
            }
            notify_points(ctx, out, Vec::new(), Vec::new());
        }
        EditKind::AddSegmentPoint => {
            for delta in edit.deltas() {
                if !ctx.doc.backend.delete_segment_point(delta.entity_id) {
                    log::warn!("Undo: Mittellinien-Punkt {} fehlt bereits", delta.entity_id);
                }
            }
        }
        EditKind::DeleteSpine => {
            let mut ids = Vec::new();
            let mut sessions = Vec::new();
            for delta in edit.deltas_mut() {
                let (Some(segment), Some(position)) = (delta.segment_id, delta.prior_position)
                else {
                    log::warn!("Undo: Delta ohne Segment/Position übersprungen");
                    continue;
                };
                if let Some(id) = ctx.doc.backend.add_spine(position, segment, delta.session) {
                    delta.entity_id = id;
                    ids.push(id);
                    sessions.push(delta.session);
                }
            }
            notify_points(ctx, out, ids, sessions);
        }
        EditKind::MoveSpine => {
            let mut ids = Vec::new();
            let mut sessions = Vec::new();
            for delta in edit.deltas() {
                let Some(position) = delta.prior_position else {
                    continue;
                };
                if ctx.doc.backend.move_annotation(delta.entity_id, position) {
                    ids.push(delta.entity_id);
                    sessions.push(delta.session);
                }
            }
            notify_points(ctx, out, ids, sessions);
        }
        EditKind::ManualConnectSpine | EditKind::EditSpineProperty => {
            let mut ids = Vec::new();
            let mut sessions = Vec::new();
            for delta in edit.deltas() {
                let (Some(column), Some(prior)) = (delta.column.as_deref(), delta.prior_value)
                else {
                    log::warn!("Undo: kein Vorher-Wert für Annotation {}", delta.entity_id);
                    continue;
                };
                if ctx.doc.backend.set_value(column, delta.entity_id, prior) {
                    ids.push(delta.entity_id);
                    sessions.push(delta.session);
                }
            }
            notify_points(ctx, out, ids, sessions);
        }
        EditKind::AddSegment => {
            for delta in edit.deltas() {
                if !ctx.doc.backend.delete_segment(delta.entity_id) {
                    log::warn!("Undo: Segment {} nicht löschbar", delta.entity_id);
                }
            }
            notify_segment(ctx, out, None);
        }
        EditKind::DeleteSegment => {
            // Erster Delta trägt die Segment-Zeile, die folgenden die Punkte.
            let Some(head) = edit.deltas().first().cloned() else {
                return;
            };
            let Some(segment) = ctx.doc.backend.add_segment(head.session) else {
                log::warn!("Undo: Segment lässt sich nicht neu anlegen");
                return;
            };
            if let Some(pivot) = head.prior_position {
                ctx.doc.backend.set_segment_pivot(segment, pivot);
            }
            for (index, delta) in edit.deltas_mut().iter_mut().enumerate() {
                delta.segment_id = Some(segment);
                if index == 0 {
                    delta.entity_id = segment;
                    continue;
                }
                let Some(position) = delta.prior_position else {
                    continue;
                };
                if let Some(id) = ctx.doc.backend.add_segment_point(segment, position) {
                    delta.entity_id = id;
                }
            }
            notify_segment(ctx, out, Some(segment));
        }
        EditKind::DeleteSegmentPoint => {
            for delta in edit.deltas_mut() {
                let (Some(segment), Some(position)) = (delta.segment_id, delta.prior_position)
                else {
                    continue;
                };
                if let Some(id) = ctx.doc.backend.add_segment_point(segment, position) {
                    delta.entity_id = id;
                }
            }
        }
        EditKind::SetSegmentPivot => {
            for delta in edit.deltas() {
                let (Some(segment), Some(position)) = (delta.segment_id, delta.prior_position)
                else {
                    log::warn!("Undo: kein vorheriger Pivot aufgezeichnet");
                    continue;
                };
                ctx.doc.backend.set_segment_pivot(segment, position);
            }
        }
    }
}

/// Spielt die ursprüngliche Aktion eines Eintrags erneut ab.
fn replay_forward(ctx: &mut RootCtx, edit: &mut EditEvent, out: &mut Vec<EventMessage>) {
    match edit.kind() {
        EditKind::AddSpine => {
            let mut ids = Vec::new();
            let mut sessions = Vec::new();
            for delta in edit.deltas_mut() {
                let (Some(segment), Some(position)) = (delta.segment_id, delta.position) else {
                    continue;
                };
                if let Some(id) = ctx.doc.backend.add_spine(position, segment, delta.session) {
                    delta.entity_id = id;
                    ids.push(id);
                    sessions.push(delta.session);
                }
            }
            notify_points(ctx, out, ids, sessions);
        }
        EditKind::DeleteSpine => {
            for delta in edit.deltas() {
                ctx.doc.backend.delete_annotation(delta.entity_id);
            }
            notify_points(ctx, out, Vec::new(), Vec::new());
        }
        EditKind::MoveSpine => {
            let mut ids = Vec::new();
            let mut sessions = Vec::new();
            for delta in edit.deltas() {
                let Some(position) = delta.position else {
                    continue;
                };
                if ctx.doc.backend.move_annotation(delta.entity_id, position) {
                    ids.push(delta.entity_id);
                    sessions.push(delta.session);
                }
            }
            notify_points(ctx, out, ids, sessions);
        }
        EditKind::ManualConnectSpine | EditKind::EditSpineProperty => {
            let mut ids = Vec::new();
            let mut sessions = Vec::new();
            for delta in edit.deltas() {
                let (Some(column), Some(value)) = (delta.column.as_deref(), delta.value) else {
                    continue;
                };
                if ctx.doc.backend.set_value(column, delta.entity_id, value) {
                    ids.push(delta.entity_id);
                    sessions.push(delta.session);
                }
            }
            notify_points(ctx, out, ids, sessions);
        }
        EditKind::AddSegment => {
            let mut created = None;
            for delta in edit.deltas_mut() {
                if let Some(segment) = ctx.doc.backend.add_segment(delta.session) {
                    delta.entity_id = segment;
                    delta.segment_id = Some(segment);
                    created = Some(segment);
                }
            }
            notify_segment(ctx, out, created);
        }
        EditKind::DeleteSegment => {
            let Some(head) = edit.deltas().first() else {
                return;
            };
            if !ctx.doc.backend.delete_segment(head.entity_id) {
                log::warn!("Redo: Segment {} nicht löschbar", head.entity_id);
            }
            notify_segment(ctx, out, None);
        }
        EditKind::AddSegmentPoint => {
            for delta in edit.deltas_mut() {
                let (Some(segment), Some(position)) = (delta.segment_id, delta.position) else {
                    continue;
                };
                if let Some(id) = ctx.doc.backend.add_segment_point(segment, position) {
                    delta.entity_id = id;
                }
            }
        }
        EditKind::DeleteSegmentPoint => {
            for delta in edit.deltas() {
                ctx.doc.backend.delete_segment_point(delta.entity_id);
            }
        }
        EditKind::SetSegmentPivot => {
            for delta in edit.deltas() {
                let (Some(segment), Some(position)) = (delta.segment_id, delta.position) else {
                    continue;
                };
                ctx.doc.backend.set_segment_pivot(segment, position);
            }
        }
    }
}
