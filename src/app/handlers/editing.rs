//! Spine-Mutationen an Root-Nodes.
//!
//! Alle Funktionen hier mutieren das Backend nur am Ursprungs-Stack-Root
//! und zeichnen dabei den Undo-Eintrag mit Vorher-Werten auf. An allen
//! anderen Roots laufen dieselben Events als reine Notifikation durch.

use glam::Vec3;

use crate::app::bus::Outcome;
use crate::app::events::{EditDelta, EditEvent, EditKind, EventMessage, EventPayload};
use crate::app::handlers::RootCtx;
use crate::app::state::EditMode;
use crate::core::PointId;

/// Legt einen neuen Spine am ersten selektierten Segment an.
///
/// Ohne Segment-Selektion wird das Event vetiert, bevor das Backend
/// berührt wird. Nach Erfolg hält der Root den neuen Spine selektiert und
/// publiziert die Selektion als synthetisches Folge-Event.
pub(crate) fn added(
    ctx: &mut RootCtx,
    event: &EventMessage,
    position: Vec3,
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
        return Outcome::Veto("Kein Segment selektiert, Spine kann nicht angelegt werden".into());
    };
    let Some(id) = ctx.doc.backend.add_spine(position, segment, session) else {
        return Outcome::Veto(format!("Spine an Segment {segment} konnte nicht angelegt werden"));
    };
    let radius = f64::from(ctx.doc.options.default_spine_radius);
    ctx.doc.backend.set_value("radius", id, radius);

    let mut edit = EditEvent::new(EditKind::AddSpine);
    edit.add_edit(
        EditDelta::entity(id, session)
            .with_segment(segment)
            .with_position(position),
    );
    ctx.doc.history.record(edit);

    ctx.selection.set_point_selection(vec![id], None);
    log::info!(
        "Spine {id} an ({:.1}, {:.1}, {:.1}) angelegt",
        position.x,
        position.y,
        position.z
    );
    out.push(EventMessage::select_points(vec![id], session));
    Outcome::Accept
}

/// Löscht die im Event bzw. am Root selektierten Spines.
pub(crate) fn deleted(
    ctx: &mut RootCtx,
    event: &EventMessage,
    out: &mut Vec<EventMessage>,
) -> Outcome {
    if !ctx.originating_stack(event) {
        return Outcome::Accept;
    }
    let session = ctx.session.unwrap_or(0);
    let targets: Vec<PointId> = if event.selection.has_point_selection() {
        event.selection.point_selection().to_vec()
    } else {
        ctx.selection.point_selection().to_vec()
    };
    if targets.is_empty() {
        return Outcome::Veto("Nichts selektiert zum Löschen".into());
    }

    let mut edit = EditEvent::new(EditKind::DeleteSpine);
    for id in &targets {
        let prior_position = ctx.doc.backend.position_of(*id);
        let segment = ctx.doc.backend.segment_of(*id);
        let row_session = ctx.doc.backend.session_of(*id).unwrap_or(session);
        if !ctx.doc.backend.delete_annotation(*id) {
            log::warn!("Löschen: Annotation {id} unbekannt");
            continue;
        }
        let mut delta = EditDelta::entity(*id, row_session);
        if let Some(seg) = segment {
            delta = delta.with_segment(seg);
        }
        if let Some(pos) = prior_position {
            delta = delta.with_prior_position(pos);
        }
        edit.add_edit(delta);
    }
    if edit.is_empty() {
        log::warn!("Löschen: keine der {} Selektionen bekannt", targets.len());
        return Outcome::Accept;
    }

    log::info!("{} Spine(s) gelöscht", edit.deltas().len());
    ctx.doc.history.record(edit);
    ctx.selection.clear_points();
    out.push(EventMessage::select_points(Vec::new(), session));
    Outcome::Accept
}

/// Wendet die Deltas eines `edit`-Events auf das Backend an.
///
/// Ein leeres Edit gilt als reiner Refresh und läuft ohne Mutation durch.
/// Nur tatsächlich angewandte Deltas landen (mit Vorher-Wert) im Undo-Log.
pub(crate) fn edited(ctx: &mut RootCtx, event: &EventMessage, edit: &EditEvent) -> Outcome {
    if edit.is_empty() || !ctx.originating_stack(event) {
        return Outcome::Accept;
    }

    let mut recorded = EditEvent::new(edit.kind());
    for delta in edit.deltas() {
        let (Some(column), Some(value)) = (delta.column.as_deref(), delta.value) else {
            log::warn!("Edit-Delta ohne Spalte/Wert übersprungen");
            continue;
        };
        let prior = ctx.doc.backend.get_value(column, delta.entity_id);
        if !ctx.doc.backend.set_value(column, delta.entity_id, value) {
            continue;
        }
        let mut applied = EditDelta::entity(delta.entity_id, delta.session)
            .with_column_value(column, value, prior);
        if let Some(seg) = delta.segment_id {
            applied = applied.with_segment(seg);
        }
        recorded.add_edit(applied);
    }
    if !recorded.is_empty() {
        ctx.doc.history.record(recorded);
    }
    Outcome::Accept
}

/// Verschiebt den selektierten Spine und beendet die Verschiebe-Geste.
pub(crate) fn move_annotation(
    ctx: &mut RootCtx,
    event: &EventMessage,
    position: Vec3,
    out: &mut Vec<EventMessage>,
) -> Outcome {
    if !ctx.originating_stack(event) {
        return Outcome::Accept;
    }
    if ctx.selection.state() != EditMode::MovingPoint {
        return Outcome::Veto("Verschiebe-Modus nicht aktiv".into());
    }
    let target = event
        .selection
        .first_point_selection()
        .or_else(|| ctx.selection.first_point_selection());
    let Some(id) = target else {
        return Outcome::Veto("Kein Punkt selektiert zum Verschieben".into());
    };
    let session = ctx.session.unwrap_or(0);

    let prior = ctx.doc.backend.position_of(id);
    if !ctx.doc.backend.move_annotation(id, position) {
        return Outcome::Veto(format!("Annotation {id} lässt sich nicht verschieben"));
    }

    let mut edit = EditEvent::new(EditKind::MoveSpine);
    let mut delta = EditDelta::entity(id, session).with_position(position);
    if let Some(pos) = prior {
        delta = delta.with_prior_position(pos);
    }
    edit.add_edit(delta);
    ctx.doc.history.record(edit);

    // Abgeschlossene Geste: zurück in den Edit-Modus.
    ctx.selection.set_state(EditMode::Edit);
    out.push(EventMessage::select_points(vec![id], session));
    out.push(EventMessage::new(EventPayload::StateChange {
        mode: EditMode::Edit,
    }));
    Outcome::Accept
}

/// Verbindet die gemerkte Quelle mit dem angeklickten Segment-Punkt.
pub(crate) fn manual_connect(
    ctx: &mut RootCtx,
    event: &EventMessage,
    segment_point: PointId,
    out: &mut Vec<EventMessage>,
) -> Outcome {
    if !ctx.originating_stack(event) {
        return Outcome::Accept;
    }
    if ctx.selection.state() != EditMode::ManualConnectSpine {
        return Outcome::Veto("Verbindungs-Modus nicht aktiv".into());
    }
    let Some(source) = ctx.selection.connect_source else {
        return Outcome::Veto("Keine Verbindungs-Quelle gemerkt".into());
    };
    let session = ctx.session.unwrap_or(0);

    let prior = ctx.doc.backend.get_value("brightestIndex", source);
    if !ctx
        .doc
        .backend
        .set_value("brightestIndex", source, segment_point as f64)
    {
        return Outcome::Veto(format!("Spine {source} lässt sich nicht verbinden"));
    }

    let mut edit = EditEvent::new(EditKind::ManualConnectSpine);
    edit.add_edit(
        EditDelta::entity(source, session).with_column_value(
            "brightestIndex",
            segment_point as f64,
            prior,
        ),
    );
    ctx.doc.history.record(edit);
    log::info!("Spine {source} manuell mit Segment-Punkt {segment_point} verbunden");

    // Abgeschlossene Geste: Quelle verwerfen, zurück in den Edit-Modus.
    ctx.selection.connect_source = None;
    ctx.selection.set_state(EditMode::Edit);
    out.push(EventMessage::select_points(vec![source], session));
    out.push(EventMessage::new(EventPayload::StateChange {
        mode: EditMode::Edit,
    }));
    Outcome::Accept
}

/// Lässt das Backend den nächstgelegenen Segment-Punkt wählen.
pub(crate) fn auto_connect(
    ctx: &mut RootCtx,
    event: &EventMessage,
    out: &mut Vec<EventMessage>,
) -> Outcome {
    if !ctx.originating_stack(event) {
        return Outcome::Accept;
    }
    let target = event
        .selection
        .first_point_selection()
        .or_else(|| ctx.selection.first_point_selection());
    let Some(id) = target else {
        return Outcome::Veto("Kein Spine selektiert zum Verbinden".into());
    };
    let session = ctx.session.unwrap_or(0);

    let prior = ctx.doc.backend.get_value("brightestIndex", id);
    let Some(segment_point) = ctx.doc.backend.auto_connect_spine(id) else {
        return Outcome::Veto(format!("Auto-Connect für Spine {id} fehlgeschlagen"));
    };

    let mut edit = EditEvent::new(EditKind::ManualConnectSpine);
    edit.add_edit(
        EditDelta::entity(id, session).with_column_value(
            "brightestIndex",
            segment_point as f64,
            prior,
        ),
    );
    ctx.doc.history.record(edit);
    log::info!("Spine {id} automatisch mit Segment-Punkt {segment_point} verbunden");

    out.push(EventMessage::select_points(vec![id], session));
    Outcome::Accept
}

/// Setzt den Radius des ersten selektierten Spines.
pub(crate) fn set_radius(ctx: &mut RootCtx, event: &EventMessage, radius: f32) -> Outcome {
    if !ctx.originating_stack(event) {
        return Outcome::Accept;
    }
    let target = event
        .selection
        .first_point_selection()
        .or_else(|| ctx.selection.first_point_selection());
    let Some(id) = target else {
        return Outcome::Veto("Kein Spine selektiert für Radius-Änderung".into());
    };
    let session = ctx.session.unwrap_or(0);

    let prior = ctx.doc.backend.get_value("radius", id);
    if !ctx.doc.backend.set_value("radius", id, f64::from(radius)) {
        return Outcome::Veto(format!("Radius von Spine {id} lässt sich nicht setzen"));
    }

    let mut edit = EditEvent::new(EditKind::EditSpineProperty);
    edit.add_edit(EditDelta::entity(id, session).with_column_value(
        "radius",
        f64::from(radius),
        prior,
    ));
    ctx.doc.history.record(edit);
    Outcome::Accept
}
