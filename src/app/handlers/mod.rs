//! Engine-Handler für Root-Nodes.
//!
//! Jeder Handler gruppiert die Event-Verarbeitung eines Feature-Bereichs.
//! Der Bus dispatcht erschöpfend über die Nutzlast-Vereinigung an die
//! passende Handler-Funktion. Backend-Mutationen und Undo-Einträge laufen
//! ausschließlich am Ursprungs-Root (keine Grenze überschritten); alle
//! späteren Roots behandeln dasselbe Event als Notifikation.

pub mod editing;
pub mod fsm;
pub mod history;
pub mod segments;
pub mod selection;
pub mod view;

use crate::app::bus::{NodeRole, Outcome};
use crate::app::events::{EventMessage, EventPayload};
use crate::app::state::{DocumentState, SelectionState, ViewState};
use crate::core::SessionId;

/// Gebündelter Zugriff eines Root-Handlers auf Node- und Dokument-Zustand.
pub(crate) struct RootCtx<'a> {
    pub role: NodeRole,
    pub session: Option<SessionId>,
    pub selection: &'a mut SelectionState,
    pub view: &'a mut ViewState,
    pub doc: &'a mut DocumentState,
}

impl RootCtx<'_> {
    /// `true` am Stack-Root, unter dem die Geste ausgelöst wurde.
    pub fn originating_stack(&self, event: &EventMessage) -> bool {
        self.role == NodeRole::StackRoot && event.at_origin()
    }

    /// `true` am ersten Root, den das Event erreicht (Stack oder Map).
    pub fn first_root(&self, event: &EventMessage) -> bool {
        event.at_origin()
    }
}

/// Erschöpfender Dispatch eines Events an die Root-Handler.
pub(crate) fn dispatch_root(
    mut ctx: RootCtx,
    event: &mut EventMessage,
    out: &mut Vec<EventMessage>,
) -> Outcome {
    match event.payload.clone() {
        EventPayload::Select => selection::selected(&mut ctx, event),
        EventPayload::Add { position } => editing::added(&mut ctx, event, position, out),
        EventPayload::Delete => editing::deleted(&mut ctx, event, out),
        EventPayload::Edit { edit } => editing::edited(&mut ctx, event, &edit),
        EventPayload::StateChange { mode } => fsm::state_changed(&mut ctx, event, mode),
        EventPayload::MoveAnnotation { position } => {
            editing::move_annotation(&mut ctx, event, position, out)
        }
        EventPayload::ManualConnectSpine { segment_point } => {
            editing::manual_connect(&mut ctx, event, segment_point, out)
        }
        EventPayload::AutoConnectSpine => editing::auto_connect(&mut ctx, event, out),
        EventPayload::SetSlice { slice } => view::set_slice(&mut ctx, slice),
        EventPayload::SetColorChannel { channel } => view::set_color_channel(&mut ctx, channel),
        EventPayload::SetRadius { radius } => editing::set_radius(&mut ctx, event, radius),
        EventPayload::RefreshSpine => view::refresh(&mut ctx),
        EventPayload::Undo => history::undo(&mut ctx, event, out),
        EventPayload::Redo => history::redo(&mut ctx, event, out),
        EventPayload::AddSegment => segments::added_segment(&mut ctx, event, out),
        EventPayload::DeleteSegment => segments::deleted_segment(&mut ctx, event, out),
        EventPayload::AddSegmentPoint { position } => {
            segments::added_segment_point(&mut ctx, event, position)
        }
        EventPayload::DeleteSegmentPoint => segments::deleted_segment_point(&mut ctx, event),
        EventPayload::SetSegmentPivot { position } => {
            segments::set_segment_pivot(&mut ctx, event, position, out)
        }
    }
}
