//! Selektions-Handling an Root-Nodes.

use crate::app::bus::{NodeRole, Outcome};
use crate::app::events::EventMessage;
use crate::app::handlers::RootCtx;
use crate::app::state::EditMode;

/// Übernimmt die Selektion eines `select`-Events in den Root-Zustand.
///
/// Stack-Roots reduzieren die mitgeführte Selektion vorab auf die eigene
/// Session, der Map-Root übernimmt sie ungefiltert. Mit gesetztem
/// Alt-Flag wird additiv erweitert statt ersetzt. Während einer laufenden
/// Geste (Verschieben, Verbinden, Tracing) ist gewöhnliche Selektion am
/// Ursprungs-Root gesperrt.
pub(crate) fn selected(ctx: &mut RootCtx, event: &EventMessage) -> Outcome {
    if ctx.originating_stack(event)
        && matches!(
            ctx.selection.state(),
            EditMode::MovingPoint | EditMode::ManualConnectSpine | EditMode::TracingSegment
        )
    {
        return Outcome::Veto(format!(
            "Selektion im Modus {:?} gesperrt",
            ctx.selection.state()
        ));
    }

    let incoming = match (ctx.role, ctx.session) {
        (NodeRole::StackRoot, Some(session)) => event.selection.reduce_to_session(session),
        _ => event.selection.clone(),
    };

    if event.alt {
        ctx.selection.extend_selection(&incoming);
    } else {
        ctx.selection.apply_selection(&incoming);
    }

    log::debug!(
        "Selektion übernommen: {} Punkt(e), alt={}",
        ctx.selection.point_selection().len(),
        event.alt
    );
    Outcome::Accept
}
