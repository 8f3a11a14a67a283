//! Edit-Modus-Übergänge an Root-Nodes.

use crate::app::bus::Outcome;
use crate::app::events::EventMessage;
use crate::app::handlers::RootCtx;
use crate::app::state::EditMode;

/// Wechselt den Edit-Modus des Root-Nodes.
///
/// Die Zulässigkeitsprüfung läuft am ersten Root, den das Event erreicht
/// (Stack oder Map): manuelles Verbinden setzt eine bestehende
/// Punkt-Selektion voraus, deren erster Eintrag als Verbindungs-Quelle
/// gemerkt wird. Nicht-ursprüngliche Roots übernehmen den bereits
/// legitimierten Modus unbesehen. Rückkehr nach `Edit` oder `View`
/// verwirft eine gemerkte Quelle.
pub(crate) fn state_changed(ctx: &mut RootCtx, event: &EventMessage, mode: EditMode) -> Outcome {
    let previous = ctx.selection.state();

    if ctx.first_root(event)
        && mode == EditMode::ManualConnectSpine
        && !ctx.selection.has_point_selection()
    {
        return Outcome::Veto("Manuelles Verbinden erfordert eine Spine-Selektion".to_string());
    }

    ctx.selection.set_state(mode);
    match mode {
        EditMode::ManualConnectSpine => {
            if event.at_origin() {
                ctx.selection.connect_source = ctx.selection.first_point_selection();
            }
        }
        EditMode::Edit | EditMode::View => {
            ctx.selection.connect_source = None;
        }
        _ => {}
    }

    log::info!("Edit-Modus: {previous:?} -> {mode:?}");
    Outcome::Accept
}
