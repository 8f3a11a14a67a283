//! Ansichts-Zustand an Root-Nodes (Slice, Farbkanal, Refresh).

use crate::app::bus::Outcome;
use crate::app::handlers::RootCtx;

/// Übernimmt den angezeigten Z-Slice.
pub(crate) fn set_slice(ctx: &mut RootCtx, slice: u32) -> Outcome {
    ctx.view.slice = slice;
    Outcome::Accept
}

/// Übernimmt den angezeigten Farbkanal.
pub(crate) fn set_color_channel(ctx: &mut RootCtx, channel: u32) -> Outcome {
    ctx.view.channel = channel;
    Outcome::Accept
}

/// Refresh ist reine Notifikation, der Root reicht sie nur durch.
pub(crate) fn refresh(_ctx: &mut RootCtx) -> Outcome {
    Outcome::Accept
}
