//! Zustands-Typen: Selektion, View und Dokument.

pub mod document;
pub mod selection;
pub mod view;

pub use document::DocumentState;
pub use selection::{EditMode, SelectionState};
pub use view::ViewState;
