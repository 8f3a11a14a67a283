//! Anzeige-Zustand eines Root-Nodes.

/// Aktuelle Bildansicht (Slice und Farbkanal) eines Stack- oder
/// Map-Fensters. Wird über SetSlice/SetColorChannel synchron gehalten.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewState {
    /// Angezeigte Bild-Ebene
    pub slice: u32,
    /// Angezeigter Farbkanal (1-basiert)
    pub channel: u32,
}

impl Default for ViewState {
    fn default() -> Self {
        Self { slice: 0, channel: 1 }
    }
}
