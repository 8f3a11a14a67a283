//! Zentrale Konfiguration des Sync-Kerns.
//!
//! `SyncOptions` enthält alle zur Laufzeit änderbaren Werte.
//! Die `const`-Werte bleiben als Fallback/Default erhalten.

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

// ── Annotationen ────────────────────────────────────────────────────

/// Standard-Radius neuer Spines (Pixel).
pub const DEFAULT_SPINE_RADIUS: f32 = 2.0;

// ── Diagnose ────────────────────────────────────────────────────────

/// Obergrenze des Event-Logs; ältere Einträge werden verworfen.
pub const EVENT_LOG_MAX_ENTRIES: usize = 1000;

/// Laufzeit-Optionen des Sync-Kerns.
///
/// Die beiden History-Optionen machen das Redo-Verhalten explizit:
/// `clear_redo_on_edit = true` verwirft nach einem Undo aufgezeichnete
/// Redo-Schritte, sobald ein neuer Vorwärts-Edit aufgezeichnet wird.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SyncOptions {
    /// Redo-Stack bei neuem Vorwärts-Edit leeren
    pub clear_redo_on_edit: bool,
    /// Maximale Undo-Tiefe (None = unbegrenzt)
    pub max_history_depth: Option<usize>,
    /// Standard-Radius neuer Spines
    pub default_spine_radius: f32,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            clear_redo_on_edit: true,
            max_history_depth: None,
            default_spine_radius: DEFAULT_SPINE_RADIUS,
        }
    }
}

impl SyncOptions {
    /// Parst Optionen aus einem TOML-String.
    pub fn from_toml(input: &str) -> anyhow::Result<Self> {
        toml::from_str(input).context("SyncOptions: TOML nicht lesbar")
    }

    /// Serialisiert die Optionen als TOML.
    pub fn to_toml(&self) -> anyhow::Result<String> {
        toml::to_string_pretty(self).context("SyncOptions: TOML nicht schreibbar")
    }

    /// Lädt Optionen aus einer Datei; fehlende Datei ergibt Defaults.
    pub fn load_from_path(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Optionen nicht lesbar: {}", path.display()))?;
        Self::from_toml(&content)
    }

    /// Speichert die Optionen in eine Datei.
    pub fn save_to_path(&self, path: &Path) -> anyhow::Result<()> {
        let content = self.to_toml()?;
        std::fs::write(path, content)
            .with_context(|| format!("Optionen nicht schreibbar: {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_clear_redo_and_unbounded_history() {
        let options = SyncOptions::default();
        assert!(options.clear_redo_on_edit);
        assert!(options.max_history_depth.is_none());
    }

    #[test]
    fn toml_round_trip_preserves_all_fields() {
        let options = SyncOptions {
            clear_redo_on_edit: false,
            max_history_depth: Some(50),
            default_spine_radius: 3.5,
        };

        let toml = options.to_toml().expect("TOML serialisierbar");
        let parsed = SyncOptions::from_toml(&toml).expect("TOML parsbar");

        assert_eq!(parsed, options);
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let parsed = SyncOptions::from_toml("clear_redo_on_edit = false\n").expect("parsbar");
        assert!(!parsed.clear_redo_on_edit);
        assert_eq!(parsed.default_spine_radius, DEFAULT_SPINE_RADIUS);
    }
}
