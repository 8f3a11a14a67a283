//! Minimales Event-Log für Diagnose und Tests.

use crate::app::events::{EventKind, EventMessage};
use crate::core::{EventId, NodeId};
use crate::shared::EVENT_LOG_MAX_ENTRIES;

/// Ein verarbeitetes Event in Kurzform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventLogEntry {
    /// Event-ID
    pub id: EventId,
    /// Art des Events
    pub kind: EventKind,
    /// Auslösender Node
    pub sender: NodeId,
}

/// Speichert verarbeitete Events in Reihenfolge.
#[derive(Default)]
pub struct EventLog {
    entries: Vec<EventLogEntry>,
}

impl EventLog {
    /// Erstellt ein leeres Event-Log.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Fügt ein verarbeitetes Event hinzu.
    /// Begrenzt auf `EVENT_LOG_MAX_ENTRIES`, ältere Einträge werden verworfen.
    pub fn record(&mut self, event: &EventMessage) {
        if self.entries.len() >= EVENT_LOG_MAX_ENTRIES {
            self.entries.drain(..EVENT_LOG_MAX_ENTRIES / 2);
        }
        self.entries.push(EventLogEntry {
            id: event.id,
            kind: event.kind(),
            sender: event.sender,
        });
    }

    /// Gibt die Anzahl der geloggten Events zurück.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Gibt `true` zurück, wenn keine Events vorhanden sind.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Liefert eine read-only Sicht auf alle Einträge.
    pub fn entries(&self) -> &[EventLogEntry] {
        &self.entries
    }

    /// Nur die Event-Arten, in Reihenfolge (Test-Helfer).
    pub fn kinds(&self) -> Vec<EventKind> {
        self.entries.iter().map(|e| e.kind).collect()
    }
}
