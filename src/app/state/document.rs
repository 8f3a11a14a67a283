//! Dokument-Zustand: Backend, Undo/Redo-Log, Optionen, Diagnose.

use crate::app::event_log::EventLog;
use crate::app::history::UndoRedoLog;
use crate::core::{AnnotationBackend, AnnotationTable};
use crate::shared::SyncOptions;

/// Geteilter Zustand eines offenen Dokuments.
///
/// Genau eine Instanz pro Dokument, geteilt von Map und allen Stacks;
/// das Undo/Redo-Log ist damit eine explizit injizierte Abhängigkeit mit
/// Dokument-Lebensdauer und kein ambienter Global-Zugriff.
pub struct DocumentState {
    /// Annotations-Backend (Koordinaten, Spalten, Geometrie)
    pub backend: Box<dyn AnnotationBackend>,
    /// Undo/Redo-Log, befüllt ausschließlich von Root-Handlern
    pub history: UndoRedoLog,
    /// Laufzeit-Optionen
    pub options: SyncOptions,
    /// Verlauf verarbeiteter Events
    pub event_log: EventLog,
    /// Zuletzt aufgelaufene Status-Meldung (Veto, verweigerter Übergang)
    status: Option<String>,
}

impl DocumentState {
    /// Erstellt ein Dokument über einem injizierten Backend.
    pub fn new(backend: Box<dyn AnnotationBackend>, options: SyncOptions) -> Self {
        let history = UndoRedoLog::from_options(&options);
        Self {
            backend,
            history,
            options,
            event_log: EventLog::new(),
            status: None,
        }
    }

    /// Komfort: Dokument über einer leeren In-Memory-Tabelle.
    pub fn with_table() -> Self {
        Self::new(Box::new(AnnotationTable::new()), SyncOptions::default())
    }

    /// Hinterlegt eine Status-Meldung für die UI.
    pub fn set_status(&mut self, message: impl Into<String>) {
        let message = message.into();
        log::warn!("{message}");
        self.status = Some(message);
    }

    /// Holt die letzte Status-Meldung ab (einmalig).
    pub fn take_status(&mut self) -> Option<String> {
        self.status.take()
    }

    /// Gibt zurück, ob ein Undo-Schritt verfügbar ist.
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// Gibt zurück, ob ein Redo-Schritt verfügbar ist.
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Menü-Beschriftung des nächsten Undo-Schritts.
    pub fn next_undo_name(&self) -> Option<&'static str> {
        self.history.next_undo_name()
    }

    /// Menü-Beschriftung des nächsten Redo-Schritts.
    pub fn next_redo_name(&self) -> Option<&'static str> {
        self.history.next_redo_name()
    }
}
