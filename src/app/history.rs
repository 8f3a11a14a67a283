//! Undo/Redo-Log aus typisierten Edit-Ereignissen.
//!
//! Undo ist "Gegen-Aktion abspielen", kein Snapshot-Restore: die
//! History-Handler lesen das oberste Ereignis, spielen dessen Deltas
//! invers gegen das Backend ab und legen es auf den Gegen-Stack zurück.

use crate::app::events::EditEvent;
use crate::shared::SyncOptions;

/// Zwei Stacks typisierter Edit-Ereignisse, ein Log pro Dokument.
#[derive(Default)]
pub struct UndoRedoLog {
    undo_stack: Vec<EditEvent>,
    redo_stack: Vec<EditEvent>,
    clear_redo_on_edit: bool,
    max_depth: Option<usize>,
}

impl UndoRedoLog {
    /// Erstellt ein Log mit expliziter Policy.
    pub fn new(clear_redo_on_edit: bool, max_depth: Option<usize>) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            clear_redo_on_edit,
            max_depth,
        }
    }

    /// Erstellt ein Log gemäß Optionen.
    pub fn from_options(options: &SyncOptions) -> Self {
        Self::new(options.clear_redo_on_edit, options.max_history_depth)
    }

    fn trim(stack: &mut Vec<EditEvent>, max_depth: Option<usize>) {
        if let Some(max) = max_depth {
            while stack.len() > max {
                stack.remove(0);
            }
        }
    }

    /// Zeichnet einen neuen Vorwärts-Edit auf.
    pub fn record(&mut self, event: EditEvent) {
        log::info!("Edit aufgezeichnet: {}", event.name());
        self.undo_stack.push(event);
        Self::trim(&mut self.undo_stack, self.max_depth);
        if self.clear_redo_on_edit {
            self.redo_stack.clear();
        }
    }

    /// Nimmt das oberste Undo-Ereignis ab; leer ist ein geloggter No-Op.
    pub fn pop_undo(&mut self) -> Option<EditEvent> {
        let event = self.undo_stack.pop();
        if event.is_none() {
            log::debug!("Undo: nichts zu tun");
        }
        event
    }

    /// Nimmt das oberste Redo-Ereignis ab; leer ist ein geloggter No-Op.
    pub fn pop_redo(&mut self) -> Option<EditEvent> {
        let event = self.redo_stack.pop();
        if event.is_none() {
            log::debug!("Redo: nichts zu tun");
        }
        event
    }

    /// Legt ein abgespieltes Undo-Ereignis auf den Redo-Stack.
    pub fn stash_redo(&mut self, event: EditEvent) {
        self.redo_stack.push(event);
        Self::trim(&mut self.redo_stack, self.max_depth);
    }

    /// Legt ein abgespieltes Redo-Ereignis zurück auf den Undo-Stack
    /// (ohne den Redo-Stack zu leeren).
    pub fn stash_undo(&mut self, event: EditEvent) {
        self.undo_stack.push(event);
        Self::trim(&mut self.undo_stack, self.max_depth);
    }

    /// Prüft ob Undo möglich ist.
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Prüft ob Redo möglich ist.
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Menü-Beschriftung des nächsten Undo-Schritts.
    pub fn next_undo_name(&self) -> Option<&'static str> {
        self.undo_stack.last().map(|e| e.name())
    }

    /// Menü-Beschriftung des nächsten Redo-Schritts.
    pub fn next_redo_name(&self) -> Option<&'static str> {
        self.redo_stack.last().map(|e| e.name())
    }

    /// Anzahl Undo-Einträge.
    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    /// Anzahl Redo-Einträge.
    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::events::{EditDelta, EditKind};

    fn edit(kind: EditKind, entity: u64) -> EditEvent {
        let mut event = EditEvent::new(kind);
        event.add_edit(EditDelta::entity(entity, 0));
        event
    }

    #[test]
    fn empty_log_cannot_undo_or_redo() {
        let mut log = UndoRedoLog::new(true, None);
        assert!(!log.can_undo());
        assert!(!log.can_redo());
        assert!(log.pop_undo().is_none());
        assert!(log.pop_redo().is_none());
    }

    #[test]
    fn record_enables_undo_and_names_it() {
        let mut log = UndoRedoLog::new(true, None);
        log.record(edit(EditKind::AddSpine, 1));

        assert!(log.can_undo());
        assert_eq!(log.next_undo_name(), Some("Spine hinzufügen"));
        assert_eq!(log.next_redo_name(), None);
    }

    #[test]
    fn undo_then_stash_moves_event_to_redo() {
        let mut log = UndoRedoLog::new(true, None);
        log.record(edit(EditKind::AddSpine, 1));

        let popped = log.pop_undo().expect("Undo vorhanden");
        log.stash_redo(popped);

        assert!(!log.can_undo());
        assert_eq!(log.next_redo_name(), Some("Spine hinzufügen"));
    }

    #[test]
    fn new_record_clears_redo_by_default() {
        let mut log = UndoRedoLog::new(true, None);
        log.record(edit(EditKind::AddSpine, 1));
        let popped = log.pop_undo().unwrap();
        log.stash_redo(popped);
        assert!(log.can_redo());

        log.record(edit(EditKind::MoveSpine, 2));

        assert!(!log.can_redo());
    }

    #[test]
    fn keep_redo_policy_preserves_stale_redo() {
        // Ursprungs-Verhalten der Vorlage: Redo bleibt trotz neuem Edit
        let mut log = UndoRedoLog::new(false, None);
        log.record(edit(EditKind::AddSpine, 1));
        let popped = log.pop_undo().unwrap();
        log.stash_redo(popped);

        log.record(edit(EditKind::MoveSpine, 2));

        assert!(log.can_redo());
        assert_eq!(log.next_redo_name(), Some("Spine hinzufügen"));
    }

    #[test]
    fn stash_undo_does_not_clear_redo() {
        let mut log = UndoRedoLog::new(true, None);
        log.record(edit(EditKind::AddSpine, 1));
        log.record(edit(EditKind::MoveSpine, 2));
        let popped = log.pop_undo().unwrap();
        log.stash_redo(popped);
        let popped = log.pop_undo().unwrap();
        log.stash_redo(popped);

        let replayed = log.pop_redo().unwrap();
        log.stash_undo(replayed);

        assert!(log.can_redo());
        assert_eq!(log.undo_len(), 1);
        assert_eq!(log.redo_len(), 1);
    }

    #[test]
    fn respects_max_depth() {
        let mut log = UndoRedoLog::new(true, Some(3));
        for i in 0..5 {
            log.record(edit(EditKind::AddSpine, i));
        }

        assert_eq!(log.undo_len(), 3);
        // Die ältesten Einträge wurden verworfen
        let top = log.pop_undo().unwrap();
        assert_eq!(top.spines(), vec![4]);
    }
}
