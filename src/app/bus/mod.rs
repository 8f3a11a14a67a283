//! Nachrichten-Bus des Propagations-Baums.
//!
//! Nodes registrieren sich per ID beim Bus; `emit` stellt über Topologie-
//! Lookup zu, statt über manuell verdrahtete Objekt-Referenzen. Damit
//! entfällt das explizite Abklemmen beim Schließen eines Fensters:
//! Zustellungen an entfernte IDs werden übersprungen.

mod propagate;

use indexmap::IndexMap;

use crate::app::state::{DocumentState, SelectionState, ViewState};
use crate::core::{EventId, NodeId, SessionId};

use super::events::EventMessage;

/// Rolle eines Nodes im Baum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeRole {
    /// Blatt: Panel/Widget, konsumiert Events und löst Gesten aus
    Leaf,
    /// Wurzel eines Stack-Fensters (eine Session)
    StackRoot,
    /// Wurzel des Map-Fensters (alle Sessions)
    MapRoot,
}

/// Ergebnis eines Handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Nicht zuständig, Event läuft unverändert weiter
    Pass,
    /// Verarbeitet; Roots reichen das Event weiter
    Accept,
    /// Abgelehnt; Propagation stoppt sofort, Meldung wird angezeigt
    Veto(String),
}

/// Handler-Schnittstelle für Präsentations-Nodes (Blätter).
///
/// Jede Methode ist optional; nicht implementierte Arten sind ein
/// Pass-Through-No-Op. Blätter lesen das Dokument, mutieren es aber nie —
/// Mutationen laufen ausschließlich über Root-Handler.
#[allow(unused_variables)]
pub trait EventHandler {
    fn on_selected(&mut self, doc: &DocumentState, event: &EventMessage) -> Outcome {
        Outcome::Pass
    }
    fn on_added(&mut self, doc: &DocumentState, event: &EventMessage) -> Outcome {
        Outcome::Pass
    }
    fn on_deleted(&mut self, doc: &DocumentState, event: &EventMessage) -> Outcome {
        Outcome::Pass
    }
    fn on_edited(&mut self, doc: &DocumentState, event: &EventMessage) -> Outcome {
        Outcome::Pass
    }
    fn on_state_changed(&mut self, doc: &DocumentState, event: &EventMessage) -> Outcome {
        Outcome::Pass
    }
    fn on_move_annotation(&mut self, doc: &DocumentState, event: &EventMessage) -> Outcome {
        Outcome::Pass
    }
    fn on_manual_connect_spine(&mut self, doc: &DocumentState, event: &EventMessage) -> Outcome {
        Outcome::Pass
    }
    fn on_auto_connect_spine(&mut self, doc: &DocumentState, event: &EventMessage) -> Outcome {
        Outcome::Pass
    }
    fn on_set_slice(&mut self, doc: &DocumentState, event: &EventMessage) -> Outcome {
        Outcome::Pass
    }
    fn on_set_color_channel(&mut self, doc: &DocumentState, event: &EventMessage) -> Outcome {
        Outcome::Pass
    }
    fn on_set_radius(&mut self, doc: &DocumentState, event: &EventMessage) -> Outcome {
        Outcome::Pass
    }
    fn on_refresh_spine(&mut self, doc: &DocumentState, event: &EventMessage) -> Outcome {
        Outcome::Pass
    }
    fn on_added_segment(&mut self, doc: &DocumentState, event: &EventMessage) -> Outcome {
        Outcome::Pass
    }
    fn on_deleted_segment(&mut self, doc: &DocumentState, event: &EventMessage) -> Outcome {
        Outcome::Pass
    }
    fn on_added_segment_point(&mut self, doc: &DocumentState, event: &EventMessage) -> Outcome {
        Outcome::Pass
    }
    fn on_deleted_segment_point(&mut self, doc: &DocumentState, event: &EventMessage) -> Outcome {
        Outcome::Pass
    }
    fn on_set_segment_pivot(&mut self, doc: &DocumentState, event: &EventMessage) -> Outcome {
        Outcome::Pass
    }
    fn on_undo(&mut self, doc: &DocumentState, event: &EventMessage) -> Outcome {
        Outcome::Pass
    }
    fn on_redo(&mut self, doc: &DocumentState, event: &EventMessage) -> Outcome {
        Outcome::Pass
    }
}

/// Handler ohne Verhalten, für Roots und Tests.
#[derive(Default)]
pub struct NullHandler;

impl EventHandler for NullHandler {}

/// Registrierter Teilnehmer des Baums.
pub(crate) struct NodeEntry {
    pub(crate) role: NodeRole,
    pub(crate) session: Option<SessionId>,
    pub(crate) stack_parent: Option<NodeId>,
    pub(crate) map_parent: Option<NodeId>,
    /// Selektions-Zustand; nur für Roots bedeutungstragend
    pub(crate) selection: SelectionState,
    pub(crate) view: ViewState,
    pub(crate) handler: Box<dyn EventHandler>,
}

/// Registry plus Zustell-Logik; besitzt den Dokument-Zustand.
pub struct SignalBus {
    pub(crate) nodes: IndexMap<NodeId, NodeEntry>,
    pub(crate) document: DocumentState,
    next_node_id: NodeId,
    next_event_id: EventId,
}

impl SignalBus {
    /// Erstellt einen Bus über einem Dokument.
    pub fn new(document: DocumentState) -> Self {
        Self {
            nodes: IndexMap::new(),
            document,
            next_node_id: 1,
            next_event_id: 1,
        }
    }

    fn insert(&mut self, entry: NodeEntry) -> NodeId {
        let id = self.next_node_id;
        self.next_node_id += 1;
        self.nodes.insert(id, entry);
        id
    }

    /// Registriert die Map-Wurzel (map-weite Selektion).
    pub fn add_map_root(&mut self) -> NodeId {
        self.insert(NodeEntry {
            role: NodeRole::MapRoot,
            session: None,
            stack_parent: None,
            map_parent: None,
            selection: SelectionState::new(None),
            view: ViewState::default(),
            handler: Box::new(NullHandler),
        })
    }

    /// Registriert eine Stack-Wurzel für eine Session, optional unter
    /// einer Map-Wurzel.
    pub fn add_stack_root(&mut self, session: SessionId, map_parent: Option<NodeId>) -> NodeId {
        if let Some(parent) = map_parent {
            debug_assert!(matches!(
                self.nodes.get(&parent).map(|e| e.role),
                Some(NodeRole::MapRoot)
            ));
        }
        self.insert(NodeEntry {
            role: NodeRole::StackRoot,
            session: Some(session),
            stack_parent: None,
            map_parent,
            selection: SelectionState::new(Some(session)),
            view: ViewState::default(),
            handler: Box::new(NullHandler),
        })
    }

    /// Registriert ein Blatt unter einer Stack- oder Map-Wurzel.
    pub fn add_leaf(&mut self, parent: NodeId, handler: Box<dyn EventHandler>) -> NodeId {
        let (stack_parent, map_parent, session) = match self.nodes.get(&parent) {
            Some(entry) if entry.role == NodeRole::StackRoot => {
                (Some(parent), None, entry.session)
            }
            Some(entry) if entry.role == NodeRole::MapRoot => (None, Some(parent), None),
            _ => {
                log::warn!("add_leaf: Parent {parent} ist kein Root — Blatt bleibt unverbunden");
                (None, None, None)
            }
        };
        self.insert(NodeEntry {
            role: NodeRole::Leaf,
            session,
            stack_parent,
            map_parent,
            selection: SelectionState::new(session),
            view: ViewState::default(),
            handler,
        })
    }

    /// Entfernt einen Node (Fenster geschlossen). Ausstehende
    /// Zustellungen an die ID werden künftig übersprungen.
    pub fn remove_node(&mut self, id: NodeId) {
        if self.nodes.shift_remove(&id).is_none() {
            log::debug!("remove_node: Node {id} war nicht registriert");
        }
    }

    /// Anzahl registrierter Nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Selektions-Zustand eines Roots.
    pub fn selection(&self, root: NodeId) -> Option<&SelectionState> {
        self.nodes.get(&root).map(|e| &e.selection)
    }

    /// Mutabler Selektions-Zustand eines Roots (Test- und Setup-Hilfe,
    /// z.B. Vorselektion eines Segments beim Öffnen).
    pub fn selection_mut(&mut self, root: NodeId) -> Option<&mut SelectionState> {
        self.nodes.get_mut(&root).map(|e| &mut e.selection)
    }

    /// Anzeige-Zustand eines Roots.
    pub fn view(&self, root: NodeId) -> Option<&ViewState> {
        self.nodes.get(&root).map(|e| &e.view)
    }

    /// Das geteilte Dokument.
    pub fn document(&self) -> &DocumentState {
        &self.document
    }

    /// Das geteilte Dokument, mutabel.
    pub fn document_mut(&mut self) -> &mut DocumentState {
        &mut self.document
    }

    pub(crate) fn alloc_event_id(&mut self) -> EventId {
        let id = self.next_event_id;
        self.next_event_id += 1;
        id
    }

    /// Stack-Wurzel über einem Node (der Node selbst, falls Wurzel).
    pub fn stack_root_of(&self, id: NodeId) -> Option<NodeId> {
        let entry = self.nodes.get(&id)?;
        match entry.role {
            NodeRole::StackRoot => Some(id),
            NodeRole::Leaf => entry.stack_parent,
            NodeRole::MapRoot => None,
        }
    }

    /// Kinder eines Roots, in Registrierungs-Reihenfolge.
    pub(crate) fn children_of(&self, root: NodeId) -> Vec<NodeId> {
        self.nodes
            .iter()
            .filter(|(_, e)| e.stack_parent == Some(root) || e.map_parent == Some(root))
            .map(|(id, _)| *id)
            .collect()
    }
}
