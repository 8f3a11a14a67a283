//! Zustell-Algorithmus: eine Breitensuche pro logischem Event.
//!
//! `emit` stellt nie rekursiv zu. Handler legen Folge-Events in eine
//! Ausgabe-Liste; der Bus reiht sie in dieselbe Warteschlange ein. Der
//! Call-Stack bleibt damit flach und die Besucht-Menge der Nachricht
//! verhindert Zyklen für beliebige Topologien, nicht nur 2-Node-Echos.

use std::collections::VecDeque;

use crate::app::events::{EventMessage, EventPayload};
use crate::app::handlers::{self, RootCtx};
use crate::app::state::{DocumentState, EditMode, SelectionState};
use crate::core::NodeId;

use super::{EventHandler, NodeEntry, NodeRole, Outcome, SignalBus};

type DeliveryQueue = VecDeque<(NodeId, EventMessage)>;

impl SignalBus {
    /// Löst ein Event aus und stellt es synchron im ganzen Baum zu.
    ///
    /// Jeder registrierte Node erhält das logische Event höchstens einmal.
    /// Ein Veto stoppt die Zustellung sofort und hinterlegt die Meldung
    /// als Dokument-Status.
    pub fn emit(&mut self, origin: NodeId, event: EventMessage) {
        let mut queue = DeliveryQueue::new();
        self.enqueue_from(origin, event, &mut queue);
        self.run(&mut queue);
    }

    /// Escape-Abbruch: zurück in den Edit-Modus, danach — falls eine
    /// Selektion bestand — Selektion leeren.
    pub fn cancel(&mut self, origin: NodeId) {
        let root = self
            .stack_root_of(origin)
            .or_else(|| match self.nodes.get(&origin) {
                Some(e) if e.role == NodeRole::MapRoot => Some(origin),
                Some(e) => e.map_parent,
                None => None,
            });
        let had_selection = root
            .and_then(|r| self.selection(r))
            .map(|s| s.has_point_selection())
            .unwrap_or(false);
        let session = root.and_then(|r| self.nodes.get(&r)).and_then(|e| e.session);

        self.emit(
            origin,
            EventMessage::new(EventPayload::StateChange {
                mode: EditMode::Edit,
            }),
        );
        if had_selection {
            let mut selection = SelectionState::new(session);
            selection.set_point_selection(Vec::new(), None);
            self.emit(
                origin,
                EventMessage::with_selection(EventPayload::Select, selection),
            );
        }
    }

    /// Stempelt ein Event (ID, Sender, Besucht-Menge, Log) und reiht die
    /// Zustellung an die direkten Nachbarn des Ursprungs ein.
    fn enqueue_from(&mut self, origin: NodeId, mut event: EventMessage, queue: &mut DeliveryQueue) {
        event.id = self.alloc_event_id();
        event.sender = origin;
        event.visited.insert(origin);
        self.document.event_log.record(&event);

        for target in self.neighbor_targets(origin, &event) {
            queue.push_back((target, event.clone()));
        }
    }

    /// Direkte Nachbarn: Eltern-Links plus — für Roots — alle Kinder,
    /// ohne bereits beliefernde Nodes.
    fn neighbor_targets(&self, id: NodeId, event: &EventMessage) -> Vec<NodeId> {
        let Some(entry) = self.nodes.get(&id) else {
            return Vec::new();
        };
        let mut targets = Vec::new();
        for parent in [entry.stack_parent, entry.map_parent].into_iter().flatten() {
            if !event.visited.contains(&parent) {
                targets.push(parent);
            }
        }
        if entry.role != NodeRole::Leaf {
            for child in self.children_of(id) {
                if !event.visited.contains(&child) {
                    targets.push(child);
                }
            }
        }
        targets
    }

    fn run(&mut self, queue: &mut DeliveryQueue) {
        while let Some((target, mut event)) = queue.pop_front() {
            if event.visited.contains(&target) {
                continue;
            }

            let mut followups: Vec<EventMessage> = Vec::new();
            let (outcome, role, session) = {
                let Self {
                    nodes, document, ..
                } = self;
                let Some(entry) = nodes.get_mut(&target) else {
                    // Fenster inzwischen geschlossen
                    continue;
                };
                event.visited.insert(target);
                let outcome = dispatch_node(entry, document, &mut event, &mut followups);
                (outcome, entry.role, entry.session)
            };

            match outcome {
                Outcome::Veto(message) => {
                    self.document.set_status(message);
                    queue.clear();
                    return;
                }
                Outcome::Pass => {}
                Outcome::Accept => match role {
                    NodeRole::StackRoot => {
                        if let Some(session) = session {
                            event.selection = event.selection.reduce_to_session(session);
                        }
                        event.crossed_stack = true;
                        for next in self.neighbor_targets(target, &event) {
                            queue.push_back((next, event.clone()));
                        }
                    }
                    NodeRole::MapRoot => {
                        event.crossed_map = true;
                        for next in self.neighbor_targets(target, &event) {
                            queue.push_back((next, event.clone()));
                        }
                    }
                    NodeRole::Leaf => {}
                },
            }

            for followup in followups {
                self.enqueue_from(target, followup, queue);
            }
        }
    }
}

/// Dispatch nach Rolle: Roots laufen durch die Engine-Handler,
/// Blätter durch ihr injiziertes `EventHandler`-Trait.
fn dispatch_node(
    entry: &mut NodeEntry,
    doc: &mut DocumentState,
    event: &mut EventMessage,
    followups: &mut Vec<EventMessage>,
) -> Outcome {
    match entry.role {
        NodeRole::Leaf => dispatch_leaf(entry.handler.as_mut(), doc, event),
        NodeRole::StackRoot | NodeRole::MapRoot => {
            let ctx = RootCtx {
                role: entry.role,
                session: entry.session,
                selection: &mut entry.selection,
                view: &mut entry.view,
                doc,
            };
            handlers::dispatch_root(ctx, event, followups)
        }
    }
}

fn dispatch_leaf(
    handler: &mut dyn EventHandler,
    doc: &DocumentState,
    event: &EventMessage,
) -> Outcome {
    match &event.payload {
        EventPayload::Select => handler.on_selected(doc, event),
        EventPayload::Add { .. } => handler.on_added(doc, event),
        EventPayload::Delete => handler.on_deleted(doc, event),
        EventPayload::Edit { .. } => handler.on_edited(doc, event),
        EventPayload::StateChange { .. } => handler.on_state_changed(doc, event),
        EventPayload::MoveAnnotation { .. } => handler.on_move_annotation(doc, event),
        EventPayload::ManualConnectSpine { .. } => handler.on_manual_connect_spine(doc, event),
        EventPayload::AutoConnectSpine => handler.on_auto_connect_spine(doc, event),
        EventPayload::SetSlice { .. } => handler.on_set_slice(doc, event),
        EventPayload::SetColorChannel { .. } => handler.on_set_color_channel(doc, event),
        EventPayload::SetRadius { .. } => handler.on_set_radius(doc, event),
        EventPayload::RefreshSpine => handler.on_refresh_spine(doc, event),
        EventPayload::Undo => handler.on_undo(doc, event),
        EventPayload::Redo => handler.on_redo(doc, event),
        EventPayload::AddSegment => handler.on_added_segment(doc, event),
        EventPayload::DeleteSegment => handler.on_deleted_segment(doc, event),
        EventPayload::AddSegmentPoint { .. } => handler.on_added_segment_point(doc, event),
        EventPayload::DeleteSegmentPoint => handler.on_deleted_segment_point(doc, event),
        EventPayload::SetSegmentPivot { .. } => handler.on_set_segment_pivot(doc, event),
    }
}
