use glam::Vec3;
use neurostack_sync::{
    AnnotationTable, DocumentState, EditMode, EventMessage, EventPayload, SignalBus, SyncOptions,
};

/// Map-Fenster plus zwei Stack-Fenster (Session 0 und 1), je ein Blatt.
fn two_stack_setup() -> (SignalBus, Topology) {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut bus = SignalBus::new(DocumentState::with_table());
    let map = bus.add_map_root();
    let stack0 = bus.add_stack_root(0, Some(map));
    let stack1 = bus.add_stack_root(1, Some(map));
    let leaf0 = bus.add_leaf(stack0, Box::new(neurostack_sync::NullHandler));
    let leaf1 = bus.add_leaf(stack1, Box::new(neurostack_sync::NullHandler));
    (
        bus,
        Topology {
            map,
            stack0,
            stack1,
            leaf0,
            leaf1,
        },
    )
}

struct Topology {
    map: u64,
    stack0: u64,
    stack1: u64,
    leaf0: u64,
    leaf1: u64,
}

#[test]
fn test_spine_created_in_one_stack_is_selected_map_wide() {
    let (mut bus, topo) = two_stack_setup();
    let segment = bus
        .document_mut()
        .backend
        .add_segment(0)
        .expect("Segment sollte anlegbar sein");
    bus.selection_mut(topo.stack0)
        .expect("Stack 0 registriert")
        .set_segment_selection(Some(vec![segment]));

    bus.emit(
        topo.leaf0,
        EventMessage::new(EventPayload::Add {
            position: Vec3::new(3.0, 3.0, 3.0),
        }),
    );

    let spine = bus
        .selection(topo.stack0)
        .expect("Stack 0 registriert")
        .first_point_selection()
        .expect("Neuer Spine sollte selektiert sein");
    // Die synthetische Selektion erreicht auch das Map-Fenster
    assert_eq!(
        bus.selection(topo.map)
            .expect("Map registriert")
            .point_selection(),
        &[spine]
    );
    // Session 1 bleibt nach Reduktion leer
    assert!(!bus
        .selection(topo.stack1)
        .expect("Stack 1 registriert")
        .has_point_selection());
}

#[test]
fn test_full_manual_connect_scenario_with_undo() {
    let (mut bus, topo) = two_stack_setup();
    let segment = bus
        .document_mut()
        .backend
        .add_segment(0)
        .expect("Segment sollte anlegbar sein");
    let segment_point = bus
        .document_mut()
        .backend
        .add_segment_point(segment, Vec3::ZERO)
        .expect("Mittellinien-Punkt sollte anlegbar sein");
    let spine = bus
        .document_mut()
        .backend
        .add_spine(Vec3::new(1.0, 0.0, 0.0), segment, 0)
        .expect("Spine sollte anlegbar sein");

    // Schritt 1: Spine im Stack-Fenster anklicken
    bus.emit(topo.leaf0, EventMessage::select_points(vec![spine], 0));
    // Schritt 2: Verbindungs-Modus betreten
    bus.emit(
        topo.leaf0,
        EventMessage::new(EventPayload::StateChange {
            mode: EditMode::ManualConnectSpine,
        }),
    );
    // Schritt 3: Ziel-Punkt anklicken
    bus.emit(
        topo.leaf0,
        EventMessage::new(EventPayload::ManualConnectSpine { segment_point }),
    );

    assert_eq!(
        bus.document().backend.get_value("brightestIndex", spine),
        Some(segment_point as f64)
    );
    assert_eq!(
        bus.selection(topo.stack0)
            .expect("Stack 0 registriert")
            .state(),
        EditMode::Edit
    );

    // Schritt 4: Undo stellt den alten Wert wieder her
    bus.emit(topo.leaf1, EventMessage::new(EventPayload::Undo));

    assert_eq!(
        bus.document().backend.get_value("brightestIndex", spine),
        Some(-1.0)
    );
    assert!(bus.document().can_redo());
}

#[test]
fn test_map_origin_manual_connect_mode_requires_selection() {
    let (mut bus, topo) = two_stack_setup();
    let map_leaf = bus.add_leaf(topo.map, Box::new(neurostack_sync::NullHandler));

    bus.emit(
        map_leaf,
        EventMessage::new(EventPayload::StateChange {
            mode: EditMode::ManualConnectSpine,
        }),
    );

    // Der Map-Root prüft die Vorbedingung selbst; der illegale Modus
    // erreicht kein Fenster
    assert_eq!(
        bus.selection(topo.map).expect("Map registriert").state(),
        EditMode::Edit
    );
    assert_eq!(
        bus.selection(topo.stack0)
            .expect("Stack 0 registriert")
            .state(),
        EditMode::Edit
    );
    assert!(bus
        .document_mut()
        .take_status()
        .expect("Veto-Meldung erwartet")
        .contains("Spine-Selektion"));

    // Mit map-weiter Selektion ist der Übergang zulässig
    bus.emit(map_leaf, EventMessage::select_points(vec![7], 0));
    bus.emit(
        map_leaf,
        EventMessage::new(EventPayload::StateChange {
            mode: EditMode::ManualConnectSpine,
        }),
    );
    assert_eq!(
        bus.selection(topo.map).expect("Map registriert").state(),
        EditMode::ManualConnectSpine
    );
    assert_eq!(
        bus.selection(topo.map)
            .expect("Map registriert")
            .connect_source,
        Some(7)
    );
}

#[test]
fn test_keep_redo_policy_survives_new_edits() {
    let options = SyncOptions {
        clear_redo_on_edit: false,
        ..SyncOptions::default()
    };
    let mut bus = SignalBus::new(DocumentState::new(
        Box::new(AnnotationTable::new()),
        options,
    ));
    let root = bus.add_stack_root(0, None);
    let leaf = bus.add_leaf(root, Box::new(neurostack_sync::NullHandler));
    let segment = bus
        .document_mut()
        .backend
        .add_segment(0)
        .expect("Segment sollte anlegbar sein");
    bus.selection_mut(root)
        .expect("Root registriert")
        .set_segment_selection(Some(vec![segment]));

    bus.emit(
        leaf,
        EventMessage::new(EventPayload::Add {
            position: Vec3::ONE,
        }),
    );
    bus.emit(leaf, EventMessage::new(EventPayload::Undo));
    assert!(bus.document().can_redo());

    // Neuer Edit lässt den Redo-Stack mit dieser Policy stehen
    bus.emit(
        leaf,
        EventMessage::new(EventPayload::Add {
            position: Vec3::new(2.0, 2.0, 2.0),
        }),
    );
    assert!(bus.document().can_redo());
}

#[test]
fn test_max_history_depth_caps_undo_steps() {
    let options = SyncOptions {
        max_history_depth: Some(2),
        ..SyncOptions::default()
    };
    let mut bus = SignalBus::new(DocumentState::new(
        Box::new(AnnotationTable::new()),
        options,
    ));
    let root = bus.add_stack_root(0, None);
    let leaf = bus.add_leaf(root, Box::new(neurostack_sync::NullHandler));
    let segment = bus
        .document_mut()
        .backend
        .add_segment(0)
        .expect("Segment sollte anlegbar sein");
    bus.selection_mut(root)
        .expect("Root registriert")
        .set_segment_selection(Some(vec![segment]));

    bus.emit(
        leaf,
        EventMessage::new(EventPayload::Add {
            position: Vec3::ZERO,
        }),
    );
    let first = bus
        .selection(root)
        .expect("Root registriert")
        .first_point_selection()
        .expect("Erster Spine sollte selektiert sein");
    for x in 1..3 {
        bus.emit(
            leaf,
            EventMessage::new(EventPayload::Add {
                position: Vec3::new(x as f32, 0.0, 0.0),
            }),
        );
    }

    bus.emit(leaf, EventMessage::new(EventPayload::Undo));
    bus.emit(leaf, EventMessage::new(EventPayload::Undo));

    // Tiefe 2: der älteste Eintrag ist aus dem Log gefallen,
    // der erste Spine bleibt daher stehen
    assert!(!bus.document().can_undo());
    assert!(bus.document().backend.position_of(first).is_some());
    bus.emit(leaf, EventMessage::new(EventPayload::Undo));
    assert!(!bus.document().can_undo());
}
