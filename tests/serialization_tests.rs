// Check that snapshots and placement data survive a trip through serde
#![cfg(feature = "serde")]
use casement::{
    pure::{LayoutKind, MembershipState, Snapshot},
    rules::{Decoration, PlacementSpec, Rule},
    sys::WindowEvent,
    Engine, Handle,
};
use std::time::Instant;

mod common;

use common::{config, window, RecordingWindowSystem};

#[test]
fn snapshots_can_be_restored_from_json() {
    let config = config(
        3,
        [Rule::builder()
            .class_name("^Vim$")
            .placement(PlacementSpec::on(1).titlebar(Decoration::Hidden))
            .placement(PlacementSpec::on(2).floating())],
    );
    let sys = RecordingWindowSystem::new();
    sys.add(window(1, "Vim", "notes.md"));
    let mut engine = Engine::new(&config, sys).unwrap();
    engine
        .handle_event(WindowEvent::Created(Handle::from(1)), Instant::now())
        .unwrap();
    engine.set_layout(2, LayoutKind::FullScreen).unwrap();

    let snap = engine.snapshot();
    let json = serde_json::to_string(&snap).unwrap();
    let restored: Snapshot = serde_json::from_str(&json).unwrap();

    assert_eq!(restored, snap);
    let ws = restored.workspace(2).unwrap();
    assert_eq!(ws.layout, LayoutKind::FullScreen);
    assert_eq!(ws.layout_name, "Full Screen");
    assert_eq!(
        ws.in_state(MembershipState::Visible).collect::<Vec<_>>(),
        vec![Handle::from(1)]
    );
}

#[test]
fn window_events_use_externally_tagged_variants() {
    let event = WindowEvent::Destroyed(Handle::from(0x2a));

    let json = serde_json::to_string(&event).unwrap();

    assert_eq!(json, r#"{"Destroyed":42}"#);
    assert_eq!(serde_json::from_str::<WindowEvent>(&json).unwrap(), event);
}
