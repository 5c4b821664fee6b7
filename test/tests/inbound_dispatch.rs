//! Viewer input is parsed, applied to server state, and routed to the
//! matching callbacks

use std::sync::{Arc, Mutex};

use glam::{DVec3, IVec2};

use scenecast_server::ServerConfig;
use scenecast_test::{opcodes, serving_server};

#[test]
fn key_events_track_keys_down() {
    let (server, wire) = serving_server(ServerConfig::default());
    let released = Arc::new(Mutex::new(Vec::new()));
    let sink = released.clone();
    server.register_keyup_listener(move |key| sink.lock().unwrap().push(key.to_string()));

    wire.send(1, r#"{"type":"keydown","key":"a"}"#);
    wire.send(1, r#"{"type":"keydown","key":"Shift"}"#);
    assert_eq!(server.get_keys_down().len(), 2);

    wire.send(1, r#"{"type":"keyup","key":"a"}"#);
    assert!(!server.is_key_down("a"));
    assert!(server.is_key_down("Shift"));
    assert_eq!(*released.lock().unwrap(), vec!["a"]);
}

#[test]
fn drag_updates_position_without_echoing_a_command() {
    let (server, wire) = serving_server(ServerConfig::default());
    let dragged_to = Arc::new(Mutex::new(None));
    let unit = DVec3::ONE;
    server.create_box("crate", unit, DVec3::ZERO, DVec3::ZERO, unit, false, false);

    let sink = dragged_to.clone();
    server.register_drag_listener("crate", move |pos| *sink.lock().unwrap() = Some(pos));
    let sent = wire.take_broadcasts();
    assert_eq!(opcodes(sent.last().unwrap()), vec!["enable_mouse"]);

    wire.send(1, r#"{"type":"drag","key":"crate","pos":[4.0,5.0,6.0]}"#);

    assert_eq!(*dragged_to.lock().unwrap(), Some(DVec3::new(4.0, 5.0, 6.0)));
    assert_eq!(server.get_object_position("crate"), DVec3::new(4.0, 5.0, 6.0));
    assert!(wire.take_sent().is_empty());
}

#[test]
fn drag_listeners_fire_in_registration_order() {
    let (server, wire) = serving_server(ServerConfig::default());
    let order = Arc::new(Mutex::new(Vec::new()));
    for id in 0..3 {
        let order = order.clone();
        server.register_drag_listener("handle", move |_| order.lock().unwrap().push(id));
    }

    // listeners on a key with no object still fire
    wire.send(1, r#"{"type":"drag","key":"handle","pos":[0.0,0.0,0.0]}"#);
    assert_eq!(*order.lock().unwrap(), vec![0, 1, 2]);
}

#[test]
fn screen_resize_is_recorded_and_reported() {
    let (server, wire) = serving_server(ServerConfig::default());
    let sizes = Arc::new(Mutex::new(Vec::new()));
    let sink = sizes.clone();
    server.register_screen_resize_listener(move |size| sink.lock().unwrap().push(size));

    wire.send(1, r#"{"type":"screen_resize","size":[1280,720]}"#);

    assert_eq!(server.get_screen_size(), IVec2::new(1280, 720));
    assert_eq!(*sizes.lock().unwrap(), vec![IVec2::new(1280, 720)]);
}

#[test]
fn button_click_runs_its_callback() {
    let (server, wire) = serving_server(ServerConfig::default());
    let clicks = Arc::new(Mutex::new(0));
    let counter = clicks.clone();
    server.create_button("go", "Go", IVec2::ZERO, IVec2::new(80, 20), move || {
        *counter.lock().unwrap() += 1
    });

    wire.send(1, r#"{"type":"button_click","key":"go"}"#);
    wire.send(1, r#"{"type":"button_click","key":"other"}"#);
    assert_eq!(*clicks.lock().unwrap(), 1);

    server.delete_ui_element("go");
    wire.send(1, r#"{"type":"button_click","key":"go"}"#);
    assert_eq!(*clicks.lock().unwrap(), 1);
}

#[test]
fn slider_change_records_value_then_runs_callback() {
    let (server, wire) = serving_server(ServerConfig::default());
    let values = Arc::new(Mutex::new(Vec::new()));
    let sink = values.clone();
    server.create_slider(
        "gain",
        IVec2::ZERO,
        IVec2::new(200, 20),
        0.0,
        10.0,
        1.0,
        false,
        true,
        move |value| sink.lock().unwrap().push(value),
    );
    wire.take_sent();

    wire.send(1, r#"{"type":"slider_set_value","key":"gain","value":7.5}"#);

    assert_eq!(*values.lock().unwrap(), vec![7.5]);
    assert!(wire.take_sent().is_empty());

    // the stored value is what a newly connected viewer sees
    wire.connect(2);
    let replay = match wire.take_sent().remove(0) {
        scenecast_test::Sent::To(2, message) => message,
        other => panic!("expected a replay, got {other:?}"),
    };
    assert!(replay.contains("\"value\":7.5"), "{replay}");
}

#[test]
fn malformed_messages_are_dropped() {
    let (server, wire) = serving_server(ServerConfig::default());
    let keys = Arc::new(Mutex::new(0));
    let counter = keys.clone();
    server.register_keydown_listener(move |_| *counter.lock().unwrap() += 1);

    wire.send(1, "not json");
    wire.send(1, r#"{"type":"teleport","key":"a"}"#);
    wire.send(1, r#"{"type":"keydown"}"#);
    wire.send(1, r#"{"type":"drag","key":"a","pos":[1.0]}"#);
    wire.send(1, r#"{"type":"keydown","key":"ok"}"#);

    assert_eq!(*keys.lock().unwrap(), 1);
    assert!(server.is_key_down("ok"));
    assert!(server.is_serving());
}

#[test]
fn clear_forgets_listeners_but_keeps_connection_listeners() {
    let (server, wire) = serving_server(ServerConfig::default());
    let events = Arc::new(Mutex::new(Vec::new()));

    let sink = events.clone();
    server.register_connection_listener(move || sink.lock().unwrap().push("connect"));
    let sink = events.clone();
    server.register_keydown_listener(move |_| sink.lock().unwrap().push("keydown"));
    let unit = DVec3::ONE;
    server.create_box("b", unit, DVec3::ZERO, DVec3::ZERO, unit, false, false);
    wire.send(1, r#"{"type":"keydown","key":"a"}"#);
    wire.take_sent();

    server.clear();
    let messages = wire.take_broadcasts();
    assert_eq!(opcodes(&messages[0]), vec!["clear_all"]);
    assert!(!server.has_object("b"));
    assert!(server.get_keys_down().is_empty());

    wire.send(1, r#"{"type":"keydown","key":"a"}"#);
    wire.connect(2);
    assert_eq!(*events.lock().unwrap(), vec!["keydown", "connect"]);
}
