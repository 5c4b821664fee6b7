//! A viewer that connects is sent the current scene, addressed to it alone

use std::sync::{Arc, Mutex};

use glam::{DVec3, IVec2};

use scenecast_server::ServerConfig;
use scenecast_test::{keys, opcodes, serving_server, Sent};

#[test]
fn replay_orders_textures_objects_ui_then_mouse_flags() {
    let (server, wire) = serving_server(ServerConfig::default());
    server
        .create_text("b-label", "hi", IVec2::ZERO, IVec2::ONE)
        .create_sphere("z-ball", 1.0, DVec3::ZERO, DVec3::ONE, false, false)
        .create_texture("tex", "AAAA")
        .create_line("a-line", &[DVec3::ZERO, DVec3::ONE], DVec3::ONE)
        .register_drag_listener("z-ball", |_| {});
    wire.take_sent();

    wire.connect(7);

    let sent = wire.take_sent();
    assert_eq!(sent.len(), 1);
    let message = match &sent[0] {
        Sent::To(7, message) => message,
        other => panic!("replay should be addressed to the new viewer, got {other:?}"),
    };
    assert_eq!(
        opcodes(message),
        vec![
            "create_texture",
            "create_line",
            "create_sphere",
            "create_text",
            "enable_mouse"
        ]
    );
    assert_eq!(keys(message), vec!["tex", "a-line", "z-ball", "b-label", "z-ball"]);
}

#[test]
fn replay_reflects_current_state() {
    let (server, wire) = serving_server(ServerConfig::default());
    server.create_sphere("s", 1.0, DVec3::ZERO, DVec3::ONE, false, false);
    server.set_object_position("s", DVec3::new(9.0, 8.0, 7.0));
    wire.take_sent();

    wire.connect(1);

    match wire.take_sent().remove(0) {
        Sent::To(1, message) => {
            assert_eq!(opcodes(&message), vec!["create_sphere"]);
            assert!(message.contains("\"pos\":[9.0,8.0,7.0]"), "{message}");
        }
        other => panic!("expected a replay, got {other:?}"),
    }
}

#[test]
fn empty_scene_sends_no_replay() {
    let (_server, wire) = serving_server(ServerConfig::default());
    wire.connect(1);
    assert!(wire.take_sent().is_empty());
}

#[test]
fn replay_can_be_disabled() {
    let (server, wire) = serving_server(ServerConfig {
        replay_on_connect: false,
        ..ServerConfig::default()
    });
    server.create_sphere("s", 1.0, DVec3::ZERO, DVec3::ONE, false, false);
    wire.take_sent();

    wire.connect(1);
    assert!(wire.take_sent().is_empty());
}

#[test]
fn connection_listeners_run_after_the_replay() {
    let (server, wire) = serving_server(ServerConfig::default());
    server.create_sphere("s", 1.0, DVec3::ZERO, DVec3::ONE, false, false);
    let greeted = Arc::new(Mutex::new(false));

    let greeter = server.clone();
    let flag = greeted.clone();
    server.register_connection_listener(move || {
        greeter.create_text("welcome", "hello", IVec2::ZERO, IVec2::new(100, 20));
        *flag.lock().unwrap() = true;
    });
    wire.take_sent();

    wire.connect(4);

    assert!(*greeted.lock().unwrap());
    let sent = wire.take_sent();
    assert_eq!(sent.len(), 2);
    assert!(matches!(&sent[0], Sent::To(4, _)));
    match &sent[1] {
        Sent::Broadcast(message) => assert_eq!(opcodes(message), vec!["create_text"]),
        other => panic!("expected a broadcast, got {other:?}"),
    }
}
