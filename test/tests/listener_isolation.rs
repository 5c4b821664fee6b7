//! A panicking listener is logged and skipped; the listeners after it still
//! run and the server keeps working

use std::sync::{Arc, Mutex};

use glam::DVec3;

use scenecast_server::ServerConfig;
use scenecast_test::serving_server;

#[test]
fn failing_keydown_listener_does_not_stop_the_rest() {
    let (server, wire) = serving_server(ServerConfig::default());
    let seen = Arc::new(Mutex::new(Vec::new()));

    server.register_keydown_listener(|_key| panic!("listener one fails"));
    for id in [2, 3] {
        let seen = seen.clone();
        server.register_keydown_listener(move |key| {
            seen.lock().unwrap().push(format!("{id}:{key}"));
        });
    }

    wire.send(1, r#"{"type":"keydown","key":"w"}"#);

    assert_eq!(*seen.lock().unwrap(), vec!["2:w", "3:w"]);
    assert!(server.is_key_down("w"));
}

#[test]
fn failing_connection_listener_does_not_stop_the_rest() {
    let (server, wire) = serving_server(ServerConfig::default());
    let connections = Arc::new(Mutex::new(0));

    server.register_connection_listener(|| panic!("first connection listener fails"));
    let counter = connections.clone();
    server.register_connection_listener(move || *counter.lock().unwrap() += 1);

    wire.connect(1);
    wire.connect(2);

    assert_eq!(*connections.lock().unwrap(), 2);
}

#[test]
fn server_state_survives_a_panicking_drag_listener() {
    let (server, wire) = serving_server(ServerConfig::default());
    server.create_sphere("ball", 1.0, DVec3::ZERO, DVec3::ONE, false, false);
    server.register_drag_listener("ball", |_pos| panic!("drag listener fails"));

    wire.send(1, r#"{"type":"drag","key":"ball","pos":[1.0,2.0,3.0]}"#);

    assert_eq!(server.get_object_position("ball"), DVec3::new(1.0, 2.0, 3.0));
    // the scene lock is free again
    server.set_object_position("ball", DVec3::ZERO);
    assert_eq!(server.get_object_position("ball"), DVec3::ZERO);
}
