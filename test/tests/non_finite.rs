//! Plot series never put NaN or infinity on the wire

use glam::IVec2;

use scenecast_server::ServerConfig;
use scenecast_test::serving_server;

#[test]
fn create_plot_coerces_non_finite_samples() {
    let (server, wire) = serving_server(ServerConfig::default());

    server.create_plot(
        "p",
        IVec2::ZERO,
        IVec2::new(300, 200),
        &[1.0, f64::NAN, 3.0],
        0.0,
        3.0,
        &[2.0, f64::INFINITY, f64::NEG_INFINITY, 4.5],
        0.0,
        5.0,
        "line",
    );

    let messages = wire.take_broadcasts();
    assert_eq!(messages.len(), 1);
    assert!(messages[0].contains("\"xs\":[1.0,0.0,3.0]"), "{}", messages[0]);
    assert!(messages[0].contains("\"ys\":[2.0,0.0,0.0,4.5]"), "{}", messages[0]);
    serde_json::from_str::<serde_json::Value>(&messages[0]).expect("message stays valid JSON");
}

#[test]
fn set_plot_data_coerces_non_finite_samples() {
    let (server, wire) = serving_server(ServerConfig::default());
    let (xs, ys) = ([0.5, f64::NAN], [f64::NEG_INFINITY, 0.25]);
    server.create_plot("p", IVec2::ZERO, IVec2::ONE, &[], 0.0, 1.0, &[], 0.0, 1.0, "scatter");
    wire.take_sent();

    server.set_plot_data("p", &xs, 0.0, 1.0, &ys, 0.0, 1.0);

    let messages = wire.take_broadcasts();
    assert!(messages[0].contains("\"type\":\"set_plot_data\""));
    assert!(messages[0].contains("\"xs\":[0.5,0.0]"), "{}", messages[0]);
    assert!(messages[0].contains("\"ys\":[0.0,0.25]"), "{}", messages[0]);
}
