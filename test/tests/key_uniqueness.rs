//! PROPERTY-BASED TESTS: one key names at most one object
//!
//! Creating under an existing key replaces whatever was there, whatever its
//! kind. A freshly connected viewer is sent the scene, so the replay shows
//! exactly what the store holds.

use glam::{DVec3, IVec2};
use proptest::prelude::*;

use scenecast_server::{GuiServer, ServerConfig};
use scenecast_shared::Command;
use scenecast_test::{decode, serving_server, Sent};

#[derive(Clone, Copy, Debug)]
enum Kind {
    Box,
    Sphere,
    Capsule,
    Line,
    Texture,
    Text,
    Button,
    Slider,
    Plot,
}

impl Kind {
    fn create_opcode(&self) -> &'static str {
        match self {
            Kind::Box => "create_box",
            Kind::Sphere => "create_sphere",
            Kind::Capsule => "create_capsule",
            Kind::Line => "create_line",
            Kind::Texture => "create_texture",
            Kind::Text => "create_text",
            Kind::Button => "create_button",
            Kind::Slider => "create_slider",
            Kind::Plot => "create_plot",
        }
    }
}

fn kind_strategy() -> impl Strategy<Value = Kind> {
    prop_oneof![
        Just(Kind::Box),
        Just(Kind::Sphere),
        Just(Kind::Capsule),
        Just(Kind::Line),
        Just(Kind::Texture),
        Just(Kind::Text),
        Just(Kind::Button),
        Just(Kind::Slider),
        Just(Kind::Plot),
    ]
}

fn key_strategy() -> impl Strategy<Value = String> {
    prop_oneof![Just("a"), Just("b"), Just("c")].prop_map(str::to_string)
}

fn create(server: &GuiServer, kind: Kind, key: &str) {
    let v = DVec3::ONE;
    let corner = IVec2::new(10, 10);
    match kind {
        Kind::Box => {
            server.create_box(key, v, v, v, v, false, false);
        }
        Kind::Sphere => {
            server.create_sphere(key, 1.0, v, v, false, false);
        }
        Kind::Capsule => {
            server.create_capsule(key, 1.0, 2.0, v, v, v, false, false);
        }
        Kind::Line => {
            server.create_line(key, &[DVec3::ZERO, v], v);
        }
        Kind::Texture => {
            server.create_texture(key, "AAAA");
        }
        Kind::Text => {
            server.create_text(key, "hello", corner, corner);
        }
        Kind::Button => {
            server.create_button(key, "go", corner, corner, || {});
        }
        Kind::Slider => {
            server.create_slider(key, corner, corner, 0.0, 1.0, 0.5, false, true, |_| {});
        }
        Kind::Plot => {
            server.create_plot(key, corner, corner, &[0.0], 0.0, 1.0, &[0.0], 0.0, 1.0, "line");
        }
    }
}

fn replayed_creates(wire: &scenecast_test::LocalWire) -> Vec<Command> {
    wire.connect(1);
    wire.take_sent()
        .into_iter()
        .find_map(|sent| match sent {
            Sent::To(1, message) => Some(decode(&message)),
            _ => None,
        })
        .unwrap_or_default()
}

proptest! {
    /// The replay holds one create per key, of the most recently created kind
    #[test]
    fn prop_last_create_wins(
        creates in prop::collection::vec((kind_strategy(), key_strategy()), 1..30),
    ) {
        let (server, wire) = serving_server(ServerConfig::default());
        for (kind, key) in &creates {
            create(&server, *kind, key);
        }
        wire.take_sent();

        let replay = replayed_creates(&wire);

        let mut expected: Vec<(String, &'static str)> = Vec::new();
        for (kind, key) in &creates {
            expected.retain(|(known, _)| known != key);
            expected.push((key.clone(), kind.create_opcode()));
        }
        prop_assert_eq!(replay.len(), expected.len());
        for (key, opcode) in &expected {
            let matching: Vec<&Command> = replay
                .iter()
                .filter(|command| command.key() == Some(key.as_str()))
                .collect();
            prop_assert_eq!(matching.len(), 1);
            prop_assert_eq!(matching[0].opcode(), *opcode);
        }
    }
}

#[test]
fn sphere_replaces_box_under_same_key() {
    let (server, _wire) = serving_server(ServerConfig::default());
    server.create_box(
        "shared",
        DVec3::new(1.0, 2.0, 3.0),
        DVec3::X,
        DVec3::Y,
        DVec3::ONE,
        false,
        false,
    );
    server.create_sphere("shared", 0.5, DVec3::Z, DVec3::ONE, false, false);

    assert!(server.has_object("shared"));
    assert_eq!(server.get_object_position("shared"), DVec3::Z);
    assert_eq!(server.get_object_scale("shared"), DVec3::splat(0.5));
    // spheres have no orientation
    assert_eq!(server.get_object_rotation("shared"), DVec3::ZERO);
}
