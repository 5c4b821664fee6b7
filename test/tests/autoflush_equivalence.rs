//! PROPERTY-BASED TESTS: autoflush only changes how commands are grouped
//!
//! For the same calls, the per-command messages sent with autoflush on
//! concatenate to exactly the single message flushed with autoflush off.

use glam::{DVec3, IVec2};
use proptest::prelude::*;

use scenecast_server::{GuiServer, ServerConfig};
use scenecast_test::{buffered_config, decode, flatten_messages, serving_server};

#[derive(Clone, Debug)]
enum Op {
    CreateBox(String, f64),
    CreateSlider(String, f64),
    SetPosition(String, f64),
    SetColor(String, f64),
    SetSliderValue(String, f64),
    Delete(String),
    DeletePrefix(String),
    Drag(String),
}

fn key_strategy() -> impl Strategy<Value = String> {
    prop_oneof![Just("w/a"), Just("w/b"), Just("ui/c")].prop_map(str::to_string)
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (key_strategy(), -10.0..10.0f64).prop_map(|(k, x)| Op::CreateBox(k, x)),
        (key_strategy(), 0.0..1.0f64).prop_map(|(k, x)| Op::CreateSlider(k, x)),
        (key_strategy(), -10.0..10.0f64).prop_map(|(k, x)| Op::SetPosition(k, x)),
        (key_strategy(), 0.0..1.0f64).prop_map(|(k, x)| Op::SetColor(k, x)),
        (key_strategy(), 0.0..1.0f64).prop_map(|(k, x)| Op::SetSliderValue(k, x)),
        key_strategy().prop_map(Op::Delete),
        prop_oneof![Just("w/"), Just("ui/")].prop_map(|p| Op::DeletePrefix(p.to_string())),
        key_strategy().prop_map(Op::Drag),
    ]
}

fn run(server: &GuiServer, ops: &[Op]) {
    for op in ops {
        match op {
            Op::CreateBox(key, x) => {
                let pos = DVec3::splat(*x);
                server.create_box(key, DVec3::ONE, pos, DVec3::ZERO, DVec3::ONE, false, false);
            }
            Op::CreateSlider(key, x) => {
                let (corner, size) = (IVec2::ZERO, IVec2::ONE);
                server.create_slider(key, corner, size, 0.0, 1.0, *x, false, true, |_| {});
            }
            Op::SetPosition(key, x) => {
                server.set_object_position(key, DVec3::splat(*x));
            }
            Op::SetColor(key, x) => {
                server.set_object_color(key, DVec3::splat(*x));
            }
            Op::SetSliderValue(key, x) => {
                server.set_slider_value(key, *x);
            }
            Op::Delete(key) => {
                server.delete_object(key);
            }
            Op::DeletePrefix(prefix) => {
                server.delete_objects_by_prefix(prefix);
            }
            Op::Drag(key) => {
                server.register_drag_listener(key, |_| {});
            }
        }
    }
}

proptest! {
    #[test]
    fn prop_autoflush_concatenates_to_flushed_batch(
        ops in prop::collection::vec(op_strategy(), 0..40),
    ) {
        let (eager, eager_wire) = serving_server(ServerConfig::default());
        run(&eager, &ops);
        let eager_messages = eager_wire.take_broadcasts();
        for message in &eager_messages {
            prop_assert_eq!(decode(message).len(), 1);
        }

        let (buffered, buffered_wire) = serving_server(buffered_config());
        run(&buffered, &ops);
        buffered.flush();
        let buffered_messages = buffered_wire.take_broadcasts();

        if eager_messages.is_empty() {
            prop_assert!(buffered_messages.is_empty());
        } else {
            prop_assert_eq!(buffered_messages.len(), 1);
        }
        prop_assert_eq!(flatten_messages(&eager_messages), flatten_messages(&buffered_messages));
    }
}
