//! # Scenecast Shared
//! The wire protocol spoken between the scenecast server and its browser
//! viewer: the scene object model, the outbound commands that mutate the
//! viewer, and the inbound messages the viewer reports back.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

mod client_message;
mod command;
mod error;
mod object;

pub use client_message::ClientMessage;
pub use command::{batch, Command};
pub use error::ProtocolError;
pub use object::{
    scene_object::{ObjectKind, SceneObject},
    shapes::{BoxShape, CapsuleShape, LineShape, MeshShape, SphereShape, Texture},
    ui::{Button, Plot, Slider, Text},
    DEFAULT_LINE_COLOR, DEFAULT_OBJECT_COLOR,
};

pub use glam::{DVec2, DVec3, IVec2, UVec3};
