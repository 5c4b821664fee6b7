//! # Scenecast Server
//! A server that keeps an authoritative model of a 3D scene and screen-space
//! widgets, streams every mutation to a browser viewer as batched JSON
//! commands, and routes the viewer's input events back to application
//! callbacks.

#![deny(
    trivial_casts,
    trivial_numeric_casts,
    unstable_features,
    unused_import_braces
)]

#[macro_use]
extern crate cfg_if;

pub mod transport;
pub mod shared {
    pub use scenecast_shared::{
        batch, BoxShape, Button, CapsuleShape, ClientMessage, Command, LineShape, MeshShape,
        ObjectKind, Plot, ProtocolError, SceneObject, Slider, SphereShape, Text, Texture,
        DEFAULT_LINE_COLOR, DEFAULT_OBJECT_COLOR,
    };
}

mod command_queue;
mod error;
mod events;
mod mesh;
mod render;
mod scene;
mod server;

pub use error::ScenecastServerError;
pub use events::listeners::{
    DragListener, KeyListener, Listener, ScreenResizeListener, SliderListener,
};
pub use mesh::{
    asset::{AssetMaterial, AssetMesh, AssetNode, AssetScene, TextureSource},
    flatten::{flatten, FlattenedMesh},
};
pub use render::snapshot::{
    BodySnapshot, BodyTrajectory, ShapeGeometry, ShapeSnapshot, SkeletonSnapshot, WorldSnapshot,
};
pub use server::{GuiServer, ServerConfig, ServingState};
