use glam::{DVec2, DVec3, UVec3};
use serde::{Deserialize, Serialize};

use super::{DEFAULT_LINE_COLOR, DEFAULT_OBJECT_COLOR};

/// An axis-aligned box before rotation, centered on `pos`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxShape {
    pub key: String,
    pub size: DVec3,
    pub pos: DVec3,
    pub euler: DVec3,
    pub color: DVec3,
    pub cast_shadows: bool,
    pub receive_shadows: bool,
}

impl BoxShape {
    pub fn new(key: impl Into<String>, size: DVec3, pos: DVec3, euler: DVec3) -> Self {
        Self {
            key: key.into(),
            size,
            pos,
            euler,
            color: DEFAULT_OBJECT_COLOR,
            cast_shadows: false,
            receive_shadows: false,
        }
    }

    pub fn with_color(mut self, color: DVec3) -> Self {
        self.color = color;
        self
    }

    pub fn with_shadows(mut self, cast_shadows: bool, receive_shadows: bool) -> Self {
        self.cast_shadows = cast_shadows;
        self.receive_shadows = receive_shadows;
        self
    }
}

/// A sphere. Spheres carry no orientation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SphereShape {
    pub key: String,
    pub radius: f64,
    pub pos: DVec3,
    pub color: DVec3,
    pub cast_shadows: bool,
    pub receive_shadows: bool,
}

impl SphereShape {
    pub fn new(key: impl Into<String>, radius: f64, pos: DVec3) -> Self {
        Self {
            key: key.into(),
            radius,
            pos,
            color: DEFAULT_OBJECT_COLOR,
            cast_shadows: false,
            receive_shadows: false,
        }
    }

    pub fn with_color(mut self, color: DVec3) -> Self {
        self.color = color;
        self
    }

    pub fn with_shadows(mut self, cast_shadows: bool, receive_shadows: bool) -> Self {
        self.cast_shadows = cast_shadows;
        self.receive_shadows = receive_shadows;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapsuleShape {
    pub key: String,
    pub radius: f64,
    pub height: f64,
    pub pos: DVec3,
    pub euler: DVec3,
    pub color: DVec3,
    pub cast_shadows: bool,
    pub receive_shadows: bool,
}

impl CapsuleShape {
    pub fn new(key: impl Into<String>, radius: f64, height: f64, pos: DVec3, euler: DVec3) -> Self {
        Self {
            key: key.into(),
            radius,
            height,
            pos,
            euler,
            color: DEFAULT_OBJECT_COLOR,
            cast_shadows: false,
            receive_shadows: false,
        }
    }

    pub fn with_color(mut self, color: DVec3) -> Self {
        self.color = color;
        self
    }

    pub fn with_shadows(mut self, cast_shadows: bool, receive_shadows: bool) -> Self {
        self.cast_shadows = cast_shadows;
        self.receive_shadows = receive_shadows;
        self
    }
}

/// A polyline through world-space points. Lines have no transform of their
/// own; moving one means recreating it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineShape {
    pub key: String,
    pub points: Vec<DVec3>,
    pub color: DVec3,
}

impl LineShape {
    pub fn new(key: impl Into<String>, points: Vec<DVec3>) -> Self {
        Self {
            key: key.into(),
            points,
            color: DEFAULT_LINE_COLOR,
        }
    }

    pub fn with_color(mut self, color: DVec3) -> Self {
        self.color = color;
        self
    }
}

/// A triangle mesh in the flat layout the viewer consumes.
///
/// `textures[i]` applies from `texture_start_indices[i]` up to the next start
/// index (or the last face). Start indices count flat face indices, three per
/// triangle. An empty texture key marks a region drawn with `color` instead of
/// an image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshShape {
    pub key: String,
    pub vertices: Vec<DVec3>,
    pub vertex_normals: Vec<DVec3>,
    pub faces: Vec<UVec3>,
    pub uv: Vec<DVec2>,
    pub textures: Vec<String>,
    pub texture_start_indices: Vec<usize>,
    pub pos: DVec3,
    pub euler: DVec3,
    pub scale: DVec3,
    pub color: DVec3,
    pub cast_shadows: bool,
    pub receive_shadows: bool,
}

impl MeshShape {
    /// An empty, untransformed mesh under `key`
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            vertices: Vec::new(),
            vertex_normals: Vec::new(),
            faces: Vec::new(),
            uv: Vec::new(),
            textures: Vec::new(),
            texture_start_indices: Vec::new(),
            pos: DVec3::ZERO,
            euler: DVec3::ZERO,
            scale: DVec3::ONE,
            color: DEFAULT_OBJECT_COLOR,
            cast_shadows: false,
            receive_shadows: false,
        }
    }

    pub fn with_transform(mut self, pos: DVec3, euler: DVec3, scale: DVec3) -> Self {
        self.pos = pos;
        self.euler = euler;
        self.scale = scale;
        self
    }

    pub fn with_color(mut self, color: DVec3) -> Self {
        self.color = color;
        self
    }

    pub fn with_shadows(mut self, cast_shadows: bool, receive_shadows: bool) -> Self {
        self.cast_shadows = cast_shadows;
        self.receive_shadows = receive_shadows;
        self
    }
}

/// An image the viewer can map onto meshes, referenced by key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Texture {
    pub key: String,
    pub base64: String,
}

impl Texture {
    pub fn new(key: impl Into<String>, base64: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            base64: base64.into(),
        }
    }
}
