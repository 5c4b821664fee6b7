use glam::DVec3;

use crate::{
    command::Command,
    object::{
        shapes::{BoxShape, CapsuleShape, LineShape, MeshShape, SphereShape, Texture},
        ui::{Button, Plot, Slider, Text},
    },
};

/// The kind tag of a [`SceneObject`].
///
/// Variants are declared in replay order: textures must reach the viewer
/// before the meshes that reference them, and 3-D objects go before
/// screen-space UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ObjectKind {
    Texture,
    Box,
    Sphere,
    Capsule,
    Line,
    Mesh,
    Text,
    Button,
    Slider,
    Plot,
}

impl ObjectKind {
    pub fn is_ui_element(&self) -> bool {
        matches!(
            self,
            ObjectKind::Text | ObjectKind::Button | ObjectKind::Slider | ObjectKind::Plot
        )
    }
}

/// Any object addressable by key, 3-D or screen-space
#[derive(Debug, Clone, PartialEq)]
pub enum SceneObject {
    Box(BoxShape),
    Sphere(SphereShape),
    Capsule(CapsuleShape),
    Line(LineShape),
    Mesh(MeshShape),
    Texture(Texture),
    Text(Text),
    Button(Button),
    Slider(Slider),
    Plot(Plot),
}

impl SceneObject {
    pub fn kind(&self) -> ObjectKind {
        match self {
            SceneObject::Box(_) => ObjectKind::Box,
            SceneObject::Sphere(_) => ObjectKind::Sphere,
            SceneObject::Capsule(_) => ObjectKind::Capsule,
            SceneObject::Line(_) => ObjectKind::Line,
            SceneObject::Mesh(_) => ObjectKind::Mesh,
            SceneObject::Texture(_) => ObjectKind::Texture,
            SceneObject::Text(_) => ObjectKind::Text,
            SceneObject::Button(_) => ObjectKind::Button,
            SceneObject::Slider(_) => ObjectKind::Slider,
            SceneObject::Plot(_) => ObjectKind::Plot,
        }
    }

    pub fn key(&self) -> &str {
        match self {
            SceneObject::Box(inner) => &inner.key,
            SceneObject::Sphere(inner) => &inner.key,
            SceneObject::Capsule(inner) => &inner.key,
            SceneObject::Line(inner) => &inner.key,
            SceneObject::Mesh(inner) => &inner.key,
            SceneObject::Texture(inner) => &inner.key,
            SceneObject::Text(inner) => &inner.key,
            SceneObject::Button(inner) => &inner.key,
            SceneObject::Slider(inner) => &inner.key,
            SceneObject::Plot(inner) => &inner.key,
        }
    }

    pub fn is_ui_element(&self) -> bool {
        self.kind().is_ui_element()
    }

    /// The command that recreates this object from scratch on the viewer
    pub fn create_command(&self) -> Command {
        match self {
            SceneObject::Box(inner) => Command::CreateBox(inner.clone()),
            SceneObject::Sphere(inner) => Command::CreateSphere(inner.clone()),
            SceneObject::Capsule(inner) => Command::CreateCapsule(inner.clone()),
            SceneObject::Line(inner) => Command::CreateLine(inner.clone()),
            SceneObject::Mesh(inner) => Command::CreateMesh(inner.clone()),
            SceneObject::Texture(inner) => Command::CreateTexture(inner.clone()),
            SceneObject::Text(inner) => Command::CreateText(inner.clone()),
            SceneObject::Button(inner) => Command::CreateButton(inner.clone()),
            SceneObject::Slider(inner) => Command::CreateSlider(inner.clone()),
            SceneObject::Plot(inner) => Command::CreatePlot(inner.clone()),
        }
    }

    /// The command that removes this object from the viewer
    pub fn delete_command(&self) -> Command {
        let key = self.key().to_string();
        if self.is_ui_element() {
            Command::DeleteUiElem { key }
        } else {
            Command::DeleteObject { key }
        }
    }

    // Generic 3-D accessors. `None` means this kind has no such field.

    pub fn position(&self) -> Option<DVec3> {
        match self {
            SceneObject::Box(inner) => Some(inner.pos),
            SceneObject::Sphere(inner) => Some(inner.pos),
            SceneObject::Capsule(inner) => Some(inner.pos),
            SceneObject::Mesh(inner) => Some(inner.pos),
            _ => None,
        }
    }

    pub fn rotation(&self) -> Option<DVec3> {
        match self {
            SceneObject::Box(inner) => Some(inner.euler),
            SceneObject::Capsule(inner) => Some(inner.euler),
            SceneObject::Mesh(inner) => Some(inner.euler),
            _ => None,
        }
    }

    pub fn color(&self) -> Option<DVec3> {
        match self {
            SceneObject::Box(inner) => Some(inner.color),
            SceneObject::Sphere(inner) => Some(inner.color),
            SceneObject::Capsule(inner) => Some(inner.color),
            SceneObject::Line(inner) => Some(inner.color),
            SceneObject::Mesh(inner) => Some(inner.color),
            _ => None,
        }
    }

    /// Box size, mesh scale, `[r, r, r]` for a sphere and `[r, r, h]` for a
    /// capsule. Lines are degenerate and report zero.
    pub fn scale(&self) -> Option<DVec3> {
        match self {
            SceneObject::Box(inner) => Some(inner.size),
            SceneObject::Sphere(inner) => Some(DVec3::splat(inner.radius)),
            SceneObject::Capsule(inner) => {
                Some(DVec3::new(inner.radius, inner.radius, inner.height))
            }
            SceneObject::Line(_) => Some(DVec3::ZERO),
            SceneObject::Mesh(inner) => Some(inner.scale),
            _ => None,
        }
    }

    /// Returns whether the field exists on this kind (and was written)
    pub fn set_position(&mut self, pos: DVec3) -> bool {
        match self {
            SceneObject::Box(inner) => inner.pos = pos,
            SceneObject::Sphere(inner) => inner.pos = pos,
            SceneObject::Capsule(inner) => inner.pos = pos,
            SceneObject::Mesh(inner) => inner.pos = pos,
            _ => return false,
        }
        true
    }

    pub fn set_rotation(&mut self, euler: DVec3) -> bool {
        match self {
            SceneObject::Box(inner) => inner.euler = euler,
            SceneObject::Capsule(inner) => inner.euler = euler,
            SceneObject::Mesh(inner) => inner.euler = euler,
            _ => return false,
        }
        true
    }

    pub fn set_color(&mut self, color: DVec3) -> bool {
        match self {
            SceneObject::Box(inner) => inner.color = color,
            SceneObject::Sphere(inner) => inner.color = color,
            SceneObject::Capsule(inner) => inner.color = color,
            SceneObject::Line(inner) => inner.color = color,
            SceneObject::Mesh(inner) => inner.color = color,
            _ => return false,
        }
        true
    }

    /// Inverse of [`SceneObject::scale`]. Lines ignore scale.
    pub fn set_scale(&mut self, scale: DVec3) -> bool {
        match self {
            SceneObject::Box(inner) => inner.size = scale,
            SceneObject::Sphere(inner) => inner.radius = scale.x,
            SceneObject::Capsule(inner) => {
                inner.radius = scale.x;
                inner.height = scale.z;
            }
            SceneObject::Mesh(inner) => inner.scale = scale,
            _ => return false,
        }
        true
    }
}
