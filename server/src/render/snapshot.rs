use std::sync::Arc;

use glam::DVec3;

use scenecast_shared::ObjectKind;

use crate::mesh::asset::AssetScene;

/// Read-only view of a simulated world, taken once per frame
#[derive(Clone, Debug, Default)]
pub struct WorldSnapshot {
    pub skeletons: Vec<SkeletonSnapshot>,
}

#[derive(Clone, Debug, Default)]
pub struct SkeletonSnapshot {
    pub name: String,
    pub bodies: Vec<BodySnapshot>,
}

/// One rigid body. Positions and orientations are in world coordinates.
#[derive(Clone, Debug, Default)]
pub struct BodySnapshot {
    pub name: String,
    pub position: DVec3,
    pub euler: DVec3,
    pub shapes: Vec<ShapeSnapshot>,
    /// Net external force currently applied to the body
    pub external_force: DVec3,
    /// World-space vertices of the body's collision geometry
    pub vertices: Vec<DVec3>,
    /// Velocity of each entry in `vertices`
    pub vertex_velocities: Vec<DVec3>,
}

#[derive(Clone, Debug)]
pub struct ShapeSnapshot {
    pub name: String,
    pub geometry: ShapeGeometry,
    pub position: DVec3,
    pub euler: DVec3,
    pub color: DVec3,
}

#[derive(Clone, Debug)]
pub enum ShapeGeometry {
    Box { size: DVec3 },
    Sphere { radius: f64 },
    Capsule { radius: f64, height: f64 },
    Mesh { asset: Arc<AssetScene>, scale: DVec3 },
}

impl ShapeGeometry {
    /// The kind of scene object this geometry is rendered as
    pub(crate) fn kind(&self) -> ObjectKind {
        match self {
            ShapeGeometry::Box { .. } => ObjectKind::Box,
            ShapeGeometry::Sphere { .. } => ObjectKind::Sphere,
            ShapeGeometry::Capsule { .. } => ObjectKind::Capsule,
            ShapeGeometry::Mesh { .. } => ObjectKind::Mesh,
        }
    }

    /// The value `get_object_scale` reports for this geometry
    pub(crate) fn scale(&self) -> DVec3 {
        match self {
            ShapeGeometry::Box { size } => *size,
            ShapeGeometry::Sphere { radius } => DVec3::splat(*radius),
            ShapeGeometry::Capsule { radius, height } => DVec3::new(*radius, *radius, *height),
            ShapeGeometry::Mesh { scale, .. } => *scale,
        }
    }

    pub(crate) fn has_orientation(&self) -> bool {
        !matches!(self, ShapeGeometry::Sphere { .. })
    }
}

/// The path one body followed, in world coordinates
#[derive(Clone, Debug, Default)]
pub struct BodyTrajectory {
    pub body: String,
    pub points: Vec<DVec3>,
}
