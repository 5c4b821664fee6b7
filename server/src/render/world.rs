use glam::{DMat3, DVec3, EulerRot};

use scenecast_shared::DEFAULT_LINE_COLOR;

use super::snapshot::{
    BodySnapshot, BodyTrajectory, ShapeGeometry, SkeletonSnapshot, WorldSnapshot,
};
use crate::GuiServer;

/// Length of a force line per unit of force, when drawing magnitudes
const FORCE_LINE_SCALE: f64 = 0.001;
/// Length of every force line, when magnitudes are not drawn
const NORMALIZED_FORCE_LINE_LENGTH: f64 = 0.1;

const NEGLIGIBLE_FORCE: f64 = 1e-9;
const FORCE_COLOR: DVec3 = DVec3::new(1.0, 0.0, 0.0);
const TORQUE_COLOR: DVec3 = DVec3::new(0.0, 0.0, 1.0);

// These helpers only call the public mutators, so each one locks the scene
// per call and never holds it across a whole frame.
impl GuiServer {
    /// Creates or updates every shape of every skeleton in `world`. With
    /// `render_forces` each body gets a line along its external force, whose
    /// length is proportional to the force with `render_force_magnitudes`
    /// and fixed without.
    pub fn render_world(
        &self,
        world: &WorldSnapshot,
        prefix: &str,
        render_forces: bool,
        render_force_magnitudes: bool,
    ) -> &Self {
        for skeleton in &world.skeletons {
            self.render_skeleton(skeleton, prefix, None);

            if !render_forces {
                continue;
            }
            for body in &skeleton.bodies {
                let key = format!("{}.forces.{}.{}", prefix, skeleton.name, body.name);
                let force = body.external_force;
                if force.length() < NEGLIGIBLE_FORCE {
                    self.delete_object(&key);
                    continue;
                }
                let tip = if render_force_magnitudes {
                    force * FORCE_LINE_SCALE
                } else {
                    force.normalize() * NORMALIZED_FORCE_LINE_LENGTH
                };
                self.create_line(&key, &[body.position, body.position + tip], FORCE_COLOR);
            }
        }
        self
    }

    /// Creates each shape of `skeleton` under
    /// `"{prefix}.{skeleton}.{body}.{shape}"`, or, when an object of the same
    /// kind already exists there, sends only the fields that changed
    pub fn render_skeleton(
        &self,
        skeleton: &SkeletonSnapshot,
        prefix: &str,
        override_color: Option<DVec3>,
    ) -> &Self {
        for body in &skeleton.bodies {
            for shape in &body.shapes {
                let key = format!(
                    "{}.{}.{}.{}",
                    prefix, skeleton.name, body.name, shape.name
                );
                let color = override_color.unwrap_or(shape.color);

                if self.get_object_kind(&key) != Some(shape.geometry.kind()) {
                    match &shape.geometry {
                        ShapeGeometry::Box { size } => {
                            self.create_box(
                                &key,
                                *size,
                                shape.position,
                                shape.euler,
                                color,
                                false,
                                false,
                            );
                        }
                        ShapeGeometry::Sphere { radius } => {
                            self.create_sphere(
                                &key,
                                *radius,
                                shape.position,
                                color,
                                false,
                                false,
                            );
                        }
                        ShapeGeometry::Capsule { radius, height } => {
                            self.create_capsule(
                                &key,
                                *radius,
                                *height,
                                shape.position,
                                shape.euler,
                                color,
                                false,
                                false,
                            );
                        }
                        ShapeGeometry::Mesh { asset, scale } => {
                            self.create_mesh_from_asset(
                                &key,
                                asset,
                                shape.position,
                                shape.euler,
                                *scale,
                                color,
                                false,
                                false,
                            );
                        }
                    }
                    continue;
                }

                if self.get_object_position(&key) != shape.position {
                    self.set_object_position(&key, shape.position);
                }
                if shape.geometry.has_orientation()
                    && self.get_object_rotation(&key) != shape.euler
                {
                    self.set_object_rotation(&key, shape.euler);
                }
                if self.get_object_color(&key) != color {
                    self.set_object_color(&key, color);
                }
                let scale = shape.geometry.scale();
                if self.get_object_scale(&key) != scale {
                    self.set_object_scale(&key, scale);
                }
            }
        }
        self
    }

    /// Draws three axis lines of length `scale` at `pos`, rotated by
    /// `euler`: x red, y green, z blue
    pub fn render_basis(&self, scale: f64, prefix: &str, pos: DVec3, euler: DVec3) -> &Self {
        let rotation = DMat3::from_euler(EulerRot::XYZ, euler.x, euler.y, euler.z);
        let axes = [
            ("x", DVec3::X, DVec3::new(1.0, 0.0, 0.0)),
            ("y", DVec3::Y, DVec3::new(0.0, 1.0, 0.0)),
            ("z", DVec3::Z, DVec3::new(0.0, 0.0, 1.0)),
        ];
        for (axis, direction, color) in axes {
            let tip = pos + rotation * direction * scale;
            self.create_line(&format!("{}.{}", prefix, axis), &[pos, tip], color);
        }
        self
    }

    /// One line per body, through every point of its trajectory
    pub fn render_trajectory_lines(
        &self,
        trajectories: &[BodyTrajectory],
        prefix: &str,
    ) -> &Self {
        for trajectory in trajectories {
            self.create_line(
                &format!("{}.{}", prefix, trajectory.body),
                &trajectory.points,
                DEFAULT_LINE_COLOR,
            );
        }
        self
    }

    /// Draws `wrench` (torque then force) as two lines from the body,
    /// scaled by `scale`
    pub fn render_body_wrench(
        &self,
        body: &BodySnapshot,
        wrench: [f64; 6],
        scale: f64,
        prefix: &str,
    ) -> &Self {
        let torque = DVec3::new(wrench[0], wrench[1], wrench[2]);
        let force = DVec3::new(wrench[3], wrench[4], wrench[5]);
        let origin = body.position;

        self.create_line(
            &format!("{}.{}.torque", prefix, body.name),
            &[origin, origin + torque * scale],
            TORQUE_COLOR,
        );
        self.create_line(
            &format!("{}.{}.force", prefix, body.name),
            &[origin, origin + force * scale],
            FORCE_COLOR,
        );
        self
    }

    pub fn clear_body_wrench(&self, body: &BodySnapshot, prefix: &str) -> &Self {
        self.delete_objects_by_prefix(&format!("{}.{}.", prefix, body.name))
    }

    /// A short line from every vertex of `body` along its velocity
    pub fn render_moving_body_node_vertices(
        &self,
        body: &BodySnapshot,
        scale: f64,
        prefix: &str,
    ) -> &Self {
        for (index, (vertex, velocity)) in body
            .vertices
            .iter()
            .zip(&body.vertex_velocities)
            .enumerate()
        {
            self.create_line(
                &format!("{}.{}.{}", prefix, body.name, index),
                &[*vertex, *vertex + *velocity * scale],
                DEFAULT_LINE_COLOR,
            );
        }
        self
    }
}
