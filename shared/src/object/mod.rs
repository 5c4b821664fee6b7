pub mod scene_object;
pub mod shapes;
pub mod ui;

use glam::DVec3;

/// Color used for solids when the caller doesn't pick one
pub const DEFAULT_OBJECT_COLOR: DVec3 = DVec3::new(0.5, 0.5, 0.5);

/// Color used for lines when the caller doesn't pick one
pub const DEFAULT_LINE_COLOR: DVec3 = DVec3::new(1.0, 0.5, 0.5);
