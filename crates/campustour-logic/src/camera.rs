//! Perspective camera model: pose, projection parameters and
//! world-to-surface projection for the label overlay.

use serde::{Deserialize, Serialize};

use crate::constants::camera::{FAR, FOV_DEGREES, NEAR};
use crate::math::{Mat4, Vec3};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view.
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: FOV_DEGREES,
            near: NEAR,
            far: FAR,
        }
    }
}

/// Cached projection matrix. Recomputed only by
/// [`PerspectiveCamera::update_projection`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub matrix: Mat4,
}

impl Projection {
    fn new(fov_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            matrix: Mat4::perspective_rh(fov_degrees.to_radians(), aspect, near, far),
        }
    }

    /// Horizontal focal scale (`y_scale / aspect`).
    pub fn x_scale(&self) -> f32 {
        self.matrix.x_axis.x
    }

    /// Vertical focal scale (`1 / tan(fov / 2)`).
    pub fn y_scale(&self) -> f32 {
        self.matrix.y_axis.y
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PerspectiveCamera {
    pub position: Vec3,
    /// Unit view direction.
    forward: Vec3,
    pub fov_degrees: f32,
    /// Width over height of the surface.
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    projection: Projection,
}

impl PerspectiveCamera {
    pub fn new(config: &CameraConfig, aspect: f32) -> Self {
        Self {
            position: Vec3::ZERO,
            forward: Vec3::NEG_Z,
            fov_degrees: config.fov_degrees,
            aspect,
            near: config.near,
            far: config.far,
            projection: Projection::new(config.fov_degrees, aspect, config.near, config.far),
        }
    }

    /// Point the camera at `target`. Keeps the previous direction when
    /// the target coincides with the camera.
    pub fn look_at(&mut self, target: Vec3) {
        if let Some(dir) = (target - self.position).try_normalize() {
            self.forward = dir;
        }
    }

    pub fn forward(&self) -> Vec3 {
        self.forward
    }

    /// Recompute the cached projection from fov, aspect, near and far.
    pub fn update_projection(&mut self) {
        self.projection = Projection::new(self.fov_degrees, self.aspect, self.near, self.far);
    }

    pub fn projection(&self) -> Projection {
        self.projection
    }

    /// World-to-view transform. Looking straight up or down uses a
    /// horizontal reference in place of +Y.
    pub fn view_matrix(&self) -> Mat4 {
        let up = if self.forward.cross(Vec3::Y).length_squared() < 1e-12 {
            Vec3::X.cross(self.forward)
        } else {
            Vec3::Y
        };
        Mat4::look_at_rh(self.position, self.position + self.forward, up)
    }

    /// Project a world point to surface pixels (origin top-left). `None`
    /// when the point is behind the near plane or beyond the far plane.
    pub fn project(&self, world: Vec3, width: u32, height: u32) -> Option<(f32, f32)> {
        let clip = self.projection.matrix * self.view_matrix() * world.extend(1.0);
        if clip.w <= 0.0 {
            return None;
        }
        let ndc = clip.truncate() / clip.w;
        if !(0.0..=1.0).contains(&ndc.z) {
            return None;
        }
        let x = (ndc.x + 1.0) / 2.0 * width as f32;
        let y = (1.0 - ndc.y) / 2.0 * height as f32;
        Some((x, y))
    }
}
