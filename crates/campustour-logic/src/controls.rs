//! Orbit controller: rotates the camera around a target point on a sphere.
//!
//! Input accumulates rotation deltas; [`OrbitControls::update`] applies
//! them. With damping on, each update applies `damping_factor` of the
//! pending delta and keeps the rest (decayed by `1 - damping_factor`) for
//! later frames, so drags coast to a stop.

use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

use crate::camera::PerspectiveCamera;
use crate::constants::controls::{DAMPING_FACTOR, ROTATE_SPEED};
use crate::math::Vec3;

/// Keeps the polar angle off the poles where the azimuth is undefined.
const POLE_EPSILON: f32 = 1e-6;
const MIN_RADIUS: f32 = 1e-3;
/// Damped deltas below this snap to zero.
const SETTLE_EPSILON: f32 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlsConfig {
    pub enable_damping: bool,
    pub damping_factor: f32,
    pub enable_pan: bool,
    pub enable_zoom: bool,
    /// Polar range in radians, measured from +Y.
    pub min_polar_angle: f32,
    pub max_polar_angle: f32,
    /// Radians of rotation per pixel of drag.
    pub rotate_speed: f32,
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            enable_damping: true,
            damping_factor: DAMPING_FACTOR,
            enable_pan: false,
            enable_zoom: false,
            min_polar_angle: 0.0,
            max_polar_angle: PI,
            rotate_speed: ROTATE_SPEED,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrbitControls {
    pub enabled: bool,
    /// Point the camera orbits and looks at.
    pub target: Vec3,
    config: ControlsConfig,
    theta_delta: f32,
    phi_delta: f32,
    pan_offset: Vec3,
    zoom_scale: f32,
}

impl OrbitControls {
    pub fn new(config: ControlsConfig) -> Self {
        Self {
            enabled: true,
            target: Vec3::ZERO,
            config,
            theta_delta: 0.0,
            phi_delta: 0.0,
            pan_offset: Vec3::ZERO,
            zoom_scale: 1.0,
        }
    }

    pub fn config(&self) -> &ControlsConfig {
        &self.config
    }

    /// Pending rotation not yet applied by [`update`](Self::update).
    pub fn pending_rotation(&self) -> (f32, f32) {
        (self.theta_delta, self.phi_delta)
    }

    /// No pending rotation, pan or zoom.
    pub fn is_settled(&self) -> bool {
        self.theta_delta == 0.0
            && self.phi_delta == 0.0
            && self.pan_offset == Vec3::ZERO
            && self.zoom_scale == 1.0
    }

    /// Drop any queued rotation, pan and zoom.
    pub fn reset_motion(&mut self) {
        self.theta_delta = 0.0;
        self.phi_delta = 0.0;
        self.pan_offset = Vec3::ZERO;
        self.zoom_scale = 1.0;
    }

    /// Queue a drag of `dx`, `dy` pixels. Ignored while disabled.
    pub fn rotate(&mut self, dx: f32, dy: f32) {
        if !self.enabled {
            return;
        }
        self.theta_delta -= dx * self.config.rotate_speed;
        self.phi_delta -= dy * self.config.rotate_speed;
    }

    /// Queue a target shift in world units. Returns `false` when panning
    /// is off or the controller is disabled.
    pub fn pan(&mut self, offset: Vec3) -> bool {
        if !self.enabled || !self.config.enable_pan {
            return false;
        }
        self.pan_offset += offset;
        true
    }

    /// Queue a distance scale (`< 1` moves closer). Returns `false` when
    /// zoom is off, the controller is disabled, or the scale is not
    /// positive.
    pub fn zoom(&mut self, scale: f32) -> bool {
        if !self.enabled || !self.config.enable_zoom || scale <= 0.0 || !scale.is_finite() {
            return false;
        }
        self.zoom_scale *= scale;
        true
    }

    /// Apply pending input to the camera and aim it at the target.
    /// Returns whether the camera moved. Does nothing while disabled.
    pub fn update(&mut self, camera: &mut PerspectiveCamera) -> bool {
        if !self.enabled {
            return false;
        }
        if self.is_settled() {
            camera.look_at(self.target);
            return false;
        }
        let before = camera.position;
        let offset = camera.position - self.target;
        let distance = offset.length();
        let radius = (distance * self.zoom_scale).max(MIN_RADIUS);
        let mut theta = offset.x.atan2(offset.z);
        let mut phi = if distance > 0.0 {
            (offset.y / distance).clamp(-1.0, 1.0).acos()
        } else {
            PI / 2.0
        };

        let c = &self.config;
        let step = if c.enable_damping { c.damping_factor } else { 1.0 };
        theta += self.theta_delta * step;
        phi += self.phi_delta * step;
        let lo = c.min_polar_angle.max(POLE_EPSILON);
        let hi = c.max_polar_angle.min(PI - POLE_EPSILON);
        phi = phi.clamp(lo, hi.max(lo));

        self.target += self.pan_offset;
        let sin_phi = phi.sin();
        let offset = Vec3::new(
            radius * sin_phi * theta.sin(),
            radius * phi.cos(),
            radius * sin_phi * theta.cos(),
        );
        camera.position = self.target + offset;
        camera.look_at(self.target);

        if c.enable_damping {
            let keep = 1.0 - c.damping_factor;
            self.theta_delta *= keep;
            self.phi_delta *= keep;
            if self.theta_delta.abs() < SETTLE_EPSILON && self.phi_delta.abs() < SETTLE_EPSILON {
                self.theta_delta = 0.0;
                self.phi_delta = 0.0;
            }
        } else {
            self.theta_delta = 0.0;
            self.phi_delta = 0.0;
        }
        self.pan_offset = Vec3::ZERO;
        self.zoom_scale = 1.0;

        camera.position.distance_squared(before) > 1e-12
    }
}
