//! Vector and color types shared by every module.
//!
//! Vectors and rotations are glam's (the same version Bevy re-exports, so
//! the viewer uses them directly). Colors stay a packed `0xRRGGBB` value
//! that serializes as a plain integer.

use serde::{Deserialize, Serialize};

pub use glam::{EulerRot, Mat3, Mat4, Vec3};

/// 24-bit RGB color stored as `0xRRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color(pub u32);

impl Color {
    pub const WHITE: Self = Self(0xffffff);
    pub const GOLD: Self = Self(0xffd700);

    /// Red, green, blue as `0..=255` bytes.
    pub fn rgb_u8(self) -> (u8, u8, u8) {
        (
            ((self.0 >> 16) & 0xff) as u8,
            ((self.0 >> 8) & 0xff) as u8,
            (self.0 & 0xff) as u8,
        )
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

/// Rotation for Euler angles applied about X, then Y, then Z of the
/// intrinsic frame. This is the order every scene node uses.
pub fn euler_xyz(euler: Vec3) -> Mat3 {
    Mat3::from_euler(EulerRot::XYZ, euler.x, euler.y, euler.z)
}

/// Component-wise comparison within `tolerance`, used by tests and the
/// harness.
pub fn approx_eq_vec(a: Vec3, b: Vec3, tolerance: f32) -> bool {
    a.abs_diff_eq(b, tolerance)
}
