//! Transform (position, rotation, scale)
//!
//! A Transform places a scene node relative to its parent.

use roomview_math::{EulerRot, Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// A transform with position, quaternion rotation and per-axis scale
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::IDENTITY
        }
    }

    pub fn from_position_rotation(position: Vec3, rotation: Quat) -> Self {
        Self {
            position,
            rotation,
            scale: Vec3::ONE,
        }
    }

    /// Build from glTF-style decomposed TRS arrays (rotation is `[x, y, z, w]`)
    pub fn from_trs(translation: [f32; 3], rotation: [f32; 4], scale: [f32; 3]) -> Self {
        Self {
            position: Vec3::from(translation),
            rotation: Quat::from_array(rotation).normalize(),
            scale: Vec3::from(scale),
        }
    }

    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    /// Set rotation from Euler angles in degrees (Y, X, Z order)
    pub fn with_euler_degrees(mut self, x: f32, y: f32, z: f32) -> Self {
        self.set_euler(Vec3::new(x.to_radians(), y.to_radians(), z.to_radians()));
        self
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// Rotation as Euler angles in radians, applied yaw first (Y, X, Z)
    ///
    /// Singular at pitch ±90°; any yaw round-trips.
    pub fn euler(&self) -> Vec3 {
        let (y, x, z) = self.rotation.to_euler(EulerRot::YXZ);
        Vec3::new(x, y, z)
    }

    /// Set rotation from Euler angles in radians (Y, X, Z order)
    pub fn set_euler(&mut self, angles: Vec3) {
        self.rotation = Quat::from_euler(EulerRot::YXZ, angles.y, angles.x, angles.z);
    }

    /// Local-to-parent matrix: scale, then rotation, then translation
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }

    pub fn transform_point(&self, p: Vec3) -> Vec3 {
        self.rotation * (p * self.scale) + self.position
    }

    pub fn translate(&mut self, offset: Vec3) {
        self.position += offset;
    }

    pub fn rotate(&mut self, rotation: Quat) {
        self.rotation = (rotation * self.rotation).normalize();
    }
}
