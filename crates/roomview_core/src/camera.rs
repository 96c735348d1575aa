//! Perspective camera
//!
//! Right-handed, +Y up, looking from `position` toward `target`. The
//! projection maps depth to wgpu's 0..1 clip range.

use roomview_math::{Mat4, Ray, Vec2, Vec3};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PerspectiveCamera {
    /// Vertical field of view in degrees
    pub fov_y_degrees: f32,
    /// Width divided by height
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
}

impl Default for PerspectiveCamera {
    fn default() -> Self {
        Self {
            fov_y_degrees: 45.0,
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 1000.0,
            position: Vec3::new(-100.0, 200.0, 200.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
        }
    }
}

impl PerspectiveCamera {
    pub fn new(fov_y_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            fov_y_degrees,
            aspect,
            near,
            far,
            ..Default::default()
        }
    }

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    pub fn looking_at(mut self, target: Vec3) -> Self {
        self.target = target;
        self
    }

    /// Update the aspect ratio from a surface size
    ///
    /// Zero-sized surfaces (minimized windows) leave the aspect unchanged.
    pub fn set_viewport(&mut self, width: u32, height: u32) -> bool {
        if width == 0 || height == 0 {
            return false;
        }
        self.aspect = width as f32 / height as f32;
        true
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y_degrees.to_radians(), self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Unit vector from the camera toward its target
    pub fn forward(&self) -> Vec3 {
        (self.target - self.position).normalize_or_zero()
    }

    /// Ray from the camera through a point in normalized device coordinates
    ///
    /// `ndc` is in [-1, 1] on both axes with +Y up. The ray starts on the
    /// near plane.
    pub fn ray_from_ndc(&self, ndc: Vec2) -> Ray {
        let inverse = self.view_projection().inverse();
        let near = inverse.project_point3(ndc.extend(0.0));
        Ray::new(near, near - self.position)
    }
}
