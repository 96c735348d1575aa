//! Scene lighting

use roomview_math::Vec3;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AmbientLight {
    pub color: [f32; 3],
    pub intensity: f32,
}

impl Default for AmbientLight {
    fn default() -> Self {
        Self {
            color: [1.0; 3],
            intensity: 0.5,
        }
    }
}

/// Omnidirectional light
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PointLight {
    pub position: Vec3,
    pub color: [f32; 3],
    pub intensity: f32,
    pub cast_shadow: bool,
}

impl PointLight {
    pub fn new(position: Vec3, intensity: f32) -> Self {
        Self {
            position,
            color: [1.0; 3],
            intensity,
            cast_shadow: false,
        }
    }
}

/// Cone light aimed at a target point
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpotLight {
    pub position: Vec3,
    pub target: Vec3,
    pub color: [f32; 3],
    pub intensity: f32,
    /// Half-angle of the cone in radians
    pub angle: f32,
    /// Fraction of the cone (0..1) over which the edge fades out
    pub penumbra: f32,
    pub cast_shadow: bool,
    pub shadow_map_size: u32,
    pub shadow_near: f32,
    pub shadow_far: f32,
}

impl Default for SpotLight {
    fn default() -> Self {
        Self {
            position: Vec3::new(100.0, 200.0, 200.0),
            target: Vec3::ZERO,
            color: [1.0; 3],
            intensity: 1.5,
            angle: 30f32.to_radians(),
            penumbra: 1.0,
            cast_shadow: true,
            shadow_map_size: 2048,
            shadow_near: 10.0,
            shadow_far: 500.0,
        }
    }
}

impl SpotLight {
    pub fn direction(&self) -> Vec3 {
        (self.target - self.position).normalize_or_zero()
    }

    /// Cosines of the inner (full strength) and outer (zero) cone edges
    pub fn cone_cosines(&self) -> (f32, f32) {
        let outer = self.angle.clamp(0.0, std::f32::consts::FRAC_PI_2);
        let inner = outer * (1.0 - self.penumbra.clamp(0.0, 1.0));
        (inner.cos(), outer.cos())
    }
}

/// All lights of a scene
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Lighting {
    pub ambient: AmbientLight,
    pub points: Vec<PointLight>,
    pub spots: Vec<SpotLight>,
}
