//! Physical material properties for collision response

use serde::{Deserialize, Serialize};

/// How a surface behaves on contact
///
/// Friction is how much objects resist sliding, restitution is how much
/// of the normal velocity survives a bounce.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PhysicsMaterial {
    /// Friction coefficient (0.0 = ice, 1.0 = rubber)
    pub friction: f32,
    /// Restitution/bounciness (0.0 = no bounce, 1.0 = perfect bounce)
    pub restitution: f32,
}

impl Default for PhysicsMaterial {
    fn default() -> Self {
        Self {
            friction: 0.5,
            restitution: 0.0,
        }
    }
}

impl PhysicsMaterial {
    /// Furniture wood: moderate friction, low bounce
    pub const WOOD: Self = Self {
        friction: 0.5,
        restitution: 0.2,
    };

    /// Glazed pots and tiles
    pub const CERAMIC: Self = Self {
        friction: 0.4,
        restitution: 0.1,
    };

    /// Carpeted floor: grippy, absorbs impacts
    pub const CARPET: Self = Self {
        friction: 0.8,
        restitution: 0.0,
    };

    /// Values are clamped to the range [0.0, 1.0].
    pub fn new(friction: f32, restitution: f32) -> Self {
        Self {
            friction: friction.clamp(0.0, 1.0),
            restitution: restitution.clamp(0.0, 1.0),
        }
    }

    /// Combine two materials for collision response
    ///
    /// Geometric mean for friction, maximum for restitution.
    pub fn combine(&self, other: &Self) -> Self {
        Self {
            friction: (self.friction * other.friction).sqrt(),
            restitution: self.restitution.max(other.restitution),
        }
    }
}
