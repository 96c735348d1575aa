//! Rigid bodies and static colliders

use crate::collision::CollisionFilter;
use crate::material::PhysicsMaterial;
use crate::shapes::{Collider, Cylinder, Plane, Sphere};
use roomview_math::{Aabb, Vec3};
use slotmap::new_key_type;

new_key_type! {
    /// Key to a rigid body in the physics world
    ///
    /// Generational: a key to a removed body returns None even after its
    /// slot has been reused.
    pub struct BodyKey;
}

/// Whether a body is simulated
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BodyType {
    /// Moved by gravity and contacts
    #[default]
    Dynamic,
    /// Never moves; other bodies collide against it
    Static,
}

/// A translating rigid body with a world-space collider
#[derive(Clone, Debug)]
pub struct RigidBody {
    /// Position in world space (the collider's center)
    pub position: Vec3,
    /// Units per second
    pub velocity: Vec3,
    /// Mass; zero makes the body static
    pub mass: f32,
    pub material: PhysicsMaterial,
    pub affected_by_gravity: bool,
    pub collider: Collider,
    pub body_type: BodyType,
    pub filter: CollisionFilter,
}

impl RigidBody {
    fn with_collider(position: Vec3, collider: Collider) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
            mass: 1.0,
            material: PhysicsMaterial::default(),
            affected_by_gravity: true,
            collider,
            body_type: BodyType::Dynamic,
            filter: CollisionFilter::default(),
        }
    }

    pub fn new_sphere(position: Vec3, radius: f32) -> Self {
        Self::with_collider(position, Collider::Sphere(Sphere::new(position, radius)))
    }

    pub fn new_box(position: Vec3, half_extents: Vec3) -> Self {
        Self::with_collider(
            position,
            Collider::Box(Aabb::from_center_half_extents(position, half_extents)),
        )
    }

    /// Vertical cylinder centered on `position`
    pub fn new_cylinder(position: Vec3, radius_top: f32, radius_bottom: f32, height: f32, segments: u32) -> Self {
        Self::with_collider(
            position,
            Collider::Cylinder(Cylinder::new(position, radius_top, radius_bottom, height, segments)),
        )
    }

    pub fn new_static_box(position: Vec3, half_extents: Vec3) -> Self {
        Self::new_box(position, half_extents).with_mass(0.0)
    }

    pub fn with_velocity(mut self, velocity: Vec3) -> Self {
        self.velocity = velocity;
        self
    }

    /// Set the mass; a mass of zero (or less) turns the body static
    pub fn with_mass(mut self, mass: f32) -> Self {
        self.mass = mass.max(0.0);
        if self.mass == 0.0 {
            self.body_type = BodyType::Static;
            self.affected_by_gravity = false;
            self.velocity = Vec3::ZERO;
        } else {
            self.body_type = BodyType::Dynamic;
        }
        self
    }

    pub fn with_material(mut self, material: PhysicsMaterial) -> Self {
        self.material = material;
        self
    }

    pub fn with_gravity(mut self, affected: bool) -> Self {
        self.affected_by_gravity = affected && !self.is_static();
        self
    }

    pub fn with_filter(mut self, filter: CollisionFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn is_static(&self) -> bool {
        self.body_type == BodyType::Static
    }

    /// Move the body and its collider
    pub fn set_position(&mut self, position: Vec3) {
        let delta = position - self.position;
        self.position = position;
        self.collider = self.collider.translated(delta);
    }

    /// Apply a positional correction (e.g., from collision resolution)
    pub fn apply_correction(&mut self, correction: Vec3) {
        self.position += correction;
        self.collider = self.collider.translated(correction);
    }
}

/// Immovable world geometry (floors, walls)
#[derive(Clone, Debug)]
pub struct StaticCollider {
    pub collider: Collider,
    pub material: PhysicsMaterial,
    pub filter: CollisionFilter,
}

impl StaticCollider {
    pub fn new(collider: Collider, material: PhysicsMaterial) -> Self {
        Self {
            collider,
            material,
            filter: CollisionFilter::static_world(),
        }
    }

    /// Infinite horizontal floor at height `y`
    pub fn floor(y: f32, material: PhysicsMaterial) -> Self {
        Self::new(Collider::Plane(Plane::floor(y)), material)
    }

    pub fn platform(center: Vec3, half_extents: Vec3, material: PhysicsMaterial) -> Self {
        Self::new(
            Collider::Box(Aabb::from_center_half_extents(center, half_extents)),
            material,
        )
    }

    pub fn with_filter(mut self, filter: CollisionFilter) -> Self {
        self.filter = filter;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_sphere_body() {
        let pos = Vec3::new(1.0, 2.0, 3.0);
        let body = RigidBody::new_sphere(pos, 0.5);
        assert_eq!(body.position, pos);
        assert_eq!(body.velocity, Vec3::ZERO);
        assert!(body.affected_by_gravity);
        assert!(!body.is_static());
        assert_eq!(body.collider.center(), pos);
    }

    #[test]
    fn test_zero_mass_is_static() {
        let body = RigidBody::new_box(Vec3::ZERO, Vec3::ONE)
            .with_velocity(Vec3::X)
            .with_mass(0.0);
        assert!(body.is_static());
        assert!(!body.affected_by_gravity);
        assert_eq!(body.velocity, Vec3::ZERO);
    }

    #[test]
    fn test_gravity_cannot_be_enabled_on_static() {
        let body = RigidBody::new_static_box(Vec3::ZERO, Vec3::ONE).with_gravity(true);
        assert!(!body.affected_by_gravity);
    }

    #[test]
    fn test_cylinder_body() {
        let body = RigidBody::new_cylinder(Vec3::new(0.0, 75.0, 0.0), 20.0, 10.0, 150.0, 12).with_mass(5.0);
        assert_eq!(body.mass, 5.0);
        assert!(!body.is_static());
        assert_eq!(body.collider.bounds().map(|b| b.min.y), Some(0.0));
    }

    #[test]
    fn test_set_position_moves_collider() {
        let mut body = RigidBody::new_sphere(Vec3::ZERO, 1.0);
        body.set_position(Vec3::new(5.0, 10.0, 3.0));
        assert_eq!(body.collider.center(), Vec3::new(5.0, 10.0, 3.0));
    }

    #[test]
    fn test_apply_correction() {
        let mut body = RigidBody::new_sphere(Vec3::X, 1.0);
        body.apply_correction(Vec3::new(0.0, 0.5, 0.0));
        assert_eq!(body.position, Vec3::new(1.0, 0.5, 0.0));
        assert_eq!(body.collider.center(), Vec3::new(1.0, 0.5, 0.0));
    }
}
