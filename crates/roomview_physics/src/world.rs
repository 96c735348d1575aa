//! Physics world and simulation

use crate::body::{BodyKey, RigidBody, StaticCollider};
use crate::collision::{aabb_vs_aabb, aabb_vs_plane, sphere_vs_aabb, sphere_vs_plane, sphere_vs_sphere, Contact};
use crate::shapes::ContactShape;
use roomview_math::Vec3;
use serde::{Deserialize, Serialize};
use slotmap::SlotMap;

/// Configuration for the physics simulation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Gravity acceleration in world units per second squared
    pub gravity: Vec3,
    /// Length of one simulation sub-step in seconds
    pub fixed_timestep: f32,
    /// Upper bound on sub-steps per `step` call; excess time is dropped
    pub max_substeps: u32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: Vec3::new(0.0, -200.0, 0.0),
            fixed_timestep: 1.0 / 20.0,
            max_substeps: 10,
        }
    }
}

impl PhysicsConfig {
    pub fn new(gravity: Vec3) -> Self {
        Self {
            gravity,
            ..Default::default()
        }
    }

    pub fn with_fixed_timestep(mut self, fixed_timestep: f32) -> Self {
        self.fixed_timestep = fixed_timestep;
        self
    }
}

/// Counters describing how the world has been driven
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PhysicsStats {
    /// Calls to [`PhysicsWorld::step`]
    pub step_calls: u64,
    /// Fixed sub-steps actually simulated
    pub substeps: u64,
    /// Sub-steps skipped because a frame exceeded `max_substeps`
    pub dropped_substeps: u64,
}

/// The physics world containing all rigid bodies
pub struct PhysicsWorld {
    bodies: SlotMap<BodyKey, RigidBody>,
    static_colliders: Vec<StaticCollider>,
    accumulator: f32,
    stats: PhysicsStats,
    pub config: PhysicsConfig,
}

impl PhysicsWorld {
    pub fn new() -> Self {
        Self::with_config(PhysicsConfig::default())
    }

    pub fn with_config(config: PhysicsConfig) -> Self {
        Self {
            bodies: SlotMap::with_key(),
            static_colliders: Vec::new(),
            accumulator: 0.0,
            stats: PhysicsStats::default(),
            config,
        }
    }

    pub fn add_static_collider(&mut self, collider: StaticCollider) {
        self.static_colliders.push(collider);
    }

    pub fn static_colliders(&self) -> &[StaticCollider] {
        &self.static_colliders
    }

    pub fn add_body(&mut self, body: RigidBody) -> BodyKey {
        self.bodies.insert(body)
    }

    pub fn remove_body(&mut self, key: BodyKey) -> Option<RigidBody> {
        self.bodies.remove(key)
    }

    pub fn get_body(&self, key: BodyKey) -> Option<&RigidBody> {
        self.bodies.get(key)
    }

    pub fn get_body_mut(&mut self, key: BodyKey) -> Option<&mut RigidBody> {
        self.bodies.get_mut(key)
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    pub fn bodies(&self) -> impl Iterator<Item = (BodyKey, &RigidBody)> + '_ {
        self.bodies.iter()
    }

    pub fn stats(&self) -> PhysicsStats {
        self.stats
    }

    /// Advance the simulation by `dt` seconds of wall time
    ///
    /// Time is accumulated and consumed in whole `fixed_timestep` sub-steps,
    /// at most `max_substeps` per call. Returns the number of sub-steps run.
    /// Negative or non-finite deltas count as a call but advance nothing.
    pub fn step(&mut self, dt: f32) -> u32 {
        self.stats.step_calls += 1;

        let fixed = self.config.fixed_timestep;
        if !dt.is_finite() || dt <= 0.0 || fixed.is_nan() || fixed <= 0.0 {
            return 0;
        }

        self.accumulator += dt;
        let mut ran = 0;
        while self.accumulator >= fixed && ran < self.config.max_substeps {
            self.substep(fixed);
            self.accumulator -= fixed;
            ran += 1;
        }

        if self.accumulator >= fixed {
            let dropped = (self.accumulator / fixed).floor();
            self.stats.dropped_substeps += dropped as u64;
            log::debug!("physics fell behind, dropping {} sub-steps", dropped);
            self.accumulator %= fixed;
        }

        self.stats.substeps += u64::from(ran);
        ran
    }

    /// One fixed sub-step:
    /// 1. gravity and velocity integration for dynamic bodies
    /// 2. static collider resolution
    /// 3. body-body resolution
    fn substep(&mut self, dt: f32) {
        let gravity = self.config.gravity;
        for (_key, body) in &mut self.bodies {
            if body.is_static() {
                continue;
            }
            if body.affected_by_gravity {
                body.velocity += gravity * dt;
            }
            let displacement = body.velocity * dt;
            body.apply_correction(displacement);
        }

        self.resolve_static_collisions();
        self.resolve_body_collisions();
    }

    /// Contact between a moving shape `a` and another shape `b`
    ///
    /// The returned normal points from `b` toward `a`.
    fn contact(a: ContactShape, b: ContactShape) -> Option<Contact> {
        match (a, b) {
            (ContactShape::Sphere(s), ContactShape::Plane(p)) => sphere_vs_plane(&s, &p),
            (ContactShape::Box(bx), ContactShape::Plane(p)) => aabb_vs_plane(&bx, &p),
            (ContactShape::Sphere(s), ContactShape::Box(bx)) => sphere_vs_aabb(&s, &bx),
            (ContactShape::Box(bx), ContactShape::Sphere(s)) => sphere_vs_aabb(&s, &bx).map(Contact::flipped),
            (ContactShape::Box(x), ContactShape::Box(y)) => aabb_vs_aabb(&x, &y),
            (ContactShape::Sphere(x), ContactShape::Sphere(y)) => sphere_vs_sphere(&x, &y).map(Contact::flipped),
            (ContactShape::Plane(_), _) | (_, ContactShape::Plane(_)) => None,
        }
    }

    fn resolve_static_collisions(&mut self) {
        for (_key, body) in &mut self.bodies {
            if body.is_static() {
                continue;
            }

            for static_col in &self.static_colliders {
                if !body.filter.collides_with(&static_col.filter) {
                    continue;
                }
                let contact = Self::contact(body.collider.contact_shape(), static_col.collider.contact_shape());
                let Some(contact) = contact.filter(Contact::is_colliding) else {
                    continue;
                };

                body.apply_correction(contact.normal * contact.penetration);
                let combined = body.material.combine(&static_col.material);
                body.velocity = Self::reflect_velocity(body.velocity, contact.normal, combined.restitution, combined.friction);
            }
        }
    }

    fn resolve_body_collisions(&mut self) {
        let keys: Vec<BodyKey> = self.bodies.keys().collect();

        for (i, &key_a) in keys.iter().enumerate() {
            for &key_b in &keys[i + 1..] {
                let (a, b) = (&self.bodies[key_a], &self.bodies[key_b]);
                if (a.is_static() && b.is_static()) || !a.filter.collides_with(&b.filter) {
                    continue;
                }

                // Normal points from B toward A
                let contact = Self::contact(a.collider.contact_shape(), b.collider.contact_shape());
                if let Some(contact) = contact.filter(Contact::is_colliding) {
                    self.resolve_pair(key_a, key_b, &contact);
                }
            }
        }
    }

    fn resolve_pair(&mut self, key_a: BodyKey, key_b: BodyKey, contact: &Contact) {
        let (static_a, static_b) = (self.bodies[key_a].is_static(), self.bodies[key_b].is_static());
        let push = contact.normal * contact.penetration;

        let (share_a, share_b) = if static_a {
            (0.0, 1.0)
        } else if static_b {
            (1.0, 0.0)
        } else {
            let (mass_a, mass_b) = (self.bodies[key_a].mass, self.bodies[key_b].mass);
            let total = mass_a + mass_b;
            (mass_b / total, mass_a / total)
        };

        let combined = self.bodies[key_a].material.combine(&self.bodies[key_b].material);

        if !static_a {
            let body = &mut self.bodies[key_a];
            body.apply_correction(push * share_a);
            body.velocity = Self::reflect_velocity(body.velocity, contact.normal, combined.restitution, combined.friction);
        }
        if !static_b {
            let body = &mut self.bodies[key_b];
            body.apply_correction(-push * share_b);
            body.velocity = Self::reflect_velocity(body.velocity, -contact.normal, combined.restitution, combined.friction);
        }
    }

    /// Remove the velocity component heading into a surface, bounce, and damp sliding
    fn reflect_velocity(velocity: Vec3, normal: Vec3, restitution: f32, friction: f32) -> Vec3 {
        let into = velocity.dot(normal);
        if into >= 0.0 {
            return velocity;
        }

        let bounced = velocity - normal * into * (1.0 + restitution);
        let along_normal = normal * bounced.dot(normal);
        let tangent = bounced - along_normal;
        if tangent.length_squared() > 1e-8 {
            along_normal + tangent * (1.0 - friction)
        } else {
            bounced
        }
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::PhysicsMaterial;

    fn world_with_floor(floor_material: PhysicsMaterial) -> PhysicsWorld {
        let mut world = PhysicsWorld::new();
        world.add_static_collider(StaticCollider::floor(0.0, floor_material));
        world
    }

    #[test]
    fn test_physics_config_default() {
        let config = PhysicsConfig::default();
        assert_eq!(config.gravity, Vec3::new(0.0, -200.0, 0.0));
        assert!((config.fixed_timestep - 0.05).abs() < 1e-6);
        assert_eq!(config.max_substeps, 10);
    }

    #[test]
    fn test_stale_key_returns_none() {
        let mut world = PhysicsWorld::new();
        let key = world.add_body(RigidBody::new_sphere(Vec3::new(0.0, 5.0, 0.0), 0.5));
        assert!(world.remove_body(key).is_some());
        let new_key = world.add_body(RigidBody::new_sphere(Vec3::ZERO, 0.5));
        assert!(world.get_body(key).is_none());
        assert!(world.get_body(new_key).is_some());
    }

    #[test]
    fn test_step_accumulates_partial_time() {
        let mut world = PhysicsWorld::new();
        assert_eq!(world.step(0.03), 0);
        assert_eq!(world.step(0.03), 1);
        assert_eq!(world.stats().step_calls, 2);
        assert_eq!(world.stats().substeps, 1);
    }

    #[test]
    fn test_step_clamps_to_max_substeps() {
        let mut world = PhysicsWorld::new();
        assert_eq!(world.step(10.0), 10);
        assert!(world.stats().dropped_substeps > 0);
        // Leftover is below one sub-step after the drop
        assert_eq!(world.step(0.0), 0);
    }

    #[test]
    fn test_step_ignores_bad_deltas() {
        let mut world = PhysicsWorld::new();
        let key = world.add_body(RigidBody::new_sphere(Vec3::new(0.0, 10.0, 0.0), 1.0));
        assert_eq!(world.step(f32::NAN), 0);
        assert_eq!(world.step(-1.0), 0);
        assert_eq!(world.get_body(key).map(|b| b.position.y), Some(10.0));
        assert_eq!(world.stats().step_calls, 2);
    }

    #[test]
    fn test_gravity_moves_dynamic_not_static() {
        let mut world = PhysicsWorld::new();
        let dynamic = world.add_body(RigidBody::new_sphere(Vec3::new(0.0, 100.0, 0.0), 1.0));
        let fixed = world.add_body(RigidBody::new_static_box(Vec3::new(50.0, 100.0, 0.0), Vec3::ONE));
        world.step(0.05);
        assert!(world.get_body(dynamic).map(|b| b.position.y).unwrap_or(100.0) < 100.0);
        assert_eq!(world.get_body(fixed).map(|b| b.position.y), Some(100.0));
    }

    #[test]
    fn test_sphere_comes_to_rest_on_floor() {
        let mut world = world_with_floor(PhysicsMaterial::CARPET);
        let key = world.add_body(RigidBody::new_sphere(Vec3::new(0.0, 50.0, 0.0), 5.0));
        for _ in 0..100 {
            world.step(0.05);
        }
        let body = world.get_body(key).expect("body exists");
        assert!((body.position.y - 5.0).abs() < 0.5, "y = {}", body.position.y);
    }

    #[test]
    fn test_cylinder_lands_on_static_box() {
        let mut world = world_with_floor(PhysicsMaterial::CARPET);
        world.add_body(
            RigidBody::new_static_box(Vec3::new(0.0, 20.0, 0.0), Vec3::new(50.0, 20.0, 50.0))
                .with_material(PhysicsMaterial::WOOD),
        );
        let plant = world.add_body(RigidBody::new_cylinder(Vec3::new(0.0, 200.0, 0.0), 20.0, 10.0, 150.0, 12).with_mass(5.0));
        for _ in 0..200 {
            world.step(0.05);
        }
        let body = world.get_body(plant).expect("body exists");
        // Table top at y=40, cylinder half-height 75
        assert!((body.position.y - 115.0).abs() < 2.0, "y = {}", body.position.y);
    }

    #[test]
    fn test_bouncy_material_reverses_velocity() {
        let mut world = world_with_floor(PhysicsMaterial::new(0.0, 1.0));
        let key = world.add_body(RigidBody::new_sphere(Vec3::new(0.0, 1.5, 0.0), 1.0).with_velocity(Vec3::new(0.0, -20.0, 0.0)));
        world.step(0.05);
        assert!(world.get_body(key).map(|b| b.velocity.y).unwrap_or(-1.0) > 0.0);
    }
}
