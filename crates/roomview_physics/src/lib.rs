//! Rigid body physics for roomview
//!
//! This crate provides a small physics simulation covering what the room
//! scenes need:
//! - Collision shapes (spheres, boxes, cylinders, planes)
//! - Collision detection and filtering
//! - Rigid bodies with gravity, stepped on a fixed timestep

pub mod body;
pub mod collision;
pub mod material;
pub mod shapes;
pub mod world;

pub use body::{BodyKey, BodyType, RigidBody, StaticCollider};
pub use collision::{aabb_vs_aabb, aabb_vs_plane, sphere_vs_aabb, sphere_vs_plane, sphere_vs_sphere, CollisionFilter, CollisionLayer, Contact};
pub use material::PhysicsMaterial;
pub use shapes::{Collider, Cylinder, Plane, Sphere};
pub use world::{PhysicsConfig, PhysicsStats, PhysicsWorld};
