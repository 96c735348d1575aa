//! Math Library for roomview
//!
//! Vector, matrix and quaternion types come from `glam` and are re-exported
//! here so the rest of the workspace has a single import point.
//!
//! ## Core Types
//!
//! - [`Ray`] - Half-line used for picking
//! - [`Aabb`] - Axis-aligned bounding box with slab intersection
//! - [`MeshData`] - CPU-side triangle or line geometry
//!
//! ## Primitives
//!
//! The [`primitives`] module builds the procedural meshes the scene objects
//! are assembled from (boxes, planes, spheres, cylinders, axes).

mod aabb;
mod ray;
pub mod mesh;
pub mod primitives;

pub use aabb::Aabb;
pub use mesh::{MeshData, MeshId, Topology};
pub use ray::{intersect_triangle, Ray, TriangleHit};

pub use glam::{EulerRot, Mat3, Mat4, Quat, Vec2, Vec3, Vec4};
