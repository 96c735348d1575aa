//! Collision shapes
//!
//! These are lightweight primitives used for collision detection,
//! separate from the renderable meshes in roomview_math.

use roomview_math::{Aabb, Vec3};

/// A sphere defined by center and radius
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sphere {
    pub center: Vec3,
    pub radius: f32,
}

impl Sphere {
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Check if a point is inside or on the sphere
    pub fn contains(&self, point: Vec3) -> bool {
        (point - self.center).length_squared() <= self.radius * self.radius
    }
}

/// A vertical cylinder, possibly tapered
///
/// Collision treats it as its bounding box; the radii are kept so the
/// shape can be described and debug-drawn faithfully.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cylinder {
    pub center: Vec3,
    pub radius_top: f32,
    pub radius_bottom: f32,
    pub height: f32,
    pub segments: u32,
}

impl Cylinder {
    pub fn new(center: Vec3, radius_top: f32, radius_bottom: f32, height: f32, segments: u32) -> Self {
        Self {
            center,
            radius_top,
            radius_bottom,
            height,
            segments,
        }
    }

    pub fn bounding_box(&self) -> Aabb {
        let r = self.radius_top.max(self.radius_bottom);
        Aabb::from_center_half_extents(self.center, Vec3::new(r, self.height * 0.5, r))
    }
}

/// An infinite plane defined by normal and distance from origin
///
/// The plane equation is: normal · point = distance
/// Points with normal · point > distance are "above" the plane (positive side)
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Plane {
    /// Unit normal vector pointing to the positive side
    pub normal: Vec3,
    /// Signed distance from origin along the normal
    pub distance: f32,
}

impl Plane {
    /// Create a new plane from a normal and distance
    ///
    /// The normal will be normalized automatically.
    pub fn new(normal: Vec3, distance: f32) -> Self {
        Self {
            normal: normal.normalize_or_zero(),
            distance,
        }
    }

    /// Create a plane from a point on the plane and a normal
    pub fn from_point_normal(point: Vec3, normal: Vec3) -> Self {
        let n = normal.normalize_or_zero();
        Self {
            normal: n,
            distance: n.dot(point),
        }
    }

    /// Horizontal floor plane at the given Y height
    pub fn floor(y: f32) -> Self {
        Self::from_point_normal(Vec3::new(0.0, y, 0.0), Vec3::Y)
    }

    /// Positive above the plane, negative below, zero on it
    pub fn signed_distance(&self, point: Vec3) -> f32 {
        self.normal.dot(point) - self.distance
    }

    pub fn is_above(&self, point: Vec3) -> bool {
        self.signed_distance(point) > 0.0
    }
}

/// Collider enum for storing different collision shape types
///
/// Colliders hold absolute world-space geometry.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Collider {
    Sphere(Sphere),
    Box(Aabb),
    Cylinder(Cylinder),
    Plane(Plane),
}

/// The primitive a collider is tested as
#[derive(Clone, Copy, Debug)]
pub(crate) enum ContactShape {
    Sphere(Sphere),
    Box(Aabb),
    Plane(Plane),
}

impl Collider {
    /// Get the center of the collider
    ///
    /// For planes, returns the point on the plane closest to the origin.
    pub fn center(&self) -> Vec3 {
        match self {
            Collider::Sphere(s) => s.center,
            Collider::Box(b) => b.center(),
            Collider::Cylinder(c) => c.center,
            Collider::Plane(p) => p.normal * p.distance,
        }
    }

    /// World-space bounds; planes are unbounded and return `None`
    pub fn bounds(&self) -> Option<Aabb> {
        match self {
            Collider::Sphere(s) => Some(Aabb::from_center_half_extents(s.center, Vec3::splat(s.radius))),
            Collider::Box(b) => Some(*b),
            Collider::Cylinder(c) => Some(c.bounding_box()),
            Collider::Plane(_) => None,
        }
    }

    /// Translate the collider by a delta
    pub fn translated(&self, delta: Vec3) -> Self {
        match self {
            Collider::Sphere(s) => Collider::Sphere(Sphere::new(s.center + delta, s.radius)),
            Collider::Box(b) => Collider::Box(b.translated(delta)),
            Collider::Cylinder(c) => Collider::Cylinder(Cylinder {
                center: c.center + delta,
                ..*c
            }),
            Collider::Plane(p) => Collider::Plane(Plane::new(p.normal, p.distance + p.normal.dot(delta))),
        }
    }

    pub(crate) fn contact_shape(&self) -> ContactShape {
        match self {
            Collider::Sphere(s) => ContactShape::Sphere(*s),
            Collider::Box(b) => ContactShape::Box(*b),
            Collider::Cylinder(c) => ContactShape::Box(c.bounding_box()),
            Collider::Plane(p) => ContactShape::Plane(*p),
        }
    }
}
