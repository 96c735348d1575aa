//! Collision detection
//!
//! Provides contact generation between spheres, boxes and planes, plus
//! collision filtering via layer masks.

use bitflags::bitflags;

use crate::shapes::{Plane, Sphere};
use roomview_math::{Aabb, Vec3};

bitflags! {
    /// Collision layers for filtering which objects can collide
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct CollisionLayer: u32 {
        /// Default layer for most objects
        const DEFAULT = 1 << 0;
        /// Static room geometry (floor, walls)
        const STATIC = 1 << 1;
        /// Furniture the props rest on
        const FURNITURE = 1 << 2;
        /// Loose props (plants, decorations)
        const PROP = 1 << 3;
        /// All layers
        const ALL = 0xFFFFFFFF;
    }
}

/// Layer membership and the layers an object collides with
///
/// Two objects A and B collide if:
/// - (A.layer & B.mask) != 0, AND
/// - (B.layer & A.mask) != 0
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CollisionFilter {
    pub layer: CollisionLayer,
    pub mask: CollisionLayer,
}

impl Default for CollisionFilter {
    fn default() -> Self {
        Self {
            layer: CollisionLayer::DEFAULT,
            mask: CollisionLayer::ALL,
        }
    }
}

impl CollisionFilter {
    pub fn new(layer: CollisionLayer, mask: CollisionLayer) -> Self {
        Self { layer, mask }
    }

    pub fn collides_with(&self, other: &Self) -> bool {
        self.layer.intersects(other.mask) && other.layer.intersects(self.mask)
    }

    /// Floors and walls: hit by everything
    pub fn static_world() -> Self {
        Self::new(CollisionLayer::STATIC, CollisionLayer::ALL)
    }

    /// Furniture collides with the room and with props, not with other furniture
    pub fn furniture() -> Self {
        Self::new(
            CollisionLayer::FURNITURE,
            CollisionLayer::ALL & !CollisionLayer::FURNITURE,
        )
    }

    pub fn prop() -> Self {
        Self::new(CollisionLayer::PROP, CollisionLayer::ALL)
    }
}

/// Contact information from a collision
#[derive(Clone, Copy, Debug)]
pub struct Contact {
    /// Point of contact
    pub point: Vec3,
    /// Normal pointing from the second shape toward the first
    pub normal: Vec3,
    /// Penetration depth (positive means overlapping)
    pub penetration: f32,
}

impl Contact {
    pub fn new(point: Vec3, normal: Vec3, penetration: f32) -> Self {
        Self {
            point,
            normal,
            penetration,
        }
    }

    pub fn is_colliding(&self) -> bool {
        self.penetration > 0.0
    }

    /// Same contact seen from the other shape
    pub fn flipped(mut self) -> Self {
        self.normal = -self.normal;
        self
    }
}

/// Sphere vs plane; normal points from the plane toward the sphere
pub fn sphere_vs_plane(sphere: &Sphere, plane: &Plane) -> Option<Contact> {
    // radius - signed distance covers centers on either side of the plane
    let penetration = sphere.radius - plane.signed_distance(sphere.center);
    if penetration > 0.0 {
        let point = sphere.center - plane.normal * sphere.radius;
        Some(Contact::new(point, plane.normal, penetration))
    } else {
        None
    }
}

/// Box vs plane, using the corner deepest along the negative normal
pub fn aabb_vs_plane(aabb: &Aabb, plane: &Plane) -> Option<Contact> {
    let closest_vertex = aabb.center() - aabb.half_extents() * plane.normal.signum();
    let signed_dist = plane.signed_distance(closest_vertex);
    if signed_dist < 0.0 {
        Some(Contact::new(closest_vertex, plane.normal, -signed_dist))
    } else {
        None
    }
}

/// Sphere vs box; normal points from the box toward the sphere
pub fn sphere_vs_aabb(sphere: &Sphere, aabb: &Aabb) -> Option<Contact> {
    let closest = aabb.closest_point(sphere.center);
    let delta = sphere.center - closest;
    let dist_squared = delta.length_squared();

    if dist_squared >= sphere.radius * sphere.radius {
        return None;
    }

    let dist = dist_squared.sqrt();
    let penetration = sphere.radius - dist;
    let normal = if dist > 0.0001 {
        delta / dist
    } else {
        // Center inside the box: escape through the nearest face
        let to_min = sphere.center - aabb.min;
        let to_max = aabb.max - sphere.center;
        let candidates = [
            (to_min.x, Vec3::NEG_X),
            (to_max.x, Vec3::X),
            (to_min.y, Vec3::NEG_Y),
            (to_max.y, Vec3::Y),
            (to_min.z, Vec3::NEG_Z),
            (to_max.z, Vec3::Z),
        ];
        candidates
            .iter()
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, n)| *n)
            .unwrap_or(Vec3::Y)
    };

    Some(Contact::new(closest, normal, penetration))
}

/// Box vs box; normal points from `b` toward `a` along the least-overlap axis
pub fn aabb_vs_aabb(a: &Aabb, b: &Aabb) -> Option<Contact> {
    if a.max.cmplt(b.min).any() || a.min.cmpgt(b.max).any() {
        return None;
    }

    let overlap = (a.max.min(b.max) - a.min.max(b.min)).max(Vec3::ZERO);
    let (ca, cb) = (a.center(), b.center());
    let axis = if overlap.x <= overlap.y && overlap.x <= overlap.z {
        0
    } else if overlap.y <= overlap.z {
        1
    } else {
        2
    };

    let mut normal = Vec3::ZERO;
    normal[axis] = if ca[axis] < cb[axis] { -1.0 } else { 1.0 };

    let point = (a.min.max(b.min) + a.max.min(b.max)) * 0.5;
    Some(Contact::new(point, normal, overlap[axis]))
}

/// Sphere vs sphere; normal points from `a` toward `b`
pub fn sphere_vs_sphere(a: &Sphere, b: &Sphere) -> Option<Contact> {
    let delta = b.center - a.center;
    let dist_sq = delta.length_squared();
    let min_dist = a.radius + b.radius;

    if dist_sq < min_dist * min_dist && dist_sq > 0.0001 {
        let dist = dist_sq.sqrt();
        let normal = delta / dist;
        let point = a.center + normal * a.radius;
        Some(Contact::new(point, normal, min_dist - dist))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_furniture_ignores_furniture() {
        let a = CollisionFilter::furniture();
        let b = CollisionFilter::furniture();
        assert!(!a.collides_with(&b));
        assert!(a.collides_with(&CollisionFilter::static_world()));
        assert!(a.collides_with(&CollisionFilter::prop()));
    }

    #[test]
    fn test_sphere_vs_plane_above() {
        let sphere = Sphere::new(Vec3::new(0.0, 2.0, 0.0), 1.0);
        assert!(sphere_vs_plane(&sphere, &Plane::floor(0.0)).is_none());
    }

    #[test]
    fn test_sphere_vs_plane_colliding() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.5, 0.0), 1.0);
        let contact = sphere_vs_plane(&sphere, &Plane::floor(0.0)).expect("Should collide");
        assert!((contact.penetration - 0.5).abs() < 0.0001);
        assert_eq!(contact.normal, Vec3::Y);
    }

    #[test]
    fn test_aabb_vs_plane_colliding() {
        let aabb = Aabb::from_center_half_extents(Vec3::new(0.0, 0.25, 0.0), Vec3::splat(0.5));
        let contact = aabb_vs_plane(&aabb, &Plane::floor(0.0)).expect("Should collide");
        assert!((contact.penetration - 0.25).abs() < 0.0001);
        assert_eq!(contact.normal, Vec3::Y);
    }

    #[test]
    fn test_aabb_vs_plane_above() {
        let aabb = Aabb::from_center_half_extents(Vec3::new(0.0, 2.0, 0.0), Vec3::splat(0.5));
        assert!(aabb_vs_plane(&aabb, &Plane::floor(0.0)).is_none());
    }

    #[test]
    fn test_sphere_vs_aabb_colliding() {
        let sphere = Sphere::new(Vec3::new(1.0, 0.0, 0.0), 1.0);
        let aabb = Aabb::from_center_half_extents(Vec3::ZERO, Vec3::splat(0.5));
        let contact = sphere_vs_aabb(&sphere, &aabb).expect("Should collide");
        assert!((contact.penetration - 0.5).abs() < 0.0001);
        assert_eq!(contact.normal, Vec3::X);
    }

    #[test]
    fn test_sphere_inside_aabb_escapes_nearest_face() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.4, 0.0), 0.1);
        let aabb = Aabb::from_center_half_extents(Vec3::ZERO, Vec3::splat(0.5));
        let contact = sphere_vs_aabb(&sphere, &aabb).expect("Should collide");
        assert_eq!(contact.normal, Vec3::Y);
    }

    #[test]
    fn test_aabb_vs_aabb_min_axis() {
        let a = Aabb::from_center_half_extents(Vec3::new(0.0, 0.9, 0.0), Vec3::splat(0.5));
        let b = Aabb::from_center_half_extents(Vec3::ZERO, Vec3::splat(0.5));
        let contact = aabb_vs_aabb(&a, &b).expect("Should collide");
        assert_eq!(contact.normal, Vec3::Y);
        assert!((contact.penetration - 0.1).abs() < 0.0001);
    }

    #[test]
    fn test_aabb_vs_aabb_separated() {
        let a = Aabb::from_center_half_extents(Vec3::new(3.0, 0.0, 0.0), Vec3::splat(0.5));
        let b = Aabb::from_center_half_extents(Vec3::ZERO, Vec3::splat(0.5));
        assert!(aabb_vs_aabb(&a, &b).is_none());
    }

    #[test]
    fn test_sphere_vs_sphere() {
        let a = Sphere::new(Vec3::ZERO, 1.0);
        let b = Sphere::new(Vec3::new(1.5, 0.0, 0.0), 1.0);
        let contact = sphere_vs_sphere(&a, &b).expect("Should collide");
        assert_eq!(contact.normal, Vec3::X);
        assert!((contact.penetration - 0.5).abs() < 0.0001);
    }
}
