//! Rays and ray/triangle intersection

use glam::{Mat4, Vec3};

/// A half-line with an origin and a unit direction
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// Create a ray, normalizing the direction
    ///
    /// A zero direction is kept as zero; such a ray hits nothing.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    /// Point at distance `t` along the ray
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Transform the ray by an affine matrix
    ///
    /// The direction is NOT renormalized, so distances measured against the
    /// transformed ray are in the same units as the original one.
    pub fn transformed(&self, matrix: &Mat4) -> Self {
        Self {
            origin: matrix.transform_point3(self.origin),
            direction: matrix.transform_vector3(self.direction),
        }
    }
}

/// Result of a ray/triangle test
#[derive(Clone, Copy, Debug)]
pub struct TriangleHit {
    /// Distance along the ray
    pub t: f32,
    /// Barycentric coordinate of the second vertex
    pub u: f32,
    /// Barycentric coordinate of the third vertex
    pub v: f32,
}

/// Möller-Trumbore ray/triangle intersection
///
/// Triangles are hit from both sides. Hits behind the origin are rejected.
pub fn intersect_triangle(ray: &Ray, v0: Vec3, v1: Vec3, v2: Vec3) -> Option<TriangleHit> {
    const EPSILON: f32 = 1e-7;

    let edge1 = v1 - v0;
    let edge2 = v2 - v0;

    let h = ray.direction.cross(edge2);
    let a = edge1.dot(h);

    // Parallel to the triangle plane
    if a.abs() < EPSILON {
        return None;
    }

    let f = 1.0 / a;
    let s = ray.origin - v0;
    let u = f * s.dot(h);
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(edge1);
    let v = f * ray.direction.dot(q);
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = f * edge2.dot(q);
    if t < EPSILON {
        return None;
    }

    Some(TriangleHit { t, u, v })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ray_normalizes_direction() {
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -5.0));
        assert!((ray.direction.length() - 1.0).abs() < 1e-6);
        assert_eq!(ray.at(2.0), Vec3::new(0.0, 0.0, -2.0));
    }

    #[test]
    fn test_triangle_hit_front() {
        let ray = Ray::new(Vec3::new(0.25, 0.25, 5.0), Vec3::NEG_Z);
        let hit = intersect_triangle(&ray, Vec3::ZERO, Vec3::X, Vec3::Y).expect("should hit");
        assert!((hit.t - 5.0).abs() < 1e-5);
        assert!((hit.u - 0.25).abs() < 1e-5);
        assert!((hit.v - 0.25).abs() < 1e-5);
    }

    #[test]
    fn test_triangle_hit_back_face() {
        let ray = Ray::new(Vec3::new(0.25, 0.25, -5.0), Vec3::Z);
        assert!(intersect_triangle(&ray, Vec3::ZERO, Vec3::X, Vec3::Y).is_some());
    }

    #[test]
    fn test_triangle_miss_outside() {
        let ray = Ray::new(Vec3::new(2.0, 2.0, 5.0), Vec3::NEG_Z);
        assert!(intersect_triangle(&ray, Vec3::ZERO, Vec3::X, Vec3::Y).is_none());
    }

    #[test]
    fn test_triangle_behind_origin() {
        let ray = Ray::new(Vec3::new(0.25, 0.25, 5.0), Vec3::Z);
        assert!(intersect_triangle(&ray, Vec3::ZERO, Vec3::X, Vec3::Y).is_none());
    }

    #[test]
    fn test_transformed_keeps_parameter_scale() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 10.0), Vec3::NEG_Z);
        let scale = Mat4::from_scale(Vec3::splat(0.5));
        let local = ray.transformed(&scale);
        // Point at t=4 in world space maps to the same t in local space
        let world_point = ray.at(4.0);
        let local_point = local.origin + local.direction * 4.0;
        assert!((scale.transform_point3(world_point) - local_point).length() < 1e-5);
    }
}
