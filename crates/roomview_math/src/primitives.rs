//! Procedural mesh builders
//!
//! All builders produce meshes centered on the origin with +Y up, so a
//! node's position is the center of its geometry.

use std::collections::BTreeSet;
use std::f32::consts::{PI, TAU};

use glam::Vec3;

use crate::MeshData;

/// Axis-aligned box with the given full extents
pub fn cuboid(width: f32, height: f32, depth: f32) -> MeshData {
    let h = Vec3::new(width, height, depth) * 0.5;
    // (normal, tangent u, tangent v) per face; u x v == normal keeps CCW winding
    let faces = [
        (Vec3::X, Vec3::NEG_Z, Vec3::Y),
        (Vec3::NEG_X, Vec3::Z, Vec3::Y),
        (Vec3::Y, Vec3::X, Vec3::NEG_Z),
        (Vec3::NEG_Y, Vec3::X, Vec3::Z),
        (Vec3::Z, Vec3::X, Vec3::Y),
        (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
    ];

    let mut positions = Vec::with_capacity(24);
    let mut normals = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);
    for (normal, u, v) in faces {
        let base = positions.len() as u32;
        for (su, sv) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
            positions.push((normal + u * su + v * sv) * h);
            normals.push(normal);
        }
        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }
    MeshData::triangles(positions, normals, indices)
}

/// Horizontal plane in XZ facing +Y
pub fn plane(width: f32, depth: f32) -> MeshData {
    let (hw, hd) = (width * 0.5, depth * 0.5);
    let positions = vec![
        Vec3::new(-hw, 0.0, hd),
        Vec3::new(hw, 0.0, hd),
        Vec3::new(hw, 0.0, -hd),
        Vec3::new(-hw, 0.0, -hd),
    ];
    MeshData::triangles(positions, vec![Vec3::Y; 4], vec![0, 1, 2, 0, 2, 3])
}

/// UV sphere
pub fn sphere(radius: f32, segments: u32, rings: u32) -> MeshData {
    let segments = segments.max(3);
    let rings = rings.max(2);

    let mut positions = Vec::new();
    let mut normals = Vec::new();
    for ring in 0..=rings {
        let phi = PI * ring as f32 / rings as f32;
        for seg in 0..=segments {
            let theta = TAU * seg as f32 / segments as f32;
            let n = Vec3::new(phi.sin() * theta.cos(), phi.cos(), -phi.sin() * theta.sin());
            positions.push(n * radius);
            normals.push(n);
        }
    }

    let stride = segments + 1;
    let mut indices = Vec::new();
    for ring in 0..rings {
        for seg in 0..segments {
            let a = ring * stride + seg;
            let b = a + stride;
            indices.extend_from_slice(&[a, b, a + 1, a + 1, b, b + 1]);
        }
    }
    MeshData::triangles(positions, normals, indices)
}

/// Capped cylinder (or truncated cone) along Y
pub fn cylinder(radius_top: f32, radius_bottom: f32, height: f32, segments: u32) -> MeshData {
    let segments = segments.max(3);
    let half = height * 0.5;

    let mut positions = Vec::new();
    let mut normals = Vec::new();
    let mut indices = Vec::new();

    // Side wall; slope accounts for cone-shaped cylinders
    let slope = (radius_bottom - radius_top) / height.max(f32::EPSILON);
    for seg in 0..=segments {
        let theta = TAU * seg as f32 / segments as f32;
        let (s, c) = theta.sin_cos();
        let dir = Vec3::new(c, 0.0, -s);
        let normal = Vec3::new(c, slope, -s).normalize();
        positions.push(dir * radius_top + Vec3::Y * half);
        normals.push(normal);
        positions.push(dir * radius_bottom - Vec3::Y * half);
        normals.push(normal);
    }
    for seg in 0..segments {
        let top = seg * 2;
        let bottom = top + 1;
        indices.extend_from_slice(&[top, bottom, top + 2, top + 2, bottom, bottom + 2]);
    }

    // Caps as triangle fans
    for (y, radius, normal) in [(half, radius_top, Vec3::Y), (-half, radius_bottom, Vec3::NEG_Y)] {
        if radius <= 0.0 {
            continue;
        }
        let center = positions.len() as u32;
        positions.push(Vec3::Y * y);
        normals.push(normal);
        for seg in 0..=segments {
            let theta = TAU * seg as f32 / segments as f32;
            let (s, c) = theta.sin_cos();
            positions.push(Vec3::new(c * radius, y, -s * radius));
            normals.push(normal);
        }
        for seg in 0..segments {
            let a = center + 1 + seg;
            if normal.y > 0.0 {
                indices.extend_from_slice(&[center, a, a + 1]);
            } else {
                indices.extend_from_slice(&[center, a + 1, a]);
            }
        }
    }
    MeshData::triangles(positions, normals, indices)
}

/// Single line segment
pub fn line_segment(from: Vec3, to: Vec3) -> MeshData {
    MeshData::lines(vec![from, to], vec![0, 1])
}

/// Edge list of a triangle mesh, each shared edge emitted once
pub fn wireframe(mesh: &MeshData) -> MeshData {
    let mut edges = BTreeSet::new();
    for tri in mesh.indices().chunks_exact(3) {
        for (a, b) in [(tri[0], tri[1]), (tri[1], tri[2]), (tri[2], tri[0])] {
            edges.insert((a.min(b), a.max(b)));
        }
    }
    let indices = edges.into_iter().flat_map(|(a, b)| [a, b]).collect();
    MeshData::lines(mesh.positions().to_vec(), indices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Ray, Topology};

    #[test]
    fn test_cuboid_bounds_and_counts() {
        let mesh = cuboid(2.0, 4.0, 6.0);
        assert_eq!(mesh.triangle_count(), 12);
        assert_eq!(mesh.bounds().min, Vec3::new(-1.0, -2.0, -3.0));
        assert_eq!(mesh.bounds().max, Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_cuboid_winding_faces_outward() {
        let mesh = cuboid(1.0, 1.0, 1.0);
        for [a, b, c] in mesh.triangles_iter() {
            let face_normal = (b - a).cross(c - a);
            let centroid = (a + b + c) / 3.0;
            assert!(face_normal.dot(centroid) > 0.0);
        }
    }

    #[test]
    fn test_plane_is_flat() {
        let mesh = plane(40.0, 40.0);
        assert_eq!(mesh.bounds().min.y, 0.0);
        assert_eq!(mesh.bounds().max.y, 0.0);
        let ray = Ray::new(Vec3::new(5.0, 10.0, 5.0), Vec3::NEG_Y);
        assert!((mesh.raycast(&ray).expect("should hit") - 10.0).abs() < 1e-5);
    }

    #[test]
    fn test_sphere_radius() {
        let mesh = sphere(5.0, 16, 8);
        for p in mesh.positions() {
            assert!((p.length() - 5.0).abs() < 1e-4);
        }
        let ray = Ray::new(Vec3::new(0.3, 0.2, 20.0), Vec3::NEG_Z);
        let t = mesh.raycast(&ray).expect("should hit");
        // Faceted surface sits slightly inside the true sphere
        assert!(t > 14.9 && t < 15.5);
    }

    #[test]
    fn test_cylinder_bounds() {
        let mesh = cylinder(20.0, 10.0, 150.0, 12);
        let bounds = mesh.bounds();
        assert!((bounds.max.y - 75.0).abs() < 1e-4);
        assert!((bounds.min.y + 75.0).abs() < 1e-4);
        assert!((bounds.max.x - 20.0).abs() < 1e-4);
    }

    #[test]
    fn test_wireframe_deduplicates_edges() {
        let mesh = plane(1.0, 1.0);
        let wire = wireframe(&mesh);
        assert_eq!(wire.topology(), Topology::Lines);
        // Two triangles share one diagonal: 5 unique edges
        assert_eq!(wire.indices().len(), 10);
    }
}
