//! CPU-side mesh data
//!
//! Meshes are pure geometry: positions, normals and an index list. Colours
//! and other surface properties live on the scene node's material.

use std::sync::atomic::{AtomicU64, Ordering};

use glam::Vec3;

use crate::{intersect_triangle, Aabb, Ray};

static NEXT_MESH_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a mesh
///
/// The renderer keys its GPU buffer cache on this, so two nodes sharing an
/// `Arc<MeshData>` upload the geometry once.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MeshId(u64);

impl MeshId {
    fn next() -> Self {
        Self(NEXT_MESH_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw numeric value
    pub fn get(&self) -> u64 {
        self.0
    }
}

/// How the index list is interpreted
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Topology {
    /// Every three indices form a triangle
    #[default]
    Triangles,
    /// Every two indices form a line segment
    Lines,
}

/// Indexed geometry with precomputed local bounds
#[derive(Clone, Debug)]
pub struct MeshData {
    id: MeshId,
    topology: Topology,
    positions: Vec<Vec3>,
    normals: Vec<Vec3>,
    indices: Vec<u32>,
    bounds: Aabb,
}

impl MeshData {
    /// Create a triangle mesh
    ///
    /// If `normals` does not match `positions` in length, flat per-vertex
    /// normals are computed from the triangles instead.
    pub fn triangles(positions: Vec<Vec3>, normals: Vec<Vec3>, indices: Vec<u32>) -> Self {
        let normals = if normals.len() == positions.len() {
            normals
        } else {
            compute_normals(&positions, &indices)
        };
        Self::build(Topology::Triangles, positions, normals, indices)
    }

    /// Create a line-list mesh
    pub fn lines(positions: Vec<Vec3>, indices: Vec<u32>) -> Self {
        let normals = vec![Vec3::Y; positions.len()];
        Self::build(Topology::Lines, positions, normals, indices)
    }

    fn build(topology: Topology, positions: Vec<Vec3>, normals: Vec<Vec3>, mut indices: Vec<u32>) -> Self {
        let stride = match topology {
            Topology::Triangles => 3,
            Topology::Lines => 2,
        };
        // Drop a trailing partial primitive and any out-of-range index
        let vertex_count = positions.len() as u32;
        indices.truncate(indices.len() - indices.len() % stride);
        if indices.iter().any(|&i| i >= vertex_count) {
            indices.clear();
        }

        let bounds = Aabb::from_points(&positions);
        Self {
            id: MeshId::next(),
            topology,
            positions,
            normals,
            indices,
            bounds,
        }
    }

    pub fn id(&self) -> MeshId {
        self.id
    }

    pub fn topology(&self) -> Topology {
        self.topology
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Bounds in the mesh's own coordinate frame
    pub fn bounds(&self) -> Aabb {
        self.bounds
    }

    /// Number of triangles (zero for line meshes)
    pub fn triangle_count(&self) -> usize {
        match self.topology {
            Topology::Triangles => self.indices.len() / 3,
            Topology::Lines => 0,
        }
    }

    /// Iterate over triangles as vertex triples
    pub fn triangles_iter(&self) -> impl Iterator<Item = [Vec3; 3]> + '_ {
        let chunks = match self.topology {
            Topology::Triangles => self.indices.chunks_exact(3),
            Topology::Lines => self.indices[..0].chunks_exact(3),
        };
        chunks.map(move |tri| {
            [
                self.positions[tri[0] as usize],
                self.positions[tri[1] as usize],
                self.positions[tri[2] as usize],
            ]
        })
    }

    /// Nearest hit distance of a ray expressed in mesh-local space
    ///
    /// Line meshes are never hit.
    pub fn raycast(&self, ray: &Ray) -> Option<f32> {
        self.bounds.intersect_ray(ray)?;
        self.triangles_iter()
            .filter_map(|[a, b, c]| intersect_triangle(ray, a, b, c))
            .map(|hit| hit.t)
            .min_by(|a, b| a.total_cmp(b))
    }
}

/// Area-weighted vertex normals
fn compute_normals(positions: &[Vec3], indices: &[u32]) -> Vec<Vec3> {
    let mut normals = vec![Vec3::ZERO; positions.len()];
    for tri in indices.chunks_exact(3) {
        let (a, b, c) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
        if a >= positions.len() || b >= positions.len() || c >= positions.len() {
            continue;
        }
        let n = (positions[b] - positions[a]).cross(positions[c] - positions[a]);
        normals[a] += n;
        normals[b] += n;
        normals[c] += n;
    }
    normals
        .into_iter()
        .map(|n| n.try_normalize().unwrap_or(Vec3::Y))
        .collect()
}
