//! Ray queries against the scene graph

use roomview_math::{Ray, Topology, Vec3};

use crate::graph::{NodeKey, SceneGraph};

/// One intersected node
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit {
    pub node: NodeKey,
    /// World-space distance from the ray origin
    pub distance: f32,
    pub point: Vec3,
}

/// Intersects rays with every visible triangle mesh in a graph
#[derive(Clone, Copy, Debug)]
pub struct Raycaster {
    pub near: f32,
    pub far: f32,
}

impl Default for Raycaster {
    fn default() -> Self {
        Self {
            near: 0.0,
            far: f32::INFINITY,
        }
    }
}

impl Raycaster {
    pub fn new(near: f32, far: f32) -> Self {
        Self { near, far }
    }

    /// All hits within `[near, far]`, nearest first
    ///
    /// Hidden subtrees and line meshes are skipped. A node is reported at
    /// most once, at its nearest triangle.
    pub fn intersect(&self, graph: &SceneGraph, ray: &Ray) -> Vec<RayHit> {
        let mut hits: Vec<RayHit> = graph
            .drawables()
            .into_iter()
            .filter(|d| d.visual.mesh.topology() == Topology::Triangles)
            .filter_map(|d| {
                let inverse = d.world.inverse();
                if !inverse.is_finite() {
                    return None;
                }
                let local = ray.transformed(&inverse);
                let t = d.visual.mesh.raycast(&local)?;
                (t >= self.near && t <= self.far).then(|| RayHit {
                    node: d.node,
                    distance: t,
                    point: ray.at(t),
                })
            })
            .collect();
        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits
    }

    /// Nearest hit, if any
    pub fn intersect_first(&self, graph: &SceneGraph, ray: &Ray) -> Option<RayHit> {
        self.intersect(graph, ray).into_iter().next()
    }
}
