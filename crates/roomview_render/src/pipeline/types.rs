//! GPU-compatible data types for the forward pipeline
//!
//! These types are designed to match the shader layouts in `scene.wgsl`
//! exactly. All types derive Pod and Zeroable for safe GPU buffer operations.

use bytemuck::{Pod, Zeroable};
use roomview_core::{Lighting, Material, PerspectiveCamera};
use roomview_math::{Mat4, MeshData, Topology, Vec3};

/// Maximum point lights uploaded per frame; extra lights are ignored
pub const MAX_POINT_LIGHTS: usize = 4;
/// Maximum spot lights uploaded per frame; extra lights are ignored
pub const MAX_SPOT_LIGHTS: usize = 4;

/// Stride between per-draw uniform blocks (wgpu's dynamic offset alignment)
pub const DRAW_UNIFORM_STRIDE: u64 = 256;

/// A mesh vertex with position and normal
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

impl Vertex {
    /// Interleave a mesh's positions and normals
    pub fn from_mesh(mesh: &MeshData) -> Vec<Self> {
        let normals = mesh.normals();
        mesh.positions()
            .iter()
            .enumerate()
            .map(|(i, p)| Self {
                position: p.to_array(),
                normal: normals.get(i).copied().unwrap_or(Vec3::Y).to_array(),
            })
            .collect()
    }
}

/// A point light; color is premultiplied by intensity
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, Pod, Zeroable)]
pub struct GpuPointLight {
    pub position: [f32; 4],
    pub color: [f32; 4],
}

/// A spot light; `cone` holds (inner cosine, outer cosine, 0, 0)
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, Pod, Zeroable)]
pub struct GpuSpotLight {
    pub position: [f32; 4],
    pub direction: [f32; 4],
    pub color: [f32; 4],
    pub cone: [f32; 4],
}

/// Per-frame uniforms (group 0)
/// Layout: 496 bytes total (must match scene.wgsl FrameUniforms)
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct FrameUniforms {
    /// Projection * view (64 bytes)
    pub view_proj: [[f32; 4]; 4],
    /// Eye position + padding (16 bytes)
    pub camera_position: [f32; 4],
    /// Ambient color premultiplied by intensity + padding (16 bytes)
    pub ambient: [f32; 4],
    /// (point count, spot count, 0, 0) (16 bytes)
    pub light_counts: [u32; 4],
    pub points: [GpuPointLight; MAX_POINT_LIGHTS],
    pub spots: [GpuSpotLight; MAX_SPOT_LIGHTS],
}

impl Default for FrameUniforms {
    fn default() -> Self {
        Self {
            view_proj: Mat4::IDENTITY.to_cols_array_2d(),
            camera_position: [0.0, 0.0, 0.0, 1.0],
            ambient: [0.5, 0.5, 0.5, 0.0],
            light_counts: [0; 4],
            points: [GpuPointLight::default(); MAX_POINT_LIGHTS],
            spots: [GpuSpotLight::default(); MAX_SPOT_LIGHTS],
        }
    }
}

impl FrameUniforms {
    pub fn new(camera: &PerspectiveCamera, lighting: &Lighting) -> Self {
        let mut uniforms = Self {
            view_proj: camera.view_projection().to_cols_array_2d(),
            camera_position: camera.position.extend(1.0).to_array(),
            ambient: premultiply(lighting.ambient.color, lighting.ambient.intensity),
            ..Self::default()
        };

        if lighting.points.len() > MAX_POINT_LIGHTS || lighting.spots.len() > MAX_SPOT_LIGHTS {
            log::debug!(
                "Scene has {} point and {} spot lights; only the first {} of each are shaded",
                lighting.points.len(),
                lighting.spots.len(),
                MAX_POINT_LIGHTS
            );
        }

        let mut point_count = 0;
        for (slot, light) in uniforms.points.iter_mut().zip(&lighting.points) {
            *slot = GpuPointLight {
                position: light.position.extend(1.0).to_array(),
                color: premultiply(light.color, light.intensity),
            };
            point_count += 1;
        }

        let mut spot_count = 0;
        for (slot, light) in uniforms.spots.iter_mut().zip(&lighting.spots) {
            let (inner, outer) = light.cone_cosines();
            *slot = GpuSpotLight {
                position: light.position.extend(1.0).to_array(),
                direction: light.direction().extend(0.0).to_array(),
                color: premultiply(light.color, light.intensity),
                cone: [inner, outer, 0.0, 0.0],
            };
            spot_count += 1;
        }

        uniforms.light_counts = [point_count, spot_count, 0, 0];
        uniforms
    }
}

/// Per-draw uniforms (group 1, dynamic offset)
/// Layout: 160 bytes, padded to [`DRAW_UNIFORM_STRIDE`] in the buffer
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct DrawUniforms {
    /// Model matrix (64 bytes)
    pub model: [[f32; 4]; 4],
    /// Inverse-transpose of the model matrix (64 bytes)
    pub normal_matrix: [[f32; 4]; 4],
    /// RGBA base color (16 bytes)
    pub base_color: [f32; 4],
    /// Emissive rgb, w = 1.0 for unlit (16 bytes)
    pub emissive: [f32; 4],
}

impl DrawUniforms {
    pub fn new(world: Mat4, material: &Material, topology: Topology) -> Self {
        let normal = if world.determinant().abs() > f32::EPSILON {
            world.inverse().transpose()
        } else {
            Mat4::IDENTITY
        };
        // Lines have no normals to shade
        let unlit = material.unlit || topology == Topology::Lines;
        let [r, g, b] = material.emissive;
        Self {
            model: world.to_cols_array_2d(),
            normal_matrix: normal.to_cols_array_2d(),
            base_color: material.base_color,
            emissive: [r, g, b, if unlit { 1.0 } else { 0.0 }],
        }
    }
}

fn premultiply(color: [f32; 3], intensity: f32) -> [f32; 4] {
    let k = intensity.max(0.0);
    [color[0] * k, color[1] * k, color[2] * k, 0.0]
}

#[cfg(test)]
mod tests {
    use super::*;
    use roomview_core::{PointLight, SpotLight};
    use roomview_math::primitives;
    use std::mem::size_of;

    #[test]
    fn test_vertex_size() {
        // 3 floats position + 3 floats normal = 24 bytes
        assert_eq!(size_of::<Vertex>(), 24);
    }

    #[test]
    fn test_frame_uniforms_size() {
        // 16 + 4 + 4 + 4 floats, 4 point lights * 8 floats, 4 spot lights * 16 floats
        assert_eq!(size_of::<FrameUniforms>(), 496);
    }

    #[test]
    fn test_draw_uniforms_fit_stride() {
        assert_eq!(size_of::<DrawUniforms>(), 160);
        assert!(size_of::<DrawUniforms>() as u64 <= DRAW_UNIFORM_STRIDE);
    }

    #[test]
    fn test_alignment() {
        assert_eq!(std::mem::align_of::<Vertex>(), 4);
        assert_eq!(std::mem::align_of::<FrameUniforms>(), 4);
        assert_eq!(std::mem::align_of::<DrawUniforms>(), 4);
    }

    #[test]
    fn test_lights_are_packed_and_counted() {
        let mut lighting = Lighting::default();
        lighting.points.push(PointLight::new(Vec3::new(15.0, 20.0, 20.0), 2.0));
        lighting.spots.push(SpotLight::default());

        let uniforms = FrameUniforms::new(&PerspectiveCamera::default(), &lighting);
        assert_eq!(uniforms.light_counts, [1, 1, 0, 0]);
        assert_eq!(uniforms.points[0].position, [15.0, 20.0, 20.0, 1.0]);
        assert_eq!(uniforms.points[0].color[0], 2.0);
        let (inner, outer) = SpotLight::default().cone_cosines();
        assert_eq!(uniforms.spots[0].cone, [inner, outer, 0.0, 0.0]);
    }

    #[test]
    fn test_extra_lights_are_dropped() {
        let mut lighting = Lighting::default();
        for i in 0..(MAX_POINT_LIGHTS + 3) {
            lighting.points.push(PointLight::new(Vec3::splat(i as f32), 1.0));
        }
        let uniforms = FrameUniforms::new(&PerspectiveCamera::default(), &lighting);
        assert_eq!(uniforms.light_counts[0] as usize, MAX_POINT_LIGHTS);
    }

    #[test]
    fn test_line_draws_are_unlit() {
        let lines = DrawUniforms::new(Mat4::IDENTITY, &Material::WHITE, Topology::Lines);
        assert_eq!(lines.emissive[3], 1.0);
        let lit = DrawUniforms::new(Mat4::IDENTITY, &Material::WHITE, Topology::Triangles);
        assert_eq!(lit.emissive[3], 0.0);
    }

    #[test]
    fn test_degenerate_scale_keeps_identity_normals() {
        let flat = Mat4::from_scale(Vec3::new(1.0, 0.0, 1.0));
        let uniforms = DrawUniforms::new(flat, &Material::WHITE, Topology::Triangles);
        assert_eq!(uniforms.normal_matrix, Mat4::IDENTITY.to_cols_array_2d());
    }

    #[test]
    fn test_line_mesh_vertices_default_normal() {
        let edges = primitives::wireframe(&primitives::cuboid(1.0, 1.0, 1.0));
        let vertices = Vertex::from_mesh(&edges);
        assert_eq!(vertices.len(), edges.positions().len());
        assert!(vertices.iter().all(|v| v.normal == [0.0, 1.0, 0.0]));
    }
}
