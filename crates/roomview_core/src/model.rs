//! Models imported from glTF
//!
//! A ModelAsset is a plain, thread-safe copy of a glTF scene: a node tree
//! with transforms and meshes, plus its animation clips. It holds no scene
//! graph keys, so it can be built on a worker thread and instantiated into
//! a [`SceneGraph`] later.

use std::path::Path;
use std::sync::Arc;

use gltf::animation::util::ReadOutputs;
use gltf::animation::{Interpolation as GltfInterpolation, Property};
use gltf::mesh::Mode;
use roomview_math::{Aabb, Mat4, MeshData, Quat, Vec3};

use crate::animation::{AnimationClip, Interpolation, Track, TrackValues};
use crate::asset_cache::Asset;
use crate::asset_error::AssetError;
use crate::graph::{NodeKey, SceneGraph};
use crate::node::{Material, SceneNode, Visual};
use crate::Transform;

/// One node of an imported model
#[derive(Clone, Debug)]
pub struct ModelNode {
    pub name: String,
    pub transform: Transform,
    pub primitives: Vec<(Arc<MeshData>, Material)>,
    /// Indices into [`ModelAsset::nodes`]
    pub children: Vec<usize>,
}

/// An imported model, ready to be instantiated
#[derive(Clone, Debug)]
pub struct ModelAsset {
    pub name: String,
    pub nodes: Vec<ModelNode>,
    /// Top-level nodes of the scene
    pub roots: Vec<usize>,
    pub clips: Vec<Arc<AnimationClip>>,
}

impl ModelAsset {
    /// Import the default scene (or the first scene) of a glTF file
    pub fn from_gltf(path: impl AsRef<Path>) -> Result<Self, AssetError> {
        let path = path.as_ref();
        let (document, buffers, _images) = gltf::import(path)?;
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "model".to_string());

        let nodes = document
            .nodes()
            .map(|node| read_node(&node, &buffers))
            .collect::<Result<Vec<_>, _>>()?;

        let scene = document
            .default_scene()
            .or_else(|| document.scenes().next())
            .ok_or_else(|| AssetError::Parse(format!("{} has no scenes", path.display())))?;
        let roots = scene.nodes().map(|n| n.index()).collect();

        let clips = document
            .animations()
            .map(|animation| Arc::new(read_animation(&animation, &buffers, &nodes)))
            .collect();

        let model = Self { name, nodes, roots, clips };
        log::info!(
            "Imported model {:?}: {} nodes, {} clips",
            model.name,
            model.nodes.len(),
            model.clips.len()
        );
        Ok(model)
    }

    pub fn mesh_count(&self) -> usize {
        self.nodes.iter().map(|n| n.primitives.len()).sum()
    }

    /// Bounds of all meshes in model space
    pub fn bounds(&self) -> Aabb {
        let mut bounds = Aabb::EMPTY;
        self.walk(|node, world| {
            for (mesh, _) in &node.primitives {
                bounds = bounds.union(&mesh.bounds().transformed(&world));
            }
        });
        bounds
    }

    /// Depth-first visit with each node's model-space matrix
    fn walk(&self, mut visit: impl FnMut(&ModelNode, Mat4)) {
        let mut visited = vec![false; self.nodes.len()];
        let mut stack: Vec<(usize, Mat4)> = self.roots.iter().rev().map(|&i| (i, Mat4::IDENTITY)).collect();
        while let Some((index, parent)) = stack.pop() {
            let Some(node) = self.nodes.get(index) else {
                continue;
            };
            if std::mem::replace(&mut visited[index], true) {
                continue;
            }
            let world = parent * node.transform.to_matrix();
            visit(node, world);
            stack.extend(node.children.iter().rev().map(|&c| (c, world)));
        }
    }

    /// Add the model's node tree to `graph` under `parent`
    ///
    /// Returns the key of a new group node named after the model. Nodes with
    /// several primitives get one child mesh node per primitive.
    pub fn instantiate(&self, graph: &mut SceneGraph, parent: NodeKey) -> NodeKey {
        let root = graph.add_child(parent, SceneNode::group(self.name.clone()));
        let mut visited = vec![false; self.nodes.len()];
        let mut stack: Vec<(usize, NodeKey)> = self.roots.iter().rev().map(|&i| (i, root)).collect();

        while let Some((index, parent)) = stack.pop() {
            let Some(model_node) = self.nodes.get(index) else {
                continue;
            };
            if std::mem::replace(&mut visited[index], true) {
                continue;
            }

            let mut node = SceneNode::group(model_node.name.clone()).with_transform(model_node.transform);
            if let [(mesh, material)] = model_node.primitives.as_slice() {
                node.visual = Some(Visual::new(Arc::clone(mesh), *material));
            }
            let key = graph.add_child(parent, node);

            if model_node.primitives.len() > 1 {
                for (i, (mesh, material)) in model_node.primitives.iter().enumerate() {
                    graph.add_child(
                        key,
                        SceneNode::mesh(Arc::clone(mesh), *material).with_name(format!("{}_primitive_{}", model_node.name, i)),
                    );
                }
            }
            stack.extend(model_node.children.iter().rev().map(|&c| (c, key)));
        }
        root
    }
}

impl Asset for ModelAsset {
    fn load_from_file(path: &Path) -> Result<Self, AssetError> {
        Self::from_gltf(path)
    }
}

fn read_node(node: &gltf::Node, buffers: &[gltf::buffer::Data]) -> Result<ModelNode, AssetError> {
    let (t, r, s) = node.transform().decomposed();
    let name = node
        .name()
        .map(str::to_string)
        .unwrap_or_else(|| format!("node_{}", node.index()));

    let mut primitives = Vec::new();
    if let Some(mesh) = node.mesh() {
        for primitive in mesh.primitives() {
            let reader = primitive.reader(|buffer| buffers.get(buffer.index()).map(|d| &d.0[..]));
            let positions: Vec<Vec3> = reader
                .read_positions()
                .ok_or_else(|| AssetError::Parse(format!("mesh primitive of {name} has no positions")))?
                .map(Vec3::from_array)
                .collect();
            let indices: Vec<u32> = match reader.read_indices() {
                Some(indices) => indices.into_u32().collect(),
                None => (0..positions.len() as u32).collect(),
            };

            let mesh = match primitive.mode() {
                Mode::Triangles => {
                    let normals = reader
                        .read_normals()
                        .map(|n| n.map(Vec3::from_array).collect())
                        .unwrap_or_default();
                    MeshData::triangles(positions, normals, indices)
                }
                Mode::Lines => MeshData::lines(positions, indices),
                other => {
                    log::warn!("skipping {other:?} primitive in {name}");
                    continue;
                }
            };

            let gltf_material = primitive.material();
            let material = Material {
                base_color: gltf_material.pbr_metallic_roughness().base_color_factor(),
                emissive: gltf_material.emissive_factor(),
                unlit: false,
            };
            primitives.push((Arc::new(mesh), material));
        }
    }

    Ok(ModelNode {
        name,
        transform: Transform::from_trs(t, r, s),
        primitives,
        children: node.children().map(|c| c.index()).collect(),
    })
}

fn read_animation(animation: &gltf::Animation, buffers: &[gltf::buffer::Data], nodes: &[ModelNode]) -> AnimationClip {
    let name = animation
        .name()
        .map(str::to_string)
        .unwrap_or_else(|| format!("animation_{}", animation.index()));

    let mut tracks = Vec::new();
    for channel in animation.channels() {
        let target = channel.target();
        let Some(node) = nodes.get(target.node().index()) else {
            continue;
        };
        let reader = channel.reader(|buffer| buffers.get(buffer.index()).map(|d| &d.0[..]));
        let (Some(inputs), Some(outputs)) = (reader.read_inputs(), reader.read_outputs()) else {
            continue;
        };
        let times: Vec<f32> = inputs.collect();

        let (interpolation, cubic) = match channel.sampler().interpolation() {
            GltfInterpolation::Linear => (Interpolation::Linear, false),
            GltfInterpolation::Step => (Interpolation::Step, false),
            // Keep only the keyframe values, dropping tangents
            GltfInterpolation::CubicSpline => (Interpolation::Linear, true),
        };
        let keep = |i: usize| !cubic || i % 3 == 1;

        let values = match (target.property(), outputs) {
            (Property::Translation, ReadOutputs::Translations(v)) => {
                TrackValues::Translation(v.enumerate().filter(|(i, _)| keep(*i)).map(|(_, p)| Vec3::from_array(p)).collect())
            }
            (Property::Rotation, ReadOutputs::Rotations(v)) => TrackValues::Rotation(
                v.into_f32()
                    .enumerate()
                    .filter(|(i, _)| keep(*i))
                    .map(|(_, q)| Quat::from_array(q).normalize())
                    .collect(),
            ),
            (Property::Scale, ReadOutputs::Scales(v)) => {
                TrackValues::Scale(v.enumerate().filter(|(i, _)| keep(*i)).map(|(_, s)| Vec3::from_array(s)).collect())
            }
            (property, _) => {
                log::debug!("clip {name}: ignoring {property:?} channel");
                continue;
            }
        };
        tracks.push(Track::new(node.name.clone(), times, values, interpolation));
    }
    AnimationClip::new(name, tracks)
}
