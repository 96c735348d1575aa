//! Scene nodes and materials
//!
//! A SceneNode is one element of the scene graph: a transform, an optional
//! mesh with its material, and optional links to physics and interaction.

use std::fmt;
use std::sync::Arc;

use bitflags::bitflags;
use roomview_math::{MeshData, Quat, Vec3};
use roomview_physics::BodyKey;
use serde::{Deserialize, Serialize};

use crate::graph::NodeKey;
use crate::interaction::Behavior;
use crate::Transform;

bitflags! {
    /// Flags indicating which parts of a node have changed since the last render
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct DirtyFlags: u8 {
        const NONE = 0;
        /// Transform (position, rotation, scale) has changed
        const TRANSFORM = 1 << 0;
        /// Mesh has changed
        const MESH = 1 << 1;
        /// Material has changed
        const MATERIAL = 1 << 2;
        const ALL = Self::TRANSFORM.bits() | Self::MESH.bits() | Self::MATERIAL.bits();
    }
}

/// Lambert surface description
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// Base color as RGBA (each component 0.0-1.0)
    pub base_color: [f32; 4],
    /// Light emitted regardless of scene lighting
    pub emissive: [f32; 3],
    /// Skip lighting entirely (helpers, wireframes)
    pub unlit: bool,
}

impl Default for Material {
    fn default() -> Self {
        Self::WHITE
    }
}

impl Material {
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    pub const GRAY: Self = Self::rgb(0.533, 0.533, 0.533);
    pub const BLACK: Self = Self::rgb(0.02, 0.02, 0.02);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self {
            base_color: [r, g, b, 1.0],
            emissive: [0.0; 3],
            unlit: false,
        }
    }

    /// Opaque material from a 0xRRGGBB literal
    pub fn hex(rgb: u32) -> Self {
        let channel = |shift: u32| ((rgb >> shift) & 0xff) as f32 / 255.0;
        Self::rgb(channel(16), channel(8), channel(0))
    }

    pub fn with_emissive(mut self, emissive: [f32; 3]) -> Self {
        self.emissive = emissive;
        self
    }

    pub fn unlit(mut self) -> Self {
        self.unlit = true;
        self
    }
}

/// Geometry plus the material it is drawn with
#[derive(Clone, Debug)]
pub struct Visual {
    pub mesh: Arc<MeshData>,
    pub material: Material,
}

impl Visual {
    pub fn new(mesh: Arc<MeshData>, material: Material) -> Self {
        Self { mesh, material }
    }
}

/// Connection from a node to the rigid body that drives it
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PhysicsLink {
    pub body: BodyKey,
    /// Body center relative to the node origin, in world axes
    pub offset: Vec3,
}

/// A node in the scene graph
///
/// Each node has:
/// - An optional name (for lookup)
/// - A transform relative to its parent
/// - An optional visual (mesh + material) and shadow flags
/// - An optional physics link and interaction behavior
pub struct SceneNode {
    pub name: Option<String>,
    pub transform: Transform,
    pub visual: Option<Visual>,
    pub cast_shadow: bool,
    pub receive_shadow: bool,
    /// Hidden nodes hide their whole subtree and are not pickable
    pub visible: bool,
    pub physics: Option<PhysicsLink>,
    behavior: Option<Arc<dyn Behavior>>,
    pub(crate) parent: Option<NodeKey>,
    pub(crate) children: Vec<NodeKey>,
    dirty: DirtyFlags,
}

impl Default for SceneNode {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneNode {
    /// An empty grouping node
    pub fn new() -> Self {
        Self {
            name: None,
            transform: Transform::IDENTITY,
            visual: None,
            cast_shadow: false,
            receive_shadow: false,
            visible: true,
            physics: None,
            behavior: None,
            parent: None,
            children: Vec::new(),
            dirty: DirtyFlags::ALL,
        }
    }

    /// A named grouping node
    pub fn group(name: impl Into<String>) -> Self {
        Self::new().with_name(name)
    }

    /// A node drawing `mesh` with `material`
    pub fn mesh(mesh: impl Into<Arc<MeshData>>, material: Material) -> Self {
        let mut node = Self::new();
        node.visual = Some(Visual::new(mesh.into(), material));
        node
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.transform.position = position;
        self
    }

    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.transform.rotation = rotation;
        self
    }

    pub fn with_euler_degrees(mut self, x: f32, y: f32, z: f32) -> Self {
        self.transform = self.transform.with_euler_degrees(x, y, z);
        self
    }

    pub fn with_shadows(mut self, cast: bool, receive: bool) -> Self {
        self.cast_shadow = cast;
        self.receive_shadow = receive;
        self
    }

    /// Attach an interaction behavior, dispatched when the node is clicked
    pub fn with_behavior(mut self, behavior: impl Behavior + 'static) -> Self {
        self.behavior = Some(Arc::new(behavior));
        self
    }

    pub fn behavior(&self) -> Option<&Arc<dyn Behavior>> {
        self.behavior.as_ref()
    }

    pub fn set_behavior(&mut self, behavior: Option<Arc<dyn Behavior>>) {
        self.behavior = behavior;
    }

    pub fn parent(&self) -> Option<NodeKey> {
        self.parent
    }

    pub fn children(&self) -> &[NodeKey] {
        &self.children
    }

    /// Replace the material, if the node has a visual
    pub fn set_material(&mut self, material: Material) {
        if let Some(visual) = self.visual.as_mut() {
            if visual.material != material {
                visual.material = material;
                self.dirty |= DirtyFlags::MATERIAL;
            }
        }
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.transform.position = position;
        self.dirty |= DirtyFlags::TRANSFORM;
    }

    pub fn set_rotation(&mut self, rotation: Quat) {
        self.transform.rotation = rotation;
        self.dirty |= DirtyFlags::TRANSFORM;
    }

    pub fn set_scale(&mut self, scale: Vec3) {
        self.transform.scale = scale;
        self.dirty |= DirtyFlags::TRANSFORM;
    }

    pub fn mark_dirty(&mut self, flags: DirtyFlags) {
        self.dirty |= flags;
    }

    pub fn is_dirty(&self) -> bool {
        !self.dirty.is_empty()
    }

    pub fn dirty_flags(&self) -> DirtyFlags {
        self.dirty
    }

    pub fn clear_dirty(&mut self) {
        self.dirty = DirtyFlags::NONE;
    }
}

impl fmt::Debug for SceneNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SceneNode")
            .field("name", &self.name)
            .field("transform", &self.transform)
            .field("has_visual", &self.visual.is_some())
            .field("behavior", &self.behavior.as_ref().map(|b| b.label()))
            .field("children", &self.children.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interaction::PowerToggle;
    use roomview_math::primitives;

    #[test]
    fn test_new_node_is_dirty() {
        let node = SceneNode::new();
        assert!(node.is_dirty());
        assert_eq!(node.dirty_flags(), DirtyFlags::ALL);
    }

    #[test]
    fn test_set_material_marks_dirty() {
        let mut node = SceneNode::mesh(primitives::cuboid(1.0, 1.0, 1.0), Material::GRAY);
        node.clear_dirty();
        node.set_material(Material::GRAY);
        assert!(!node.is_dirty());
        node.set_material(Material::WHITE);
        assert_eq!(node.dirty_flags(), DirtyFlags::MATERIAL);
    }

    #[test]
    fn test_material_hex() {
        let m = Material::hex(0xff8000);
        assert_eq!(m.base_color[0], 1.0);
        assert!((m.base_color[1] - 128.0 / 255.0).abs() < 1e-6);
        assert_eq!(m.base_color[2], 0.0);
    }

    #[test]
    fn test_builder_chain() {
        let node = SceneNode::group("tv")
            .with_position(Vec3::new(-30.0, 55.0, 0.0))
            .with_shadows(true, false)
            .with_behavior(PowerToggle);
        assert_eq!(node.name.as_deref(), Some("tv"));
        assert!(node.cast_shadow);
        assert_eq!(node.behavior().map(|b| b.label()), Some("power toggle"));
    }
}
