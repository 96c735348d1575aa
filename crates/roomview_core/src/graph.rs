//! Scene graph
//!
//! The SceneGraph owns every node of a scene in a generational slot map,
//! arranged as a tree under a single root. It also owns the optional
//! physics world and the scene lighting.

use roomview_math::{Mat4, Vec3};
use roomview_physics::{BodyKey, PhysicsConfig, PhysicsWorld, RigidBody};
use slotmap::{new_key_type, SlotMap};

use crate::light::Lighting;
use crate::node::{DirtyFlags, SceneNode, Visual};

new_key_type! {
    /// Key to a node in the scene graph
    pub struct NodeKey;
}

/// A visible mesh node with its resolved world matrix
#[derive(Clone, Copy, Debug)]
pub struct Drawable<'a> {
    pub node: NodeKey,
    pub world: Mat4,
    pub visual: &'a Visual,
    pub cast_shadow: bool,
    pub receive_shadow: bool,
}

/// Hierarchical container for all scene nodes
pub struct SceneGraph {
    nodes: SlotMap<NodeKey, SceneNode>,
    root: NodeKey,
    physics_world: Option<PhysicsWorld>,
    pub lighting: Lighting,
    /// Clear color as RGBA
    pub background: [f32; 4],
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneGraph {
    pub fn new() -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(SceneNode::group("root"));
        Self {
            nodes,
            root,
            physics_world: None,
            lighting: Lighting::default(),
            background: [0.0, 0.0, 0.0, 1.0],
        }
    }

    /// Enable physics for this scene
    pub fn with_physics(mut self, config: PhysicsConfig) -> Self {
        self.physics_world = Some(PhysicsWorld::with_config(config));
        self
    }

    pub fn physics(&self) -> Option<&PhysicsWorld> {
        self.physics_world.as_ref()
    }

    pub fn physics_mut(&mut self) -> Option<&mut PhysicsWorld> {
        self.physics_world.as_mut()
    }

    pub fn root(&self) -> NodeKey {
        self.root
    }

    /// Add a node directly under the root
    pub fn add(&mut self, node: SceneNode) -> NodeKey {
        self.add_child(self.root, node)
    }

    /// Add a node under `parent`
    ///
    /// A stale parent key attaches the node under the root instead.
    pub fn add_child(&mut self, parent: NodeKey, mut node: SceneNode) -> NodeKey {
        let parent = if self.nodes.contains_key(parent) {
            parent
        } else {
            log::warn!("add_child: parent no longer exists, attaching {:?} to root", node.name);
            self.root
        };
        node.parent = Some(parent);
        node.children.clear();
        let key = self.nodes.insert(node);
        self.nodes[parent].children.push(key);
        key
    }

    pub fn get(&self, key: NodeKey) -> Option<&SceneNode> {
        self.nodes.get(key)
    }

    pub fn get_mut(&mut self, key: NodeKey) -> Option<&mut SceneNode> {
        self.nodes.get_mut(key)
    }

    pub fn contains(&self, key: NodeKey) -> bool {
        self.nodes.contains_key(key)
    }

    /// Number of nodes including the root
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeKey, &SceneNode)> + '_ {
        self.nodes.iter()
    }

    /// First node with the given name, searching the whole graph
    pub fn find_by_name(&self, name: &str) -> Option<NodeKey> {
        self.find_in_subtree(self.root, name)
    }

    /// First node with the given name within `start`'s subtree (inclusive), depth first
    pub fn find_in_subtree(&self, start: NodeKey, name: &str) -> Option<NodeKey> {
        self.descendants(start)
            .into_iter()
            .find(|&key| self.nodes[key].name.as_deref() == Some(name))
    }

    /// `start` followed by its descendants, depth first in child order
    pub fn descendants(&self, start: NodeKey) -> Vec<NodeKey> {
        let mut out = Vec::new();
        if !self.nodes.contains_key(start) {
            return out;
        }
        let mut stack = vec![start];
        while let Some(key) = stack.pop() {
            out.push(key);
            stack.extend(self.nodes[key].children.iter().rev().copied());
        }
        out
    }

    /// `key` followed by its parent chain up to the root
    pub fn ancestors(&self, key: NodeKey) -> impl Iterator<Item = NodeKey> + '_ {
        std::iter::successors(self.nodes.contains_key(key).then_some(key), move |&k| {
            self.nodes.get(k).and_then(|n| n.parent)
        })
    }

    /// Product of all transforms from the root down to `key`
    pub fn world_matrix(&self, key: NodeKey) -> Mat4 {
        self.ancestors(key)
            .fold(Mat4::IDENTITY, |acc, k| self.nodes[k].transform.to_matrix() * acc)
    }

    /// World-space position of a node's origin
    pub fn world_position(&self, key: NodeKey) -> Vec3 {
        self.world_matrix(key).transform_point3(Vec3::ZERO)
    }

    /// True if the node and every ancestor are visible
    pub fn is_visible(&self, key: NodeKey) -> bool {
        self.ancestors(key).all(|k| self.nodes[k].visible)
    }

    /// Every visible mesh node with its world matrix, in tree order
    pub fn drawables(&self) -> Vec<Drawable<'_>> {
        let mut out = Vec::new();
        let mut stack = vec![(self.root, Mat4::IDENTITY)];
        while let Some((key, parent_world)) = stack.pop() {
            let node = &self.nodes[key];
            if !node.visible {
                continue;
            }
            let world = parent_world * node.transform.to_matrix();
            if let Some(visual) = node.visual.as_ref() {
                out.push(Drawable {
                    node: key,
                    world,
                    visual,
                    cast_shadow: node.cast_shadow,
                    receive_shadow: node.receive_shadow,
                });
            }
            stack.extend(node.children.iter().rev().map(|&child| (child, world)));
        }
        out
    }

    /// Register a rigid body for a node and link them
    ///
    /// `offset` is the body center relative to the node origin. Returns
    /// `None` (and logs) if the scene has no physics or the node is gone.
    pub fn attach_body(&mut self, key: NodeKey, body: RigidBody, offset: Vec3) -> Option<BodyKey> {
        if !self.nodes.contains_key(key) {
            log::warn!("attach_body: node no longer exists");
            return None;
        }
        let Some(physics) = self.physics_world.as_mut() else {
            log::warn!("attach_body: scene has no physics world");
            return None;
        };
        let body_key = physics.add_body(body);
        self.nodes[key].physics = Some(crate::node::PhysicsLink { body: body_key, offset });
        Some(body_key)
    }

    /// Step physics and sync linked node transforms from their bodies
    ///
    /// Returns the number of fixed sub-steps run. A scene without physics
    /// does nothing and returns 0.
    pub fn step_physics(&mut self, dt: f32) -> u32 {
        let Some(physics) = self.physics_world.as_mut() else {
            return 0;
        };
        let substeps = physics.step(dt);

        let links: Vec<(NodeKey, Vec3)> = self
            .nodes
            .iter()
            .filter_map(|(key, node)| {
                let link = node.physics?;
                let body = physics.get_body(link.body)?;
                Some((key, body.position - link.offset))
            })
            .collect();

        for (key, world_origin) in links {
            let parent_world = self.nodes[key]
                .parent
                .map(|p| self.world_matrix(p))
                .unwrap_or(Mat4::IDENTITY);
            let local = parent_world.inverse().transform_point3(world_origin);
            let node = &mut self.nodes[key];
            if node.transform.position != local {
                node.set_position(local);
            }
        }
        substeps
    }

    /// Clear dirty flags on every node
    pub fn clear_dirty(&mut self) {
        for (_key, node) in &mut self.nodes {
            node.clear_dirty();
        }
    }

    /// Whether anything changed since the last `clear_dirty`
    pub fn has_dirty(&self) -> bool {
        self.nodes.values().any(|n| n.dirty_flags() != DirtyFlags::NONE)
    }
}
