//! Floor: a 200 x 200 grey plane at y = 0 that receives shadows

use roomview_core::{primitives, Material, NodeKey, PhysicsMaterial, SceneNode, StaticCollider};

use super::{SceneObject, SpawnContext};

pub const FLOOR_SIZE: f32 = 200.0;

#[derive(Clone, Copy, Debug)]
pub struct Floor {
    pub size: f32,
    pub material: PhysicsMaterial,
}

impl Default for Floor {
    fn default() -> Self {
        Self {
            size: FLOOR_SIZE,
            material: PhysicsMaterial::CARPET,
        }
    }
}

impl SceneObject for Floor {
    fn spawn(&self, ctx: &mut SpawnContext<'_>, parent: NodeKey) -> NodeKey {
        ctx.graph.add_child(
            parent,
            SceneNode::mesh(primitives::plane(self.size, self.size), Material::hex(0x888888))
                .with_name("floor")
                .with_shadows(false, true),
        )
    }

    /// The collider is an infinite plane at the floor's height
    fn add_physics(&self, ctx: &mut SpawnContext<'_>, node: NodeKey) {
        let y = ctx.graph.world_position(node).y;
        if let Some(physics) = ctx.graph.physics_mut() {
            physics.add_static_collider(StaticCollider::floor(y, self.material));
        }
    }
}
