//! Potted plant loaded from `plant.gltf`
//!
//! The model's origin is at the pot's base; it is shifted down by half the
//! pot height so the object origin sits at the centre of its collision
//! cylinder. The cylinder body is registered only once the model is
//! attached, and until then the plant has no physics at all.

use roomview_core::{CollisionFilter, LoadContext, NodeKey, PhysicsMaterial, RigidBody, SceneNode, Vec3};

use super::{Placement, SceneObject, SpawnContext};

pub const MODEL_FILE: &str = "plant.gltf";

/// Offset of the model under the object origin
pub const MODEL_OFFSET: Vec3 = Vec3::new(0.0, -75.0, 0.0);

pub const MASS: f32 = 5.0;
pub const RADIUS_TOP: f32 = 20.0;
pub const RADIUS_BOTTOM: f32 = 10.0;
pub const HEIGHT: f32 = 150.0;
pub const SEGMENTS: u32 = 12;

#[derive(Clone, Debug)]
pub struct PlantFromFile {
    pub placement: Placement,
}

impl Default for PlantFromFile {
    fn default() -> Self {
        Self {
            placement: Placement::at(Vec3::new(-70.0, 120.0, -50.0)),
        }
    }
}

impl PlantFromFile {
    pub fn new(placement: Placement) -> Self {
        Self { placement }
    }
}

impl SceneObject for PlantFromFile {
    fn spawn(&self, ctx: &mut SpawnContext<'_>, parent: NodeKey) -> NodeKey {
        let node = ctx.graph.add_child(
            parent,
            SceneNode::group("plantFromFile").with_transform(self.placement.transform()),
        );
        let path = ctx.asset_path(MODEL_FILE);
        let id = ctx.loader.request(node, path);
        ctx.loader.when_loaded(id, |ctx| {
            if let Some(model) = ctx.graph.get_mut(ctx.model_root) {
                model.set_position(MODEL_OFFSET);
            }
            for key in ctx.graph.descendants(ctx.model_root) {
                if let Some(node) = ctx.graph.get_mut(key) {
                    node.cast_shadow = node.visual.is_some();
                }
            }
        });
        node
    }

    fn add_physics(&self, ctx: &mut SpawnContext<'_>, node: NodeKey) {
        let Some(id) = ctx.loader.load_for(node) else {
            log::warn!("Plant has no model load; skipping its body");
            return;
        };
        ctx.loader.when_loaded(id, register_body);
    }
}

fn register_body(ctx: &mut LoadContext<'_>) {
    let center = ctx.graph.world_position(ctx.placeholder);
    let body = RigidBody::new_cylinder(center, RADIUS_TOP, RADIUS_BOTTOM, HEIGHT, SEGMENTS)
        .with_mass(MASS)
        .with_material(PhysicsMaterial::CERAMIC)
        .with_filter(CollisionFilter::prop());
    if ctx.graph.attach_body(ctx.placeholder, body, Vec3::ZERO).is_none() {
        log::warn!("Plant body not registered; scene has no physics");
    }
}
