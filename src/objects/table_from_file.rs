//! Table loaded from `table.gltf`
//!
//! Physics: a static box collider matching the model's world bounds,
//! registered once the model is attached. It sits on the furniture layer.

use roomview_core::{CollisionFilter, LoadContext, NodeKey, PhysicsMaterial, SceneNode, StaticCollider};

use super::{Placement, SceneObject, SpawnContext};

pub const MODEL_FILE: &str = "table.gltf";

#[derive(Clone, Debug, Default)]
pub struct TableFromFile {
    pub placement: Placement,
}

impl TableFromFile {
    pub fn new(placement: Placement) -> Self {
        Self { placement }
    }
}

impl SceneObject for TableFromFile {
    fn spawn(&self, ctx: &mut SpawnContext<'_>, parent: NodeKey) -> NodeKey {
        let node = ctx.graph.add_child(
            parent,
            SceneNode::group("tableFromFile").with_transform(self.placement.transform()),
        );
        let path = ctx.asset_path(MODEL_FILE);
        let id = ctx.loader.request(node, path);
        ctx.loader.when_loaded(id, |ctx| {
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
            log::warn!("Table has no model load; skipping its collider");
            return;
        };
        ctx.loader.when_loaded(id, register_collider);
    }
}

fn register_collider(ctx: &mut LoadContext<'_>) {
    let bounds = ctx.asset.bounds().transformed(&ctx.graph.world_matrix(ctx.model_root));
    if bounds.is_empty() {
        log::warn!("Table model {} has no geometry; no collider added", ctx.asset.name);
        return;
    }
    let Some(physics) = ctx.graph.physics_mut() else {
        return;
    };
    physics.add_static_collider(
        StaticCollider::platform(bounds.center(), bounds.half_extents(), PhysicsMaterial::WOOD)
            .with_filter(CollisionFilter::furniture()),
    );
    log::debug!("Table collider {:?}..{:?}", bounds.min, bounds.max);
}
