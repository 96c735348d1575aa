//! Television loaded from `television.gltf`
//!
//! Once loaded, every mesh casts and receives shadows and all clips in the
//! file play on one fresh mixer bound to the model.

use roomview_core::{AnimationMixer, LoadContext, NodeKey, SceneNode, Vec3};

use super::{Placement, SceneObject, SpawnContext};

pub const MODEL_FILE: &str = "television.gltf";

#[derive(Clone, Debug)]
pub struct TelevisionFromFile {
    pub placement: Placement,
}

impl Default for TelevisionFromFile {
    fn default() -> Self {
        Self {
            placement: Placement::at(Vec3::new(30.0, 55.0, 0.0)).with_yaw(-10.0),
        }
    }
}

impl TelevisionFromFile {
    pub fn new(placement: Placement) -> Self {
        Self { placement }
    }
}

impl SceneObject for TelevisionFromFile {
    fn spawn(&self, ctx: &mut SpawnContext<'_>, parent: NodeKey) -> NodeKey {
        let node = ctx.graph.add_child(
            parent,
            SceneNode::group("televisionFromFile").with_transform(self.placement.transform()),
        );
        let path = ctx.asset_path(MODEL_FILE);
        let id = ctx.loader.request(node, path);
        ctx.loader.when_loaded(id, on_loaded);
        node
    }
}

fn on_loaded(ctx: &mut LoadContext<'_>) {
    for key in ctx.graph.descendants(ctx.model_root) {
        if let Some(node) = ctx.graph.get_mut(key) {
            if node.visual.is_some() {
                node.cast_shadow = true;
                node.receive_shadow = true;
            }
        }
    }

    if ctx.asset.clips.is_empty() {
        return;
    }
    let mut mixer = AnimationMixer::new(ctx.model_root);
    for clip in &ctx.asset.clips {
        mixer.play(clip.clone());
    }
    log::info!("Playing {} animation clip(s) on {}", ctx.asset.clips.len(), ctx.asset.name);
    ctx.mixers.push(mixer);
}
