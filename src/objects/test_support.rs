//! Model sources and fixtures for object tests

use std::path::Path;
use std::sync::Arc;

use roomview_core::{
    primitives, AnimationClip, AssetError, Interpolation, Material, ModelAsset, ModelNode, ModelSource, Track, TrackValues,
    Transform, Vec3,
};

/// Hands out the same model for every path
pub struct FixedSource {
    model: Arc<ModelAsset>,
}

impl FixedSource {
    pub fn new(model: ModelAsset) -> Self {
        Self { model: Arc::new(model) }
    }
}

impl ModelSource for FixedSource {
    fn load(&mut self, _path: &Path) -> Result<Arc<ModelAsset>, AssetError> {
        Ok(Arc::clone(&self.model))
    }
}

/// Fails every load
pub struct MissingSource;

impl ModelSource for MissingSource {
    fn load(&mut self, path: &Path) -> Result<Arc<ModelAsset>, AssetError> {
        Err(AssetError::NotFound(path.display().to_string()))
    }
}

/// A single box of the given size, base at the model origin
pub fn box_model(name: &str, size: Vec3) -> ModelAsset {
    ModelAsset {
        name: name.to_string(),
        nodes: vec![ModelNode {
            name: "body".to_string(),
            transform: Transform::from_position(Vec3::new(0.0, size.y * 0.5, 0.0)),
            primitives: vec![(Arc::new(primitives::cuboid(size.x, size.y, size.z)), Material::hex(0x8b5a2b))],
            children: Vec::new(),
        }],
        roots: vec![0],
        clips: Vec::new(),
    }
}

/// body -> screen, with a clip moving the screen
pub fn model_with_clip(name: &str) -> ModelAsset {
    let clip = AnimationClip::new(
        "bob",
        vec![Track::new(
            "screen",
            vec![0.0, 1.0],
            TrackValues::Translation(vec![Vec3::ZERO, Vec3::Y]),
            Interpolation::Linear,
        )],
    );
    ModelAsset {
        name: name.to_string(),
        nodes: vec![
            ModelNode {
                name: "body".to_string(),
                transform: Transform::IDENTITY,
                primitives: vec![(Arc::new(primitives::cuboid(40.0, 30.0, 30.0)), Material::GRAY)],
                children: vec![1],
            },
            ModelNode {
                name: "screen".to_string(),
                transform: Transform::IDENTITY,
                primitives: vec![(Arc::new(primitives::plane(30.0, 20.0)), Material::BLACK)],
                children: Vec::new(),
            },
        ],
        roots: vec![0],
        clips: vec![Arc::new(clip)],
    }
}
