//! Shared test doubles for driving the application without a window

#![allow(dead_code)]

use std::cell::Cell;
use std::path::Path;
use std::sync::mpsc::Receiver;
use std::sync::Arc;

use roomview::config::AppConfig;
use roomview::systems::{AppContext, FrameScheduler};
use roomview_core::{
    primitives, AssetError, Material, ModelAsset, ModelLoader, ModelNode, ModelSource, PerspectiveCamera, SceneGraph,
    Transform, Vec3,
};
use roomview_render::{FrameRenderer, RenderError};

/// Every load fails
pub struct NoModels;

impl ModelSource for NoModels {
    fn load(&mut self, path: &Path) -> Result<Arc<ModelAsset>, AssetError> {
        Err(AssetError::NotFound(path.display().to_string()))
    }
}

/// Hands out a box for every path, once the gate lets it through
pub struct GatedBoxes {
    pub gate: Receiver<()>,
}

impl ModelSource for GatedBoxes {
    fn load(&mut self, path: &Path) -> Result<Arc<ModelAsset>, AssetError> {
        self.gate
            .recv()
            .map_err(|_| AssetError::NotFound(path.display().to_string()))?;
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("model")
            .to_string();
        Ok(Arc::new(ModelAsset {
            name,
            nodes: vec![ModelNode {
                name: "body".to_string(),
                transform: Transform::from_position(Vec3::new(0.0, 20.0, 0.0)),
                primitives: vec![(Arc::new(primitives::cuboid(40.0, 40.0, 40.0)), Material::GRAY)],
                children: Vec::new(),
            }],
            roots: vec![0],
            clips: Vec::new(),
        }))
    }
}

pub fn offline_context() -> AppContext {
    AppContext::with_loader(&AppConfig::default(), ModelLoader::with_source(NoModels))
}

/// What the renderer saw on each call
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderCall {
    /// Physics step calls made before this render
    pub step_calls: u64,
    pub camera_aspect: f32,
}

#[derive(Default)]
pub struct RecordingRenderer {
    pub calls: Vec<RenderCall>,
    pub size: (u32, u32),
    pub resizes: u32,
    pub fail_with: Option<RenderError>,
}

impl FrameRenderer for RecordingRenderer {
    fn render(&mut self, graph: &SceneGraph, camera: &PerspectiveCamera) -> Result<(), RenderError> {
        self.calls.push(RenderCall {
            step_calls: graph.physics().map(|p| p.stats().step_calls).unwrap_or(0),
            camera_aspect: camera.aspect,
        });
        match &self.fail_with {
            Some(e) => Err(e.clone()),
            None => Ok(()),
        }
    }

    fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.size = (width, height);
            self.resizes += 1;
        }
    }

    fn surface_size(&self) -> (u32, u32) {
        self.size
    }
}

#[derive(Default)]
pub struct CountingScheduler {
    pub requests: Cell<u32>,
}

impl FrameScheduler for CountingScheduler {
    fn request_frame(&self) {
        self.requests.set(self.requests.get() + 1);
    }
}
