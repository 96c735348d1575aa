//! Application context
//!
//! All scene and interaction state lives in one [`AppContext`], owned by
//! the application and passed by reference to each system.

use std::path::PathBuf;

use roomview_core::{
    AnimationMixer, DispatchOutcome, InteractionDispatcher, InteractionState, LayoutError, ModelLoader,
    PerspectiveCamera, SceneGraph, SceneLayout, TweenManager, Vec2,
};
use roomview_input::{OrbitController, PointerTracker};
use winit::event::{ElementState, MouseButton};

use crate::config::AppConfig;
use crate::objects::TvRig;
use crate::scene::{BuiltScene, SceneBuilder};

pub struct AppContext {
    pub graph: SceneGraph,
    pub camera: PerspectiveCamera,
    pub orbit: OrbitController,
    pub pointer: PointerTracker,
    pub interaction: InteractionState,
    pub dispatcher: InteractionDispatcher,
    pub tweens: TweenManager,
    pub mixers: Vec<AnimationMixer>,
    pub loader: ModelLoader,
    pub tv: Option<TvRig>,
    layout_file: Option<PathBuf>,
}

impl AppContext {
    /// Build the configured scene, loading models from disk
    pub fn new(config: &AppConfig) -> Self {
        Self::with_loader(config, ModelLoader::new())
    }

    pub fn with_loader(config: &AppConfig, loader: ModelLoader) -> Self {
        Self::from_scene(SceneBuilder::from_config(config, loader), config)
    }

    pub fn from_scene(scene: BuiltScene, config: &AppConfig) -> Self {
        let input = &config.input;
        let mut orbit = OrbitController::new()
            .with_rotate_sensitivity(input.rotate_sensitivity)
            .with_distance_limits(input.min_distance, input.max_distance)
            .with_smoothing(input.smoothing_enabled);
        orbit.set_home(scene.camera.position, scene.camera.target);

        let pointer = PointerTracker::new(config.window.width, config.window.height)
            .with_click_tolerance(input.click_tolerance);

        Self {
            graph: scene.graph,
            camera: scene.camera,
            orbit,
            pointer,
            interaction: InteractionState::new(),
            dispatcher: InteractionDispatcher::new(),
            tweens: TweenManager::new(),
            mixers: Vec::new(),
            loader: scene.loader,
            tv: scene.tv,
            layout_file: config.scene.layout_file.clone(),
        }
    }

    /// Track the pointer in window pixels
    pub fn on_cursor_moved(&mut self, x: f64, y: f64) {
        self.interaction.pointer_ndc = self.pointer.on_cursor_moved(x, y);
    }

    /// Feed a mouse button to the orbit controller and the click detector
    ///
    /// A left click dispatches through the scene; drags only orbit.
    pub fn on_mouse_button(&mut self, button: MouseButton, state: ElementState) -> Option<DispatchOutcome> {
        self.orbit.process_mouse_button(button, state);
        let click = self.pointer.on_button(button, state)?;
        if click.button != MouseButton::Left {
            return None;
        }
        Some(self.handle_click(click.ndc))
    }

    /// Cast a ray through `ndc` and run whatever behavior it resolves to
    pub fn handle_click(&mut self, ndc: Vec2) -> DispatchOutcome {
        self.interaction.pointer_ndc = ndc;
        let outcome = self
            .dispatcher
            .dispatch_click(&self.graph, &self.camera, &mut self.interaction);
        match &outcome {
            DispatchOutcome::Activated { label, .. } => log::debug!("Click ran {}", label),
            DispatchOutcome::Unhandled { node } => {
                log::trace!("Click on {:?} has no handler", self.graph.get(*node).and_then(|n| n.name.as_deref()))
            }
            DispatchOutcome::Missed => log::trace!("Click missed"),
        }
        outcome
    }

    pub fn toggle_power(&mut self) {
        self.interaction.toggle_power();
    }

    pub fn is_powered(&self) -> bool {
        self.interaction.power_on
    }

    pub fn reset_camera(&mut self) {
        self.orbit.reset(&mut self.camera);
    }

    pub fn layout_file(&self) -> Option<&PathBuf> {
        self.layout_file.as_ref()
    }

    /// Write the current placements to the configured layout file
    ///
    /// Returns `Ok(false)` when no layout file is configured.
    pub fn save_layout(&self) -> Result<bool, LayoutError> {
        let Some(path) = &self.layout_file else {
            log::warn!("No scene.layout_file configured; layout not saved");
            return Ok(false);
        };
        SceneLayout::capture("roomview", &self.graph).save(path)?;
        log::info!("Saved layout to {:?}", path);
        Ok(true)
    }
}
