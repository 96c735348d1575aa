//! SceneBuilder - Declarative scene construction
//!
//! Provides a fluent API for building room scenes out of [`SceneObject`]s,
//! plus the two presets the application starts with.

use std::path::{Path, PathBuf};

use roomview_core::{
    AmbientLight, ModelLoader, NodeKey, PerspectiveCamera, PhysicsConfig, PointLight, SceneGraph, SceneLayout,
    SpotLight, Vec3,
};

use crate::config::{AppConfig, ScenePreset};
use crate::objects::{
    AxesHelper, Floor, Placement, PlantFromFile, SceneObject, SpawnContext, TableFromFile, Television,
    TelevisionFromFile, TvRig, WireframeCube, WireframePlane, WireframeSphere,
};

/// Camera eye for the `primitives` preset
const PRIMITIVES_CAMERA: Vec3 = Vec3::new(30.0, 40.0, 50.0);

/// A finished scene and the handles the application needs to drive it
pub struct BuiltScene {
    pub graph: SceneGraph,
    pub camera: PerspectiveCamera,
    pub loader: ModelLoader,
    /// The procedural television, if the scene has one
    pub tv: Option<TvRig>,
}

/// Builder for constructing scenes
///
/// # Example
/// ```ignore
/// let scene = SceneBuilder::new(ModelLoader::new())
///     .with_physics(PhysicsConfig::default())
///     .with_ambient(0.5)
///     .add(&Floor::default())
///     .add_television(&Television::default())
///     .build();
/// ```
pub struct SceneBuilder {
    graph: SceneGraph,
    loader: ModelLoader,
    asset_dir: PathBuf,
    camera: PerspectiveCamera,
    tv: Option<TvRig>,
}

impl SceneBuilder {
    /// Create a new scene builder
    pub fn new(loader: ModelLoader) -> Self {
        Self {
            graph: SceneGraph::new(),
            loader,
            asset_dir: PathBuf::from("assets/models"),
            camera: PerspectiveCamera::default(),
            tv: None,
        }
    }

    /// Enable physics
    pub fn with_physics(mut self, config: PhysicsConfig) -> Self {
        self.graph = self.graph.with_physics(config);
        self
    }

    /// Directory model files are resolved against
    pub fn with_asset_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.asset_dir = dir.into();
        self
    }

    pub fn with_camera(mut self, camera: PerspectiveCamera) -> Self {
        self.camera = camera;
        self
    }

    pub fn with_background(mut self, color: [f32; 4]) -> Self {
        self.graph.background = color;
        self
    }

    pub fn with_ambient(mut self, intensity: f32) -> Self {
        self.graph.lighting.ambient = AmbientLight {
            intensity,
            ..AmbientLight::default()
        };
        self
    }

    pub fn add_point_light(mut self, light: PointLight) -> Self {
        self.graph.lighting.points.push(light);
        self
    }

    pub fn add_spot_light(mut self, light: SpotLight) -> Self {
        self.graph.lighting.spots.push(light);
        self
    }

    /// Spawn an object under the root and register its physics
    pub fn add(mut self, object: &dyn SceneObject) -> Self {
        self.spawn(object);
        self
    }

    /// Add the procedural television and keep its rig
    ///
    /// Only one rig is kept; adding a second television replaces it.
    pub fn add_television(mut self, television: &Television) -> Self {
        let root = self.graph.root();
        if self.tv.is_some() {
            log::warn!("Scene already has a television rig; replacing it");
        }
        self.tv = Some(television.spawn_rig(&mut self.graph, root));
        self
    }

    /// Apply a saved layout if `path` exists
    pub fn apply_layout(mut self, path: Option<&Path>) -> Self {
        let Some(path) = path.filter(|p| p.exists()) else {
            return self;
        };
        match SceneLayout::load(path) {
            Ok(layout) => {
                let applied = layout.apply(&mut self.graph);
                log::info!("Applied layout {:?} ({} placements)", path, applied);
            }
            Err(e) => log::warn!("Failed to load layout {:?}: {}", path, e),
        }
        self
    }

    fn spawn(&mut self, object: &dyn SceneObject) -> NodeKey {
        let root = self.graph.root();
        let mut ctx = SpawnContext {
            graph: &mut self.graph,
            loader: &mut self.loader,
            asset_dir: &self.asset_dir,
        };
        let node = object.spawn(&mut ctx, root);
        object.add_physics(&mut ctx, node);
        node
    }

    /// Build the scene
    pub fn build(self) -> BuiltScene {
        log::debug!("Built scene with {} nodes", self.graph.node_count());
        BuiltScene {
            graph: self.graph,
            camera: self.camera,
            loader: self.loader,
            tv: self.tv,
        }
    }

    /// Build the scene selected by `config.scene.preset`
    pub fn from_config(config: &AppConfig, loader: ModelLoader) -> BuiltScene {
        match config.scene.preset {
            ScenePreset::LivingRoom => Self::living_room(config, loader),
            ScenePreset::Primitives => Self::primitives(config, loader),
        }
    }

    /// Televisions, table, plant and floor under three lights, with physics
    pub fn living_room(config: &AppConfig, loader: ModelLoader) -> BuiltScene {
        let tunables = config.tunables.clamped();
        let rendering = &config.rendering;

        let spot = SpotLight {
            position: Vec3::from_array(tunables.spot_light_position),
            target: Vec3::ZERO,
            intensity: rendering.spot_light_intensity,
            ..SpotLight::default()
        };
        let mut point = PointLight::new(Vec3::from_array(rendering.point_light_position), rendering.point_light_intensity);
        point.cast_shadow = true;

        let tv = Television::new(Placement::at(Vec3::from_array(tunables.procedural_tv_position)).with_yaw(10.0))
            .with_knob_turn_seconds(config.scene.knob_turn_seconds);
        let tv_from_file =
            TelevisionFromFile::new(Placement::at(Vec3::from_array(tunables.file_tv_position)).with_yaw(-10.0));

        let mut builder = Self::new(loader)
            .with_physics(config.physics.to_physics_config())
            .with_asset_dir(&config.scene.asset_dir)
            .with_camera(camera_from_config(config))
            .with_background(rendering.background_color)
            .with_ambient(rendering.ambient_intensity)
            .add_point_light(point)
            .add_spot_light(spot);

        if config.debug.show_axes {
            builder = builder.add(&AxesHelper::new(50.0));
        }

        builder
            .add(&Floor::default())
            .add_television(&tv)
            .add(&tv_from_file)
            .add(&TableFromFile::default())
            .add(&PlantFromFile::default())
            .apply_layout(config.scene.layout_file.as_deref())
            .build()
    }

    /// Wireframe cube, sphere and plane with an axes helper; no physics
    pub fn primitives(config: &AppConfig, loader: ModelLoader) -> BuiltScene {
        let camera = PerspectiveCamera {
            position: PRIMITIVES_CAMERA,
            target: Vec3::ZERO,
            ..camera_from_config(config)
        };
        Self::new(loader)
            .with_camera(camera)
            .with_background(config.rendering.background_color)
            .add(&AxesHelper::new(20.0))
            .add(&WireframeCube::default())
            .add(&WireframeSphere::default())
            .add(&WireframePlane::default())
            .build()
    }
}

/// Perspective camera from the camera and window sections
pub fn camera_from_config(config: &AppConfig) -> PerspectiveCamera {
    let camera = &config.camera;
    let aspect = config.window.width.max(1) as f32 / config.window.height.max(1) as f32;
    PerspectiveCamera::new(camera.fov, aspect, camera.near, camera.far)
        .with_position(Vec3::from_array(camera.position))
        .looking_at(Vec3::from_array(camera.target))
}

#[cfg(test)]
mod tests {
    use super::*;
    use roomview_core::PhysicsMaterial;

    fn offline_loader() -> ModelLoader {
        ModelLoader::with_source(crate::objects::test_support::MissingSource)
    }

    #[test]
    fn test_empty_scene() {
        let scene = SceneBuilder::new(offline_loader()).build();
        assert_eq!(scene.graph.node_count(), 1);
        assert!(scene.graph.physics().is_none());
        assert!(scene.tv.is_none());
    }

    #[test]
    fn test_scene_with_floor() {
        let scene = SceneBuilder::new(offline_loader())
            .with_physics(PhysicsConfig::default())
            .add(&Floor {
                size: 10.0,
                material: PhysicsMaterial::WOOD,
            })
            .build();

        assert!(scene.graph.find_by_name("floor").is_some());
        let physics = scene.graph.physics().unwrap();
        assert_eq!(physics.static_colliders().len(), 1);
    }

    #[test]
    fn test_living_room_layout() {
        let config = AppConfig::default();
        let scene = SceneBuilder::living_room(&config, offline_loader());
        let graph = &scene.graph;

        for name in ["floor", "television", "televisionFromFile", "tableFromFile", "plantFromFile", "axesHelper"] {
            assert!(graph.find_by_name(name).is_some(), "missing {name}");
        }
        let tv = scene.tv.as_ref().unwrap();
        assert_eq!(graph.world_position(tv.root), Vec3::new(-30.0, 55.0, 0.0));
        assert_eq!(graph.lighting.points.len(), 1);
        assert_eq!(graph.lighting.spots.len(), 1);
        assert_eq!(graph.lighting.spots[0].position, Vec3::new(100.0, 200.0, 200.0));
        assert_eq!(scene.loader.pending_count(), 3);
        assert_eq!(scene.camera.position, Vec3::new(-100.0, 200.0, 200.0));
    }

    #[test]
    fn test_living_room_uses_clamped_tunables() {
        let mut config = AppConfig::default();
        config.tunables.spot_light_position = [1000.0, 0.0, 0.0];
        config.debug.show_axes = false;
        let scene = SceneBuilder::living_room(&config, offline_loader());
        assert_eq!(scene.graph.lighting.spots[0].position, Vec3::new(300.0, 0.0, 0.0));
        assert!(scene.graph.find_by_name("axesHelper").is_none());
    }

    #[test]
    fn test_primitives_preset() {
        let mut config = AppConfig::default();
        config.scene.preset = ScenePreset::Primitives;
        let scene = SceneBuilder::from_config(&config, offline_loader());
        for name in ["cube", "sphere", "plane", "axesHelper"] {
            assert!(scene.graph.find_by_name(name).is_some(), "missing {name}");
        }
        assert!(scene.graph.physics().is_none());
        assert!(scene.tv.is_none());
        assert_eq!(scene.camera.position, PRIMITIVES_CAMERA);
    }
}
