//! Application configuration
//!
//! Configuration is loaded from multiple sources with the following priority (lowest to highest):
//! 1. `config/default.toml` (version controlled)
//! 2. `config/user.toml` (gitignored, user overrides)
//! 3. Environment variables (`RV_SECTION__KEY`)

use figment::{Figment, providers::{Format, Toml, Env}};
use roomview_core::Vec3;
use serde::{Serialize, Deserialize};
use std::path::{Path, PathBuf};

/// Range of the live-tunable positions on every axis
pub const TUNABLE_RANGE: (f32, f32) = (-300.0, 300.0);

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Window configuration
    #[serde(default)]
    pub window: WindowConfig,
    /// Camera configuration
    #[serde(default)]
    pub camera: CameraConfig,
    /// Input configuration
    #[serde(default)]
    pub input: InputConfig,
    /// Physics configuration
    #[serde(default)]
    pub physics: PhysicsConfig,
    /// Rendering configuration
    #[serde(default)]
    pub rendering: RenderingConfig,
    /// Scene selection and assets
    #[serde(default)]
    pub scene: SceneConfig,
    /// Live-tunable positions
    #[serde(default)]
    pub tunables: TunablesConfig,
    /// Debug configuration
    #[serde(default)]
    pub debug: DebugConfig,
}

impl AppConfig {
    /// Load configuration from default locations
    ///
    /// Priority (lowest to highest):
    /// 1. `config/default.toml`
    /// 2. `config/user.toml`
    /// 3. Environment variables (`RV_*`)
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from a specific config directory
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();
        let default_path = config_dir.join("default.toml");
        let user_path = config_dir.join("user.toml");

        let mut figment = Figment::new();

        if default_path.exists() {
            figment = figment.merge(Toml::file(&default_path));
        }

        // Load user config (optional)
        if user_path.exists() {
            figment = figment.merge(Toml::file(&user_path));
        }

        // Environment variables override everything
        // RV_WINDOW__TITLE=Test -> window.title = "Test"
        figment = figment.merge(Env::prefixed("RV_").split("__"));

        let mut config: Self = figment.extract().map_err(ConfigError::from)?;
        config.tunables = config.tunables.clamped();
        Ok(config)
    }
}

/// Window configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Window title
    pub title: String,
    /// Window width in pixels
    pub width: u32,
    /// Window height in pixels
    pub height: u32,
    /// Start in fullscreen mode
    pub fullscreen: bool,
    /// Enable VSync
    pub vsync: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "roomview".to_string(),
            width: 1280,
            height: 720,
            fullscreen: false,
            vsync: true,
        }
    }
}

/// Camera configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Starting eye position [x, y, z]
    pub position: [f32; 3],
    /// Orbit target [x, y, z]
    pub target: [f32; 3],
    /// Vertical field of view in degrees
    pub fov: f32,
    /// Near clipping plane
    pub near: f32,
    /// Far clipping plane
    pub far: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: [-100.0, 200.0, 200.0],
            target: [0.0, 0.0, 0.0],
            fov: 45.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

/// Input configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Orbit speed in radians per dragged pixel
    pub rotate_sensitivity: f32,
    /// Closest dolly distance
    pub min_distance: f32,
    /// Farthest dolly distance
    pub max_distance: f32,
    /// Smooth orbit input
    pub smoothing_enabled: bool,
    /// Maximum pointer travel in pixels for a press/release to count as a click
    pub click_tolerance: f32,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            rotate_sensitivity: 0.005,
            min_distance: 10.0,
            max_distance: 900.0,
            smoothing_enabled: false,
            click_tolerance: 4.0,
        }
    }
}

/// Physics configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Gravity vector (units per second squared)
    pub gravity: [f32; 3],
    /// Fixed sub-step length in seconds
    pub fixed_timestep: f32,
    /// Most sub-steps run for one frame
    pub max_substeps: u32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: [0.0, -200.0, 0.0],
            fixed_timestep: 1.0 / 20.0,
            max_substeps: 10,
        }
    }
}

impl PhysicsConfig {
    /// Convert to the physics engine's config
    pub fn to_physics_config(&self) -> roomview_core::PhysicsConfig {
        let mut config = roomview_core::PhysicsConfig::new(Vec3::from_array(self.gravity))
            .with_fixed_timestep(self.fixed_timestep);
        config.max_substeps = self.max_substeps.max(1);
        config
    }
}

/// Rendering configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderingConfig {
    /// Background color [r, g, b, a]
    pub background_color: [f32; 4],
    /// Ambient light intensity
    pub ambient_intensity: f32,
    /// Point light position [x, y, z]
    pub point_light_position: [f32; 3],
    /// Point light intensity
    pub point_light_intensity: f32,
    /// Spot light intensity
    pub spot_light_intensity: f32,
    /// Longest frame delta fed to the simulation, in seconds
    pub max_frame_delta: f32,
}

impl Default for RenderingConfig {
    fn default() -> Self {
        Self {
            background_color: [0.0, 0.0, 0.0, 1.0],
            ambient_intensity: 0.5,
            point_light_position: [15.0, 20.0, 20.0],
            point_light_intensity: 2.0,
            spot_light_intensity: 1.5,
            max_frame_delta: 0.25,
        }
    }
}

/// Which scene to build at start-up
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenePreset {
    /// Television, table, plant and floor with physics
    #[default]
    LivingRoom,
    /// Wireframe cube, sphere and plane with an axes helper
    Primitives,
}

/// Scene configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub preset: ScenePreset,
    /// Directory holding the glTF models
    pub asset_dir: PathBuf,
    /// RON layout applied after building, and written by the save key
    pub layout_file: Option<PathBuf>,
    /// Seconds the power knob takes to turn
    pub knob_turn_seconds: f32,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            preset: ScenePreset::LivingRoom,
            asset_dir: PathBuf::from("assets/models"),
            layout_file: None,
            knob_turn_seconds: 0.25,
        }
    }
}

/// Positions exposed for live tuning, each axis in [`TUNABLE_RANGE`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TunablesConfig {
    pub spot_light_position: [f32; 3],
    pub procedural_tv_position: [f32; 3],
    pub file_tv_position: [f32; 3],
}

impl Default for TunablesConfig {
    fn default() -> Self {
        Self {
            spot_light_position: [100.0, 200.0, 200.0],
            procedural_tv_position: [-30.0, 55.0, 0.0],
            file_tv_position: [30.0, 55.0, 0.0],
        }
    }
}

impl TunablesConfig {
    /// Clamp every axis into [`TUNABLE_RANGE`]; NaN becomes 0
    pub fn clamped(&self) -> Self {
        Self {
            spot_light_position: clamp_position(self.spot_light_position),
            procedural_tv_position: clamp_position(self.procedural_tv_position),
            file_tv_position: clamp_position(self.file_tv_position),
        }
    }
}

fn clamp_position(p: [f32; 3]) -> [f32; 3] {
    let (min, max) = TUNABLE_RANGE;
    p.map(|v| if v.is_nan() { 0.0 } else { v.clamp(min, max) })
}

/// Debug configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level (error, warn, info, debug, trace)
    pub log_level: String,
    /// Show the world axes helper
    pub show_axes: bool,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            show_axes: true,
        }
    }
}

/// Configuration error
#[derive(Debug)]
pub struct ConfigError {
    message: String,
}

impl From<figment::Error> for ConfigError {
    fn from(e: figment::Error) -> Self {
        ConfigError {
            message: e.to_string(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Configuration error: {}", self.message)
    }
}

impl std::error::Error for ConfigError {}
