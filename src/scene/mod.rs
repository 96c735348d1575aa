//! Scene construction utilities
//!
//! This module provides a declarative API for building room scenes.

mod scene_builder;

pub use scene_builder::{camera_from_config, BuiltScene, SceneBuilder};
