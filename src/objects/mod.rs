//! Scene objects
//!
//! Each object inserts its nodes under a parent and exposes an
//! [`SceneObject::add_physics`] hook. Objects backed by a model file insert
//! an empty placeholder, request the model, and finish their setup
//! (physics, mixers, shadows) in a load-completion callback.

mod floor;
mod helpers;
mod plant_from_file;
mod table_from_file;
mod television;
mod television_from_file;
#[cfg(test)]
pub(crate) mod test_support;

use std::path::{Path, PathBuf};

use roomview_core::{ModelLoader, NodeKey, SceneGraph, Transform, Vec3};

pub use floor::{Floor, FLOOR_SIZE};
pub use helpers::{AxesHelper, WireframeCube, WireframePlane, WireframeSphere};
pub use plant_from_file::PlantFromFile;
pub use table_from_file::TableFromFile;
pub use television::{Television, TvRig};
pub use television_from_file::TelevisionFromFile;

/// Everything an object needs to insert itself
pub struct SpawnContext<'a> {
    pub graph: &'a mut SceneGraph,
    pub loader: &'a mut ModelLoader,
    pub asset_dir: &'a Path,
}

impl SpawnContext<'_> {
    pub fn asset_path(&self, file: &str) -> PathBuf {
        self.asset_dir.join(file)
    }
}

/// A placeable part of a scene
pub trait SceneObject {
    /// Insert the object's nodes under `parent`; returns the object's root node
    fn spawn(&self, ctx: &mut SpawnContext<'_>, parent: NodeKey) -> NodeKey;

    /// Register the object's colliders or bodies
    ///
    /// For file-backed objects this only schedules the registration; it
    /// happens once the model has loaded.
    fn add_physics(&self, ctx: &mut SpawnContext<'_>, node: NodeKey) {
        let _ = (ctx, node);
    }
}

/// Placement shared by the objects: position plus Y rotation in degrees
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
    pub position: Vec3,
    pub yaw_degrees: f32,
}

impl Placement {
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            yaw_degrees: 0.0,
        }
    }

    pub fn with_yaw(mut self, degrees: f32) -> Self {
        self.yaw_degrees = degrees;
        self
    }

    pub fn transform(&self) -> Transform {
        Transform::from_position(self.position).with_euler_degrees(0.0, self.yaw_degrees, 0.0)
    }
}

impl Default for Placement {
    fn default() -> Self {
        Self::at(Vec3::ZERO)
    }
}
