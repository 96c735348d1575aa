//! Core types for roomview
//!
//! This crate provides everything a room scene is made of, independent of
//! windowing and GPU code:
//!
//! - [`Transform`] - Position, rotation, and scale of a node
//! - [`SceneNode`] / [`SceneGraph`] - Named node hierarchy with physics links
//! - [`Lighting`] - Ambient, point and spot lights
//! - [`PerspectiveCamera`] - View and projection, NDC picking rays
//! - [`Raycaster`] / [`InteractionDispatcher`] - Click picking and behaviors
//! - [`TweenManager`] / [`AnimationMixer`] - Time-driven node animation
//! - [`ModelAsset`] / [`ModelLoader`] - glTF import on a worker thread
//! - [`SceneLayout`] - Loadable/saveable object placements

mod transform;
mod node;
mod graph;
mod light;
mod camera;
mod raycast;
mod interaction;
mod tween;
mod animation;
mod asset_error;
mod asset_cache;
mod model;
mod model_loader;
mod layout;

pub use transform::Transform;
pub use node::{DirtyFlags, Material, PhysicsLink, SceneNode, Visual};
pub use graph::{Drawable, NodeKey, SceneGraph};
pub use light::{AmbientLight, Lighting, PointLight, SpotLight};
pub use camera::PerspectiveCamera;
pub use raycast::{RayHit, Raycaster};
pub use interaction::{Behavior, DispatchOutcome, InteractionDispatcher, InteractionState, PowerToggle};
pub use tween::{Easing, Tween, TweenId, TweenManager, TweenTarget};
pub use animation::{AnimationAction, AnimationClip, AnimationMixer, Interpolation, LoopMode, SampledValue, Track, TrackValues};
pub use asset_error::AssetError;
pub use asset_cache::{Asset, AssetCache, AssetHandle, AssetId};
pub use model::{ModelAsset, ModelNode};
pub use model_loader::{GltfSource, LoadContext, LoadId, LoadStatus, ModelLoader, ModelSource};
pub use layout::{LayoutError, NodePlacement, SceneLayout};

// Re-export commonly used types from roomview_math for convenience
pub use roomview_math::{primitives, Aabb, Mat4, MeshData, Quat, Ray, Topology, Vec2, Vec3};

// Re-export physics types for convenient access through roomview_core
pub use roomview_physics::{BodyKey, CollisionFilter, PhysicsConfig, PhysicsMaterial, PhysicsWorld, RigidBody, StaticCollider};
