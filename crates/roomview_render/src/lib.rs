//! Scene Rendering Library
//!
//! This crate provides the wgpu-based forward renderer for roomview scenes.
//!
//! ## Key Components
//!
//! - [`context::RenderContext`] - WGPU device, queue, and surface management
//! - [`pipeline::ForwardPipeline`] - Lit triangles and unlit line lists
//! - [`mesh_cache::MeshCache`] - Uploads each shared mesh once
//! - [`FrameRenderer`] - What the frame loop renders through
//! - [`SceneRenderer`] - The wgpu implementation of [`FrameRenderer`]

pub mod context;
pub mod mesh_cache;
pub mod pipeline;
mod renderer;

pub use renderer::{FrameRenderer, RenderError, SceneRenderer};
