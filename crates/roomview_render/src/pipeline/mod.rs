//! Rendering pipeline components
//!
//! GPU data layouts shared with `scene.wgsl` and the forward pipeline that
//! draws triangle and line meshes.

pub mod types;
pub mod forward;

pub use types::{
    DrawUniforms, FrameUniforms, GpuPointLight, GpuSpotLight, Vertex, DRAW_UNIFORM_STRIDE, MAX_POINT_LIGHTS,
    MAX_SPOT_LIGHTS,
};
pub use forward::{DrawCall, ForwardPipeline, DEPTH_FORMAT};
