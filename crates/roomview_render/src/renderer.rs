//! Scene renderer
//!
//! [`FrameRenderer`] is the seam the frame loop talks to; [`SceneRenderer`]
//! is the wgpu implementation that draws a [`SceneGraph`] through a
//! [`PerspectiveCamera`].

use std::fmt;
use std::sync::Arc;

use roomview_core::{PerspectiveCamera, SceneGraph};
use winit::window::Window;

use crate::context::RenderContext;
use crate::mesh_cache::{GpuMesh, MeshCache};
use crate::pipeline::{DrawCall, DrawUniforms, ForwardPipeline, FrameUniforms};

/// Render error types
#[derive(Debug, Clone, PartialEq)]
pub enum RenderError {
    /// Surface was lost or outdated; it has been reconfigured
    SurfaceLost,
    /// GPU out of memory
    OutOfMemory,
    /// Acquiring the next frame timed out
    Timeout,
    /// No compatible GPU adapter
    NoAdapter,
    /// Surface creation or configuration failed
    Surface(String),
    /// Device request failed
    Device(String),
    /// Other surface error
    Other(String),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::SurfaceLost => write!(f, "Surface lost"),
            RenderError::OutOfMemory => write!(f, "Out of memory"),
            RenderError::Timeout => write!(f, "Timed out acquiring frame"),
            RenderError::NoAdapter => write!(f, "No suitable GPU adapter"),
            RenderError::Surface(msg) => write!(f, "Surface error: {}", msg),
            RenderError::Device(msg) => write!(f, "Device error: {}", msg),
            RenderError::Other(msg) => write!(f, "Render error: {}", msg),
        }
    }
}

impl std::error::Error for RenderError {}

impl RenderError {
    /// Whether rendering can continue on the next frame
    pub fn is_recoverable(&self) -> bool {
        matches!(self, RenderError::SurfaceLost | RenderError::Timeout | RenderError::Other(_))
    }
}

/// Anything that can draw a frame of the scene
pub trait FrameRenderer {
    /// Draw the scene as seen by `camera`
    fn render(&mut self, graph: &SceneGraph, camera: &PerspectiveCamera) -> Result<(), RenderError>;
    /// Resize the output; zero sizes are ignored
    fn resize(&mut self, width: u32, height: u32);
    /// Current output size in pixels
    fn surface_size(&self) -> (u32, u32);
}

/// wgpu renderer for a scene graph
pub struct SceneRenderer {
    context: RenderContext,
    pipeline: ForwardPipeline,
    meshes: MeshCache<GpuMesh>,
    frame_count: u64,
}

impl SceneRenderer {
    /// Create a renderer for `window`, blocking on device creation
    pub fn new(window: Arc<Window>, vsync: bool) -> Result<Self, RenderError> {
        let context = pollster::block_on(RenderContext::with_vsync(window, vsync))?;
        let mut pipeline = ForwardPipeline::new(&context.device, context.config.format);
        pipeline.ensure_depth_texture(&context.device, context.config.width, context.config.height);

        log::info!(
            "Renderer ready: {}x{} {:?}",
            context.config.width,
            context.config.height,
            context.config.format
        );

        Ok(Self {
            context,
            pipeline,
            meshes: MeshCache::new(),
            frame_count: 0,
        })
    }

    pub fn context(&self) -> &RenderContext {
        &self.context
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn cached_mesh_count(&self) -> usize {
        self.meshes.len()
    }
}

impl FrameRenderer for SceneRenderer {
    fn render(&mut self, graph: &SceneGraph, camera: &PerspectiveCamera) -> Result<(), RenderError> {
        let output = match self.context.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.context.reconfigure();
                return Err(RenderError::SurfaceLost);
            }
            Err(wgpu::SurfaceError::OutOfMemory) => return Err(RenderError::OutOfMemory),
            Err(wgpu::SurfaceError::Timeout) => return Err(RenderError::Timeout),
            Err(e) => return Err(RenderError::Other(format!("{:?}", e))),
        };

        self.meshes.begin_frame();
        let device = &self.context.device;
        let drawables = graph.drawables();
        let mut uniforms = Vec::with_capacity(drawables.len());
        let mut ids = Vec::with_capacity(drawables.len());
        for drawable in &drawables {
            let mesh = &drawable.visual.mesh;
            if self.meshes.prepare(mesh, |m| GpuMesh::upload(device, m)) {
                uniforms.push(DrawUniforms::new(drawable.world, &drawable.visual.material, mesh.topology()));
                ids.push(mesh.id());
            }
        }

        self.pipeline
            .update_frame(&self.context.queue, &FrameUniforms::new(camera, &graph.lighting));
        self.pipeline
            .write_draws(&self.context.device, &self.context.queue, &uniforms);

        let calls: Vec<DrawCall<'_>> = ids
            .iter()
            .enumerate()
            .filter_map(|(slot, id)| {
                self.meshes.get(*id).map(|mesh| DrawCall {
                    mesh,
                    slot: slot as u32,
                })
            })
            .collect();

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .context
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        let bg = graph.background;
        self.pipeline.render(
            &mut encoder,
            &view,
            &calls,
            wgpu::Color {
                r: bg[0] as f64,
                g: bg[1] as f64,
                b: bg[2] as f64,
                a: bg[3] as f64,
            },
        );

        self.context.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        self.meshes.evict_idle();
        self.frame_count += 1;
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) {
        if self.context.resize(winit::dpi::PhysicalSize::new(width, height)) {
            self.pipeline.ensure_depth_texture(&self.context.device, width, height);
        }
    }

    fn surface_size(&self) -> (u32, u32) {
        (self.context.config.width, self.context.config.height)
    }
}
