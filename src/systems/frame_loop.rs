//! Per-frame orchestration
//!
//! Each frame, in order:
//! 1. Delta time calculation
//! 2. Finished model loads are attached and their callbacks run
//! 3. Television rig follows the power flag
//! 4. Tweens, then animation mixers
//! 5. Orbit camera input
//! 6. One physics step
//! 7. One render
//! 8. The next frame is requested from the host

use std::time::Instant;

use roomview_render::{FrameRenderer, RenderError};

use super::context::AppContext;

/// Something that can schedule another frame (the window, in the app)
pub trait FrameScheduler {
    fn request_frame(&self);
}

/// Measures time between frames
pub struct FrameClock {
    last_frame: Instant,
    max_delta: f32,
}

impl FrameClock {
    pub fn new(max_delta: f32) -> Self {
        Self {
            last_frame: Instant::now(),
            max_delta: max_delta.max(0.0),
        }
    }

    /// Seconds since the previous tick
    pub fn tick(&mut self) -> f32 {
        self.tick_at(Instant::now())
    }

    pub fn tick_at(&mut self, now: Instant) -> f32 {
        let raw = now.saturating_duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;
        self.clamp(raw)
    }

    /// Cap dt to prevent a spiral of death after a stall; non-finite becomes 0
    pub fn clamp(&self, dt: f32) -> f32 {
        if dt.is_finite() {
            dt.clamp(0.0, self.max_delta)
        } else {
            0.0
        }
    }
}

/// What one frame did
#[derive(Debug, Default)]
pub struct FrameReport {
    pub dt: f32,
    pub loads_completed: usize,
    pub tweens_completed: usize,
    pub substeps: u32,
    pub rendered: bool,
    pub render_error: Option<RenderError>,
}

/// Drives the application one frame at a time
pub struct FrameLoop {
    clock: FrameClock,
    frames: u64,
}

impl FrameLoop {
    pub fn new(max_frame_delta: f32) -> Self {
        Self {
            clock: FrameClock::new(max_frame_delta),
            frames: 0,
        }
    }

    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    /// Run one frame using wall-clock time
    pub fn tick(
        &mut self,
        ctx: &mut AppContext,
        renderer: &mut dyn FrameRenderer,
        scheduler: &dyn FrameScheduler,
    ) -> FrameReport {
        let dt = self.clock.tick();
        self.run_frame(dt, ctx, renderer, scheduler)
    }

    /// Run one frame with an explicit delta
    ///
    /// Render errors are logged and reported; they never stop the loop, so
    /// the next frame is always requested.
    pub fn run_frame(
        &mut self,
        dt: f32,
        ctx: &mut AppContext,
        renderer: &mut dyn FrameRenderer,
        scheduler: &dyn FrameScheduler,
    ) -> FrameReport {
        let dt = self.clock.clamp(dt);
        let mut report = FrameReport {
            dt,
            ..FrameReport::default()
        };

        report.loads_completed = ctx.loader.drain(&mut ctx.graph, &mut ctx.mixers);

        if let Some(tv) = ctx.tv.as_mut() {
            tv.sync(ctx.interaction.power_on, &mut ctx.graph, &mut ctx.tweens);
        }

        report.tweens_completed = ctx.tweens.update(dt, &mut ctx.graph);
        for mixer in &mut ctx.mixers {
            mixer.update(dt, &mut ctx.graph);
        }

        ctx.orbit.update(&mut ctx.camera, dt);

        report.substeps = ctx.graph.step_physics(dt);

        match renderer.render(&ctx.graph, &ctx.camera) {
            Ok(()) => report.rendered = true,
            Err(e) => {
                log::error!("Render error: {}", e);
                report.render_error = Some(e);
            }
        }
        ctx.graph.clear_dirty();
        self.frames += 1;

        scheduler.request_frame();
        report
    }
}

/// Propagate a window resize to the renderer, camera and pointer
///
/// Zero-sized resizes (minimized windows) are ignored. Returns whether
/// anything changed.
pub fn handle_resize(ctx: &mut AppContext, renderer: &mut dyn FrameRenderer, width: u32, height: u32) -> bool {
    if width == 0 || height == 0 {
        log::debug!("Ignoring zero-sized resize");
        return false;
    }
    renderer.resize(width, height);
    ctx.camera.set_viewport(width, height);
    ctx.pointer.set_viewport(width, height);
    true
}
