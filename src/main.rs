//! roomview - interactive living-room scene viewer
//!
//! Orbit with the left mouse button, pan with the right, dolly with the
//! wheel. Click the television's knob to switch it on.

use std::sync::Arc;
use winit::{
    application::ApplicationHandler,
    event::{DeviceEvent, DeviceId, MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::PhysicalKey,
    window::WindowId,
};

use roomview::config::AppConfig;
use roomview::input::{InputAction, InputMapper};
use roomview::systems::{handle_resize, AppContext, FrameLoop, FrameScheduler, WindowSystem};
use roomview_core::DispatchOutcome;
use roomview_render::{FrameRenderer, RenderError, SceneRenderer};

/// Window and GPU state, created once the event loop is running
struct Running {
    window: WindowSystem,
    renderer: SceneRenderer,
}

/// Main application state
struct App {
    /// Application configuration
    config: AppConfig,
    ctx: AppContext,
    frame_loop: FrameLoop,
    running: Option<Running>,
    /// Power and pending-load state currently shown in the title
    shown_state: Option<(bool, usize)>,
}

impl App {
    fn new(config: AppConfig) -> Self {
        let ctx = AppContext::new(&config);
        log::info!(
            "Built {:?} scene with {} nodes, {} model(s) loading",
            config.scene.preset,
            ctx.graph.node_count(),
            ctx.loader.pending_count()
        );
        let frame_loop = FrameLoop::new(config.rendering.max_frame_delta);

        Self {
            config,
            ctx,
            frame_loop,
            running: None,
            shown_state: None,
        }
    }

    fn handle_action(&mut self, action: InputAction, event_loop: &ActiveEventLoop) {
        match action {
            InputAction::Exit => event_loop.exit(),
            InputAction::ResetCamera => {
                self.ctx.reset_camera();
                log::info!("Camera reset to starting position");
            }
            InputAction::ToggleFullscreen => {
                if let Some(running) = &self.running {
                    running.window.toggle_fullscreen();
                }
            }
            InputAction::ToggleSmoothing => {
                self.ctx.orbit.smoothing_enabled = !self.ctx.orbit.smoothing_enabled;
                log::info!("Input smoothing: {}", if self.ctx.orbit.smoothing_enabled { "ON" } else { "OFF" });
            }
            InputAction::TogglePower => self.ctx.toggle_power(),
            InputAction::SaveLayout => {
                if let Err(e) = self.ctx.save_layout() {
                    log::warn!("Failed to save layout: {}", e);
                }
            }
        }
    }

    fn update_title(&mut self) {
        let Some(running) = &self.running else {
            return;
        };
        let state = (self.ctx.is_powered(), self.ctx.loader.pending_count());
        if self.shown_state != Some(state) {
            running.window.update_title(state.0, state.1);
            self.shown_state = Some(state);
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.running.is_some() {
            return;
        }

        let window = match WindowSystem::create(event_loop, &self.config.window) {
            Ok(window) => window,
            Err(e) => {
                log::error!("{}", e);
                event_loop.exit();
                return;
            }
        };

        let renderer = match SceneRenderer::new(Arc::clone(window.window()), self.config.window.vsync) {
            Ok(renderer) => renderer,
            Err(e) => {
                log::error!("Failed to initialise renderer: {}", e);
                event_loop.exit();
                return;
            }
        };

        let mut running = Running { window, renderer };
        let (width, height) = running.renderer.surface_size();
        handle_resize(&mut self.ctx, &mut running.renderer, width, height);
        running.window.request_frame();
        self.running = Some(running);
        self.update_title();
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }

            WindowEvent::Resized(physical_size) => {
                if let Some(running) = &mut self.running {
                    handle_resize(&mut self.ctx, &mut running.renderer, physical_size.width, physical_size.height);
                }
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(key) = event.physical_key {
                    if let Some(action) = InputMapper::map_keyboard(key, event.state) {
                        self.handle_action(action, event_loop);
                    }
                }
            }

            WindowEvent::CursorMoved { position, .. } => {
                self.ctx.on_cursor_moved(position.x, position.y);
            }

            WindowEvent::MouseInput { state, button, .. } => {
                if let Some(DispatchOutcome::Activated { label, .. }) = self.ctx.on_mouse_button(button, state) {
                    log::info!("Clicked {}", label);
                }
            }

            WindowEvent::MouseWheel { delta, .. } => {
                let lines = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 100.0,
                };
                self.ctx.orbit.process_scroll(lines);
            }

            WindowEvent::RedrawRequested => {
                let Some(running) = &mut self.running else {
                    return;
                };
                let report = self.frame_loop.tick(&mut self.ctx, &mut running.renderer, &running.window);
                if let Some(RenderError::OutOfMemory) = report.render_error {
                    log::error!("GPU out of memory; exiting");
                    event_loop.exit();
                    return;
                }
                if report.loads_completed > 0 {
                    log::debug!("{} model load(s) finished this frame", report.loads_completed);
                }
                self.update_title();
            }

            _ => {}
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        if let DeviceEvent::MouseMotion { delta } = event {
            self.ctx.orbit.process_mouse_motion(delta.0, delta.1);
        }
    }
}

fn main() {
    // Load configuration
    let config = AppConfig::load().unwrap_or_else(|e| {
        eprintln!("Failed to load config: {}. Using defaults.", e);
        AppConfig::default()
    });

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(config.debug.log_level.as_str()))
        .init();
    log::info!("Starting roomview");

    let event_loop = match EventLoop::new() {
        Ok(event_loop) => event_loop,
        Err(e) => {
            log::error!("Failed to create event loop: {}", e);
            return;
        }
    };
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = App::new(config);
    if let Err(e) = event_loop.run_app(&mut app) {
        log::error!("Event loop error: {}", e);
    }
}
