//! Window management system
//!
//! Handles window creation, fullscreen toggle, title updates and frame requests.

use std::sync::Arc;
use winit::{
    event_loop::ActiveEventLoop,
    window::{Fullscreen, Window},
};
use crate::config::WindowConfig;
use super::frame_loop::FrameScheduler;

/// Manages the application window
pub struct WindowSystem {
    window: Arc<Window>,
    base_title: String,
}

impl WindowSystem {
    /// Create window from config
    pub fn create(
        event_loop: &ActiveEventLoop,
        config: &WindowConfig,
    ) -> Result<Self, WindowError> {
        let mut attrs = Window::default_attributes()
            .with_title(&config.title)
            .with_inner_size(winit::dpi::LogicalSize::new(
                config.width,
                config.height,
            ));

        if config.fullscreen {
            attrs = attrs.with_fullscreen(Some(Fullscreen::Borderless(None)));
        }

        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .map_err(|e| WindowError::CreationFailed(e.to_string()))?,
        );

        Ok(Self {
            window,
            base_title: config.title.clone(),
        })
    }

    /// Get window reference (for renderer creation)
    pub fn window(&self) -> &Arc<Window> {
        &self.window
    }

    /// Toggle fullscreen mode
    pub fn toggle_fullscreen(&self) {
        let new_fullscreen = if self.window.fullscreen().is_some() {
            None
        } else {
            Some(Fullscreen::Borderless(None))
        };
        self.window.set_fullscreen(new_fullscreen);
    }

    /// Update window title with the television state
    pub fn update_title(&self, powered: bool, loads_pending: usize) {
        self.window.set_title(&format_title(&self.base_title, powered, loads_pending));
    }

    /// Request a redraw
    pub fn request_redraw(&self) {
        self.window.request_redraw();
    }
}

impl FrameScheduler for WindowSystem {
    fn request_frame(&self) {
        self.request_redraw();
    }
}

fn format_title(base: &str, powered: bool, loads_pending: usize) -> String {
    let power = if powered { "TV on" } else { "TV off" };
    if loads_pending > 0 {
        format!("{} - {} [loading {} model(s)]", base, power, loads_pending)
    } else {
        format!("{} - {} [click the knob]", base, power)
    }
}

#[derive(Debug)]
pub enum WindowError {
    CreationFailed(String),
}

impl std::fmt::Display for WindowError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WindowError::CreationFailed(msg) => write!(f, "Window creation failed: {}", msg),
        }
    }
}

impl std::error::Error for WindowError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_formatting_loading() {
        let title = format_title("Test", false, 2);
        assert_eq!(title, "Test - TV off [loading 2 model(s)]");
    }

    #[test]
    fn test_title_formatting_loaded() {
        let title = format_title("Test", true, 0);
        assert!(title.contains("TV on"));
        assert!(title.contains("click the knob"));
    }
}
