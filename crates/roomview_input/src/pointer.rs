//! Pointer tracking
//!
//! Converts window pixel coordinates to normalized device coordinates and
//! tells clicks apart from drags: a press and release of the same button
//! that moved less than `click_tolerance` pixels is a click.

use roomview_math::Vec2;
use winit::event::{ElementState, MouseButton};

/// A completed click in both pixel and NDC space
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Click {
    pub button: MouseButton,
    pub pixel: Vec2,
    pub ndc: Vec2,
}

pub struct PointerTracker {
    viewport: Vec2,
    pixel: Vec2,
    pressed: Option<(MouseButton, Vec2)>,
    /// Maximum travel in pixels between press and release for a click
    pub click_tolerance: f32,
}

impl PointerTracker {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            viewport: Vec2::new(width.max(1) as f32, height.max(1) as f32),
            pixel: Vec2::ZERO,
            pressed: None,
            click_tolerance: 4.0,
        }
    }

    pub fn with_click_tolerance(mut self, pixels: f32) -> Self {
        self.click_tolerance = pixels.max(0.0);
        self
    }

    /// Update the viewport size; zero sizes are ignored
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.viewport = Vec2::new(width as f32, height as f32);
        }
    }

    pub fn viewport(&self) -> Vec2 {
        self.viewport
    }

    /// Record a cursor move and return the new NDC position
    pub fn on_cursor_moved(&mut self, x: f64, y: f64) -> Vec2 {
        self.pixel = Vec2::new(x as f32, y as f32);
        self.ndc()
    }

    /// Current pointer position in pixels
    pub fn pixel(&self) -> Vec2 {
        self.pixel
    }

    /// Current pointer position in NDC, +Y up
    pub fn ndc(&self) -> Vec2 {
        pixel_to_ndc(self.pixel, self.viewport)
    }

    /// Whether a button is held and the pointer has moved past the click tolerance
    pub fn is_dragging(&self) -> bool {
        self.pressed
            .is_some_and(|(_, start)| start.distance(self.pixel) >= self.click_tolerance)
    }

    /// Feed a button event; returns a click on a short release
    pub fn on_button(&mut self, button: MouseButton, state: ElementState) -> Option<Click> {
        match state {
            ElementState::Pressed => {
                self.pressed = Some((button, self.pixel));
                None
            }
            ElementState::Released => {
                let (pressed_button, start) = self.pressed.take()?;
                if pressed_button != button || start.distance(self.pixel) >= self.click_tolerance {
                    return None;
                }
                Some(Click {
                    button,
                    pixel: self.pixel,
                    ndc: self.ndc(),
                })
            }
        }
    }
}

/// Map a pixel position (origin top-left) to NDC in [-1, 1], +Y up
pub fn pixel_to_ndc(pixel: Vec2, viewport: Vec2) -> Vec2 {
    let size = viewport.max(Vec2::ONE);
    Vec2::new(pixel.x / size.x * 2.0 - 1.0, -(pixel.y / size.y * 2.0 - 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ndc_corners_and_center() {
        let viewport = Vec2::new(800.0, 600.0);
        assert_eq!(pixel_to_ndc(Vec2::ZERO, viewport), Vec2::new(-1.0, 1.0));
        assert_eq!(pixel_to_ndc(Vec2::new(800.0, 600.0), viewport), Vec2::new(1.0, -1.0));
        assert_eq!(pixel_to_ndc(Vec2::new(800.0, 0.0), viewport), Vec2::new(1.0, 1.0));
        assert_eq!(pixel_to_ndc(Vec2::new(400.0, 300.0), viewport), Vec2::ZERO);
    }

    #[test]
    fn test_cursor_move_updates_ndc() {
        let mut pointer = PointerTracker::new(200, 100);
        let ndc = pointer.on_cursor_moved(150.0, 25.0);
        assert_eq!(ndc, Vec2::new(0.5, 0.5));
        assert_eq!(pointer.ndc(), ndc);
    }

    #[test]
    fn test_resize_changes_mapping() {
        let mut pointer = PointerTracker::new(200, 100);
        pointer.on_cursor_moved(100.0, 50.0);
        assert_eq!(pointer.ndc(), Vec2::ZERO);
        pointer.set_viewport(400, 100);
        assert_eq!(pointer.ndc(), Vec2::new(-0.5, 0.0));
        pointer.set_viewport(0, 0);
        assert_eq!(pointer.viewport(), Vec2::new(400.0, 100.0));
    }

    #[test]
    fn test_short_press_is_click() {
        let mut pointer = PointerTracker::new(800, 600);
        pointer.on_cursor_moved(400.0, 300.0);
        assert!(pointer.on_button(MouseButton::Left, ElementState::Pressed).is_none());
        pointer.on_cursor_moved(401.0, 301.0);
        let click = pointer.on_button(MouseButton::Left, ElementState::Released);
        assert!(click.is_some_and(|c| c.button == MouseButton::Left));
    }

    #[test]
    fn test_drag_is_not_click() {
        let mut pointer = PointerTracker::new(800, 600);
        pointer.on_cursor_moved(400.0, 300.0);
        pointer.on_button(MouseButton::Left, ElementState::Pressed);
        pointer.on_cursor_moved(450.0, 300.0);
        assert!(pointer.is_dragging());
        assert!(pointer.on_button(MouseButton::Left, ElementState::Released).is_none());
        assert!(!pointer.is_dragging());
    }

    #[test]
    fn test_release_without_press() {
        let mut pointer = PointerTracker::new(800, 600);
        assert!(pointer.on_button(MouseButton::Left, ElementState::Released).is_none());
        pointer.on_button(MouseButton::Right, ElementState::Pressed);
        assert!(pointer.on_button(MouseButton::Left, ElementState::Released).is_none());
    }
}
