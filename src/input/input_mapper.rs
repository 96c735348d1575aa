//! Input mapping from raw events to semantic actions
//!
//! Maps keyboard input to high-level actions like ResetCamera, TogglePower, etc.
//! Mouse buttons, motion and wheel are NOT mapped here - they go to the
//! pointer tracker and the orbit controller.

use winit::event::ElementState;
use winit::keyboard::KeyCode;

/// Actions triggered by keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    /// Exit application (Escape)
    Exit,
    /// Reset camera to starting position (R key)
    ResetCamera,
    /// Toggle fullscreen mode (F key)
    ToggleFullscreen,
    /// Toggle orbit input smoothing (G key)
    ToggleSmoothing,
    /// Flip the television power without clicking the knob (P key)
    TogglePower,
    /// Write the current object placements to the layout file (L key)
    SaveLayout,
}

/// Maps raw key events to semantic actions
pub struct InputMapper;

impl InputMapper {
    /// Map keyboard input to an action
    ///
    /// Returns `Some(action)` on press of a bound key, `None` otherwise
    pub fn map_keyboard(key: KeyCode, state: ElementState) -> Option<InputAction> {
        // Only handle key presses, not releases
        if state != ElementState::Pressed {
            return None;
        }

        match key {
            KeyCode::Escape => Some(InputAction::Exit),
            KeyCode::KeyR => Some(InputAction::ResetCamera),
            KeyCode::KeyF => Some(InputAction::ToggleFullscreen),
            KeyCode::KeyG => Some(InputAction::ToggleSmoothing),
            KeyCode::KeyP => Some(InputAction::TogglePower),
            KeyCode::KeyL => Some(InputAction::SaveLayout),
            _ => None,
        }
    }
}
