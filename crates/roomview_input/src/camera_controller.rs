//! Orbit camera controller
//!
//! Controls:
//! - Left drag: orbit around the target
//! - Right drag: pan the target
//! - Mouse wheel: dolly in/out
//! - R (via [`OrbitController::reset`]): back to the initial view

use roomview_core::PerspectiveCamera;
use roomview_math::Vec3;
use winit::event::{ElementState, MouseButton};

/// Camera controller orbiting a target point
pub struct OrbitController {
    // Mouse state
    orbiting: bool,
    panning: bool,
    pending_yaw: f32,
    pending_pitch: f32,
    pending_pan_x: f32,
    pending_pan_y: f32,
    pending_zoom: f32,

    // Input smoothing state
    smooth_yaw: f32,
    smooth_pitch: f32,

    home: Option<(Vec3, Vec3)>,

    // Configuration
    pub rotate_sensitivity: f32,
    pub pan_sensitivity: f32,
    /// Fractional distance change per wheel line
    pub zoom_sensitivity: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub smoothing_half_life: f32, // Exponential smoothing half-life in seconds
    pub smoothing_enabled: bool,
}

impl Default for OrbitController {
    fn default() -> Self {
        Self::new()
    }
}

impl OrbitController {
    pub fn new() -> Self {
        Self {
            orbiting: false,
            panning: false,
            pending_yaw: 0.0,
            pending_pitch: 0.0,
            pending_pan_x: 0.0,
            pending_pan_y: 0.0,
            pending_zoom: 0.0,

            smooth_yaw: 0.0,
            smooth_pitch: 0.0,

            home: None,

            rotate_sensitivity: 0.005,
            pan_sensitivity: 0.002,
            zoom_sensitivity: 0.1,
            min_distance: 10.0,
            max_distance: 900.0,
            smoothing_half_life: 0.05,
            smoothing_enabled: false,
        }
    }

    /// Process mouse button input
    pub fn process_mouse_button(&mut self, button: MouseButton, state: ElementState) {
        let pressed = state == ElementState::Pressed;

        match button {
            MouseButton::Left => self.orbiting = pressed,
            MouseButton::Right | MouseButton::Middle => self.panning = pressed,
            _ => {}
        }
    }

    /// Process raw mouse movement in pixels
    pub fn process_mouse_motion(&mut self, delta_x: f64, delta_y: f64) {
        if self.orbiting {
            self.pending_yaw += delta_x as f32;
            self.pending_pitch += delta_y as f32;
        } else if self.panning {
            self.pending_pan_x += delta_x as f32;
            self.pending_pan_y += delta_y as f32;
        }
    }

    /// Process wheel input in lines; positive scrolls toward the target
    pub fn process_scroll(&mut self, lines: f32) {
        self.pending_zoom += lines;
    }

    pub fn is_active(&self) -> bool {
        self.orbiting || self.panning
    }

    /// Remember the view that [`reset`](Self::reset) returns to
    pub fn set_home(&mut self, position: Vec3, target: Vec3) {
        self.home = Some((position, target));
    }

    pub fn reset<C: CameraControl>(&mut self, camera: &mut C) {
        if let Some((position, target)) = self.home {
            camera.set_view(position, target);
        }
        self.pending_yaw = 0.0;
        self.pending_pitch = 0.0;
        self.pending_pan_x = 0.0;
        self.pending_pan_y = 0.0;
        self.pending_zoom = 0.0;
        self.smooth_yaw = 0.0;
        self.smooth_pitch = 0.0;
    }

    /// Apply accumulated input to the camera
    pub fn update<C: CameraControl>(&mut self, camera: &mut C, dt: f32) {
        let (yaw_input, pitch_input) = if self.smoothing_enabled && dt > 0.0 {
            let smooth_factor = 2.0f32.powf(-dt / self.smoothing_half_life);
            self.smooth_yaw = self.smooth_yaw * smooth_factor + self.pending_yaw * (1.0 - smooth_factor);
            self.smooth_pitch = self.smooth_pitch * smooth_factor + self.pending_pitch * (1.0 - smooth_factor);
            (self.smooth_yaw, self.smooth_pitch)
        } else {
            (self.pending_yaw, self.pending_pitch)
        };

        if yaw_input != 0.0 || pitch_input != 0.0 {
            // Dragging right swings the camera left around the target
            camera.orbit(-yaw_input * self.rotate_sensitivity, -pitch_input * self.rotate_sensitivity);
        }

        if self.pending_pan_x != 0.0 || self.pending_pan_y != 0.0 {
            let scale = camera.distance() * self.pan_sensitivity;
            camera.pan(-self.pending_pan_x * scale, self.pending_pan_y * scale);
        }

        if self.pending_zoom != 0.0 {
            let factor = (1.0 - self.pending_zoom * self.zoom_sensitivity).max(0.1);
            let distance = (camera.distance() * factor).clamp(self.min_distance, self.max_distance);
            camera.set_distance(distance);
        }

        self.pending_yaw = 0.0;
        self.pending_pitch = 0.0;
        self.pending_pan_x = 0.0;
        self.pending_pan_y = 0.0;
        self.pending_zoom = 0.0;
    }

    /// Builder: set rotation sensitivity (radians per pixel)
    pub fn with_rotate_sensitivity(mut self, sensitivity: f32) -> Self {
        self.rotate_sensitivity = sensitivity;
        self
    }

    /// Builder: set dolly range
    pub fn with_distance_limits(mut self, min: f32, max: f32) -> Self {
        self.min_distance = min.min(max);
        self.max_distance = max.max(min);
        self
    }

    /// Builder: enable or disable smoothing
    pub fn with_smoothing(mut self, enabled: bool) -> Self {
        self.smoothing_enabled = enabled;
        self
    }
}

/// Trait for camera control
/// Allows the controller to work with different camera implementations
pub trait CameraControl {
    /// Rotate the eye around the target by yaw (about +Y) and pitch
    fn orbit(&mut self, delta_yaw: f32, delta_pitch: f32);
    /// Move eye and target together along the view's right and up axes
    fn pan(&mut self, right: f32, up: f32);
    fn distance(&self) -> f32;
    fn set_distance(&mut self, distance: f32);
    fn set_view(&mut self, position: Vec3, target: Vec3);
}

/// Keeps pitch away from the poles
const MAX_POLAR: f32 = std::f32::consts::PI - 0.01;
const MIN_POLAR: f32 = 0.01;

impl CameraControl for PerspectiveCamera {
    fn orbit(&mut self, delta_yaw: f32, delta_pitch: f32) {
        let offset = self.position - self.target;
        let radius = offset.length();
        if radius <= f32::EPSILON {
            return;
        }
        let azimuth = offset.x.atan2(offset.z) + delta_yaw;
        let polar = ((offset.y / radius).clamp(-1.0, 1.0).acos() + delta_pitch).clamp(MIN_POLAR, MAX_POLAR);
        let (sin_p, cos_p) = polar.sin_cos();
        let (sin_a, cos_a) = azimuth.sin_cos();
        self.position = self.target + Vec3::new(sin_p * sin_a, cos_p, sin_p * cos_a) * radius;
    }

    fn pan(&mut self, right: f32, up: f32) {
        let forward = self.forward();
        let Some(side) = forward.cross(self.up).try_normalize() else {
            return;
        };
        let camera_up = side.cross(forward);
        let delta = side * right + camera_up * up;
        self.position += delta;
        self.target += delta;
    }

    fn distance(&self) -> f32 {
        self.position.distance(self.target)
    }

    fn set_distance(&mut self, distance: f32) {
        let direction = (self.position - self.target).normalize_or_zero();
        if direction != Vec3::ZERO {
            self.position = self.target + direction * distance;
        }
    }

    fn set_view(&mut self, position: Vec3, target: Vec3) {
        self.position = position;
        self.target = target;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> PerspectiveCamera {
        PerspectiveCamera::default()
            .with_position(Vec3::new(0.0, 0.0, 100.0))
            .looking_at(Vec3::ZERO)
    }

    #[test]
    fn test_orbit_keeps_distance() {
        let mut cam = camera();
        cam.orbit(0.7, 0.3);
        assert!((cam.distance() - 100.0).abs() < 1e-3);
        assert_eq!(cam.target, Vec3::ZERO);
    }

    #[test]
    fn test_orbit_quarter_turn() {
        let mut cam = camera();
        cam.orbit(std::f32::consts::FRAC_PI_2, 0.0);
        assert!((cam.position - Vec3::new(100.0, 0.0, 0.0)).length() < 1e-3);
    }

    #[test]
    fn test_pitch_is_clamped() {
        let mut cam = camera();
        cam.orbit(0.0, -10.0);
        assert!(cam.position.y < 100.0);
        assert!(cam.position.y > 99.0);
    }

    #[test]
    fn test_drag_only_orbits_while_pressed() {
        let mut cam = camera();
        let mut controller = OrbitController::new();
        controller.process_mouse_motion(100.0, 0.0);
        controller.update(&mut cam, 0.016);
        assert_eq!(cam.position, Vec3::new(0.0, 0.0, 100.0));

        controller.process_mouse_button(MouseButton::Left, ElementState::Pressed);
        controller.process_mouse_motion(100.0, 0.0);
        controller.update(&mut cam, 0.016);
        assert!(cam.position.x.abs() > 1.0);
    }

    #[test]
    fn test_pan_moves_target_and_eye() {
        let mut cam = camera();
        let mut controller = OrbitController::new();
        controller.process_mouse_button(MouseButton::Right, ElementState::Pressed);
        controller.process_mouse_motion(50.0, 0.0);
        controller.update(&mut cam, 0.016);
        assert!(cam.target.x < 0.0);
        assert!((cam.distance() - 100.0).abs() < 1e-3);
    }

    #[test]
    fn test_scroll_zoom_is_clamped() {
        let mut cam = camera();
        let mut controller = OrbitController::new().with_distance_limits(50.0, 200.0);
        controller.process_scroll(100.0);
        controller.update(&mut cam, 0.016);
        assert!((cam.distance() - 50.0).abs() < 1e-3);
        controller.process_scroll(-100.0);
        controller.update(&mut cam, 0.016);
        assert!((cam.distance() - 200.0).abs() < 1e-3);
    }

    #[test]
    fn test_reset_restores_home() {
        let mut cam = camera();
        let mut controller = OrbitController::new();
        controller.set_home(cam.position, cam.target);
        cam.orbit(1.0, 0.5);
        controller.reset(&mut cam);
        assert_eq!(cam.position, Vec3::new(0.0, 0.0, 100.0));
    }
}
