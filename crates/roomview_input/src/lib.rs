//! Input Handling
//!
//! This crate turns window input into scene actions: pointer positions in
//! normalized device coordinates, clicks separated from drags, and an orbit
//! camera driven by the mouse.

mod camera_controller;
mod pointer;

pub use camera_controller::{CameraControl, OrbitController};
pub use pointer::{pixel_to_ndc, Click, PointerTracker};
