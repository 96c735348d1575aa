//! roomview - an interactive living-room scene viewer
//!
//! The binary wires these modules to a winit event loop; everything here
//! is usable without a window, which is how the tests drive it.

pub mod config;
pub mod input;
pub mod objects;
pub mod scene;
pub mod systems;
