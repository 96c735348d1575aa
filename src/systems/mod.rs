//! Application systems
//!
//! The application context plus the systems that drive it: the frame loop
//! and the window.

mod context;
mod frame_loop;
mod window;

pub use context::AppContext;
pub use frame_loop::{handle_resize, FrameClock, FrameLoop, FrameReport, FrameScheduler};
pub use window::{WindowError, WindowSystem};
