//! Triangle engine crate.
//!
//! Owns the window, GPU context and event loop used by the hello-triangle binary.

pub mod core;
pub mod device;
pub mod logging;
pub mod paint;
pub mod render;
pub mod window;
