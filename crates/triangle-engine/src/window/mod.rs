//! Window + runtime loop.
//!
//! Owns the `winit` EventLoop and Window and drives the GPU layer through the
//! event dispatcher.

mod dispatch;
mod runtime;

pub use dispatch::{Dispatcher, FrameCounters, LoopEvent, LoopStep, Presenter};
pub use runtime::{Runtime, RuntimeConfig};
