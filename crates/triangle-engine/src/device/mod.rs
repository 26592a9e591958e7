//! GPU device + surface management.
//!
//! This module is responsible for:
//! - selecting an adapter compatible with the window surface
//! - creating the wgpu Device/Queue and configuring the Surface
//! - acquiring frames and presenting them

mod error;
mod frame;
mod gpu;
mod init;
mod surface;

pub use error::{classify_surface_error, SurfaceErrorAction};
pub use frame::GpuFrame;
pub use gpu::{request_adapter, Gpu};
pub use init::GpuInit;

pub(crate) use surface::is_drawable;
