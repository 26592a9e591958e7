//! GPU rendering subsystem.
//!
//! Each renderer owns its GPU resources and builds them lazily against the
//! surface format of the frame it is asked to draw.

mod ctx;
mod triangle;

pub use ctx::{RenderCtx, RenderTarget};
pub use triangle::{TriangleRenderer, TRIANGLE_SHADER, TRIANGLE_VERTEX_COUNT};
