use winit::dpi::PhysicalSize;

use super::ctx::FrameCtx;

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application contract implemented by binaries driving the runtime.
pub trait App {
    /// Called after the surface has been reconfigured for a new size.
    fn on_resize(&mut self, size: PhysicalSize<u32>) {
        let _ = size;
    }

    /// Called once per redraw request while the window is drawable.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl;

    /// Called once when the window is closing, before GPU resources are released.
    fn on_close(&mut self) {}
}
