use winit::window::Window;

use crate::device::{Gpu, SurfaceErrorAction};
use crate::paint::Color;
use crate::render::{RenderCtx, RenderTarget};

use super::app::AppControl;

/// Per-frame context passed to `core::App::on_frame`.
///
/// Lifetimes:
/// - `'a` is the duration of the callback invocation
/// - `'w` is the window-borrow lifetime carried by `Gpu<'w>`
pub struct FrameCtx<'a, 'w> {
    pub window: &'a Window,
    pub gpu: &'a mut Gpu<'w>,
    /// Redraws handled before this one.
    pub frame_index: u64,
}

impl<'a, 'w> FrameCtx<'a, 'w> {
    /// Acquires the surface texture, calls `draw` with a target that clears to
    /// `clear`, then submits and presents.
    ///
    /// Surface acquisition errors skip the frame and schedule another redraw;
    /// fatal ones return `Exit`.
    pub fn render<F>(&mut self, clear: Color, draw: F) -> AppControl
    where
        F: FnOnce(&RenderCtx<'_>, &mut RenderTarget<'_>),
    {
        let mut frame = match self.gpu.begin_frame() {
            Ok(f) => f,
            Err(err) => {
                let (control, redraw) = control_for(self.gpu.handle_surface_error(err));
                if redraw {
                    self.window.request_redraw();
                }
                return control;
            }
        };

        let rctx = RenderCtx::new(
            self.gpu.device(),
            self.gpu.queue(),
            self.gpu.surface_format(),
        );

        // RenderTarget borrows frame.encoder; dropped before submit() takes frame.
        {
            let mut target = RenderTarget::new(&mut frame.encoder, &frame.view, clear);
            draw(&rctx, &mut target);
        }

        self.window.pre_present_notify();
        self.gpu.submit(frame);

        AppControl::Continue
    }
}

/// Control directive for a failed frame, and whether to request another redraw.
///
/// With on-demand redraws nothing else would retry a skipped frame.
pub(crate) fn control_for(action: SurfaceErrorAction) -> (AppControl, bool) {
    match action {
        SurfaceErrorAction::Fatal => (AppControl::Exit, false),
        SurfaceErrorAction::Reconfigure | SurfaceErrorAction::SkipFrame => {
            (AppControl::Continue, true)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fatal_error_exits_without_redraw() {
        assert_eq!(control_for(SurfaceErrorAction::Fatal), (AppControl::Exit, false));
    }

    #[test]
    fn reconfigure_continues_and_redraws() {
        assert_eq!(
            control_for(SurfaceErrorAction::Reconfigure),
            (AppControl::Continue, true)
        );
    }

    #[test]
    fn skipped_frame_continues_and_redraws() {
        assert_eq!(
            control_for(SurfaceErrorAction::SkipFrame),
            (AppControl::Continue, true)
        );
    }
}
