use winit::dpi::PhysicalSize;
use winit::event::WindowEvent;

use crate::core::AppControl;
use crate::device::is_drawable;

/// The window events the loop reacts to.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum LoopEvent {
    Resized(PhysicalSize<u32>),
    RedrawRequested,
    CloseRequested,
}

impl LoopEvent {
    /// Translates a winit event; `inner_size` is queried only for scale changes.
    pub fn from_window_event(
        event: &WindowEvent,
        inner_size: impl FnOnce() -> PhysicalSize<u32>,
    ) -> Option<Self> {
        match event {
            WindowEvent::Resized(size) => Some(Self::Resized(*size)),
            WindowEvent::ScaleFactorChanged { .. } => Some(Self::Resized(inner_size())),
            WindowEvent::RedrawRequested => Some(Self::RedrawRequested),
            WindowEvent::CloseRequested => Some(Self::CloseRequested),
            _ => None,
        }
    }
}

/// Side of the loop that touches the surface and the window.
pub trait Presenter {
    /// Reconfigures the surface with `size` (never zero).
    fn reconfigure(&mut self, size: PhysicalSize<u32>);

    /// Renders and presents one frame.
    fn present(&mut self) -> AppControl;

    fn request_redraw(&mut self);
}

#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct FrameCounters {
    /// Redraws handed to the presenter for rendering.
    pub presented: u64,
    /// Redraws dropped because the window had a zero extent.
    pub skipped: u64,
    pub reconfigures: u64,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum LoopStep {
    Continue,
    Exit,
}

/// Event switch for one window.
///
/// Events are handled in arrival order. A resize reconfigures the surface before
/// anything else can present; once the loop has terminated every further event
/// is ignored.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    size: PhysicalSize<u32>,
    terminated: bool,
    counters: FrameCounters,
}

impl Dispatcher {
    pub fn new(initial_size: PhysicalSize<u32>) -> Self {
        Self {
            size: initial_size,
            terminated: false,
            counters: FrameCounters::default(),
        }
    }

    pub fn size(&self) -> PhysicalSize<u32> {
        self.size
    }

    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    pub fn counters(&self) -> FrameCounters {
        self.counters
    }

    pub fn dispatch<P: Presenter>(&mut self, presenter: &mut P, event: LoopEvent) -> LoopStep {
        if self.terminated {
            return LoopStep::Exit;
        }

        match event {
            LoopEvent::Resized(size) => {
                log::debug!("window resized to {}x{}", size.width, size.height);
                self.size = size;
                if is_drawable(size) {
                    presenter.reconfigure(size);
                    self.counters.reconfigures += 1;
                }
                // macOS does not redraw after a resize on its own.
                presenter.request_redraw();
                LoopStep::Continue
            }

            LoopEvent::RedrawRequested => {
                if !is_drawable(self.size) {
                    self.counters.skipped += 1;
                    return LoopStep::Continue;
                }

                self.counters.presented += 1;
                match presenter.present() {
                    AppControl::Continue => LoopStep::Continue,
                    AppControl::Exit => self.terminate(),
                }
            }

            LoopEvent::CloseRequested => {
                log::info!("close requested");
                self.terminate()
            }
        }
    }

    fn terminate(&mut self) -> LoopStep {
        self.terminated = true;
        LoopStep::Exit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Eq, PartialEq)]
    enum Call {
        Reconfigure(u32, u32),
        Present,
        RequestRedraw,
    }

    #[derive(Default)]
    struct Recorder {
        calls: Vec<Call>,
        exit_on_present: bool,
    }

    impl Presenter for Recorder {
        fn reconfigure(&mut self, size: PhysicalSize<u32>) {
            self.calls.push(Call::Reconfigure(size.width, size.height));
        }

        fn present(&mut self) -> AppControl {
            self.calls.push(Call::Present);
            if self.exit_on_present {
                AppControl::Exit
            } else {
                AppControl::Continue
            }
        }

        fn request_redraw(&mut self) {
            self.calls.push(Call::RequestRedraw);
        }
    }

    fn size(w: u32, h: u32) -> PhysicalSize<u32> {
        PhysicalSize::new(w, h)
    }

    // ── resize ────────────────────────────────────────────────────────────

    #[test]
    fn resize_reconfigures_before_next_present() {
        let mut d = Dispatcher::new(size(800, 600));
        let mut p = Recorder::default();

        d.dispatch(&mut p, LoopEvent::Resized(size(1024, 768)));
        d.dispatch(&mut p, LoopEvent::RedrawRequested);

        assert_eq!(
            p.calls,
            vec![Call::Reconfigure(1024, 768), Call::RequestRedraw, Call::Present]
        );
        assert_eq!(d.size(), size(1024, 768));
    }

    #[test]
    fn consecutive_resizes_use_latest_size() {
        let mut d = Dispatcher::new(size(800, 600));
        let mut p = Recorder::default();

        d.dispatch(&mut p, LoopEvent::Resized(size(640, 480)));
        d.dispatch(&mut p, LoopEvent::Resized(size(320, 240)));
        d.dispatch(&mut p, LoopEvent::RedrawRequested);

        let last_reconfigure = p
            .calls
            .iter()
            .rev()
            .find(|c| matches!(c, Call::Reconfigure(..)));
        assert_eq!(last_reconfigure, Some(&Call::Reconfigure(320, 240)));
        assert_eq!(p.calls.last(), Some(&Call::Present));
    }

    #[test]
    fn zero_size_defers_reconfigure_and_skips_redraw() {
        let mut d = Dispatcher::new(size(800, 600));
        let mut p = Recorder::default();

        d.dispatch(&mut p, LoopEvent::Resized(size(0, 0)));
        d.dispatch(&mut p, LoopEvent::RedrawRequested);

        assert_eq!(p.calls, vec![Call::RequestRedraw]);
        assert_eq!(d.counters().skipped, 1);
        assert_eq!(d.counters().reconfigures, 0);

        d.dispatch(&mut p, LoopEvent::Resized(size(800, 600)));
        d.dispatch(&mut p, LoopEvent::RedrawRequested);

        assert_eq!(
            &p.calls[1..],
            &[Call::Reconfigure(800, 600), Call::RequestRedraw, Call::Present]
        );
    }

    // ── redraw ────────────────────────────────────────────────────────────

    #[test]
    fn each_redraw_presents_once() {
        let mut d = Dispatcher::new(size(800, 600));
        let mut p = Recorder::default();

        for _ in 0..3 {
            assert_eq!(d.dispatch(&mut p, LoopEvent::RedrawRequested), LoopStep::Continue);
        }

        assert_eq!(p.calls, vec![Call::Present; 3]);
        assert_eq!(d.counters().presented, 3);
    }

    #[test]
    fn app_exit_from_frame_terminates() {
        let mut d = Dispatcher::new(size(800, 600));
        let mut p = Recorder {
            exit_on_present: true,
            ..Default::default()
        };

        assert_eq!(d.dispatch(&mut p, LoopEvent::RedrawRequested), LoopStep::Exit);
        assert!(d.is_terminated());
    }

    // ── close ─────────────────────────────────────────────────────────────

    #[test]
    fn close_terminates_without_drawing() {
        let mut d = Dispatcher::new(size(800, 600));
        let mut p = Recorder::default();

        assert_eq!(d.dispatch(&mut p, LoopEvent::CloseRequested), LoopStep::Exit);
        assert!(d.is_terminated());
        assert!(p.calls.is_empty());
    }

    #[test]
    fn events_after_close_are_ignored() {
        let mut d = Dispatcher::new(size(800, 600));
        let mut p = Recorder::default();

        d.dispatch(&mut p, LoopEvent::CloseRequested);
        assert_eq!(d.dispatch(&mut p, LoopEvent::RedrawRequested), LoopStep::Exit);
        assert_eq!(d.dispatch(&mut p, LoopEvent::Resized(size(10, 10))), LoopStep::Exit);

        assert!(p.calls.is_empty());
        assert_eq!(d.counters(), FrameCounters::default());
    }

    // ── translation ───────────────────────────────────────────────────────

    #[test]
    fn translates_window_events() {
        let no_size = || -> PhysicalSize<u32> { panic!("inner size not needed") };

        assert_eq!(
            LoopEvent::from_window_event(&WindowEvent::Resized(size(5, 6)), no_size),
            Some(LoopEvent::Resized(size(5, 6)))
        );
        assert_eq!(
            LoopEvent::from_window_event(&WindowEvent::RedrawRequested, no_size),
            Some(LoopEvent::RedrawRequested)
        );
        assert_eq!(
            LoopEvent::from_window_event(&WindowEvent::CloseRequested, no_size),
            Some(LoopEvent::CloseRequested)
        );
        assert_eq!(
            LoopEvent::from_window_event(&WindowEvent::Focused(true), no_size),
            None
        );
    }
}
