use triangle_engine::core::{App, AppControl, FrameCtx};
use triangle_engine::device::GpuInit;
use triangle_engine::logging::{init_logging, LoggingConfig};
use triangle_engine::paint::Color;
use triangle_engine::render::TriangleRenderer;
use triangle_engine::window::{Runtime, RuntimeConfig};

/// Clears to a solid color and draws the red triangle on every redraw.
struct HelloTriangle {
    clear: Color,
    triangle: TriangleRenderer,
}

impl HelloTriangle {
    fn new(clear: Color) -> Self {
        Self {
            clear,
            triangle: TriangleRenderer::new(),
        }
    }
}

impl App for HelloTriangle {
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        if ctx.frame_index == 0 {
            log::info!("first frame at {:?}", ctx.gpu.configured_size());
        }

        let triangle = &mut self.triangle;
        ctx.render(self.clear, |rctx, target| triangle.render(rctx, target))
    }
}

fn main() -> anyhow::Result<()> {
    init_logging(LoggingConfig::default());

    let app = HelloTriangle::new(Color::GREEN);

    Runtime::run(RuntimeConfig::default(), GpuInit::default(), app)
}
