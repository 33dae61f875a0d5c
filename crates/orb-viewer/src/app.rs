use winit::window::WindowId;

use orb_engine::coords::CanvasSize;
use orb_engine::core::{App, AppControl, FrameCtx};
use orb_engine::paint::Color;
use orb_engine::render::{FullscreenRenderer, RendererStatus};

use crate::config::RenderConfig;
use crate::planet;

/// Drives the planet renderer from the engine's frame loop.
pub struct PlanetApp {
    renderer: FullscreenRenderer,
    time_scale: f32,
}

impl PlanetApp {
    /// Creates the app and compiles the shader program up front.
    ///
    /// A compile or link failure is logged by the renderer; the app still
    /// runs and presents the clear color.
    pub fn new(config: &RenderConfig) -> Self {
        let mut renderer = planet::renderer();
        if renderer.prepare() == RendererStatus::Failed {
            log::warn!("planet shader unavailable; presenting clear color only");
        }
        Self {
            renderer,
            time_scale: config.time_scale,
        }
    }

    pub fn status(&self) -> RendererStatus {
        self.renderer.status()
    }

    /// Shader time for a given elapsed wall time.
    pub fn shader_time(&self, elapsed: f32) -> f32 {
        elapsed * self.time_scale
    }
}

impl App for PlanetApp {
    fn on_resize(&mut self, _window_id: WindowId, canvas: CanvasSize) {
        log::debug!("canvas resized to {}x{}", canvas.width, canvas.height);
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        let time = self.shader_time(ctx.time.elapsed);
        let renderer = &mut self.renderer;

        ctx.render(Color::BLACK, |rctx, target| {
            renderer.render(rctx, target, time);
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_ready_app() {
        let app = PlanetApp::new(&RenderConfig::default());
        assert_eq!(app.status(), RendererStatus::Ready);
    }

    #[test]
    fn time_scale_applies() {
        let config = RenderConfig { time_scale: 0.5, ..RenderConfig::default() };
        let app = PlanetApp::new(&config);
        assert_eq!(app.shader_time(4.0), 2.0);
    }
}
