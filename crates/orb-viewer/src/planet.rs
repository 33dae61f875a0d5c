//! The planet fragment shader.

use orb_engine::render::FullscreenRenderer;

/// WGSL source of the planet fragment stage (`fs_main`).
pub const PLANET_WGSL: &str = include_str!("shaders/planet.wgsl");

/// Label used for GPU objects and shader diagnostics.
pub const PLANET_LABEL: &str = "planet";

/// A renderer drawing the planet over the whole surface.
pub fn renderer() -> FullscreenRenderer {
    FullscreenRenderer::new(PLANET_LABEL, PLANET_WGSL)
}

#[cfg(test)]
mod tests {
    use orb_engine::render::shader::build_program;
    use orb_engine::render::RendererStatus;

    use super::*;

    #[test]
    fn planet_compiles_and_links() {
        let program = build_program(PLANET_LABEL, PLANET_WGSL).unwrap();
        assert_eq!(program.fragment_entry, "fs_main");
        assert_eq!(program.vertex_entry, "vs_main");
    }

    #[test]
    fn renderer_prepares_ready() {
        let mut r = renderer();
        assert_eq!(r.prepare(), RendererStatus::Ready);
    }

    #[test]
    fn shader_reads_both_uniforms() {
        assert!(PLANET_WGSL.contains("frame.time"));
        assert!(PLANET_WGSL.contains("frame.resolution"));
    }
}
