//! GPU rendering subsystem.
//!
//! Renderers own their GPU resources (pipelines, buffers) and record into the
//! frame encoder handed out by `core::FrameCtx::render`.
//!
//! Convention:
//! - geometry is a static clip-space quad covering the whole surface
//! - fragment shaders receive `resolution` (canvas pixels) and `time` (seconds)
//!   through a uniform block at `@group(0) @binding(0)`

mod ctx;
mod fullscreen;
mod quad;
pub mod shader;
mod uniforms;

pub use ctx::{RenderCtx, RenderTarget};
pub use fullscreen::{FullscreenRenderer, RendererStatus};
pub use quad::{FULLSCREEN_QUAD, FULLSCREEN_VERTEX_COUNT};
pub use shader::ShaderError;
pub use uniforms::FrameUniforms;
