//! Coordinate and size types shared by the runtime and renderers.
//!
//! Two spaces exist:
//! - logical pixels (DPI-independent window size), see [`Viewport`]
//! - physical canvas pixels (what the surface and shaders see), see [`CanvasSize`]

mod canvas;
mod viewport;

pub use canvas::{effective_pixel_ratio, CanvasSize};
pub use viewport::Viewport;
