use winit::dpi::PhysicalSize;

use super::Viewport;

/// Returns the pixel ratio used to size the canvas: `max(1, dpr)`.
///
/// Ratios below one would render at less than one texel per logical pixel,
/// so they are raised to one. Non-finite ratios are treated as one.
#[inline]
pub fn effective_pixel_ratio(dpr: f64) -> f64 {
    if dpr.is_finite() { dpr.max(1.0) } else { 1.0 }
}

/// Drawable size in physical pixels.
///
/// This is the size the surface is configured with and the value uploaded as
/// the shader's `resolution` uniform.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub struct CanvasSize {
    pub width: u32,
    pub height: u32,
}

impl CanvasSize {
    #[inline]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Scales a logical window size by the effective pixel ratio.
    pub fn from_logical(viewport: Viewport, dpr: f64) -> Self {
        let ratio = effective_pixel_ratio(dpr);
        Self {
            width: scale_side(viewport.width as f64, ratio),
            height: scale_side(viewport.height as f64, ratio),
        }
    }

    /// Computes the canvas size from a window's physical inner size and its
    /// scale factor.
    ///
    /// The window size is first converted back to logical pixels, then scaled
    /// by `max(1, scale_factor)`. The result never exceeds `inner`: a native
    /// swapchain must match the window extent, so below unit scale the canvas
    /// stays at the window's physical size.
    pub fn from_window(inner: PhysicalSize<u32>, scale_factor: f64) -> Self {
        if scale_factor.is_finite() && scale_factor >= 1.0 {
            return Self::new(inner.width, inner.height);
        }
        let sf = if scale_factor.is_finite() && scale_factor > 0.0 { scale_factor } else { 1.0 };
        let logical = Viewport::new(
            (inner.width as f64 / sf) as f32,
            (inner.height as f64 / sf) as f32,
        );
        let scaled = Self::from_logical(logical, scale_factor);
        Self::new(scaled.width.min(inner.width), scaled.height.min(inner.height))
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Canvas size as a `[width, height]` float pair for uniform upload.
    #[inline]
    pub fn to_f32(self) -> [f32; 2] {
        [self.width as f32, self.height as f32]
    }
}

impl From<CanvasSize> for PhysicalSize<u32> {
    fn from(c: CanvasSize) -> Self {
        PhysicalSize::new(c.width, c.height)
    }
}

impl From<PhysicalSize<u32>> for CanvasSize {
    fn from(p: PhysicalSize<u32>) -> Self {
        CanvasSize::new(p.width, p.height)
    }
}

fn scale_side(logical: f64, ratio: f64) -> u32 {
    if !(logical > 0.0) || !logical.is_finite() {
        return 0;
    }
    ((logical * ratio).round() as u32).max(1)
}
