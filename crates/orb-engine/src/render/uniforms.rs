use bytemuck::{Pod, Zeroable};

use crate::coords::CanvasSize;

/// Per-frame uniform block shared with fragment shaders.
///
/// WGSL layout (16 bytes, `@group(0) @binding(0)`):
///
/// ```wgsl
/// struct FrameUniforms {
///     resolution: vec2<f32>, // offset 0
///     time: f32,             // offset 8
/// }
/// ```
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct FrameUniforms {
    /// Canvas size in physical pixels.
    pub resolution: [f32; 2],
    /// Animation time in seconds.
    pub time: f32,
    pub _pad: f32, // 16-byte uniform alignment
}

impl FrameUniforms {
    /// Size of the block in bytes.
    pub const SIZE: u64 = std::mem::size_of::<Self>() as u64;

    #[inline]
    pub fn new(canvas: CanvasSize, time: f32) -> Self {
        Self {
            resolution: canvas.to_f32(),
            time,
            _pad: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_is_sixteen_bytes() {
        assert_eq!(FrameUniforms::SIZE, 16);
    }

    #[test]
    fn field_offsets_match_wgsl() {
        let u = FrameUniforms::new(CanvasSize::new(640, 480), 2.5);
        let floats: &[f32] = bytemuck::cast_slice(bytemuck::bytes_of(&u));
        assert_eq!(floats, &[640.0, 480.0, 2.5, 0.0]);
    }
}
