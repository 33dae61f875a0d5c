/// Two clip-space triangles covering the surface, `(x, y)` per vertex.
pub const FULLSCREEN_QUAD: [f32; 12] = [
    -1.0, -1.0,
     1.0, -1.0,
    -1.0,  1.0,
    -1.0,  1.0,
     1.0, -1.0,
     1.0,  1.0,
];

/// Number of vertices drawn for [`FULLSCREEN_QUAD`].
pub const FULLSCREEN_VERTEX_COUNT: u32 = (FULLSCREEN_QUAD.len() / 2) as u32;

const ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x2];

/// Layout of the quad buffer: one `vec2<f32>` at `@location(0)`.
pub(super) fn layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: (2 * std::mem::size_of::<f32>()) as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &ATTRS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quad_is_six_vertices() {
        assert_eq!(FULLSCREEN_QUAD.len(), 12);
        assert_eq!(FULLSCREEN_VERTEX_COUNT, 6);
    }

    #[test]
    fn quad_spans_clip_space() {
        let xs = FULLSCREEN_QUAD.iter().step_by(2);
        let ys = FULLSCREEN_QUAD.iter().skip(1).step_by(2);
        assert!(xs.clone().any(|&x| x == -1.0) && xs.clone().any(|&x| x == 1.0));
        assert!(ys.clone().any(|&y| y == -1.0) && ys.clone().any(|&y| y == 1.0));
    }

    #[test]
    fn layout_stride_matches_vertex() {
        assert_eq!(layout().array_stride, 8);
    }
}
