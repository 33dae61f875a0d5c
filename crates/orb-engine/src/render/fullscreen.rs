use std::borrow::Cow;

use wgpu::util::DeviceExt;

use crate::render::{RenderCtx, RenderTarget};

use super::quad::{self, FULLSCREEN_QUAD, FULLSCREEN_VERTEX_COUNT};
use super::shader::{self, LinkedProgram, FULLSCREEN_VERTEX_WGSL};
use super::FrameUniforms;

/// Lifecycle of a [`FullscreenRenderer`]'s shader program.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum RendererStatus {
    /// Nothing compiled yet (no frame rendered).
    Pending,
    /// Program linked; frames draw.
    Ready,
    /// Compile or link failed. The error was logged; frames draw nothing.
    Failed,
}

/// Draws one fragment shader over the whole surface.
///
/// Resources (quad buffer, uniform buffer, pipeline) are created lazily on the
/// first frame and live as long as the renderer. The pipeline is rebuilt if the
/// surface format changes.
///
/// The fragment source must declare the frame uniforms itself if it uses them:
///
/// ```wgsl
/// struct FrameUniforms { resolution: vec2<f32>, time: f32 }
/// @group(0) @binding(0) var<uniform> frame: FrameUniforms;
/// ```
pub struct FullscreenRenderer {
    label: String,
    fragment_source: Cow<'static, str>,

    program: Option<LinkedProgram>,
    status: RendererStatus,

    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,

    bind_group_layout: Option<wgpu::BindGroupLayout>,
    bind_group: Option<wgpu::BindGroup>,
    uniform_ubo: Option<wgpu::Buffer>,

    quad_vbo: Option<wgpu::Buffer>,
}

impl FullscreenRenderer {
    pub fn new(label: impl Into<String>, fragment_source: impl Into<Cow<'static, str>>) -> Self {
        Self {
            label: label.into(),
            fragment_source: fragment_source.into(),
            program: None,
            status: RendererStatus::Pending,
            pipeline_format: None,
            pipeline: None,
            bind_group_layout: None,
            bind_group: None,
            uniform_ubo: None,
            quad_vbo: None,
        }
    }

    pub fn status(&self) -> RendererStatus {
        self.status
    }

    /// Compiles and links the program without touching the GPU.
    ///
    /// Called implicitly by [`render`](Self::render); exposed so callers can
    /// surface shader errors before the first frame.
    pub fn prepare(&mut self) -> RendererStatus {
        if self.status != RendererStatus::Pending {
            return self.status;
        }

        match shader::build_program(&self.label, &self.fragment_source) {
            Ok(program) => {
                log::debug!(
                    "{} program linked ({} / {})",
                    self.label, program.vertex_entry, program.fragment_entry
                );
                self.program = Some(program);
                self.status = RendererStatus::Ready;
            }
            Err(err) => {
                log::error!("{err}");
                self.status = RendererStatus::Failed;
            }
        }
        self.status
    }

    /// Uploads `time` (seconds) and the canvas resolution, then draws the quad.
    ///
    /// Loads the existing target contents; the caller clears.
    pub fn render(&mut self, ctx: &RenderCtx<'_>, target: &mut RenderTarget<'_>, time: f32) {
        if self.prepare() != RendererStatus::Ready {
            return;
        }
        if ctx.canvas.is_empty() {
            return;
        }

        self.ensure_pipeline(ctx);
        self.ensure_static_buffers(ctx);
        self.ensure_bindings(ctx);
        self.write_uniforms(ctx, time);

        let Some(pipeline) = self.pipeline.as_ref() else { return };
        let Some(bind_group) = self.bind_group.as_ref() else { return };
        let Some(quad_vbo) = self.quad_vbo.as_ref() else { return };

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("orb fullscreen pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, bind_group, &[]);
        rpass.set_vertex_buffer(0, quad_vbo.slice(..));
        rpass.draw(0..FULLSCREEN_VERTEX_COUNT, 0..1);
    }

    // ── private helpers ────────────────────────────────────────────────────

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_format == Some(ctx.surface_format) && self.pipeline.is_some() {
            return;
        }
        let Some(program) = self.program.as_ref() else { return };

        let vertex_module = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("orb fullscreen vertex shader"),
            source: wgpu::ShaderSource::Wgsl(FULLSCREEN_VERTEX_WGSL.into()),
        });
        let fragment_module = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(self.label.as_str()),
            source: wgpu::ShaderSource::Wgsl(self.fragment_source.clone()),
        });

        let bind_group_layout =
            ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("orb frame uniforms bgl"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: wgpu::BufferSize::new(FrameUniforms::SIZE),
                    },
                    count: None,
                }],
            });

        let pipeline_layout =
            ctx.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("orb fullscreen pipeline layout"),
                bind_group_layouts: &[&bind_group_layout],
                immediate_size: 0,
            });

        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("orb fullscreen pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &vertex_module,
                entry_point: Some(program.vertex_entry.as_str()),
                compilation_options: Default::default(),
                buffers: &[quad::layout()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &fragment_module,
                entry_point: Some(program.fragment_entry.as_str()),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.surface_format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        log::debug!("{} pipeline built for {:?}", self.label, ctx.surface_format);

        self.pipeline_format = Some(ctx.surface_format);
        self.pipeline = Some(pipeline);
        self.bind_group_layout = Some(bind_group_layout);
        self.bind_group = None;
        self.uniform_ubo = None;
    }

    fn ensure_bindings(&mut self, ctx: &RenderCtx<'_>) {
        if self.bind_group.is_some() && self.uniform_ubo.is_some() {
            return;
        }
        let Some(bgl) = self.bind_group_layout.as_ref() else { return };

        let uniform_ubo = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("orb frame uniforms ubo"),
            size: FrameUniforms::SIZE,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("orb frame uniforms bind group"),
            layout: bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_ubo.as_entire_binding(),
            }],
        });

        self.uniform_ubo = Some(uniform_ubo);
        self.bind_group = Some(bind_group);
    }

    fn ensure_static_buffers(&mut self, ctx: &RenderCtx<'_>) {
        if self.quad_vbo.is_some() {
            return;
        }

        self.quad_vbo = Some(ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("orb fullscreen quad vbo"),
            contents: bytemuck::cast_slice(&FULLSCREEN_QUAD),
            usage: wgpu::BufferUsages::VERTEX,
        }));
    }

    fn write_uniforms(&mut self, ctx: &RenderCtx<'_>, time: f32) {
        let Some(ubo) = self.uniform_ubo.as_ref() else { return };
        ctx.queue.write_buffer(ubo, 0, bytemuck::bytes_of(&FrameUniforms::new(ctx.canvas, time)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_pending() {
        let r = FullscreenRenderer::new("t", "");
        assert_eq!(r.status(), RendererStatus::Pending);
    }

    #[test]
    fn broken_source_fails_once_and_stays_failed() {
        let mut r = FullscreenRenderer::new("broken", "@fragment fn fs_main( {");
        assert_eq!(r.prepare(), RendererStatus::Failed);
        assert_eq!(r.prepare(), RendererStatus::Failed);
        assert!(r.program.is_none());
    }

    #[test]
    fn valid_source_becomes_ready() {
        let mut r = FullscreenRenderer::new(
            "solid",
            "@fragment fn fs_main() -> @location(0) vec4<f32> { return vec4<f32>(1.0); }",
        );
        assert_eq!(r.prepare(), RendererStatus::Ready);
        assert_eq!(
            r.program.as_ref().map(|p| p.fragment_entry.as_str()),
            Some("fs_main")
        );
    }
}
