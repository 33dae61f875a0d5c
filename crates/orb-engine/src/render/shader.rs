//! WGSL compile + link checks.
//!
//! Sources are parsed and validated with `naga` before any GPU object is
//! created, so a broken shader produces a readable diagnostic log instead of
//! a device validation panic. "Link" checks the pair against each other and
//! against the resources the full-screen pipeline provides.

use std::fmt;

use naga::{Binding, Handle, Module, ShaderStage, Type, TypeInner};

use super::FrameUniforms;

/// Built-in full-screen vertex stage.
pub const FULLSCREEN_VERTEX_WGSL: &str = include_str!("shaders/fullscreen.wgsl");

/// Shader compile or link failure, carrying the diagnostic log.
#[derive(Debug, Clone, PartialEq)]
pub enum ShaderError {
    /// Source failed to parse or validate.
    Compile { label: String, log: String },
    /// Stages are individually valid but cannot be used together.
    Link { log: String },
}

impl ShaderError {
    /// The diagnostic text, without the error-kind prefix.
    pub fn log(&self) -> &str {
        match self {
            ShaderError::Compile { log, .. } | ShaderError::Link { log } => log,
        }
    }
}

impl fmt::Display for ShaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderError::Compile { label, log } => {
                write!(f, "failed to compile {label} shader:\n{log}")
            }
            ShaderError::Link { log } => write!(f, "failed to link shader program: {log}"),
        }
    }
}

impl std::error::Error for ShaderError {}

/// A validated single-stage shader.
#[derive(Debug)]
pub struct CompiledShader {
    pub module: Module,
    /// Name of the entry point for the requested stage.
    pub entry_point: String,
    pub stage: ShaderStage,
}

/// Entry point names of a linked vertex/fragment pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkedProgram {
    pub vertex_entry: String,
    pub fragment_entry: String,
}

/// Parses and validates `source`, requiring an entry point for `stage`.
pub fn compile(label: &str, stage: ShaderStage, source: &str) -> Result<CompiledShader, ShaderError> {
    let compile_err = |log: String| ShaderError::Compile {
        label: label.to_string(),
        log,
    };

    let module = naga::front::wgsl::parse_str(source)
        .map_err(|e| compile_err(e.emit_to_string(source)))?;

    let mut validator = naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::default(),
    );
    validator
        .validate(&module)
        .map_err(|e| compile_err(e.emit_to_string(source)))?;

    let entry_point = module
        .entry_points
        .iter()
        .find(|ep| ep.stage == stage)
        .map(|ep| ep.name.clone())
        .ok_or_else(|| compile_err(format!("no {stage:?} entry point")))?;

    Ok(CompiledShader {
        module,
        entry_point,
        stage,
    })
}

/// Checks that a vertex and fragment stage form a usable program for the
/// full-screen pipeline.
///
/// Rules:
/// - every fragment `@location` input is written by the vertex stage, with the
///   same type and interpolation
/// - the fragment stage writes a `vec4<f32>` to `@location(0)` and nothing to
///   other locations (the pipeline has one color target)
/// - the only bindable resource is the frame uniform block at group 0 binding 0,
///   declared by the fragment stage in the uniform address space and no larger
///   than [`FrameUniforms`]
pub fn link(vertex: &CompiledShader, fragment: &CompiledShader) -> Result<LinkedProgram, ShaderError> {
    let link_err = |log: String| ShaderError::Link { log };

    if vertex.stage != ShaderStage::Vertex {
        return Err(link_err(format!("expected a vertex stage, got {:?}", vertex.stage)));
    }
    if fragment.stage != ShaderStage::Fragment {
        return Err(link_err(format!("expected a fragment stage, got {:?}", fragment.stage)));
    }

    let vs = entry(vertex)?;
    let fs = entry(fragment)?;

    let mut outputs = Vec::new();
    if let Some(result) = &vs.function.result {
        collect_varyings(&vertex.module, result.ty, result.binding.as_ref(), &mut outputs);
    }

    let mut inputs = Vec::new();
    for arg in &fs.function.arguments {
        collect_varyings(&fragment.module, arg.ty, arg.binding.as_ref(), &mut inputs);
    }

    for input in &inputs {
        let loc = input.location;
        let Some(output) = outputs.iter().find(|o| o.location == loc) else {
            return Err(link_err(format!(
                "fragment input @location({loc}) is not written by the vertex stage"
            )));
        };
        if output.ty != input.ty {
            return Err(link_err(format!(
                "@location({loc}) type mismatch: vertex writes {:?}, fragment reads {:?}",
                output.ty, input.ty
            )));
        }
        if output.interpolation != input.interpolation || output.sampling != input.sampling {
            return Err(link_err(format!(
                "@location({loc}) interpolation mismatch: vertex {:?}/{:?}, fragment {:?}/{:?}",
                output.interpolation, output.sampling, input.interpolation, input.sampling
            )));
        }
    }

    let mut targets = Vec::new();
    if let Some(result) = &fs.function.result {
        collect_varyings(&fragment.module, result.ty, result.binding.as_ref(), &mut targets);
    }
    check_color_target(&targets)?;

    check_resources(&vertex.module, ShaderStage::Vertex)?;
    check_resources(&fragment.module, ShaderStage::Fragment)?;

    Ok(LinkedProgram {
        vertex_entry: vertex.entry_point.clone(),
        fragment_entry: fragment.entry_point.clone(),
    })
}

/// Compiles the built-in vertex stage and `fragment_source`, then links them.
pub fn build_program(label: &str, fragment_source: &str) -> Result<LinkedProgram, ShaderError> {
    let vertex = compile("fullscreen vertex", ShaderStage::Vertex, FULLSCREEN_VERTEX_WGSL)?;
    let fragment = compile(label, ShaderStage::Fragment, fragment_source)?;
    link(&vertex, &fragment)
}

fn entry(shader: &CompiledShader) -> Result<&naga::EntryPoint, ShaderError> {
    shader
        .module
        .entry_points
        .iter()
        .find(|ep| ep.name == shader.entry_point)
        .ok_or_else(|| ShaderError::Link {
            log: format!("entry point `{}` disappeared", shader.entry_point),
        })
}

/// A user-defined `@location` input or output of an entry point.
#[derive(Debug, Clone, PartialEq)]
struct Varying {
    location: u32,
    ty: TypeInner,
    interpolation: Option<naga::Interpolation>,
    sampling: Option<naga::Sampling>,
}

fn collect_varyings(module: &Module, ty: Handle<Type>, binding: Option<&Binding>, out: &mut Vec<Varying>) {
    let mut push = |ty: Handle<Type>, binding: &Binding| {
        if let Binding::Location { location, interpolation, sampling, .. } = binding {
            out.push(Varying {
                location: *location,
                ty: module.types[ty].inner.clone(),
                interpolation: *interpolation,
                sampling: *sampling,
            });
        }
    };

    match binding {
        Some(b) => push(ty, b),
        None => {
            if let TypeInner::Struct { members, .. } = &module.types[ty].inner {
                for m in members {
                    if let Some(b) = &m.binding {
                        push(m.ty, b);
                    }
                }
            }
        }
    }
}

fn check_color_target(targets: &[Varying]) -> Result<(), ShaderError> {
    let link_err = |log: String| Err(ShaderError::Link { log });

    if let Some(extra) = targets.iter().find(|t| t.location != 0) {
        return link_err(format!(
            "fragment output @location({}) has no color target, only @location(0) is provided",
            extra.location
        ));
    }
    let Some(color) = targets.first() else {
        return link_err("fragment stage must write a color to @location(0)".to_string());
    };
    match color.ty {
        TypeInner::Vector {
            size: naga::VectorSize::Quad,
            scalar: naga::Scalar { kind: naga::ScalarKind::Float, .. },
        } => Ok(()),
        ref other => link_err(format!("fragment output @location(0) must be vec4<f32>, got {other:?}")),
    }
}

fn check_resources(module: &Module, stage: ShaderStage) -> Result<(), ShaderError> {
    for (_, var) in module.global_variables.iter() {
        let Some(rb) = &var.binding else { continue };
        let name = var.name.as_deref().unwrap_or("<unnamed>");

        if stage != ShaderStage::Fragment {
            return Err(ShaderError::Link {
                log: format!("`{name}`: frame uniforms are bound to the fragment stage only"),
            });
        }

        if rb.group != 0 || rb.binding != 0 {
            return Err(ShaderError::Link {
                log: format!(
                    "`{name}` uses @group({}) @binding({}), only @group(0) @binding(0) is provided",
                    rb.group, rb.binding
                ),
            });
        }
        if var.space != naga::AddressSpace::Uniform {
            return Err(ShaderError::Link {
                log: format!("`{name}` must be declared `var<uniform>`"),
            });
        }
        let size = module.types[var.ty].inner.size(module.to_ctx()) as u64;
        if size > FrameUniforms::SIZE {
            return Err(ShaderError::Link {
                log: format!(
                    "`{name}` is {size} bytes, the frame uniform block is {} bytes",
                    FrameUniforms::SIZE
                ),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const UNIFORMS: &str = "
        struct FrameUniforms { resolution: vec2<f32>, time: f32 }
        @group(0) @binding(0) var<uniform> frame: FrameUniforms;
    ";

    fn fragment(body: &str) -> String {
        format!("{UNIFORMS}\n{body}")
    }

    #[test]
    fn builtin_vertex_stage_compiles() {
        let vs = compile("vs", ShaderStage::Vertex, FULLSCREEN_VERTEX_WGSL).unwrap();
        assert_eq!(vs.entry_point, "vs_main");
    }

    #[test]
    fn minimal_fragment_links() {
        let src = fragment(
            "@fragment
             fn fs_main(@builtin(position) p: vec4<f32>) -> @location(0) vec4<f32> {
                 return vec4<f32>(p.xy / frame.resolution, sin(frame.time), 1.0);
             }",
        );
        let program = build_program("test", &src).unwrap();
        assert_eq!(program.vertex_entry, "vs_main");
        assert_eq!(program.fragment_entry, "fs_main");
    }

    #[test]
    fn syntax_error_is_compile_error_with_log() {
        let err = build_program("broken", "@fragment fn fs_main( -> {").unwrap_err();
        match &err {
            ShaderError::Compile { label, log } => {
                assert_eq!(label, "broken");
                assert!(!log.is_empty());
            }
            other => panic!("expected compile error, got {other:?}"),
        }
        assert!(err.to_string().starts_with("failed to compile broken shader"));
    }

    #[test]
    fn type_error_is_compile_error() {
        let src = "@fragment fn fs_main() -> @location(0) vec4<f32> { return 1.0; }";
        assert!(matches!(build_program("t", src), Err(ShaderError::Compile { .. })));
    }

    #[test]
    fn missing_fragment_entry_is_compile_error() {
        let err = compile("t", ShaderStage::Fragment, FULLSCREEN_VERTEX_WGSL).unwrap_err();
        assert!(err.log().contains("Fragment"));
    }

    #[test]
    fn unwritten_varying_is_link_error() {
        let src = "@fragment
             fn fs_main(@location(0) uv: vec2<f32>) -> @location(0) vec4<f32> {
                 return vec4<f32>(uv, 0.0, 1.0);
             }";
        let err = build_program("t", src).unwrap_err();
        assert!(matches!(err, ShaderError::Link { .. }));
        assert!(err.log().contains("@location(0)"));
    }

    #[test]
    fn extra_binding_is_link_error() {
        let src = "@group(0) @binding(1) var<uniform> extra: vec4<f32>;
             @fragment
             fn fs_main() -> @location(0) vec4<f32> { return extra; }";
        assert!(matches!(build_program("t", src), Err(ShaderError::Link { .. })));
    }

    #[test]
    fn oversized_uniform_is_link_error() {
        let src = "struct Big { a: vec4<f32>, b: vec4<f32> }
             @group(0) @binding(0) var<uniform> big: Big;
             @fragment
             fn fs_main() -> @location(0) vec4<f32> { return big.a + big.b; }";
        let err = build_program("t", src).unwrap_err();
        assert!(err.log().contains("32 bytes"));
    }

    // ── color target ─────────────────────────────────────────────────────

    #[test]
    fn integer_color_output_is_link_error() {
        let src = "@fragment
             fn fs_main() -> @location(0) vec4<i32> { return vec4<i32>(1); }";
        let err = build_program("t", src).unwrap_err();
        assert!(matches!(err, ShaderError::Link { .. }));
        assert!(err.log().contains("vec4<f32>"));
    }

    #[test]
    fn output_to_other_location_is_link_error() {
        let src = "@fragment
             fn fs_main() -> @location(1) vec4<f32> { return vec4<f32>(1.0); }";
        let err = build_program("t", src).unwrap_err();
        assert!(matches!(err, ShaderError::Link { .. }));
        assert!(err.log().contains("@location(1)"));
    }

    #[test]
    fn struct_color_output_links() {
        let src = "struct Out { @location(0) color: vec4<f32> }
             @fragment
             fn fs_main() -> Out { var o: Out; o.color = vec4<f32>(1.0); return o; }";
        assert!(build_program("t", src).is_ok());
    }

    // ── varyings ─────────────────────────────────────────────────────────

    const VS_WITH_UV: &str = "
        struct VsOut { @builtin(position) pos: vec4<f32>, @location(0) uv: vec2<f32> }
        @vertex
        fn vs_main(@location(0) p: vec2<f32>) -> VsOut {
            var o: VsOut;
            o.pos = vec4<f32>(p, 0.0, 1.0);
            o.uv = p;
            return o;
        }
    ";

    fn link_with_uv_vertex(fs_src: &str) -> Result<LinkedProgram, ShaderError> {
        let vs = compile("vs", ShaderStage::Vertex, VS_WITH_UV).unwrap();
        let fs = compile("fs", ShaderStage::Fragment, fs_src).unwrap();
        link(&vs, &fs)
    }

    #[test]
    fn matching_varying_links() {
        let program = link_with_uv_vertex(
            "@fragment
             fn fs_main(@location(0) uv: vec2<f32>) -> @location(0) vec4<f32> {
                 return vec4<f32>(uv, 0.0, 1.0);
             }",
        );
        assert!(program.is_ok());
    }

    #[test]
    fn varying_type_mismatch_is_link_error() {
        let err = link_with_uv_vertex(
            "@fragment
             fn fs_main(@location(0) uv: vec4<f32>) -> @location(0) vec4<f32> {
                 return uv;
             }",
        )
        .unwrap_err();
        assert!(err.log().contains("type mismatch"));
    }

    #[test]
    fn varying_interpolation_mismatch_is_link_error() {
        let err = link_with_uv_vertex(
            "@fragment
             fn fs_main(@location(0) @interpolate(linear) uv: vec2<f32>) -> @location(0) vec4<f32> {
                 return vec4<f32>(uv, 0.0, 1.0);
             }",
        )
        .unwrap_err();
        assert!(err.log().contains("interpolation mismatch"));
    }

    #[test]
    fn vertex_stage_binding_is_link_error() {
        let vs_src = "
            @group(0) @binding(0) var<uniform> scale: vec4<f32>;
            @vertex
            fn vs_main(@location(0) p: vec2<f32>) -> @builtin(position) vec4<f32> {
                return vec4<f32>(p, 0.0, 1.0) * scale;
            }";
        let vs = compile("vs", ShaderStage::Vertex, vs_src).unwrap();
        let fs = compile(
            "fs",
            ShaderStage::Fragment,
            "@fragment fn fs_main() -> @location(0) vec4<f32> { return vec4<f32>(1.0); }",
        )
        .unwrap();
        assert!(matches!(link(&vs, &fs), Err(ShaderError::Link { .. })));
    }
}
