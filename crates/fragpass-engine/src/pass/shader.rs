//! Fixed full-screen-quad vertex stage shared by every pass, and the front-end
//! check run on every composed source before it reaches the device.

use bytemuck::{Pod, Zeroable};
use wgpu::naga;

use crate::error::{Error, Result};
use crate::uniform::UniformKind;

/// Vertex stage prepended to every fragment source.
///
/// Passes `uv` (0..1, origin bottom-left) at location 0. The fragment stage may
/// ignore it and use `@builtin(position)` instead.
pub const VERTEX_PRELUDE: &str = r#"
struct FragpassVertexOut {
    @builtin(position) position: vec4<f32>,
    @location(0) uv: vec2<f32>,
};

@vertex
fn fragpass_vs_main(@location(0) pos: vec2<f32>) -> FragpassVertexOut {
    var out: FragpassVertexOut;
    out.position = vec4<f32>(pos, 0.0, 1.0);
    out.uv = pos * 0.5 + vec2<f32>(0.5, 0.5);
    return out;
}
"#;

pub(crate) const VERTEX_ENTRY: &str = "fragpass_vs_main";

/// Concatenates the vertex prelude with the caller's fragment source.
pub fn compose_source(fragment_source: &str) -> String {
    let mut source = String::with_capacity(VERTEX_PRELUDE.len() + fragment_source.len() + 1);
    source.push_str(VERTEX_PRELUDE);
    source.push('\n');
    source.push_str(fragment_source);
    source
}

// ── source check ──────────────────────────────────────────────────────────

/// Parses and validates a composed source against the declared uniforms.
///
/// `globals` and `locals` are the declared kinds in binding order for groups 0
/// and 1. Fails with [`Error::Shader`] when the source does not parse or
/// validate, does not have exactly one `@fragment` entry point, or binds a
/// resource that is not a declared uniform of the matching type.
pub fn check_source(source: &str, globals: &[UniformKind], locals: &[UniformKind]) -> Result<()> {
    let module = naga::front::wgsl::parse_str(source)
        .map_err(|e| Error::Shader(e.emit_to_string(source)))?;

    let mut validator =
        naga::valid::Validator::new(naga::valid::ValidationFlags::all(), naga::valid::Capabilities::all());
    validator
        .validate(&module)
        .map_err(|e| Error::Shader(e.emit_to_string(source)))?;

    let fragments = module
        .entry_points
        .iter()
        .filter(|ep| ep.stage == naga::ShaderStage::Fragment)
        .count();
    if fragments != 1 {
        return Err(Error::Shader(format!(
            "expected exactly one @fragment entry point, found {fragments}"
        )));
    }

    for (_, var) in module.global_variables.iter() {
        let Some(binding) = &var.binding else { continue };
        let name = var.name.as_deref().unwrap_or("<unnamed>");

        let declared = match binding.group {
            0 => globals.get(binding.binding as usize),
            1 => locals.get(binding.binding as usize),
            _ => None,
        };
        let Some(kind) = declared else {
            return Err(Error::Shader(format!(
                "`{name}` at @group({}) @binding({}) is not a declared uniform",
                binding.group, binding.binding
            )));
        };

        let found = match var.space {
            naga::AddressSpace::Uniform => naga_kind(&module.types[var.ty].inner),
            _ => None,
        };
        if found != Some(*kind) {
            return Err(Error::Shader(format!(
                "`{name}` at @group({}) @binding({}) must be `var<uniform> {name}: {}`",
                binding.group,
                binding.binding,
                kind.wgsl_type()
            )));
        }
    }

    Ok(())
}

fn naga_kind(inner: &naga::TypeInner) -> Option<UniformKind> {
    let (components, scalar) = match *inner {
        naga::TypeInner::Scalar(scalar) => (1, scalar),
        naga::TypeInner::Vector { size, scalar } => (size as usize, scalar),
        _ => return None,
    };
    if scalar.width != 4 {
        return None;
    }
    UniformKind::ALL.into_iter().find(|k| {
        k.components() == components
            && match scalar.kind {
                naga::ScalarKind::Float => k.element() == crate::uniform::ElementType::Float,
                naga::ScalarKind::Sint => k.element() == crate::uniform::ElementType::Int,
                _ => false,
            }
    })
}

// ── quad vertex ───────────────────────────────────────────────────────────

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub(crate) struct QuadVertex {
    pub pos: [f32; 2], // clip space
}

impl QuadVertex {
    const ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x2];

    pub(crate) fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<QuadVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

/// Two triangles covering clip space; drawn without an index buffer.
pub(crate) const QUAD_VERTICES: [QuadVertex; 6] = [
    QuadVertex { pos: [-1.0, -1.0] },
    QuadVertex { pos: [1.0, -1.0] },
    QuadVertex { pos: [1.0, 1.0] },
    QuadVertex { pos: [-1.0, -1.0] },
    QuadVertex { pos: [1.0, 1.0] },
    QuadVertex { pos: [-1.0, 1.0] },
];

pub(crate) const QUAD_VERTEX_COUNT: u32 = QUAD_VERTICES.len() as u32;
