use crate::error::ValueError;
use crate::uniform::{GpuUniform, Scope, Uniform, UniformSet};

use super::decls::UniformDecls;

/// Output of [`build_bindings`]: the constructed uniforms and the bind group
/// layout + bind group that expose them to the fragment stage.
#[derive(Debug)]
pub struct Bindings {
    pub uniforms: UniformSet,
    pub layout: wgpu::BindGroupLayout,
    pub bind_group: wgpu::BindGroup,
}

/// Turns ordered declarations into uniforms, a layout and a bind group.
///
/// Binding index equals declaration position. Every declaration is validated
/// before any GPU resource is created, so a rejected value leaves nothing behind.
pub fn build_bindings(
    device: &wgpu::Device,
    scope: Scope,
    decls: &UniformDecls,
) -> Result<Bindings, ValueError> {
    let uniforms = declare_uniforms(scope, decls)?;
    let layout_entries = layout_entries(uniforms.iter().map(|(_, u)| u));

    let (group_label, layout_label) = match scope {
        Scope::Global => ("fragpass global bind group", "fragpass global bgl"),
        Scope::Local => ("fragpass pass bind group", "fragpass pass bgl"),
    };

    let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some(layout_label),
        entries: &layout_entries,
    });

    let gpu_uniforms: Vec<(String, GpuUniform)> = uniforms
        .into_iter()
        .map(|(name, uniform)| {
            let gpu = GpuUniform::new(device, &name, uniform);
            (name, gpu)
        })
        .collect();

    let group_entries: Vec<wgpu::BindGroupEntry<'_>> = gpu_uniforms
        .iter()
        .map(|(_, u)| wgpu::BindGroupEntry {
            binding: u.uniform().binding_index(),
            resource: u.buffer().as_entire_binding(),
        })
        .collect();

    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(group_label),
        layout: &layout,
        entries: &group_entries,
    });

    log::debug!(
        "built {:?} bindings: {} uniform(s) at group {}",
        scope,
        gpu_uniforms.len(),
        scope.group()
    );

    Ok(Bindings {
        uniforms: UniformSet::new(scope, gpu_uniforms),
        layout,
        bind_group,
    })
}

/// Constructs one [`Uniform`] per declaration, indexed by position.
pub fn declare_uniforms(
    scope: Scope,
    decls: &UniformDecls,
) -> Result<Vec<(String, Uniform)>, ValueError> {
    decls
        .iter()
        .enumerate()
        .map(|(index, (name, decl))| {
            Uniform::new(scope, index as u32, decl.clone()).map(|u| (name.to_string(), u))
        })
        .collect()
}

/// Layout entry for one uniform: a fragment-visible uniform buffer sized to its kind.
pub fn layout_entry(uniform: &Uniform) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding: uniform.binding_index(),
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: wgpu::BufferSize::new(uniform.kind().byte_size()),
        },
        count: None,
    }
}

pub fn layout_entries<'a>(
    uniforms: impl IntoIterator<Item = &'a Uniform>,
) -> Vec<wgpu::BindGroupLayoutEntry> {
    uniforms.into_iter().map(layout_entry).collect()
}

/// WGSL binding declarations for `uniforms`, one per line.
///
/// Callers may prepend this to their fragment source instead of writing the
/// `@group`/`@binding` lines by hand.
pub fn shader_prelude<'a>(uniforms: impl IntoIterator<Item = (&'a str, &'a Uniform)>) -> String {
    let mut out = String::new();
    for (name, uniform) in uniforms {
        out.push_str(&uniform.import_declaration(name));
        out.push('\n');
    }
    out
}
