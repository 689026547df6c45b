use std::fmt;
use std::rc::Rc;

use wgpu::util::DeviceExt;
use winit::dpi::PhysicalSize;
use winit::window::WindowId;

use crate::binding::{build_bindings, UniformDecls};
use crate::device::{Gpu, GpuInit, TargetFrame};
use crate::error::{Error, Result};
use crate::mirror::SharedUniforms;
use crate::uniform::{Scope, UniformKind, UniformSet};

use super::shader::{self, QuadVertex, QUAD_VERTEX_COUNT, QUAD_VERTICES};
use super::target::PassTarget;
use super::Canvas;

/// Identity of a pass in the registry.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct PassId(pub(crate) u64);

impl fmt::Display for PassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pass#{}", self.0)
    }
}

/// Everything needed to create a pass.
#[derive(Debug, Clone)]
pub struct PassDescriptor<'a> {
    pub canvas: Canvas,
    /// WGSL with exactly one `@fragment` entry point. Appended verbatim to the
    /// fixed vertex stage.
    pub fragment_source: &'a str,
    /// Local uniforms, bound at group 1. Empty means no group 1.
    pub uniforms: UniformDecls,
}

/// One canvas + compiled pipeline + its local uniforms, drawn once per tick.
pub struct Pass {
    id: PassId,
    target: PassTarget,
    pipeline: wgpu::RenderPipeline,
    quad_vbo: wgpu::Buffer,
    uniforms: Rc<SharedUniforms>,
    bind_group: Option<wgpu::BindGroup>,
}

impl Pass {
    pub(crate) async fn create(
        gpu: &Gpu,
        init: &GpuInit,
        global_layout: &wgpu::BindGroupLayout,
        global_kinds: &[UniformKind],
        id: PassId,
        desc: PassDescriptor<'_>,
    ) -> Result<Self> {
        let device = gpu.device();

        let source = shader::compose_source(desc.fragment_source);
        let local_kinds: Vec<UniformKind> = desc.uniforms.iter().map(|(_, d)| d.kind).collect();
        shader::check_source(&source, global_kinds, &local_kinds)?;

        let target = PassTarget::new(gpu, &desc.canvas, init)?;

        let quad_vbo = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("fragpass quad vbo"),
            contents: bytemuck::cast_slice(&QUAD_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let (uniforms, local) = if desc.uniforms.is_empty() {
            (UniformSet::new(Scope::Local, Vec::new()), None)
        } else {
            let bindings = build_bindings(device, Scope::Local, &desc.uniforms)?;
            (bindings.uniforms, Some((bindings.layout, bindings.bind_group)))
        };

        // Stage interface and target mismatches only show up as device validation errors.
        let scope = device.push_error_scope(wgpu::ErrorFilter::Validation);

        let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("fragpass pass shader"),
            source: wgpu::ShaderSource::Wgsl(source.into()),
        });
        check_compilation(&module).await?;

        let pipeline_layout = match &local {
            Some((local_layout, _)) => {
                device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                    label: Some("fragpass pass pipeline layout"),
                    bind_group_layouts: &[global_layout, local_layout],
                    immediate_size: 0,
                })
            }
            None => device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("fragpass pass pipeline layout"),
                bind_group_layouts: &[global_layout],
                immediate_size: 0,
            }),
        };

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("fragpass pass pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &module,
                entry_point: Some(shader::VERTEX_ENTRY),
                compilation_options: Default::default(),
                buffers: &[QuadVertex::layout()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &module,
                // The caller's source holds the only fragment entry point.
                entry_point: None,
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: target.format(),
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

        if let Some(err) = scope.pop().await {
            return Err(Error::Shader(err.to_string()));
        }

        log::debug!(
            "created {id}: {} local uniform(s), format {:?}",
            uniforms.len(),
            target.format()
        );

        Ok(Self {
            id,
            target,
            pipeline,
            quad_vbo,
            uniforms: SharedUniforms::new(uniforms, gpu.queue().clone()),
            bind_group: local.map(|(_, group)| group),
        })
    }

    #[inline]
    pub fn id(&self) -> PassId {
        self.id
    }

    /// Whether the pass binds its own uniforms at group 1.
    #[inline]
    pub fn has_local_bindings(&self) -> bool {
        self.bind_group.is_some()
    }

    /// Texture an offscreen canvas renders into; `None` for window canvases.
    ///
    /// Created with `COPY_SRC`, so the last drawn frame can be copied out.
    pub fn offscreen_texture(&self) -> Option<&wgpu::Texture> {
        self.target.offscreen_texture()
    }

    pub fn format(&self) -> wgpu::TextureFormat {
        self.target.format()
    }

    pub fn window_id(&self) -> Option<WindowId> {
        self.target.window_id()
    }

    pub(crate) fn uniforms(&self) -> &Rc<SharedUniforms> {
        &self.uniforms
    }

    pub(crate) fn acquire(&self, device: &wgpu::Device) -> Result<Option<TargetFrame>> {
        self.target.acquire(device)
    }

    pub(crate) fn resize(&mut self, device: &wgpu::Device, size: PhysicalSize<u32>) {
        self.target.resize(device, size);
    }

    pub(crate) fn pre_present(&self) {
        self.target.pre_present();
    }

    /// Records this pass's draw: pipeline, group 0, optional group 1, quad, 6 vertices.
    pub(crate) fn record(&self, rpass: &mut wgpu::RenderPass<'_>, global: &wgpu::BindGroup) {
        rpass.set_pipeline(&self.pipeline);
        rpass.set_bind_group(Scope::Global.group(), global, &[]);
        if let Some(local) = &self.bind_group {
            rpass.set_bind_group(Scope::Local.group(), local, &[]);
        }
        rpass.set_vertex_buffer(0, self.quad_vbo.slice(..));
        rpass.draw(0..QUAD_VERTEX_COUNT, 0..1);
    }
}

impl fmt::Debug for Pass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pass")
            .field("id", &self.id)
            .field("format", &self.target.format())
            .field("local_uniforms", &self.uniforms.borrow().len())
            .finish()
    }
}

/// Fails with [`Error::Shader`] if the module reported any error message.
async fn check_compilation(module: &wgpu::ShaderModule) -> Result<()> {
    let info = module.get_compilation_info().await;
    let errors: Vec<String> = info
        .messages
        .iter()
        .filter(|m| matches!(m.message_type, wgpu::CompilationMessageType::Error))
        .map(|m| match &m.location {
            Some(loc) => format!("{}:{}: {}", loc.line_number, loc.line_position, m.message),
            None => m.message.clone(),
        })
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(Error::Shader(errors.join("\n")))
    }
}
