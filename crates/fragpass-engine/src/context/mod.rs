//! The engine context.
//!
//! One `Context` holds everything a frame needs: the device, the shared global
//! binding, the global uniforms, the live passes and the frame scheduler. It is
//! passed explicitly to every operation and rebuilt wholesale by `init`.

use std::rc::Rc;

use winit::dpi::PhysicalSize;
use winit::window::WindowId;

use crate::binding::{build_bindings, UniformDecls};
use crate::core::FrameCtx;
use crate::device::{Gpu, GpuInit};
use crate::error::{Error, Result};
use crate::mirror::{PassMirror, SharedUniforms, UniformMirror};
use crate::pass::{Pass, PassDescriptor, PassId, PassRegistry};
use crate::scheduler::{FrameScheduler, RunOutcome, SchedulerState, TickOutcome};
use crate::uniform::{Scope, UniformKind};

/// Device-dependent state, present between a successful `init` and the next teardown.
struct Live {
    gpu: Gpu,
    globals: Rc<SharedUniforms>,
    global_layout: wgpu::BindGroupLayout,
    global_bind_group: wgpu::BindGroup,
}

pub struct Context {
    init: GpuInit,
    live: Option<Live>,
    passes: PassRegistry,
    scheduler: FrameScheduler,
}

impl Context {
    pub fn new(init: GpuInit) -> Self {
        Self {
            init,
            live: None,
            passes: PassRegistry::new(),
            scheduler: FrameScheduler::new(),
        }
    }

    /// Tears down any previous state, acquires a fresh device and binds the
    /// global uniforms at group 0.
    ///
    /// Fails with [`Error::Unsupported`], [`Error::Adapter`] or
    /// [`Error::Shape`]; the context is left torn down on failure.
    pub async fn init(&mut self, uniforms: UniformDecls) -> Result<UniformMirror> {
        self.teardown();

        let gpu = Gpu::acquire(&self.init).await?;
        let bindings = build_bindings(gpu.device(), Scope::Global, &uniforms)?;

        let globals = SharedUniforms::new(bindings.uniforms, gpu.queue().clone());
        let mirror = globals.mirror();

        log::debug!("context initialized with {} global uniform(s)", uniforms.len());

        self.live = Some(Live {
            gpu,
            globals,
            global_layout: bindings.layout,
            global_bind_group: bindings.bind_group,
        });

        Ok(mirror)
    }

    /// Drops every pass, the global uniforms, the scheduler state and the device.
    pub fn teardown(&mut self) {
        if self.live.is_some() {
            log::debug!("tearing down context ({} pass(es))", self.passes.len());
        }
        self.passes.clear();
        self.scheduler.reset();
        self.live = None;
    }

    #[inline]
    pub fn is_initialized(&self) -> bool {
        self.live.is_some()
    }

    pub fn gpu(&self) -> Option<&Gpu> {
        self.live.as_ref().map(|l| &l.gpu)
    }

    /// A fresh mirror over the global uniforms.
    pub fn globals(&self) -> Option<UniformMirror> {
        self.live
            .as_ref()
            .map(|l| l.globals.mirror())
    }

    // ── passes ────────────────────────────────────────────────────────────

    /// Compiles and registers a pass; returns the mirror over its local uniforms.
    ///
    /// Fails with [`Error::NotInitialized`], [`Error::Context`],
    /// [`Error::Shader`] or [`Error::Shape`]. The source is checked against the
    /// declared uniforms before anything reaches the device. Other passes are
    /// unaffected.
    pub async fn create_pass(&mut self, desc: PassDescriptor<'_>) -> Result<PassMirror> {
        let live = self.live.as_ref().ok_or(Error::NotInitialized)?;

        let global_kinds: Vec<UniformKind> = live
            .globals
            .borrow()
            .iter()
            .map(|(_, u)| u.uniform().kind())
            .collect();

        let id = self.passes.reserve_id();
        let pass = Pass::create(
            &live.gpu,
            &self.init,
            &live.global_layout,
            &global_kinds,
            id,
            desc,
        )
        .await?;

        let mirror = PassMirror::new(
            id,
            pass.uniforms().mirror(),
        );

        // A pass created while running gets its bytes before its first draw.
        if self.scheduler.is_running() {
            pass.uniforms().upload_all();
        }

        self.passes.insert(id, pass);
        Ok(mirror)
    }

    /// Empties the live pass list.
    pub fn clear_passes(&mut self) {
        log::debug!("clearing {} pass(es)", self.passes.len());
        self.passes.clear();
    }

    /// Removes one pass by identity; no-op (`false`) if it is not live.
    pub fn remove_pass(&mut self, id: PassId) -> bool {
        let removed = self.passes.remove(id);
        if removed {
            log::debug!("removed {id}");
        }
        removed
    }

    /// Removes every pass drawing into `window`, e.g. after it was closed.
    pub fn remove_window_passes(&mut self, window: WindowId) -> usize {
        self.passes.remove_where(|p| p.window_id() == Some(window))
    }

    #[inline]
    pub fn pass_count(&self) -> usize {
        self.passes.len()
    }

    pub fn pass_ids(&self) -> Vec<PassId> {
        self.passes.ids()
    }

    pub fn pass(&self, id: PassId) -> Option<&Pass> {
        self.passes.get(id)
    }

    /// Reconfigures the surfaces drawing into `window` to `size`.
    pub fn resize(&mut self, window: WindowId, size: PhysicalSize<u32>) {
        let Some(live) = self.live.as_ref() else { return };
        for pass in self.passes.iter_mut() {
            if pass.window_id() == Some(window) {
                pass.resize(live.gpu.device(), size);
            }
        }
    }

    // ── frame loop ────────────────────────────────────────────────────────

    #[inline]
    pub fn state(&self) -> SchedulerState {
        self.scheduler.state()
    }

    /// Arms the frame loop with `callback`.
    ///
    /// The first call primes every uniform buffer and reports
    /// [`RunOutcome::Started`]: the host loop must then request the first tick.
    /// Later calls only replace the callback.
    pub fn run<F>(&mut self, callback: F) -> Result<RunOutcome>
    where
        F: FnMut(&mut FrameCtx<'_>) + 'static,
    {
        let live = self.live.as_ref().ok_or(Error::NotInitialized)?;

        let outcome = self.scheduler.arm(Box::new(callback));
        if outcome == RunOutcome::Started {
            live.globals.upload_all();
            for pass in self.passes.iter() {
                pass.uniforms().upload_all();
            }
            log::debug!("frame loop started with {} pass(es)", self.passes.len());
        }
        Ok(outcome)
    }

    /// Returns the loop to idle. Ticks do nothing until `run` is called again.
    pub fn stop(&mut self) {
        self.scheduler.stop();
    }

    /// Draws every live pass once, then runs the callback.
    ///
    /// The pass list is fixed for the draw phase; changes made by the callback
    /// apply from the next tick. Fails only with [`Error::Surface`] on a fatal
    /// surface error.
    pub fn tick(&mut self) -> Result<TickOutcome> {
        let Some(live) = self.live.as_ref() else {
            return Ok(TickOutcome::Idle);
        };
        let Some(time) = self.scheduler.begin_tick() else {
            return Ok(TickOutcome::Idle);
        };

        let device = live.gpu.device();
        let queue = live.gpu.queue();

        for pass in self.passes.iter() {
            let Some(frame) = pass.acquire(device)? else {
                continue;
            };

            let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("fragpass frame encoder"),
            });

            {
                let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("fragpass pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &frame.view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                            store: wgpu::StoreOp::Store,
                        },
                        depth_slice: None,
                    })],
                    depth_stencil_attachment: None,
                    timestamp_writes: None,
                    occlusion_query_set: None,
                    multiview_mask: None,
                });

                pass.record(&mut rpass, &live.global_bind_group);
            }

            queue.submit(std::iter::once(encoder.finish()));
            pass.pre_present();
            frame.present();
        }

        let mut ctx = FrameCtx::new(time, &mut self.passes);
        self.scheduler.invoke(&mut ctx);
        let stop = ctx.stop_requested();

        Ok(self.scheduler.end_tick(stop))
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new(GpuInit::default())
    }
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("initialized", &self.is_initialized())
            .field("passes", &self.passes.len())
            .field("scheduler", &self.scheduler)
            .finish()
    }
}
