use std::sync::Arc;

use winit::dpi::PhysicalSize;
use winit::window::{Window, WindowId};

use crate::device::surface;
use crate::device::{Gpu, GpuInit, SurfaceErrorAction, TargetFrame};
use crate::error::{Error, Result};

use super::Canvas;

/// The configured render target behind a [`Canvas`].
#[derive(Debug)]
pub(crate) enum PassTarget {
    Surface {
        window: Arc<Window>,
        surface: wgpu::Surface<'static>,
        config: wgpu::SurfaceConfiguration,
        size: PhysicalSize<u32>,
    },
    Offscreen {
        texture: wgpu::Texture,
    },
}

impl PassTarget {
    pub(crate) fn new(gpu: &Gpu, canvas: &Canvas, init: &GpuInit) -> Result<Self> {
        match canvas {
            Canvas::Window(window) => {
                let (surface, config, size) =
                    surface::create_window_surface(gpu, window.clone(), init)?;
                Ok(PassTarget::Surface {
                    window: window.clone(),
                    surface,
                    config,
                    size,
                })
            }
            Canvas::Offscreen { width, height } => {
                if *width == 0 || *height == 0 {
                    return Err(Error::Context(format!(
                        "offscreen canvas has zero size ({width}x{height})"
                    )));
                }
                let texture = gpu.device().create_texture(&wgpu::TextureDescriptor {
                    label: Some("fragpass offscreen canvas"),
                    size: wgpu::Extent3d {
                        width: *width,
                        height: *height,
                        depth_or_array_layers: 1,
                    },
                    mip_level_count: 1,
                    sample_count: 1,
                    dimension: wgpu::TextureDimension::D2,
                    format: init.offscreen_format,
                    usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
                    view_formats: &[],
                });
                Ok(PassTarget::Offscreen { texture })
            }
        }
    }

    pub(crate) fn format(&self) -> wgpu::TextureFormat {
        match self {
            PassTarget::Surface { config, .. } => config.format,
            PassTarget::Offscreen { texture } => texture.format(),
        }
    }

    pub(crate) fn offscreen_texture(&self) -> Option<&wgpu::Texture> {
        match self {
            PassTarget::Surface { .. } => None,
            PassTarget::Offscreen { texture } => Some(texture),
        }
    }

    pub(crate) fn window_id(&self) -> Option<WindowId> {
        match self {
            PassTarget::Surface { window, .. } => Some(window.id()),
            PassTarget::Offscreen { .. } => None,
        }
    }

    /// Acquires a view to render into.
    ///
    /// `Ok(None)` means the pass is skipped for this tick (surface reconfigured
    /// or a transient acquisition failure).
    pub(crate) fn acquire(&self, device: &wgpu::Device) -> Result<Option<TargetFrame>> {
        match self {
            PassTarget::Surface {
                surface,
                config,
                size,
                ..
            } => {
                if size.width == 0 || size.height == 0 {
                    return Ok(None);
                }
                match surface.get_current_texture() {
                    Ok(surface_texture) => {
                        let view = surface_texture
                            .texture
                            .create_view(&wgpu::TextureViewDescriptor::default());
                        Ok(Some(TargetFrame {
                            surface_texture: Some(surface_texture),
                            view,
                        }))
                    }
                    Err(err) => {
                        match surface::map_surface_error(surface, device, config, *size, &err) {
                            SurfaceErrorAction::Fatal => Err(Error::Surface(err)),
                            action => {
                                log::warn!("skipping pass frame after surface error ({err}): {action:?}");
                                Ok(None)
                            }
                        }
                    }
                }
            }
            PassTarget::Offscreen { texture } => Ok(Some(TargetFrame {
                surface_texture: None,
                view: texture.create_view(&wgpu::TextureViewDescriptor::default()),
            })),
        }
    }

    /// Reconfigures a window surface after its window was resized.
    pub(crate) fn resize(&mut self, device: &wgpu::Device, new_size: PhysicalSize<u32>) {
        if let PassTarget::Surface {
            surface,
            config,
            size,
            ..
        } = self
        {
            surface::apply_resize(surface, device, config, size, new_size);
        }
    }

    /// Called right before the frame is presented.
    pub(crate) fn pre_present(&self) {
        if let PassTarget::Surface { window, .. } = self {
            window.pre_present_notify();
        }
    }
}
