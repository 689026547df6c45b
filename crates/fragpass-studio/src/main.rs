use std::collections::HashMap;

use anyhow::Context as _;
use fragpass_engine::logging::{init_logging, LoggingConfig};
use fragpass_engine::prelude::*;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::window::WindowId;

/// A fragment shader plus the local uniforms it declares beyond `res`.
struct Sketch {
    source: &'static str,
    extra: fn(UniformDecls) -> UniformDecls,
}

const SKETCHES: [Sketch; 2] = [
    Sketch {
        source: include_str!("../shaders/plasma.wgsl"),
        extra: |decls| decls,
    },
    Sketch {
        source: include_str!("../shaders/rings.wgsl"),
        extra: |decls| decls.with("tint", UniformKind::Vec4F32, [0.3f32, 0.8, 1.0, 1.0]),
    },
];

/// Two windows, one pass each: a plasma and a set of rings sharing the
/// `time` and `frame` globals.
#[derive(Default)]
struct Studio {
    /// Pass mirrors keyed by the window they draw into.
    passes: HashMap<WindowId, PassMirror>,
}

impl Sketch {
    fn uniforms(&self, canvas: &Canvas) -> UniformDecls {
        let (w, h) = canvas.size();
        (self.extra)(UniformDecls::new().with("res", UniformKind::Vec2I32, [w as i32, h as i32]))
    }
}

impl App for Studio {
    async fn start(&mut self, ctx: &mut Context, canvases: &[Canvas]) -> anyhow::Result<()> {
        let globals = ctx
            .init(
                UniformDecls::new()
                    .with("time", UniformKind::F32, 0.0f32)
                    .with("frame", UniformKind::I32, 0),
            )
            .await
            .context("failed to initialize fragpass context")?;

        log::info!("global uniforms:\n{}", globals.shader_prelude());

        for (canvas, sketch) in canvases.iter().zip(&SKETCHES) {
            let mirror = ctx
                .create_pass(PassDescriptor {
                    canvas: canvas.clone(),
                    fragment_source: sketch.source,
                    uniforms: sketch.uniforms(canvas),
                })
                .await
                .with_context(|| format!("failed to create pass on {canvas:?}"))?;

            log::info!("created {} with {} local uniform(s)", mirror.id(), mirror.len());

            if let Some(id) = canvas.window_id() {
                self.passes.insert(id, mirror);
            }
        }

        ctx.run(move |frame| {
            if let Err(e) = globals.set("time", frame.time.elapsed) {
                log::warn!("time update failed: {e}");
            }
            // Wraps rather than saturating; the shader only looks at it modulo.
            if let Err(e) = globals.set("frame", frame.time.frame_index as i32) {
                log::warn!("frame update failed: {e}");
            }
        })?;

        Ok(())
    }

    fn on_window_event(&mut self, window_id: WindowId, event: &WindowEvent) -> AppControl {
        match event {
            WindowEvent::Resized(size) => {
                if let Some(pass) = self.passes.get(&window_id) {
                    let res = [size.width as i32, size.height as i32];
                    if let Err(e) = pass.set("res", res) {
                        log::warn!("{}: res update failed: {e}", pass.id());
                    }
                }
            }
            WindowEvent::CloseRequested => {
                self.passes.remove(&window_id);
            }
            _ => {}
        }
        AppControl::Continue
    }
}

fn main() -> anyhow::Result<()> {
    init_logging(LoggingConfig::default());

    let config = RuntimeConfig {
        windows: vec![
            WindowConfig {
                title: "fragpass studio: plasma".to_string(),
                initial_size: LogicalSize::new(640.0, 480.0),
            },
            WindowConfig {
                title: "fragpass studio: rings".to_string(),
                initial_size: LogicalSize::new(480.0, 480.0),
            },
        ],
    };

    Runtime::run(config, GpuInit::default(), Studio::default())
}
