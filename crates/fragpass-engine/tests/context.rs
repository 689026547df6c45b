//! Device-backed tests. Each test skips itself when the host has no adapter.

use std::cell::Cell;
use std::rc::Rc;

use fragpass_engine::logging::{init_logging, LoggingConfig};
use fragpass_engine::pass::Pass;
use fragpass_engine::prelude::*;

const GLOBAL_FS: &str = "
@group(0) @binding(0) var<uniform> time: f32;

@fragment
fn fs_main(@location(0) uv: vec2<f32>) -> @location(0) vec4<f32> {
    return vec4<f32>(uv, fract(time), 1.0);
}
";

const LOCAL_FS: &str = "
@group(0) @binding(0) var<uniform> time: f32;
@group(1) @binding(0) var<uniform> res: vec2<i32>;

@fragment
fn fs_main(@builtin(position) pos: vec4<f32>) -> @location(0) vec4<f32> {
    let size = vec2<f32>(f32(res.x), f32(res.y));
    return vec4<f32>(pos.xy / size, fract(time), 1.0);
}
";

// Writes the uniforms straight into the red and green channels.
const SAMPLE_FS: &str = "
@group(0) @binding(0) var<uniform> time: f32;
@group(1) @binding(0) var<uniform> res: vec2<i32>;

@fragment
fn fs_main() -> @location(0) vec4<f32> {
    return vec4<f32>(time, f32(res.x) / 255.0, 0.0, 1.0);
}
";

fn time_decls() -> UniformDecls {
    UniformDecls::new().with("time", UniformKind::F32, 0.0f32)
}

fn res_pass(width: u32, height: u32) -> PassDescriptor<'static> {
    PassDescriptor {
        canvas: Canvas::offscreen(width, height),
        fragment_source: LOCAL_FS,
        uniforms: UniformDecls::new().with("res", UniformKind::Vec2I32, [width as i32, height as i32]),
    }
}

fn global_pass() -> PassDescriptor<'static> {
    PassDescriptor {
        canvas: Canvas::offscreen(64, 64),
        fragment_source: GLOBAL_FS,
        uniforms: UniformDecls::new(),
    }
}

/// Initializes a context, or returns `None` when no adapter is available.
fn context_with(decls: UniformDecls) -> Option<(Context, UniformMirror)> {
    context_with_init(GpuInit::default(), decls)
}

/// Linear offscreen format, so channel bytes are the shader's output times 255.
fn readback_init() -> GpuInit {
    GpuInit {
        offscreen_format: wgpu::TextureFormat::Rgba8Unorm,
        ..Default::default()
    }
}

fn context_with_init(init: GpuInit, decls: UniformDecls) -> Option<(Context, UniformMirror)> {
    init_logging(LoggingConfig {
        is_test: true,
        ..Default::default()
    });

    let mut ctx = Context::new(init);
    match pollster::block_on(ctx.init(decls)) {
        Ok(globals) => Some((ctx, globals)),
        Err(Error::Unsupported(e)) => {
            log::warn!("skipping: no adapter ({e})");
            None
        }
        Err(Error::Adapter(e)) => {
            log::warn!("skipping: no device ({e})");
            None
        }
        Err(e) => panic!("init failed: {e}"),
    }
}

/// Copies one texel of a pass's offscreen canvas back to the host.
fn read_pixel(ctx: &Context, id: PassId, x: u32, y: u32) -> [u8; 4] {
    let gpu = ctx.gpu().expect("initialized context");
    let texture = ctx
        .pass(id)
        .and_then(Pass::offscreen_texture)
        .expect("offscreen pass");
    let size = texture.size();
    let row = (size.width * 4).div_ceil(wgpu::COPY_BYTES_PER_ROW_ALIGNMENT)
        * wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;

    let buffer = gpu.device().create_buffer(&wgpu::BufferDescriptor {
        label: Some("readback"),
        size: u64::from(row * size.height),
        usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
        mapped_at_creation: false,
    });
    let mut encoder = gpu
        .device()
        .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: Some("readback") });
    encoder.copy_texture_to_buffer(
        texture.as_image_copy(),
        wgpu::TexelCopyBufferInfo {
            buffer: &buffer,
            layout: wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(row),
                rows_per_image: Some(size.height),
            },
        },
        size,
    );
    gpu.queue().submit(std::iter::once(encoder.finish()));

    let slice = buffer.slice(..);
    slice.map_async(wgpu::MapMode::Read, |r| r.expect("map readback buffer"));
    gpu.device()
        .poll(wgpu::PollType::wait_indefinitely())
        .expect("device poll");

    let data = slice.get_mapped_range();
    let at = (y * row + x * 4) as usize;
    [data[at], data[at + 1], data[at + 2], data[at + 3]]
}

fn assert_channel(actual: u8, expected: u8) {
    assert!(
        actual.abs_diff(expected) <= 1,
        "channel {actual} not within 1 of {expected}"
    );
}

// ── globals ─────────────────────────────────────────────────────────────

#[test]
fn global_f32_round_trip() {
    let Some((_ctx, globals)) = context_with(time_decls()) else { return };

    assert_eq!(globals.scope(), Scope::Global);
    assert_eq!(globals.get_f32("time"), Some(0.0));

    globals.set("time", 1.5f32).unwrap();
    assert_eq!(globals.get_f32("time"), Some(1.5));
    assert_eq!(globals.packed("time").unwrap(), 1.5f32.to_le_bytes());
}

#[test]
fn unknown_uniform_is_reported() {
    let Some((_ctx, globals)) = context_with(time_decls()) else { return };

    let err = globals.set("speed", 1.0f32).unwrap_err();
    assert!(matches!(err, Error::UnknownUniform(ref n) if n == "speed"));
    assert_eq!(globals.get_f32("time"), Some(0.0));
}

#[test]
fn init_with_bad_shape_fails() {
    init_logging(LoggingConfig {
        is_test: true,
        ..Default::default()
    });

    let mut ctx = Context::default();
    let decls = UniformDecls::new().with("res", UniformKind::Vec2I32, [1, 2, 3]);
    match pollster::block_on(ctx.init(decls)) {
        Err(Error::Shape(e)) => {
            assert_eq!((e.expected, e.actual), (2, 3));
            assert!(!ctx.is_initialized());
        }
        Err(Error::Unsupported(_) | Error::Adapter(_)) => {}
        other => panic!("expected a shape error, got {other:?}"),
    }
}

#[test]
fn init_twice_resets_passes_and_globals() {
    let Some((mut ctx, globals)) = context_with(time_decls()) else { return };
    globals.set("time", 3.0f32).unwrap();
    pollster::block_on(ctx.create_pass(global_pass())).unwrap();
    assert_eq!(ctx.pass_count(), 1);

    let fresh = pollster::block_on(
        ctx.init(UniformDecls::new().with("frame", UniformKind::I32, 7)),
    )
    .unwrap();

    assert_eq!(ctx.pass_count(), 0);
    assert_eq!(ctx.state(), SchedulerState::Idle);
    assert_eq!(fresh.names(), ["frame"]);
    assert_eq!(fresh.get_i32("frame"), Some(7));
    assert!(!fresh.contains("time"));
}

#[test]
fn reinit_detaches_earlier_mirrors() {
    let Some((mut ctx, globals)) = context_with(time_decls()) else { return };
    let pass = pollster::block_on(ctx.create_pass(res_pass(8, 8))).unwrap();
    assert!(globals.is_attached() && pass.is_attached());

    let fresh = pollster::block_on(ctx.init(time_decls())).unwrap();

    assert!(!globals.is_attached());
    assert!(matches!(globals.set("time", 1.0f32), Err(Error::Detached)));
    assert_eq!(globals.get_f32("time"), None);
    assert!(globals.names().is_empty());

    assert!(!pass.is_attached());
    assert!(matches!(pass.set("res", [1, 1]), Err(Error::Detached)));
    assert_eq!(pass.get("res"), None);

    // The new globals are unaffected by the stale handle.
    fresh.set("time", 2.0f32).unwrap();
    assert_eq!(fresh.get_f32("time"), Some(2.0));
}

#[test]
fn teardown_detaches_globals() {
    let Some((mut ctx, globals)) = context_with(time_decls()) else { return };

    ctx.teardown();
    assert!(!ctx.is_initialized());
    assert!(ctx.globals().is_none());
    assert!(matches!(globals.set("time", 1.0f32), Err(Error::Detached)));
    assert!(!globals.contains("time"));
}

// ── passes ──────────────────────────────────────────────────────────────

#[test]
fn local_vec2i_uniform() {
    let Some((mut ctx, _globals)) = context_with(time_decls()) else { return };

    let pass = pollster::block_on(ctx.create_pass(res_pass(640, 480))).unwrap();
    assert_eq!(pass.scope(), Scope::Local);
    assert_eq!(pass.get("res"), Some(UniformValue::Int(vec![640, 480])));

    pass.set("res", [800, 600]).unwrap();
    assert_eq!(pass.get("res"), Some(UniformValue::Int(vec![800, 600])));

    let err = pass.set("res", [1, 2, 3]).unwrap_err();
    assert!(matches!(err, Error::Shape(ShapeError { expected: 2, actual: 3, .. })));
    assert_eq!(pass.get("res"), Some(UniformValue::Int(vec![800, 600])));
}

#[test]
fn pass_without_locals_uses_one_bind_group() {
    let Some((mut ctx, _globals)) = context_with(time_decls()) else { return };

    let mirror = pollster::block_on(ctx.create_pass(global_pass())).unwrap();
    assert!(mirror.is_empty());

    let pass = ctx.pass(mirror.id()).unwrap();
    assert!(!pass.has_local_bindings());
}

#[test]
fn removed_pass_mirror_is_detached() {
    let Some((mut ctx, _globals)) = context_with(time_decls()) else { return };
    let kept = pollster::block_on(ctx.create_pass(res_pass(8, 8))).unwrap();
    let removed = pollster::block_on(ctx.create_pass(res_pass(8, 8))).unwrap();

    assert!(ctx.remove_pass(removed.id()));

    assert!(!removed.is_attached());
    assert!(matches!(removed.set("res", [4, 4]), Err(Error::Detached)));
    assert_eq!(removed.get("res"), None);
    assert!(removed.is_empty());

    kept.set("res", [4, 4]).unwrap();
    assert_eq!(kept.get("res"), Some(UniformValue::Int(vec![4, 4])));
}

#[test]
fn remove_pass_removes_exactly_one() {
    let Some((mut ctx, _globals)) = context_with(time_decls()) else { return };

    let a = pollster::block_on(ctx.create_pass(global_pass())).unwrap();
    let b = pollster::block_on(ctx.create_pass(res_pass(32, 32))).unwrap();
    let c = pollster::block_on(ctx.create_pass(global_pass())).unwrap();

    assert!(ctx.remove_pass(b.id()));
    assert_eq!(ctx.pass_ids(), [a.id(), c.id()]);
    assert!(!ctx.remove_pass(b.id()));
    assert_eq!(ctx.pass_count(), 2);
}

#[test]
fn create_pass_before_init_fails() {
    let mut ctx = Context::default();
    let err = pollster::block_on(ctx.create_pass(global_pass())).unwrap_err();
    assert!(matches!(err, Error::NotInitialized));
}

#[test]
fn bad_shader_leaves_other_passes_alone() {
    let Some((mut ctx, _globals)) = context_with(time_decls()) else { return };
    pollster::block_on(ctx.create_pass(global_pass())).unwrap();

    let broken = PassDescriptor {
        canvas: Canvas::offscreen(8, 8),
        fragment_source: "@fragment fn fs_main( -> {",
        uniforms: UniformDecls::new(),
    };
    let err = pollster::block_on(ctx.create_pass(broken)).unwrap_err();
    assert!(matches!(err, Error::Shader(_)));

    // Binds a local uniform the pass never declared.
    let undeclared = PassDescriptor {
        uniforms: UniformDecls::new(),
        ..res_pass(8, 8)
    };
    let err = pollster::block_on(ctx.create_pass(undeclared)).unwrap_err();
    assert!(matches!(err, Error::Shader(_)));

    assert_eq!(ctx.pass_count(), 1);
}

#[test]
fn interstage_mismatch_is_a_shader_error() {
    let Some((mut ctx, _globals)) = context_with(time_decls()) else { return };
    pollster::block_on(ctx.create_pass(global_pass())).unwrap();

    // The vertex stage only writes location 0; this parses and validates on its
    // own but cannot be linked into a pipeline.
    let unlinked = PassDescriptor {
        canvas: Canvas::offscreen(8, 8),
        fragment_source: "
@fragment
fn fs_main(@location(1) extra: vec2<f32>) -> @location(0) vec4<f32> {
    return vec4<f32>(extra, 0.0, 1.0);
}
",
        uniforms: UniformDecls::new(),
    };
    let err = pollster::block_on(ctx.create_pass(unlinked)).unwrap_err();
    assert!(matches!(err, Error::Shader(_)), "got {err:?}");
    assert_eq!(ctx.pass_count(), 1);

    // The context stays usable.
    pollster::block_on(ctx.create_pass(global_pass())).unwrap();
    assert_eq!(ctx.pass_count(), 2);
}

#[test]
fn zero_size_canvas_is_rejected() {
    let Some((mut ctx, _globals)) = context_with(time_decls()) else { return };

    let desc = PassDescriptor {
        canvas: Canvas::offscreen(0, 16),
        ..global_pass()
    };
    let err = pollster::block_on(ctx.create_pass(desc)).unwrap_err();
    assert!(matches!(err, Error::Context(_)));
}

// ── frame loop ──────────────────────────────────────────────────────────

#[test]
fn run_starts_once_then_rearms() {
    let Some((mut ctx, _globals)) = context_with(time_decls()) else { return };

    assert_eq!(ctx.tick().unwrap(), TickOutcome::Idle);
    assert_eq!(ctx.run(|_| {}).unwrap(), RunOutcome::Started);
    assert_eq!(ctx.state(), SchedulerState::Running);
    assert_eq!(ctx.run(|_| {}).unwrap(), RunOutcome::Rearmed);
}

#[test]
fn run_before_init_fails() {
    let mut ctx = Context::default();
    assert!(matches!(ctx.run(|_| {}), Err(Error::NotInitialized)));
}

#[test]
fn ticks_draw_and_invoke_the_latest_callback() {
    let Some((mut ctx, globals)) = context_with(time_decls()) else { return };
    pollster::block_on(ctx.create_pass(global_pass())).unwrap();
    pollster::block_on(ctx.create_pass(res_pass(16, 16))).unwrap();

    let first = Rc::new(Cell::new(0u32));
    let second = Rc::new(Cell::new(0u32));

    let counter = first.clone();
    ctx.run(move |frame| {
        counter.set(counter.get() + 1);
        globals.set("time", frame.time.elapsed).unwrap();
    })
    .unwrap();

    assert_eq!(ctx.tick().unwrap(), TickOutcome::Continue);
    assert_eq!(ctx.tick().unwrap(), TickOutcome::Continue);

    let counter = second.clone();
    ctx.run(move |_| counter.set(counter.get() + 1)).unwrap();
    assert_eq!(ctx.tick().unwrap(), TickOutcome::Continue);

    assert_eq!(first.get(), 2);
    assert_eq!(second.get(), 1);
}

#[test]
fn callback_can_remove_a_pass() {
    let Some((mut ctx, _globals)) = context_with(time_decls()) else { return };
    let keep = pollster::block_on(ctx.create_pass(global_pass())).unwrap();
    let doomed = pollster::block_on(ctx.create_pass(global_pass())).unwrap().id();

    ctx.run(move |frame| {
        if frame.time.frame_index == 0 {
            assert_eq!(frame.pass_count(), 2);
            assert!(frame.remove_pass(doomed));
        }
    })
    .unwrap();

    ctx.tick().unwrap();
    assert_eq!(ctx.pass_ids(), [keep.id()]);
    ctx.tick().unwrap();
    assert_eq!(ctx.pass_ids(), [keep.id()]);
}

#[test]
fn stop_from_callback_returns_to_idle() {
    let Some((mut ctx, _globals)) = context_with(time_decls()) else { return };
    pollster::block_on(ctx.create_pass(global_pass())).unwrap();

    ctx.run(|frame| frame.stop()).unwrap();
    assert_eq!(ctx.tick().unwrap(), TickOutcome::Stopped);
    assert_eq!(ctx.state(), SchedulerState::Idle);
    assert_eq!(ctx.tick().unwrap(), TickOutcome::Idle);

    // A stopped loop starts afresh.
    assert_eq!(ctx.run(|_| {}).unwrap(), RunOutcome::Started);
}

#[test]
fn pass_created_while_running_is_drawn() {
    let Some((mut ctx, _globals)) = context_with(time_decls()) else { return };

    ctx.run(|_| {}).unwrap();
    assert_eq!(ctx.tick().unwrap(), TickOutcome::Continue);

    let pass = pollster::block_on(ctx.create_pass(res_pass(24, 12))).unwrap();
    assert_eq!(ctx.tick().unwrap(), TickOutcome::Continue);
    assert_eq!(pass.get("res"), Some(UniformValue::Int(vec![24, 12])));
}

// ── readback ────────────────────────────────────────────────────────────

#[test]
fn drawn_pixels_follow_uniform_writes() {
    let Some((mut ctx, globals)) = context_with_init(readback_init(), time_decls()) else { return };
    let pass = pollster::block_on(ctx.create_pass(PassDescriptor {
        canvas: Canvas::offscreen(4, 4),
        fragment_source: SAMPLE_FS,
        uniforms: UniformDecls::new().with("res", UniformKind::Vec2I32, [0, 0]),
    }))
    .unwrap();

    globals.set("time", 0.5f32).unwrap();
    pass.set("res", [64, 4]).unwrap();
    ctx.run(|_| {}).unwrap();
    assert_eq!(ctx.tick().unwrap(), TickOutcome::Continue);

    let [r, g, b, a] = read_pixel(&ctx, pass.id(), 1, 2);
    assert_channel(r, 128);
    assert_eq!((g, b, a), (64, 0, 255));

    globals.set("time", 0.25f32).unwrap();
    pass.set("res", [200, 4]).unwrap();
    assert_eq!(ctx.tick().unwrap(), TickOutcome::Continue);

    let [r, g, b, a] = read_pixel(&ctx, pass.id(), 1, 2);
    assert_channel(r, 64);
    assert_eq!((g, b, a), (200, 0, 255));
}

#[test]
fn global_only_pass_draws_with_group_zero() {
    let Some((mut ctx, globals)) = context_with_init(readback_init(), time_decls()) else { return };
    let pass = pollster::block_on(ctx.create_pass(PassDescriptor {
        canvas: Canvas::offscreen(4, 4),
        ..global_pass()
    }))
    .unwrap();

    globals.set("time", 0.25f32).unwrap();
    ctx.run(|_| {}).unwrap();
    ctx.tick().unwrap();
    let [_, _, b, a] = read_pixel(&ctx, pass.id(), 0, 0);
    assert_channel(b, 64);
    assert_eq!(a, 255);

    // Written from the callback, so visible on the following tick.
    let writer = globals.clone();
    ctx.run(move |_| writer.set("time", 0.75f32).unwrap()).unwrap();
    ctx.tick().unwrap();
    ctx.tick().unwrap();
    let [_, _, b, _] = read_pixel(&ctx, pass.id(), 0, 0);
    assert_channel(b, 191);
}
