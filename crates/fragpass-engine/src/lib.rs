//! fragpass engine crate.
//!
//! Declares typed uniforms, binds them to full-screen fragment passes drawn on
//! independent canvases, and runs the frame loop that keeps GPU buffers in step
//! with value mirrors.
//!
//! ```rust,ignore
//! use fragpass_engine::prelude::*;
//!
//! let mut ctx = Context::default();
//! let globals = ctx.init(UniformDecls::new().with("time", UniformKind::F32, 0.0f32)).await?;
//! let pass = ctx
//!     .create_pass(PassDescriptor {
//!         canvas: Canvas::offscreen(640, 480),
//!         fragment_source: include_str!("plasma.wgsl"),
//!         uniforms: UniformDecls::new().with("res", UniformKind::Vec2I32, [640, 480]),
//!     })
//!     .await?;
//! ctx.run(move |frame| {
//!     let _ = globals.set("time", frame.time.elapsed);
//! })?;
//! loop {
//!     ctx.tick()?;
//! }
//! ```

pub mod binding;
pub mod context;
pub mod core;
pub mod device;
pub mod mirror;
pub mod pass;
pub mod scheduler;
pub mod time;
pub mod uniform;
pub mod window;

pub mod logging;
mod error;

pub use context::Context;
pub use error::{Error, InexactError, Result, ShapeError, ValueError};

/// Everything a caller needs to declare uniforms, create passes and run the loop.
pub mod prelude {
    pub use crate::binding::UniformDecls;
    pub use crate::context::Context;
    pub use crate::core::{App, AppControl, FrameCtx};
    pub use crate::device::GpuInit;
    pub use crate::error::{Error, InexactError, ShapeError, ValueError};
    pub use crate::mirror::{PassMirror, UniformMirror};
    pub use crate::pass::{Canvas, PassDescriptor, PassId};
    pub use crate::scheduler::{RunOutcome, SchedulerState, TickOutcome};
    pub use crate::uniform::{Scope, UniformDecl, UniformKind, UniformValue};
    pub use crate::window::{Runtime, RuntimeConfig, WindowConfig};
}
