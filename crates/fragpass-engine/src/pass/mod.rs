//! Render passes.
//!
//! A pass is one canvas, one pipeline (fixed full-screen-quad vertex stage plus
//! the caller's fragment stage) and the pass's local uniforms. The registry
//! keeps live passes in draw order.

mod canvas;
#[allow(clippy::module_inception)]
mod pass;
mod registry;
pub mod shader;
mod target;

pub use canvas::Canvas;
pub use pass::{Pass, PassDescriptor, PassId};
pub use registry::PassRegistry;
