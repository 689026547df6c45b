//! Window + runtime loop.
//!
//! Owns the `winit` EventLoop and the windows used as canvases, and drives the
//! context's frame loop from window redraws.

mod runtime;

pub use runtime::{Runtime, RuntimeConfig, WindowConfig};
