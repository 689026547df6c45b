//! Core engine-facing contracts.
//!
//! This module defines the interface between the runtime (platform loop) and
//! callers: the application contract and the per-frame context handed to the
//! frame callback.

mod app;
mod ctx;

pub use app::{App, AppControl};
pub use ctx::FrameCtx;
