//! Time subsystem.
//!
//! Provides stable, testable frame timing utilities without coupling to the runtime.
//! The frame scheduler owns one `FrameClock` and ticks it once per frame; the
//! resulting `FrameTime` reaches the per-frame callback through `FrameCtx`.

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};
