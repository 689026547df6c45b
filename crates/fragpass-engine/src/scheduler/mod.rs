//! Frame scheduling state machine.
//!
//! `Idle` until `run` arms a callback, then `Running` until `stop` or re-init.
//! The GPU work of a tick lives in [`Context::tick`](crate::Context::tick); this
//! module only decides whether a tick happens, what time it is, and which
//! callback runs after the draws.

use crate::core::FrameCtx;
use crate::time::{FrameClock, FrameTime};

/// Per-frame callback, invoked after every pass of the tick is submitted.
pub type FrameCallback = Box<dyn FnMut(&mut FrameCtx<'_>)>;

#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum SchedulerState {
    #[default]
    Idle,
    Running,
}

/// Result of arming the loop.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum RunOutcome {
    /// The loop was idle: uniforms were primed and the first tick must be requested.
    Started,
    /// The loop was already running: only the callback was replaced.
    Rearmed,
}

/// Result of one tick.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum TickOutcome {
    /// Nothing was drawn; the loop is not running.
    Idle,
    /// Frame done; request the next one.
    Continue,
    /// Frame done and the callback asked the loop to stop.
    Stopped,
}

#[derive(Default)]
pub struct FrameScheduler {
    state: SchedulerState,
    callback: Option<FrameCallback>,
    clock: FrameClock,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn state(&self) -> SchedulerState {
        self.state
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.state == SchedulerState::Running
    }

    /// Stores `callback`. Transitions idle → running only on the first call.
    pub fn arm(&mut self, callback: FrameCallback) -> RunOutcome {
        self.callback = Some(callback);
        match self.state {
            SchedulerState::Running => RunOutcome::Rearmed,
            SchedulerState::Idle => {
                self.state = SchedulerState::Running;
                self.clock.reset();
                RunOutcome::Started
            }
        }
    }

    /// Returns to idle; the callback is kept so a later `arm` can replace it.
    pub fn stop(&mut self) {
        self.state = SchedulerState::Idle;
    }

    /// Drops the callback and the clock; used on re-init.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Advances the clock if running.
    pub fn begin_tick(&mut self) -> Option<FrameTime> {
        self.is_running().then(|| self.clock.tick())
    }

    /// Runs the stored callback with `ctx`, if any.
    pub fn invoke(&mut self, ctx: &mut FrameCtx<'_>) {
        if let Some(callback) = self.callback.as_mut() {
            callback(ctx);
        }
    }

    /// Finishes a tick, honoring a stop requested by the callback.
    pub fn end_tick(&mut self, stop_requested: bool) -> TickOutcome {
        if stop_requested {
            self.stop();
            TickOutcome::Stopped
        } else {
            TickOutcome::Continue
        }
    }
}

impl std::fmt::Debug for FrameScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameScheduler")
            .field("state", &self.state)
            .field("has_callback", &self.callback.is_some())
            .finish()
    }
}
