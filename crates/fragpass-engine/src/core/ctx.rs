use crate::pass::{PassId, PassRegistry};
use crate::time::FrameTime;

/// Per-frame context passed to the callback armed with
/// [`Context::run`](crate::Context::run).
///
/// The callback runs after every pass of the tick was submitted, so pass list
/// changes made here take effect on the next tick.
pub struct FrameCtx<'a> {
    pub time: FrameTime,
    passes: &'a mut PassRegistry,
    stop: bool,
}

impl<'a> FrameCtx<'a> {
    pub(crate) fn new(time: FrameTime, passes: &'a mut PassRegistry) -> Self {
        Self {
            time,
            passes,
            stop: false,
        }
    }

    /// Number of live passes.
    pub fn pass_count(&self) -> usize {
        self.passes.len()
    }

    /// Live pass ids in draw order.
    pub fn pass_ids(&self) -> Vec<PassId> {
        self.passes.ids()
    }

    /// Removes one pass by identity; no-op if absent.
    pub fn remove_pass(&mut self, id: PassId) -> bool {
        let removed = self.passes.remove(id);
        if removed {
            log::debug!("removed {id} from frame callback");
        }
        removed
    }

    /// Removes every pass.
    pub fn clear_passes(&mut self) {
        self.passes.clear();
    }

    /// Stops the loop after this tick.
    pub fn stop(&mut self) {
        self.stop = true;
    }

    pub(crate) fn stop_requested(&self) -> bool {
        self.stop
    }
}
