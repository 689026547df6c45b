use winit::event::WindowEvent;
use winit::window::WindowId;

use crate::context::Context;
use crate::pass::Canvas;

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application contract implemented by callers of [`Runtime`](crate::window::Runtime).
#[allow(async_fn_in_trait)]
pub trait App {
    /// Called once, after the runtime opened its windows.
    ///
    /// Initialize `ctx`, create passes on `canvases` and arm the loop with
    /// [`Context::run`] here.
    async fn start(&mut self, ctx: &mut Context, canvases: &[Canvas]) -> anyhow::Result<()>;

    /// Called for window events, before the runtime handles resize and close.
    fn on_window_event(&mut self, window_id: WindowId, event: &WindowEvent) -> AppControl {
        let _ = (window_id, event);
        AppControl::Continue
    }
}
