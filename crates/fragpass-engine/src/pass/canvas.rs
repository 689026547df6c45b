use std::sync::Arc;

use winit::window::{Window, WindowId};

/// Where a pass draws.
///
/// Canvas acquisition and sizing belong to the caller; the engine only
/// configures a surface (or allocates a texture) for it.
#[derive(Debug, Clone)]
pub enum Canvas {
    /// A window, presented through a swapchain surface.
    Window(Arc<Window>),
    /// An offscreen color texture of fixed size (headless rendering, tests).
    Offscreen { width: u32, height: u32 },
}

impl Canvas {
    #[inline]
    pub fn window(window: Arc<Window>) -> Self {
        Canvas::Window(window)
    }

    #[inline]
    pub fn offscreen(width: u32, height: u32) -> Self {
        Canvas::Offscreen { width, height }
    }

    /// Current size in physical pixels.
    pub fn size(&self) -> (u32, u32) {
        match self {
            Canvas::Window(w) => {
                let s = w.inner_size();
                (s.width, s.height)
            }
            Canvas::Offscreen { width, height } => (*width, *height),
        }
    }

    pub fn window_id(&self) -> Option<WindowId> {
        match self {
            Canvas::Window(w) => Some(w.id()),
            Canvas::Offscreen { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offscreen_reports_its_size() {
        let canvas = Canvas::offscreen(320, 200);
        assert_eq!(canvas.size(), (320, 200));
        assert_eq!(canvas.window_id(), None);
    }
}
