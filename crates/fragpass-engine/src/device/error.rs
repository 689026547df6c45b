/// What the frame loop does with a pass after its surface failed to yield a texture.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SurfaceErrorAction {
    /// Surface was reconfigured; the pass draws again next tick.
    Reconfigured,
    /// Transient error; the pass is skipped for this tick.
    SkipFrame,
    /// Unrecoverable (commonly OOM); the tick fails.
    Fatal,
}
