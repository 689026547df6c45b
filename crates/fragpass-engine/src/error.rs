use crate::uniform::UniformKind;

/// A uniform value does not have the component count its kind requires.
///
/// Returned by construction and by every assignment; the target uniform is
/// left untouched.
#[derive(Debug, Copy, Clone, Eq, PartialEq, thiserror::Error)]
#[error("uniform of kind `{kind}` expects {expected} component(s), got {actual}")]
pub struct ShapeError {
    pub kind: UniformKind,
    pub expected: usize,
    pub actual: usize,
}

/// A component has no exact representation in the uniform's element type.
///
/// Values are converted between float and int only when nothing is lost, so a
/// successful assignment always reads back as written.
#[derive(Debug, Copy, Clone, PartialEq, thiserror::Error)]
#[error("component {index} ({value}) is not exactly representable in a `{kind}` uniform")]
pub struct InexactError {
    pub kind: UniformKind,
    pub index: usize,
    /// The rejected component; every `f32` and `i32` is exact in `f64`.
    pub value: f64,
}

/// Why a value was rejected by a uniform.
#[derive(Debug, Copy, Clone, PartialEq, thiserror::Error)]
pub enum ValueError {
    #[error(transparent)]
    Shape(#[from] ShapeError),

    #[error(transparent)]
    Inexact(#[from] InexactError),
}

/// Errors surfaced by the engine.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The host has no usable graphics adapter.
    #[error("graphics are not supported on this host: {0}")]
    Unsupported(#[source] wgpu::RequestAdapterError),

    /// An adapter exists but the device request failed.
    #[error("failed to acquire a GPU device: {0}")]
    Adapter(#[from] wgpu::RequestDeviceError),

    /// A canvas could not provide a presentation surface.
    #[error("canvas cannot provide a presentation surface: {0}")]
    Context(String),

    #[error(transparent)]
    Shape(#[from] ShapeError),

    #[error(transparent)]
    Inexact(#[from] InexactError),

    #[error("no uniform named `{0}`")]
    UnknownUniform(String),

    /// The composed shader module reported compilation errors.
    #[error("fragment shader failed to compile:\n{0}")]
    Shader(String),

    #[error("context is not initialized")]
    NotInitialized,

    /// The mirror outlived its context (re-init or teardown) or its pass.
    #[error("uniforms behind this mirror were released")]
    Detached,

    /// Fatal surface acquisition failure during a tick.
    #[error("failed to acquire a surface texture: {0}")]
    Surface(#[source] wgpu::SurfaceError),
}

impl From<ValueError> for Error {
    fn from(err: ValueError) -> Self {
        match err {
            ValueError::Shape(e) => Error::Shape(e),
            ValueError::Inexact(e) => Error::Inexact(e),
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
