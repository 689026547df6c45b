//! Typed uniforms.
//!
//! A uniform is a named scalar or vector of 32-bit floats or ints. Each one keeps
//! its logical value and the packed bytes that mirror it, and owns one GPU buffer
//! sized to its kind.

mod gpu;
mod kind;
mod set;
mod slot;
mod value;

pub use gpu::GpuUniform;
pub use kind::{ElementType, UniformKind};
pub use set::UniformSet;
pub use slot::{Scope, Uniform, UniformDecl};
pub use value::UniformValue;
