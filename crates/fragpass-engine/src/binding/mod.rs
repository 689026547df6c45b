//! Binding layouts for uniform declarations.
//!
//! Global uniforms are bound at group 0 and shared by every pass; a pass's local
//! uniforms, when it declares any, are bound at group 1.

mod builder;
mod decls;

pub use builder::{
    build_bindings, declare_uniforms, layout_entries, layout_entry, shader_prelude, Bindings,
};
pub use decls::UniformDecls;
