use crate::error::{ShapeError, ValueError};

use super::kind::UniformKind;
use super::value::UniformValue;

/// Visibility of a uniform across passes.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Scope {
    /// Shared by every pass through bind group 0.
    Global,
    /// Private to one pass through bind group 1.
    Local,
}

impl Scope {
    /// Bind group index the scope is bound at.
    #[inline]
    pub const fn group(self) -> u32 {
        match self {
            Scope::Global => 0,
            Scope::Local => 1,
        }
    }
}

/// Declaration of one uniform: its kind and initial value.
///
/// The value is not validated here; a mismatched length fails when the
/// uniform is constructed.
#[derive(Debug, Clone, PartialEq)]
pub struct UniformDecl {
    pub kind: UniformKind,
    pub initial: UniformValue,
}

impl UniformDecl {
    pub fn new(kind: UniformKind, initial: impl Into<UniformValue>) -> Self {
        Self {
            kind,
            initial: initial.into(),
        }
    }
}

/// CPU-side state of one uniform.
///
/// `logical` and `packed` are replaced together; `packed` is always the
/// encoding of `logical` under `kind`.
#[derive(Debug, Clone, PartialEq)]
pub struct Uniform {
    scope: Scope,
    binding_index: u32,
    kind: UniformKind,
    logical: UniformValue,
    packed: Vec<u8>,
}

impl Uniform {
    pub fn new(scope: Scope, binding_index: u32, decl: UniformDecl) -> Result<Self, ValueError> {
        let (logical, packed) = prepare(decl.kind, decl.initial)?;
        Ok(Self {
            scope,
            binding_index,
            kind: decl.kind,
            logical,
            packed,
        })
    }

    /// Replaces the value.
    ///
    /// A value of the wrong length, or one whose components cannot be converted
    /// to the kind's element type exactly, is rejected without side effects.
    pub fn set(&mut self, value: impl Into<UniformValue>) -> Result<(), ValueError> {
        let (logical, packed) = prepare(self.kind, value.into())?;
        self.logical = logical;
        self.packed = packed;
        Ok(())
    }

    #[inline]
    pub fn scope(&self) -> Scope {
        self.scope
    }

    #[inline]
    pub fn binding_index(&self) -> u32 {
        self.binding_index
    }

    #[inline]
    pub fn kind(&self) -> UniformKind {
        self.kind
    }

    #[inline]
    pub fn value(&self) -> &UniformValue {
        &self.logical
    }

    #[inline]
    pub fn packed(&self) -> &[u8] {
        &self.packed
    }

    /// Decodes the packed bytes back into a value.
    pub fn decode(&self) -> UniformValue {
        // `packed` has the kind's size by construction.
        UniformValue::decode(self.kind, &self.packed).unwrap_or_else(|| self.logical.clone())
    }

    /// WGSL declaration binding this uniform under `name`.
    pub fn import_declaration(&self, name: &str) -> String {
        format!(
            "@group({}) @binding({}) var<uniform> {}: {};",
            self.scope.group(),
            self.binding_index,
            name,
            self.kind.wgsl_type(),
        )
    }
}

fn prepare(kind: UniformKind, value: UniformValue) -> Result<(UniformValue, Vec<u8>), ValueError> {
    let expected = kind.components();
    if value.len() != expected {
        return Err(ShapeError {
            kind,
            expected,
            actual: value.len(),
        }
        .into());
    }
    let logical = value.convert(kind)?;
    let packed = logical.encode();
    Ok((logical, packed))
}
