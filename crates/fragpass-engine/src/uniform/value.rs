use crate::error::InexactError;

use super::kind::{ElementType, UniformKind};

/// Logical value of a uniform: an ordered sequence of 32-bit components.
///
/// A scalar is a sequence of length 1. Conversions exist from scalars, fixed
/// arrays and vectors of `f32`/`i32`, so call sites can pass `5.0`, `[640, 480]`
/// or `vec![0.1, 0.2, 0.3]` directly.
#[derive(Debug, Clone, PartialEq)]
pub enum UniformValue {
    Float(Vec<f32>),
    Int(Vec<i32>),
}

impl UniformValue {
    #[inline]
    pub fn len(&self) -> usize {
        match self {
            UniformValue::Float(v) => v.len(),
            UniformValue::Int(v) => v.len(),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn element(&self) -> ElementType {
        match self {
            UniformValue::Float(_) => ElementType::Float,
            UniformValue::Int(_) => ElementType::Int,
        }
    }

    /// Converts every component to `kind`'s element type.
    ///
    /// Only exact conversions are performed: an int must be representable as
    /// an `f32` without rounding, and a float must be integral and within the
    /// `i32` range. The first component that is not fails the whole value.
    pub fn convert(self, kind: UniformKind) -> Result<Self, InexactError> {
        let inexact = |index: usize, value: f64| InexactError { kind, index, value };
        match (self, kind.element()) {
            (UniformValue::Int(v), ElementType::Float) => v
                .into_iter()
                .enumerate()
                .map(|(i, x)| int_to_f32(x).ok_or_else(|| inexact(i, f64::from(x))))
                .collect::<Result<_, _>>()
                .map(UniformValue::Float),
            (UniformValue::Float(v), ElementType::Int) => v
                .into_iter()
                .enumerate()
                .map(|(i, x)| f32_to_i32(x).ok_or_else(|| inexact(i, f64::from(x))))
                .collect::<Result<_, _>>()
                .map(UniformValue::Int),
            (same, _) => Ok(same),
        }
    }

    /// Little-endian bytes of the components, 4 per component.
    pub fn encode(&self) -> Vec<u8> {
        match self {
            UniformValue::Float(v) => v.iter().flat_map(|x| x.to_le_bytes()).collect(),
            UniformValue::Int(v) => v.iter().flat_map(|x| x.to_le_bytes()).collect(),
        }
    }

    /// Decodes packed bytes under `kind`'s encoding.
    ///
    /// Returns `None` if `bytes` is not exactly `kind.byte_size()` long.
    pub fn decode(kind: UniformKind, bytes: &[u8]) -> Option<Self> {
        if bytes.len() as u64 != kind.byte_size() {
            return None;
        }
        let words = bytes.chunks_exact(4).map(|c| [c[0], c[1], c[2], c[3]]);
        Some(match kind.element() {
            ElementType::Float => UniformValue::Float(words.map(f32::from_le_bytes).collect()),
            ElementType::Int => UniformValue::Int(words.map(i32::from_le_bytes).collect()),
        })
    }

    /// Returns the value as a float scalar, if it has exactly one component
    /// that converts exactly.
    pub fn as_f32(&self) -> Option<f32> {
        match self {
            UniformValue::Float(v) if v.len() == 1 => Some(v[0]),
            UniformValue::Int(v) if v.len() == 1 => int_to_f32(v[0]),
            _ => None,
        }
    }

    /// Returns the value as an int scalar, if it has exactly one component
    /// that converts exactly.
    pub fn as_i32(&self) -> Option<i32> {
        match self {
            UniformValue::Int(v) if v.len() == 1 => Some(v[0]),
            UniformValue::Float(v) if v.len() == 1 => f32_to_i32(v[0]),
            _ => None,
        }
    }
}

fn int_to_f32(x: i32) -> Option<f32> {
    let f = x as f32;
    (f64::from(f) == f64::from(x)).then_some(f)
}

fn f32_to_i32(x: f32) -> Option<i32> {
    // -2^31 and 2^31 are exact in f32; NaN and infinities fail both checks.
    let in_range = x >= i32::MIN as f32 && x < -(i32::MIN as f32);
    (in_range && x.fract() == 0.0).then_some(x as i32)
}

impl From<f32> for UniformValue {
    fn from(v: f32) -> Self {
        UniformValue::Float(vec![v])
    }
}

impl From<i32> for UniformValue {
    fn from(v: i32) -> Self {
        UniformValue::Int(vec![v])
    }
}

impl<const N: usize> From<[f32; N]> for UniformValue {
    fn from(v: [f32; N]) -> Self {
        UniformValue::Float(v.to_vec())
    }
}

impl<const N: usize> From<[i32; N]> for UniformValue {
    fn from(v: [i32; N]) -> Self {
        UniformValue::Int(v.to_vec())
    }
}

impl From<Vec<f32>> for UniformValue {
    fn from(v: Vec<f32>) -> Self {
        UniformValue::Float(v)
    }
}

impl From<Vec<i32>> for UniformValue {
    fn from(v: Vec<i32>) -> Self {
        UniformValue::Int(v)
    }
}

impl From<&[f32]> for UniformValue {
    fn from(v: &[f32]) -> Self {
        UniformValue::Float(v.to_vec())
    }
}

impl From<&[i32]> for UniformValue {
    fn from(v: &[i32]) -> Self {
        UniformValue::Int(v.to_vec())
    }
}
