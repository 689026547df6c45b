use std::fmt;

/// Element encoding of a uniform component.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ElementType {
    /// 32-bit IEEE-754 float.
    Float,
    /// 32-bit two's-complement integer.
    Int,
}

/// Shape of a declared uniform: scalar or vector of 32-bit floats or ints.
///
/// The kind fixes the component count, the byte encoding and the WGSL type
/// token used in the generated binding declaration.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum UniformKind {
    F32,
    Vec2F32,
    Vec3F32,
    Vec4F32,
    I32,
    Vec2I32,
    Vec3I32,
    Vec4I32,
}

impl UniformKind {
    pub const ALL: [UniformKind; 8] = [
        UniformKind::F32,
        UniformKind::Vec2F32,
        UniformKind::Vec3F32,
        UniformKind::Vec4F32,
        UniformKind::I32,
        UniformKind::Vec2I32,
        UniformKind::Vec3I32,
        UniformKind::Vec4I32,
    ];

    /// Number of 32-bit components (1..=4).
    #[inline]
    pub const fn components(self) -> usize {
        match self {
            UniformKind::F32 | UniformKind::I32 => 1,
            UniformKind::Vec2F32 | UniformKind::Vec2I32 => 2,
            UniformKind::Vec3F32 | UniformKind::Vec3I32 => 3,
            UniformKind::Vec4F32 | UniformKind::Vec4I32 => 4,
        }
    }

    #[inline]
    pub const fn element(self) -> ElementType {
        match self {
            UniformKind::F32
            | UniformKind::Vec2F32
            | UniformKind::Vec3F32
            | UniformKind::Vec4F32 => ElementType::Float,
            UniformKind::I32
            | UniformKind::Vec2I32
            | UniformKind::Vec3I32
            | UniformKind::Vec4I32 => ElementType::Int,
        }
    }

    /// Size of the packed representation (and of the GPU buffer) in bytes.
    #[inline]
    pub const fn byte_size(self) -> u64 {
        4 * self.components() as u64
    }

    /// WGSL type token, e.g. `vec3<f32>`.
    pub const fn wgsl_type(self) -> &'static str {
        match self {
            UniformKind::F32 => "f32",
            UniformKind::Vec2F32 => "vec2<f32>",
            UniformKind::Vec3F32 => "vec3<f32>",
            UniformKind::Vec4F32 => "vec4<f32>",
            UniformKind::I32 => "i32",
            UniformKind::Vec2I32 => "vec2<i32>",
            UniformKind::Vec3I32 => "vec3<i32>",
            UniformKind::Vec4I32 => "vec4<i32>",
        }
    }

    /// Parses a WGSL type token, accepting the predeclared aliases (`vec2f`, `vec4i`).
    pub fn from_wgsl(token: &str) -> Option<Self> {
        let token = token.trim();
        let kind = match token {
            "f32" => UniformKind::F32,
            "vec2f" => UniformKind::Vec2F32,
            "vec3f" => UniformKind::Vec3F32,
            "vec4f" => UniformKind::Vec4F32,
            "i32" => UniformKind::I32,
            "vec2i" => UniformKind::Vec2I32,
            "vec3i" => UniformKind::Vec3I32,
            "vec4i" => UniformKind::Vec4I32,
            other => {
                let compact: String = other.chars().filter(|c| !c.is_whitespace()).collect();
                return Self::ALL.into_iter().find(|k| k.wgsl_type() == compact);
            }
        };
        Some(kind)
    }
}

impl fmt::Display for UniformKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wgsl_type())
    }
}
