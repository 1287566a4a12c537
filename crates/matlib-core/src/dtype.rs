use std::fmt;

use crate::error::MatlibError;

/// Element type tags understood by the kernels.
///
/// The discriminants are the wire codes used by the C ABI and must never be
/// renumbered. Complex tags name the width of each component, so
/// `Complex32` is a pair of `f32` and `Complex64` a pair of `f64`.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DType {
    Unknown = 0,
    Bool = 1,
    Int8 = 2,
    Int16 = 3,
    Int32 = 4,
    Int64 = 5,
    Uint8 = 6,
    Uint16 = 7,
    Uint32 = 8,
    Uint64 = 9,
    Float8 = 10,
    Float16 = 11,
    Float32 = 12,
    Float64 = 13,
    Complex8 = 14,
    Complex16 = 15,
    Complex32 = 16,
    Complex64 = 17,
}

impl DType {
    pub const ALL: [DType; 18] = [
        DType::Unknown,
        DType::Bool,
        DType::Int8,
        DType::Int16,
        DType::Int32,
        DType::Int64,
        DType::Uint8,
        DType::Uint16,
        DType::Uint32,
        DType::Uint64,
        DType::Float8,
        DType::Float16,
        DType::Float32,
        DType::Float64,
        DType::Complex8,
        DType::Complex16,
        DType::Complex32,
        DType::Complex64,
    ];

    /// Returns the wire code for this tag.
    pub fn code(&self) -> i32 {
        *self as i32
    }

    /// Size of a single element in bytes, or 0 for `Unknown`.
    ///
    /// Complex tags are twice the width of their component float.
    pub fn size_in_bytes(&self) -> usize {
        match self {
            DType::Unknown => 0,
            DType::Bool | DType::Int8 | DType::Uint8 | DType::Float8 => 1,
            DType::Int16 | DType::Uint16 | DType::Float16 | DType::Complex8 => 2,
            DType::Int32 | DType::Uint32 | DType::Float32 | DType::Complex16 => 4,
            DType::Int64 | DType::Uint64 | DType::Float64 | DType::Complex32 => 8,
            DType::Complex64 => 16,
        }
    }

    /// True for the eight signed and unsigned integer tags.
    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            DType::Int8
                | DType::Int16
                | DType::Int32
                | DType::Int64
                | DType::Uint8
                | DType::Uint16
                | DType::Uint32
                | DType::Uint64
        )
    }

    pub fn name(&self) -> &'static str {
        match self {
            DType::Unknown => "unknown",
            DType::Bool => "bool",
            DType::Int8 => "int8",
            DType::Int16 => "int16",
            DType::Int32 => "int32",
            DType::Int64 => "int64",
            DType::Uint8 => "uint8",
            DType::Uint16 => "uint16",
            DType::Uint32 => "uint32",
            DType::Uint64 => "uint64",
            DType::Float8 => "float8",
            DType::Float16 => "float16",
            DType::Float32 => "float32",
            DType::Float64 => "float64",
            DType::Complex8 => "complex8",
            DType::Complex16 => "complex16",
            DType::Complex32 => "complex32",
            DType::Complex64 => "complex64",
        }
    }
}

impl TryFrom<i32> for DType {
    type Error = MatlibError;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        DType::ALL
            .iter()
            .copied()
            .find(|d| d.code() == code)
            .ok_or_else(|| MatlibError::unsupported(format!("unknown dtype code {}", code)))
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
