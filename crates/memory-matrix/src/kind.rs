//! Numeric element kinds.
//!
//! `ElementKind` is the run-time tag for the element type of a buffer, and
//! `Element` ties each supported Rust primitive to its tag so matrices can be
//! generic over the element type while still reporting their kind.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use num_traits::NumCast;

use crate::error::MatrixError;

/// Supported element widths and signedness.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Float32,
    Float64,
}

impl ElementKind {
    pub const ALL: [ElementKind; 10] = [
        ElementKind::Int8,
        ElementKind::Int16,
        ElementKind::Int32,
        ElementKind::Int64,
        ElementKind::UInt8,
        ElementKind::UInt16,
        ElementKind::UInt32,
        ElementKind::UInt64,
        ElementKind::Float32,
        ElementKind::Float64,
    ];

    /// Width of one element in bytes.
    pub fn size_of(self) -> usize {
        match self {
            ElementKind::Int8 | ElementKind::UInt8 => 1,
            ElementKind::Int16 | ElementKind::UInt16 => 2,
            ElementKind::Int32 | ElementKind::UInt32 | ElementKind::Float32 => 4,
            ElementKind::Int64 | ElementKind::UInt64 | ElementKind::Float64 => 8,
        }
    }

    pub fn is_signed(self) -> bool {
        !matches!(
            self,
            ElementKind::UInt8 | ElementKind::UInt16 | ElementKind::UInt32 | ElementKind::UInt64
        )
    }

    pub fn is_float(self) -> bool {
        matches!(self, ElementKind::Float32 | ElementKind::Float64)
    }

    pub fn is_signed_integer(self) -> bool {
        self.is_signed() && !self.is_float()
    }

    pub fn name(self) -> &'static str {
        match self {
            ElementKind::Int8 => "int8",
            ElementKind::Int16 => "int16",
            ElementKind::Int32 => "int32",
            ElementKind::Int64 => "int64",
            ElementKind::UInt8 => "uint8",
            ElementKind::UInt16 => "uint16",
            ElementKind::UInt32 => "uint32",
            ElementKind::UInt64 => "uint64",
            ElementKind::Float32 => "float32",
            ElementKind::Float64 => "float64",
        }
    }

    /// Single-character typecode as used by Python's `array` module.
    /// 64-bit integers report `q`/`Q`.
    pub fn typecode(self) -> char {
        match self {
            ElementKind::Int8 => 'b',
            ElementKind::UInt8 => 'B',
            ElementKind::Int16 => 'h',
            ElementKind::UInt16 => 'H',
            ElementKind::Int32 => 'i',
            ElementKind::UInt32 => 'I',
            ElementKind::Int64 => 'q',
            ElementKind::UInt64 => 'Q',
            ElementKind::Float32 => 'f',
            ElementKind::Float64 => 'd',
        }
    }

    fn from_typecode(code: char) -> Option<Self> {
        let kind = match code {
            'b' => ElementKind::Int8,
            'B' => ElementKind::UInt8,
            'h' => ElementKind::Int16,
            'H' => ElementKind::UInt16,
            'i' => ElementKind::Int32,
            'I' => ElementKind::UInt32,
            // `l`/`L` follow LP64 and map to 64 bits.
            'l' | 'q' => ElementKind::Int64,
            'L' | 'Q' => ElementKind::UInt64,
            'f' => ElementKind::Float32,
            'd' => ElementKind::Float64,
            _ => return None,
        };
        Some(kind)
    }
}

impl Default for ElementKind {
    fn default() -> Self {
        ElementKind::Float64
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ElementKind {
    type Err = MatrixError;

    /// Accepts canonical names (`float64`), short names (`f64`) and
    /// single-character typecodes (`d`). Typecodes are case sensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        if let (Some(code), None) = (chars.next(), chars.next()) {
            return Self::from_typecode(code).ok_or_else(|| MatrixError::ParseKind(s.to_string()));
        }

        match s.to_lowercase().as_str() {
            "int8" | "i8" => Ok(ElementKind::Int8),
            "int16" | "i16" => Ok(ElementKind::Int16),
            "int32" | "i32" => Ok(ElementKind::Int32),
            "int64" | "i64" => Ok(ElementKind::Int64),
            "uint8" | "u8" => Ok(ElementKind::UInt8),
            "uint16" | "u16" => Ok(ElementKind::UInt16),
            "uint32" | "u32" => Ok(ElementKind::UInt32),
            "uint64" | "u64" => Ok(ElementKind::UInt64),
            "float32" | "f32" => Ok(ElementKind::Float32),
            "float64" | "f64" => Ok(ElementKind::Float64),
            _ => Err(MatrixError::ParseKind(s.to_string())),
        }
    }
}

/// A primitive type that can back a matrix buffer.
pub trait Element:
    Copy + PartialEq + fmt::Debug + fmt::Display + NumCast + bytemuck::Pod + 'static
{
    const KIND: ElementKind;
}

macro_rules! impl_element {
    ($($ty:ty => $kind:ident),* $(,)?) => {
        $(
            impl Element for $ty {
                const KIND: ElementKind = ElementKind::$kind;
            }
        )*
    };
}

impl_element!(
    i8 => Int8,
    i16 => Int16,
    i32 => Int32,
    i64 => Int64,
    u8 => UInt8,
    u16 => UInt16,
    u32 => UInt32,
    u64 => UInt64,
    f32 => Float32,
    f64 => Float64,
);
