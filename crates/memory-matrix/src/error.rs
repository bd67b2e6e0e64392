use std::error::Error;
use std::fmt;

use crate::kind::ElementKind;

/// Which index of a matrix or view was out of bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Row,
    Column,
    /// Linear position inside a row or column view.
    Element,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Row => write!(f, "row"),
            Axis::Column => write!(f, "column"),
            Axis::Element => write!(f, "element"),
        }
    }
}

/// Errors raised by matrix construction, indexing and the buffer utilities.
#[derive(Debug, Clone, PartialEq)]
pub enum MatrixError {
    /// Zero rows or columns, or a `rows * cols` product that overflows.
    InvalidDimension { rows: usize, cols: usize },
    /// Buffer length does not equal `rows * cols`.
    ShapeMismatch {
        rows: usize,
        cols: usize,
        len: usize,
    },
    IndexOutOfRange {
        axis: Axis,
        index: usize,
        bound: usize,
    },
    /// Zero stride for a view selecting more than one element.
    InvalidStride { stride: usize, len: usize },
    /// Buffer element width or signedness incompatible with the operation.
    TypeMismatch { expected: String, found: String },
    /// Value does not fit the target element kind; nothing was written.
    NotRepresentable { value: String, kind: ElementKind },
    ParseKind(String),
    Config(String),
}

impl fmt::Display for MatrixError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            MatrixError::InvalidDimension { rows, cols } => {
                write!(f, "invalid matrix dimensions {}x{}", rows, cols)
            }
            MatrixError::ShapeMismatch { rows, cols, len } => write!(
                f,
                "invalid shape ({}, {}) for buffer of length {}",
                rows, cols, len
            ),
            MatrixError::IndexOutOfRange { axis, index, bound } => write!(
                f,
                "{} index {} out of range (must be < {})",
                axis, index, bound
            ),
            MatrixError::InvalidStride { stride, len } => {
                write!(f, "stride {} cannot select {} elements", stride, len)
            }
            MatrixError::TypeMismatch { expected, found } => {
                write!(f, "type mismatch: expected {}, found {}", expected, found)
            }
            MatrixError::NotRepresentable { value, kind } => {
                write!(f, "value {} is not representable as {}", value, kind)
            }
            MatrixError::ParseKind(s) => write!(f, "unknown element kind: {}", s),
            MatrixError::Config(msg) => write!(f, "invalid matrix configuration: {}", msg),
        }
    }
}

impl Error for MatrixError {}

pub type Result<T> = std::result::Result<T, MatrixError>;

/// Bounds check shared by matrices and views.
#[inline]
pub(crate) fn check_index(axis: Axis, index: usize, bound: usize) -> Result<()> {
    if index < bound {
        Ok(())
    } else {
        Err(MatrixError::IndexOutOfRange { axis, index, bound })
    }
}
