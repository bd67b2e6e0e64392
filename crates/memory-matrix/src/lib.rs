//! memory-matrix: a flat-buffer 2D matrix with zero-copy views.
//!
//! `FlatMatrix` keeps every element in one row-major buffer and hands out
//! borrowed row and column windows (`StridedView`, `StridedViewMut`) instead
//! of copies. The `buffer` module holds the byte-level helpers that work on
//! any such buffer: even-index byte sums, in-place negation of signed
//! integers and aliasing detection between two views.
pub mod buffer;
pub mod config;
pub mod error;
pub mod kind;
pub mod matrix;
pub mod view;

pub use buffer::{detect_aliasing, negate_ints_in_place, sum_even_indexed_bytes, MemoryRegion};
pub use config::MatrixConfig;
pub use error::{Axis, MatrixError, Result};
pub use kind::{Element, ElementKind};
pub use matrix::{AnyMatrix, FlatMatrix};
pub use view::{StridedView, StridedViewMut};
