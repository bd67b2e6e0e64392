use std::fmt;
use std::ops::{Index, IndexMut};
use std::slice::{ChunksExact, Iter, IterMut};

use ndarray::Array2;
use num_traits::{NumCast, ToPrimitive};

use crate::buffer::{Footprint, MemoryRegion};
use crate::error::{check_index, Axis, MatrixError, Result};
use crate::kind::{Element, ElementKind};
use crate::view::{StridedView, StridedViewMut};

/// A 2D matrix stored in one contiguous row-major buffer.
///
/// Element `(r, c)` lives at offset `r * ncols + c`. Row and column views
/// borrow the buffer instead of copying it.
#[derive(Clone, Debug, PartialEq)]
pub struct FlatMatrix<T> {
    data: Vec<T>,
    rows: usize,
    cols: usize,
}

fn checked_len(rows: usize, cols: usize) -> Result<usize> {
    if rows == 0 || cols == 0 {
        return Err(MatrixError::InvalidDimension { rows, cols });
    }
    rows.checked_mul(cols)
        .ok_or(MatrixError::InvalidDimension { rows, cols })
}

impl<T: Element> FlatMatrix<T> {
    /// Allocate a `rows x cols` matrix with every element set to `fill`.
    pub fn new(rows: usize, cols: usize, fill: T) -> Result<Self> {
        let len = checked_len(rows, cols)?;
        log::debug!(
            "Allocating {} FlatMatrix: rows={}, cols={}, len={}",
            T::KIND,
            rows,
            cols,
            len
        );
        Ok(Self {
            data: vec![fill; len],
            rows,
            cols,
        })
    }

    pub fn from_shape_vec(shape: (usize, usize), data: Vec<T>) -> Result<Self> {
        let (rows, cols) = shape;
        let len = checked_len(rows, cols)?;
        if data.len() != len {
            return Err(MatrixError::ShapeMismatch {
                rows,
                cols,
                len: data.len(),
            });
        }
        Ok(Self { data, rows, cols })
    }

    pub fn kind(&self) -> ElementKind {
        T::KIND
    }

    pub fn nrows(&self) -> usize {
        self.rows
    }

    pub fn ncols(&self) -> usize {
        self.cols
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Always false; construction rejects empty shapes.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// The buffer reinterpreted as native-endian bytes, without copying.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.data)
    }

    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        bytemuck::cast_slice_mut(&mut self.data)
    }

    #[inline]
    fn offset(&self, row: usize, col: usize) -> Result<usize> {
        check_index(Axis::Row, row, self.rows)?;
        check_index(Axis::Column, col, self.cols)?;
        Ok(row * self.cols + col)
    }

    pub fn get(&self, row: usize, col: usize) -> Result<T> {
        let offset = self.offset(row, col)?;
        Ok(self.data[offset])
    }

    pub fn set(&mut self, row: usize, col: usize, value: T) -> Result<()> {
        let offset = self.offset(row, col)?;
        self.data[offset] = value;
        Ok(())
    }

    /// Convert `value` to the element type and store it.
    ///
    /// Floats stored into an integer kind are truncated toward zero. Values
    /// outside the range of the element type (and NaN into an integer kind)
    /// fail with `NotRepresentable`; nothing is written in that case.
    pub fn set_value<V>(&mut self, row: usize, col: usize, value: V) -> Result<()>
    where
        V: ToPrimitive + fmt::Display + Copy,
    {
        let offset = self.offset(row, col)?;
        let converted = <T as NumCast>::from(value).ok_or_else(|| MatrixError::NotRepresentable {
            value: value.to_string(),
            kind: T::KIND,
        })?;
        self.data[offset] = converted;
        Ok(())
    }

    /// Row `row` as a contiguous slice.
    pub fn row(&self, row: usize) -> Result<&[T]> {
        check_index(Axis::Row, row, self.rows)?;
        let start = row * self.cols;
        Ok(&self.data[start..start + self.cols])
    }

    pub fn row_mut(&mut self, row: usize) -> Result<&mut [T]> {
        check_index(Axis::Row, row, self.rows)?;
        let start = row * self.cols;
        Ok(&mut self.data[start..start + self.cols])
    }

    pub fn row_view(&self, row: usize) -> Result<StridedView<'_, T>> {
        check_index(Axis::Row, row, self.rows)?;
        log::trace!("row_view({}) on {}", row, self);
        StridedView::new(&self.data, row * self.cols, 1, self.cols)
    }

    pub fn row_view_mut(&mut self, row: usize) -> Result<StridedViewMut<'_, T>> {
        check_index(Axis::Row, row, self.rows)?;
        let (start, cols) = (row * self.cols, self.cols);
        StridedViewMut::new(&mut self.data, start, 1, cols)
    }

    /// Column `col` as a view with stride `ncols`.
    pub fn col_view(&self, col: usize) -> Result<StridedView<'_, T>> {
        check_index(Axis::Column, col, self.cols)?;
        log::trace!("col_view({}) on {}", col, self);
        StridedView::new(&self.data, col, self.cols, self.rows)
    }

    pub fn col_view_mut(&mut self, col: usize) -> Result<StridedViewMut<'_, T>> {
        check_index(Axis::Column, col, self.cols)?;
        let (cols, rows) = (self.cols, self.rows);
        StridedViewMut::new(&mut self.data, col, cols, rows)
    }

    /// Deep copy as one `Vec` per row.
    pub fn to_nested_vec(&self) -> Vec<Vec<T>> {
        self.rows_iter().map(|row| row.to_vec()).collect()
    }

    /// Owned `ndarray` copy with the same shape.
    pub fn to_ndarray(&self) -> Array2<T> {
        Array2::from_shape_vec((self.rows, self.cols), self.data.clone())
            .expect("FlatMatrix invariant: data.len() == rows * cols")
    }

    /// All elements in row-major order. Each call starts a fresh pass.
    pub fn iter(&self) -> Iter<'_, T> {
        self.data.iter()
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        self.data.iter_mut()
    }

    pub fn rows_iter(&self) -> ChunksExact<'_, T> {
        self.data.chunks_exact(self.cols)
    }

    /// Label of the form `FlatMatrix(<rows>x<cols>)`.
    pub fn describe(&self) -> String {
        self.to_string()
    }
}

impl<T> fmt::Display for FlatMatrix<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FlatMatrix({}x{})", self.rows, self.cols)
    }
}

impl<T: Element> Index<(usize, usize)> for FlatMatrix<T> {
    type Output = T;

    fn index(&self, index: (usize, usize)) -> &Self::Output {
        assert!(
            index.0 < self.rows && index.1 < self.cols,
            "matrix index out of bounds"
        );
        &self.data[index.0 * self.cols + index.1]
    }
}

impl<T: Element> IndexMut<(usize, usize)> for FlatMatrix<T> {
    fn index_mut(&mut self, index: (usize, usize)) -> &mut Self::Output {
        assert!(
            index.0 < self.rows && index.1 < self.cols,
            "matrix index out of bounds"
        );
        &mut self.data[index.0 * self.cols + index.1]
    }
}

impl<'a, T: Element> IntoIterator for &'a FlatMatrix<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T> MemoryRegion for FlatMatrix<T> {
    fn footprint(&self) -> Footprint {
        self.data.footprint()
    }
}

/// A matrix whose element kind is chosen at run time.
#[derive(Clone, Debug, PartialEq)]
pub enum AnyMatrix {
    Int8(FlatMatrix<i8>),
    Int16(FlatMatrix<i16>),
    Int32(FlatMatrix<i32>),
    Int64(FlatMatrix<i64>),
    UInt8(FlatMatrix<u8>),
    UInt16(FlatMatrix<u16>),
    UInt32(FlatMatrix<u32>),
    UInt64(FlatMatrix<u64>),
    Float32(FlatMatrix<f32>),
    Float64(FlatMatrix<f64>),
}

macro_rules! dispatch {
    ($self:expr, $m:ident => $body:expr) => {
        match $self {
            AnyMatrix::Int8($m) => $body,
            AnyMatrix::Int16($m) => $body,
            AnyMatrix::Int32($m) => $body,
            AnyMatrix::Int64($m) => $body,
            AnyMatrix::UInt8($m) => $body,
            AnyMatrix::UInt16($m) => $body,
            AnyMatrix::UInt32($m) => $body,
            AnyMatrix::UInt64($m) => $body,
            AnyMatrix::Float32($m) => $body,
            AnyMatrix::Float64($m) => $body,
        }
    };
}

fn filled<T: Element>(rows: usize, cols: usize, fill: f64) -> Result<FlatMatrix<T>> {
    let value = <T as NumCast>::from(fill).ok_or_else(|| MatrixError::NotRepresentable {
        value: fill.to_string(),
        kind: T::KIND,
    })?;
    FlatMatrix::new(rows, cols, value)
}

impl AnyMatrix {
    /// Allocate a matrix of `kind`, converting `fill` with the same policy as
    /// [`FlatMatrix::set_value`].
    pub fn new(rows: usize, cols: usize, kind: ElementKind, fill: f64) -> Result<Self> {
        let matrix = match kind {
            ElementKind::Int8 => AnyMatrix::Int8(filled(rows, cols, fill)?),
            ElementKind::Int16 => AnyMatrix::Int16(filled(rows, cols, fill)?),
            ElementKind::Int32 => AnyMatrix::Int32(filled(rows, cols, fill)?),
            ElementKind::Int64 => AnyMatrix::Int64(filled(rows, cols, fill)?),
            ElementKind::UInt8 => AnyMatrix::UInt8(filled(rows, cols, fill)?),
            ElementKind::UInt16 => AnyMatrix::UInt16(filled(rows, cols, fill)?),
            ElementKind::UInt32 => AnyMatrix::UInt32(filled(rows, cols, fill)?),
            ElementKind::UInt64 => AnyMatrix::UInt64(filled(rows, cols, fill)?),
            ElementKind::Float32 => AnyMatrix::Float32(filled(rows, cols, fill)?),
            ElementKind::Float64 => AnyMatrix::Float64(filled(rows, cols, fill)?),
        };
        Ok(matrix)
    }

    pub fn kind(&self) -> ElementKind {
        dispatch!(self, m => m.kind())
    }

    pub fn shape(&self) -> (usize, usize) {
        dispatch!(self, m => m.shape())
    }

    pub fn describe(&self) -> String {
        dispatch!(self, m => m.describe())
    }

    /// Element `(row, col)` widened to `f64`.
    pub fn get_f64(&self, row: usize, col: usize) -> Result<f64> {
        dispatch!(self, m => {
            let value = m.get(row, col)?;
            value.to_f64().ok_or_else(|| MatrixError::NotRepresentable {
                value: value.to_string(),
                kind: ElementKind::Float64,
            })
        })
    }

    pub fn set_f64(&mut self, row: usize, col: usize, value: f64) -> Result<()> {
        dispatch!(self, m => m.set_value(row, col, value))
    }

    /// Deep copy of all rows, widened to `f64`.
    pub fn to_nested_f64(&self) -> Vec<Vec<f64>> {
        dispatch!(self, m => m
            .rows_iter()
            .map(|row| row.iter().map(|v| v.to_f64().unwrap_or(f64::NAN)).collect())
            .collect())
    }

    pub fn as_bytes(&self) -> &[u8] {
        dispatch!(self, m => m.as_bytes())
    }

    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        dispatch!(self, m => m.as_bytes_mut())
    }
}

impl fmt::Display for AnyMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        dispatch!(self, m => fmt::Display::fmt(m, f))
    }
}

impl MemoryRegion for AnyMatrix {
    fn footprint(&self) -> Footprint {
        dispatch!(self, m => m.footprint())
    }
}

macro_rules! impl_from_flat {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<FlatMatrix<$ty>> for AnyMatrix {
                fn from(value: FlatMatrix<$ty>) -> Self {
                    AnyMatrix::$variant(value)
                }
            }
        )*
    };
}

impl_from_flat!(
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offsets_are_row_major() {
        let m = FlatMatrix::from_shape_vec((2, 3), vec![0, 1, 2, 3, 4, 5]).unwrap();
        for r in 0..2 {
            for c in 0..3 {
                assert_eq!(m.get(r, c).unwrap(), (r * 3 + c) as i32);
            }
        }
    }

    #[test]
    fn zero_dimensions_rejected() {
        assert_eq!(
            FlatMatrix::new(0, 4, 0.0f64).unwrap_err(),
            MatrixError::InvalidDimension { rows: 0, cols: 4 }
        );
        assert!(FlatMatrix::new(3, 0, 0i32).is_err());
    }

    #[test]
    fn overflowing_dimensions_rejected() {
        let err = FlatMatrix::new(usize::MAX, 2, 0u8).unwrap_err();
        assert!(matches!(err, MatrixError::InvalidDimension { .. }));
    }

    #[test]
    fn out_of_range_reports_axis() {
        let m = FlatMatrix::new(2, 2, 0i8).unwrap();
        assert_eq!(
            m.get(2, 0).unwrap_err(),
            MatrixError::IndexOutOfRange {
                axis: Axis::Row,
                index: 2,
                bound: 2,
            }
        );
        assert_eq!(
            m.get(0, 5).unwrap_err(),
            MatrixError::IndexOutOfRange {
                axis: Axis::Column,
                index: 5,
                bound: 2,
            }
        );
    }

    #[test]
    fn describe_label() {
        let m = FlatMatrix::new(3, 4, 0.0f64).unwrap();
        assert_eq!(m.describe(), "FlatMatrix(3x4)");
        assert_eq!(format!("{}", m), "FlatMatrix(3x4)");
    }

    #[test]
    fn set_value_truncates_floats_into_ints() {
        let mut m = FlatMatrix::new(1, 2, 0i32).unwrap();
        m.set_value(0, 0, 3.9f64).unwrap();
        m.set_value(0, 1, -2.7f64).unwrap();
        assert_eq!(m.as_slice(), &[3, -2]);
    }

    #[test]
    fn set_value_rejects_out_of_range() {
        let mut m = FlatMatrix::new(1, 1, 7u8).unwrap();
        let err = m.set_value(0, 0, 256i32).unwrap_err();
        assert_eq!(
            err,
            MatrixError::NotRepresentable {
                value: "256".to_string(),
                kind: ElementKind::UInt8,
            }
        );
        assert!(m.set_value(0, 0, -1i64).is_err());
        assert!(m.set_value(0, 0, f64::NAN).is_err());
        assert_eq!(m.get(0, 0).unwrap(), 7);
    }

    #[test]
    fn set_value_widens_ints_into_floats() {
        let mut m = FlatMatrix::new(1, 1, 0.0f64).unwrap();
        m.set_value(0, 0, 42u16).unwrap();
        assert_eq!(m.get(0, 0).unwrap(), 42.0);
    }

    #[test]
    fn bytes_view_shares_buffer() {
        let mut m = FlatMatrix::new(1, 2, 0u16).unwrap();
        m.as_bytes_mut().copy_from_slice(&[1, 0, 0, 1]);
        assert_eq!(m.as_bytes().len(), 4);
        assert_eq!(m.get(0, 0).unwrap(), u16::from_ne_bytes([1, 0]));
        assert_eq!(m.get(0, 1).unwrap(), u16::from_ne_bytes([0, 1]));
    }

    #[test]
    fn any_matrix_dispatches_on_kind() {
        let mut m = AnyMatrix::new(2, 2, "i".parse().unwrap(), 1.0).unwrap();
        assert_eq!(m.kind(), ElementKind::Int32);
        m.set_f64(1, 1, 9.5).unwrap();
        assert_eq!(m.to_nested_f64(), vec![vec![1.0, 1.0], vec![1.0, 9.0]]);
        assert_eq!(m.describe(), "FlatMatrix(2x2)");
        assert_eq!(m.as_bytes().len(), 16);
    }

    #[test]
    fn any_matrix_rejects_unrepresentable_fill() {
        let err = AnyMatrix::new(1, 1, ElementKind::UInt8, -1.0).unwrap_err();
        assert!(matches!(err, MatrixError::NotRepresentable { kind: ElementKind::UInt8, .. }));
    }
}
