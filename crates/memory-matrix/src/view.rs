//! Borrowed, possibly strided windows into a flat buffer.
//!
//! A view keeps the owner's whole backing slice together with the
//! `(offset, stride, len)` triple that selects its elements:
//!
//! ```text
//!            offset    stride
//!              |<------------->|
//! buffer: [ .. x0 .. .. .. .. x1 .. .. .. .. x2 .. ]
//!              ^               ^               ^
//!           view[0]         view[1]         view[2]
//! ```
//!
//! Row views of a row-major matrix have stride 1, column views have stride
//! `ncols`. Views never copy; they borrow the matrix for their whole life.
use std::fmt;
use std::iter::{StepBy, Take};
use std::ops::{Index, IndexMut};
use std::slice;

use crate::buffer::{Footprint, MemoryRegion};
use crate::error::{check_index, Axis, MatrixError, Result};

pub type Iter<'a, T> = Take<StepBy<slice::Iter<'a, T>>>;
pub type IterMut<'a, T> = Take<StepBy<slice::IterMut<'a, T>>>;

/// Checks the selection against the backing length and returns the stride to
/// store. Views with at most one element never step, so their stride is
/// normalised to 1.
fn validate(data_len: usize, offset: usize, stride: usize, len: usize) -> Result<usize> {
    if offset > data_len {
        return Err(MatrixError::IndexOutOfRange {
            axis: Axis::Element,
            index: offset,
            bound: data_len + 1,
        });
    }
    if len <= 1 {
        if len == 1 {
            check_index(Axis::Element, offset, data_len)?;
        }
        return Ok(1);
    }
    if stride == 0 {
        return Err(MatrixError::InvalidStride { stride, len });
    }
    let last = (len - 1)
        .checked_mul(stride)
        .and_then(|span| span.checked_add(offset))
        .unwrap_or(usize::MAX);
    check_index(Axis::Element, last, data_len)?;
    Ok(stride)
}

/// A shared strided window.
pub struct StridedView<'a, T> {
    data: &'a [T],
    offset: usize,
    stride: usize,
    len: usize,
}

/// An exclusive strided window; writes land in the owner's buffer.
pub struct StridedViewMut<'a, T> {
    data: &'a mut [T],
    offset: usize,
    stride: usize,
    len: usize,
}

impl<'a, T> StridedView<'a, T> {
    /// Build a view selecting `len` elements of `data` starting at `offset`,
    /// `stride` elements apart.
    ///
    /// Returns `IndexOutOfRange` if the last selected element lies outside
    /// `data`, and `InvalidStride` for a zero stride over two or more
    /// elements.
    pub fn new(data: &'a [T], offset: usize, stride: usize, len: usize) -> Result<Self> {
        let stride = validate(data.len(), offset, stride, len)?;
        Ok(Self {
            data,
            offset,
            stride,
            len,
        })
    }

    /// A contiguous view over the whole slice.
    pub fn contiguous(data: &'a [T]) -> Self {
        Self {
            data,
            offset: 0,
            stride: 1,
            len: data.len(),
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Position of the first element in the backing buffer.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Distance between consecutive elements, in elements.
    pub fn stride(&self) -> usize {
        self.stride
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&'a T> {
        if index < self.len {
            Some(&self.data[self.offset + index * self.stride])
        } else {
            None
        }
    }

    pub fn try_get(&self, index: usize) -> Result<&'a T> {
        check_index(Axis::Element, index, self.len)?;
        Ok(&self.data[self.offset + index * self.stride])
    }

    pub fn iter(&self) -> Iter<'a, T> {
        self.data[self.offset..]
            .iter()
            .step_by(self.stride)
            .take(self.len)
    }

    /// The selected elements as one slice, when they are adjacent in memory.
    pub fn as_slice(&self) -> Option<&'a [T]> {
        if self.stride == 1 || self.len <= 1 {
            Some(&self.data[self.offset..self.offset + self.len])
        } else {
            None
        }
    }

    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.iter().cloned().collect()
    }
}

impl<'a, T> Clone for StridedView<'a, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, T> Copy for StridedView<'a, T> {}

impl<'a, T> StridedViewMut<'a, T> {
    /// Mutable counterpart of [`StridedView::new`].
    pub fn new(data: &'a mut [T], offset: usize, stride: usize, len: usize) -> Result<Self> {
        let stride = validate(data.len(), offset, stride, len)?;
        Ok(Self {
            data,
            offset,
            stride,
            len,
        })
    }

    pub fn contiguous(data: &'a mut [T]) -> Self {
        let len = data.len();
        Self {
            data,
            offset: 0,
            stride: 1,
            len,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.as_view().get(index)
    }

    #[inline]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        if index < self.len {
            Some(&mut self.data[self.offset + index * self.stride])
        } else {
            None
        }
    }

    pub fn try_get(&self, index: usize) -> Result<&T> {
        check_index(Axis::Element, index, self.len)?;
        Ok(&self.data[self.offset + index * self.stride])
    }

    /// Write `value` at `index`; nothing is written when the index is out of
    /// range.
    pub fn set(&mut self, index: usize, value: T) -> Result<()> {
        check_index(Axis::Element, index, self.len)?;
        self.data[self.offset + index * self.stride] = value;
        Ok(())
    }

    pub fn iter(&self) -> Iter<'_, T> {
        self.as_view().iter()
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        self.data[self.offset..]
            .iter_mut()
            .step_by(self.stride)
            .take(self.len)
    }

    pub fn fill(&mut self, value: T)
    where
        T: Clone,
    {
        for slot in self.iter_mut() {
            *slot = value.clone();
        }
    }

    /// Reborrow as a shared view.
    pub fn as_view(&self) -> StridedView<'_, T> {
        StridedView {
            data: &*self.data,
            offset: self.offset,
            stride: self.stride,
            len: self.len,
        }
    }

    /// Give up exclusivity, keeping the original borrow.
    pub fn into_view(self) -> StridedView<'a, T> {
        StridedView {
            data: self.data,
            offset: self.offset,
            stride: self.stride,
            len: self.len,
        }
    }

    pub fn as_mut_slice(&mut self) -> Option<&mut [T]> {
        if self.stride == 1 || self.len <= 1 {
            Some(&mut self.data[self.offset..self.offset + self.len])
        } else {
            None
        }
    }

    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.iter().cloned().collect()
    }
}

impl<'a, T> Index<usize> for StridedView<'a, T> {
    type Output = T;

    fn index(&self, index: usize) -> &Self::Output {
        assert!(index < self.len, "view index out of bounds");
        &self.data[self.offset + index * self.stride]
    }
}

impl<'a, T> Index<usize> for StridedViewMut<'a, T> {
    type Output = T;

    fn index(&self, index: usize) -> &Self::Output {
        assert!(index < self.len, "view index out of bounds");
        &self.data[self.offset + index * self.stride]
    }
}

impl<'a, T> IndexMut<usize> for StridedViewMut<'a, T> {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        assert!(index < self.len, "view index out of bounds");
        &mut self.data[self.offset + index * self.stride]
    }
}

impl<'a, T> IntoIterator for StridedView<'a, T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, 'b, T> IntoIterator for &'b StridedView<'a, T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, 'b, T> IntoIterator for &'b mut StridedViewMut<'a, T> {
    type Item = &'b mut T;
    type IntoIter = IterMut<'b, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<'a, T> MemoryRegion for StridedView<'a, T> {
    fn footprint(&self) -> Footprint {
        Footprint::of_strided(self.data, self.offset, self.stride, self.len)
    }
}

impl<'a, T> MemoryRegion for StridedViewMut<'a, T> {
    fn footprint(&self) -> Footprint {
        Footprint::of_strided(&*self.data, self.offset, self.stride, self.len)
    }
}

// Debug shows the selected elements, not the whole backing buffer.
impl<'a, T: fmt::Debug> fmt::Debug for StridedView<'a, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StridedView")
            .field("offset", &self.offset)
            .field("stride", &self.stride)
            .field("values", &DebugValues(self.iter()))
            .finish()
    }
}

impl<'a, T: fmt::Debug> fmt::Debug for StridedViewMut<'a, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StridedViewMut")
            .field("offset", &self.offset)
            .field("stride", &self.stride)
            .field("values", &DebugValues(self.iter()))
            .finish()
    }
}

struct DebugValues<I>(I);

impl<I> fmt::Debug for DebugValues<I>
where
    I: Iterator + Clone,
    I::Item: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.0.clone()).finish()
    }
}
