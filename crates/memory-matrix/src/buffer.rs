//! Buffer-level utilities: even-index byte sums, in-place negation of signed
//! integers and aliasing detection between views.
//!
//! Aliasing is decided from resolved memory footprints (base address, element
//! width, stride, length), never from the values stored.
use std::mem;

use bytemuck::Pod;
use num_traits::{CheckedNeg, PrimInt, Signed};

use crate::error::{MatrixError, Result};
use crate::kind::{Element, ElementKind};

/// The bytes reachable through a view: `len` elements of `elem_size` bytes,
/// the first at `addr`, consecutive ones `stride` bytes apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Footprint {
    addr: usize,
    elem_size: usize,
    stride: usize,
    len: usize,
}

impl Footprint {
    /// A zero stride means every element sits at `addr`.
    pub fn new(addr: usize, elem_size: usize, stride: usize, len: usize) -> Self {
        if stride == 0 {
            Self {
                addr,
                elem_size,
                stride: elem_size.max(1),
                len: len.min(1),
            }
        } else {
            Self {
                addr,
                elem_size,
                stride,
                len,
            }
        }
    }

    /// Footprint of `len` elements of `data`, `stride` elements apart,
    /// starting at element `offset`.
    pub(crate) fn of_strided<T>(data: &[T], offset: usize, stride: usize, len: usize) -> Self {
        let size = mem::size_of::<T>();
        Self::new(
            data[offset..].as_ptr() as usize,
            size,
            stride.saturating_mul(size),
            len,
        )
    }

    pub fn len(&self) -> usize {
        self.len
    }

    /// True when no byte is reachable (no elements, or zero-sized elements).
    pub fn is_empty(&self) -> bool {
        self.len == 0 || self.elem_size == 0
    }

    /// Half-open byte range `[start, end)` spanned from the first to the last
    /// element.
    pub fn extent(&self) -> Option<(usize, usize)> {
        if self.is_empty() {
            return None;
        }
        let end = (self.len - 1)
            .saturating_mul(self.stride)
            .saturating_add(self.elem_size)
            .saturating_add(self.addr);
        Some((self.addr, end))
    }

    /// Whether some element intersects the byte range `[lo, hi)`.
    fn intersects(&self, lo: usize, hi: usize) -> bool {
        if hi <= self.addr {
            return false;
        }
        // element j covers [addr + j*stride, addr + j*stride + elem_size)
        let last = ((hi - self.addr - 1) / self.stride).min(self.len - 1);
        let first = if lo < self.addr + self.elem_size {
            0
        } else {
            (lo - self.addr - self.elem_size) / self.stride + 1
        };
        first <= last
    }

    /// Whether at least one byte is reachable through both footprints.
    pub fn overlaps(&self, other: &Footprint) -> bool {
        let (Some((a_lo, a_hi)), Some((b_lo, b_hi))) = (self.extent(), other.extent()) else {
            return false;
        };
        if a_hi <= b_lo || b_hi <= a_lo {
            return false;
        }

        let (walk, probe) = if self.len <= other.len {
            (self, other)
        } else {
            (other, self)
        };
        (0..walk.len).any(|i| {
            let lo = walk.addr.saturating_add(i.saturating_mul(walk.stride));
            probe.intersects(lo, lo.saturating_add(walk.elem_size))
        })
    }
}

/// Anything that can describe the memory it reads or writes.
pub trait MemoryRegion {
    fn footprint(&self) -> Footprint;
}

impl<T> MemoryRegion for [T] {
    fn footprint(&self) -> Footprint {
        Footprint::of_strided(self, 0, 1, self.len())
    }
}

impl<T, const N: usize> MemoryRegion for [T; N] {
    fn footprint(&self) -> Footprint {
        self.as_slice().footprint()
    }
}

impl<T> MemoryRegion for Vec<T> {
    fn footprint(&self) -> Footprint {
        self.as_slice().footprint()
    }
}

impl<R: MemoryRegion + ?Sized> MemoryRegion for &R {
    fn footprint(&self) -> Footprint {
        (**self).footprint()
    }
}

impl<R: MemoryRegion + ?Sized> MemoryRegion for &mut R {
    fn footprint(&self) -> Footprint {
        (**self).footprint()
    }
}

/// Returns true iff some storage location is reachable through both `a` and
/// `b`.
///
/// Offsets, strides, lengths and element widths may all differ; two
/// interleaved column views of the same matrix do not alias, a row and a
/// column crossing it do. Views over separate allocations never alias,
/// whatever their contents.
pub fn detect_aliasing<A, B>(a: &A, b: &B) -> bool
where
    A: MemoryRegion + ?Sized,
    B: MemoryRegion + ?Sized,
{
    let (fa, fb) = (a.footprint(), b.footprint());
    let overlap = fa.overlaps(&fb);
    log::trace!("detect_aliasing: {:?} vs {:?} -> {}", fa, fb, overlap);
    overlap
}

/// Sum the bytes at indices 0, 2, 4, ... of `buffer`.
///
/// Reads the borrowed bytes directly; an empty buffer sums to 0.
pub fn sum_even_indexed_bytes<B>(buffer: &B) -> u64
where
    B: AsRef<[u8]> + ?Sized,
{
    buffer
        .as_ref()
        .iter()
        .step_by(2)
        .map(|&b| u64::from(b))
        .sum()
}

/// [`sum_even_indexed_bytes`] over the in-memory (native-endian)
/// representation of a plain-old-data slice, reinterpreted without copying.
pub fn sum_even_indexed_bytes_of<T: Pod>(values: &[T]) -> u64 {
    sum_even_indexed_bytes(bytemuck::cast_slice::<T, u8>(values))
}

/// Replace every element `x` with `-x`, in place.
///
/// Only signed primitive integers are accepted. If any element is `T::MIN`,
/// whose negation does not fit, the call fails with `NotRepresentable` and
/// the buffer is left untouched.
pub fn negate_ints_in_place<T>(values: &mut [T]) -> Result<()>
where
    T: PrimInt + Signed + CheckedNeg + Element,
{
    if let Some(bad) = values.iter().find(|v| v.checked_neg().is_none()) {
        log::warn!("refusing to negate buffer containing {}", bad);
        return Err(MatrixError::NotRepresentable {
            value: format!("-({})", bad),
            kind: T::KIND,
        });
    }
    for v in values.iter_mut() {
        *v = -*v;
    }
    Ok(())
}

macro_rules! negate_chunks {
    ($bytes:expr, $ty:ty, $kind:expr) => {{
        const WIDTH: usize = mem::size_of::<$ty>();
        let read = |chunk: &[u8]| {
            let mut raw = [0u8; WIDTH];
            raw.copy_from_slice(chunk);
            <$ty>::from_ne_bytes(raw)
        };
        if let Some(bad) = $bytes
            .chunks_exact(WIDTH)
            .map(read)
            .find(|v| v.checked_neg().is_none())
        {
            log::warn!("refusing to negate buffer containing {}", bad);
            return Err(MatrixError::NotRepresentable {
                value: format!("-({})", bad),
                kind: $kind,
            });
        }
        for chunk in $bytes.chunks_exact_mut(WIDTH) {
            let negated = -read(&*chunk);
            chunk.copy_from_slice(&negated.to_ne_bytes());
        }
    }};
}

/// Negate, in place, a raw byte buffer holding native-endian signed integers
/// of the given `kind`.
///
/// Fails with `TypeMismatch` when `kind` is not a signed integer kind or the
/// byte length is not a multiple of its width, and with `NotRepresentable`
/// when an element equals the kind's minimum. The buffer is unchanged on
/// failure. The bytes need not be aligned.
pub fn negate_ints_in_place_bytes(bytes: &mut [u8], kind: ElementKind) -> Result<()> {
    if !kind.is_signed_integer() {
        return Err(MatrixError::TypeMismatch {
            expected: "signed integer kind".to_string(),
            found: kind.to_string(),
        });
    }
    let width = kind.size_of();
    if bytes.len() % width != 0 {
        return Err(MatrixError::TypeMismatch {
            expected: format!("buffer length divisible by {} ({})", width, kind),
            found: format!("{} bytes", bytes.len()),
        });
    }

    log::trace!("negating {} {} values", bytes.len() / width, kind);
    match kind {
        ElementKind::Int8 => negate_chunks!(bytes, i8, kind),
        ElementKind::Int16 => negate_chunks!(bytes, i16, kind),
        ElementKind::Int32 => negate_chunks!(bytes, i32, kind),
        ElementKind::Int64 => negate_chunks!(bytes, i64, kind),
        _ => unreachable!("checked signed integer kind above"),
    }
    Ok(())
}
