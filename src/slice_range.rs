use smallvec::SmallVec;

use std::fmt::Debug;
use std::ops::{Range, RangeFrom, RangeFull, RangeTo};

/// Specifies a subset of a dimension to include when slicing a matrix or view.
///
/// Can be constructed from an index or range using `index_or_range.into()`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SliceItem {
    /// Extract a specific index from a dimension.
    ///
    /// The number of dimensions in the sliced view will be one minus the
    /// number of dimensions sliced with an index.
    Index(usize),

    /// Include a subset of the range of the dimension.
    Range(SliceRange),
}

impl SliceItem {
    /// Return a SliceItem that keeps the full range of a dimension.
    #[inline]
    pub fn full_range() -> Self {
        (..).into()
    }

    /// Return a SliceItem that extracts part of an axis.
    #[inline]
    pub fn range(start: usize, len: Option<usize>, step: usize) -> SliceItem {
        SliceItem::Range(SliceRange::new(start, len, step))
    }
}

// This conversion exists to avoid ambiguity when slicing a matrix with a
// numeric literal of unspecified type (eg. `matrix.slice((0, 0))`). In this
// case it is ambiguous which `SliceItem::from` should be used, but the i32
// case is used if it exists.
impl From<i32> for SliceItem {
    #[inline]
    fn from(value: i32) -> Self {
        assert!(value >= 0, "slice index must be non-negative");
        SliceItem::Index(value as usize)
    }
}

impl From<isize> for SliceItem {
    #[inline]
    fn from(value: isize) -> Self {
        assert!(value >= 0, "slice index must be non-negative");
        SliceItem::Index(value as usize)
    }
}

impl From<usize> for SliceItem {
    #[inline]
    fn from(value: usize) -> Self {
        SliceItem::Index(value)
    }
}

impl<R> From<R> for SliceItem
where
    R: Into<SliceRange>,
{
    fn from(value: R) -> Self {
        SliceItem::Range(value.into())
    }
}

/// A range selector for slicing one dimension of a matrix or view.
///
/// This extends [`Range`] with a step between selected indices and with an
/// optional length: a range with `len: None` spans from `start` to the end
/// of whatever dimension it is applied to.
///
/// A `SliceRange` carries no validation of its own. It is only meaningful
/// once applied to a dimension, and all checks (start within the extent, a
/// non-zero step, a length that fits) happen at that point. See
/// [`Layout::try_slice`](crate::Layout::try_slice).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SliceRange {
    /// First index selected by this range.
    pub start: usize,

    /// Number of elements selected, or None if the range extends to the end
    /// of the dimension.
    pub len: Option<usize>,

    /// The step between adjacent indices selected by this range.
    pub step: usize,
}

impl SliceRange {
    /// Create a new range which selects `len` elements starting at `start`,
    /// stepping by `step`. If `len` is None the range spans to the end of
    /// the dimension it is applied to.
    #[inline]
    pub fn new(start: usize, len: Option<usize>, step: usize) -> SliceRange {
        SliceRange { start, len, step }
    }

    /// Return the number of indices reachable from `start`, advancing by
    /// `step`, within a dimension of size `dim_size`. This includes the
    /// case where `step` divides the remainder evenly, and is zero when
    /// `start` is at or beyond the end of the dimension.
    ///
    /// An explicit `len` is not consulted;
    /// [`Layout::try_slice`](crate::Layout::try_slice) validates an
    /// explicit length against this value when the range is applied.
    /// Panics if `self.step` is zero.
    pub fn steps(&self, dim_size: usize) -> usize {
        dim_size.saturating_sub(self.start).div_ceil(self.step)
    }
}

impl<T> From<Range<T>> for SliceRange
where
    T: TryInto<usize>,
    <T as TryInto<usize>>::Error: Debug,
{
    fn from(r: Range<T>) -> SliceRange {
        let start = r.start.try_into().unwrap();
        let end: usize = r.end.try_into().unwrap();
        SliceRange::new(start, Some(end.saturating_sub(start)), 1)
    }
}

impl<T> From<RangeTo<T>> for SliceRange
where
    T: TryInto<usize>,
    <T as TryInto<usize>>::Error: Debug,
{
    fn from(r: RangeTo<T>) -> SliceRange {
        SliceRange::new(0, Some(r.end.try_into().unwrap()), 1)
    }
}

impl<T> From<RangeFrom<T>> for SliceRange
where
    T: TryInto<usize>,
    <T as TryInto<usize>>::Error: Debug,
{
    fn from(r: RangeFrom<T>) -> SliceRange {
        SliceRange::new(r.start.try_into().unwrap(), None, 1)
    }
}

impl From<RangeFull> for SliceRange {
    #[inline]
    fn from(_: RangeFull) -> SliceRange {
        SliceRange::new(0, None, 1)
    }
}

/// Used to convert sequences of indices and/or ranges into a uniform
/// `[SliceItem]` array that can be used to slice a matrix.
///
/// This trait is implemented for:
///
///  - Individual indices and ranges (types satisfying `Into<SliceItem>`)
///  - Arrays of indices or ranges
///  - Tuples of indices and/or ranges
///  - `[SliceItem]` slices
///
/// Ranges can be specified using regular Rust ranges (eg. `start..end`,
/// `start..`, `..end`, `..`) or a [`SliceRange`], which extends regular Rust
/// ranges with support for a step between selected indices.
pub trait IntoSliceItems {
    type Array: AsRef<[SliceItem]>;

    fn into_slice_items(self) -> Self::Array;
}

impl<'a> IntoSliceItems for &'a [SliceItem] {
    type Array = &'a [SliceItem];

    fn into_slice_items(self) -> &'a [SliceItem] {
        self
    }
}

impl<const N: usize, T: Into<SliceItem>> IntoSliceItems for [T; N] {
    type Array = [SliceItem; N];

    fn into_slice_items(self) -> [SliceItem; N] {
        self.map(|x| x.into())
    }
}

impl<T: Into<SliceItem>> IntoSliceItems for T {
    type Array = [SliceItem; 1];

    fn into_slice_items(self) -> [SliceItem; 1] {
        [self.into()]
    }
}

impl<T1: Into<SliceItem>> IntoSliceItems for (T1,) {
    type Array = [SliceItem; 1];

    fn into_slice_items(self) -> [SliceItem; 1] {
        [self.0.into()]
    }
}

impl<T1: Into<SliceItem>, T2: Into<SliceItem>> IntoSliceItems for (T1, T2) {
    type Array = [SliceItem; 2];

    fn into_slice_items(self) -> [SliceItem; 2] {
        [self.0.into(), self.1.into()]
    }
}

impl<T1: Into<SliceItem>, T2: Into<SliceItem>, T3: Into<SliceItem>> IntoSliceItems
    for (T1, T2, T3)
{
    type Array = [SliceItem; 3];

    fn into_slice_items(self) -> [SliceItem; 3] {
        [self.0.into(), self.1.into(), self.2.into()]
    }
}

impl<T1: Into<SliceItem>, T2: Into<SliceItem>, T3: Into<SliceItem>, T4: Into<SliceItem>>
    IntoSliceItems for (T1, T2, T3, T4)
{
    type Array = [SliceItem; 4];

    fn into_slice_items(self) -> [SliceItem; 4] {
        [self.0.into(), self.1.into(), self.2.into(), self.3.into()]
    }
}

impl<
        T1: Into<SliceItem>,
        T2: Into<SliceItem>,
        T3: Into<SliceItem>,
        T4: Into<SliceItem>,
        T5: Into<SliceItem>,
    > IntoSliceItems for (T1, T2, T3, T4, T5)
{
    type Array = [SliceItem; 5];

    fn into_slice_items(self) -> [SliceItem; 5] {
        [
            self.0.into(),
            self.1.into(),
            self.2.into(),
            self.3.into(),
            self.4.into(),
        ]
    }
}

/// Dynamically sized array of [`SliceItem`]s, which avoids allocating in the
/// common case where the length is small.
pub type DynSliceItems = SmallVec<[SliceItem; 5]>;

/// Convert a slice of indices into [`SliceItem`]s.
///
/// To convert indices of a statically known length to [`SliceItem`]s, use
/// [`IntoSliceItems`] instead. This function is for the case when the length
/// is not statically known, but is assumed to likely be small.
pub fn to_slice_items<T: Clone + Into<SliceItem>>(index: &[T]) -> DynSliceItems {
    index.iter().map(|x| x.clone().into()).collect()
}
