use std::iter::zip;

use smallvec::{smallvec, SmallVec};

use crate::errors::{DimensionError, SliceError};
use crate::index_iterator::Indices;
use crate::slice_range::SliceItem;

/// Defines the valid indices for an N-dimensional array and how to map them
/// to offsets in a linear buffer.
///
/// A layout records a base offset, the size of each dimension (the _shape_)
/// and the stride (gap) between offsets in each dimension. The dimension
/// count is fixed when the layout is created: layouts of a different rank
/// are only ever obtained as new values, by indexing along an axis
/// ([`index_axis`](Layout::index_axis)) or slicing
/// ([`slice`](Layout::slice)). A layout created by
/// [`from_shape`](Layout::from_shape) is a _root_ layout: its base offset is
/// zero and its strides are the canonical row-major strides for the shape.
/// Derived layouts inherit and transform the strides of their parent rather
/// than recomputing them, which is what allows a sliced view to keep
/// addressing the original buffer.
#[derive(Clone, Debug, PartialEq)]
pub struct Layout {
    /// Flat offset of the element at index `[0, 0, ..., 0]`.
    base: usize,

    /// Array of dimension sizes followed by the corresponding dimension
    /// strides.
    ///
    /// Since we always have the same number of stride and shape dims, these
    /// are combined into one array to avoid redundantly storing separate
    /// lengths for each.
    shape_and_strides: SmallVec<[usize; 8]>,
}

impl Layout {
    /// Construct a root layout with dimension sizes given by `shape`,
    /// a base offset of zero and canonical row-major strides.
    pub fn from_shape(shape: &[usize]) -> Layout {
        Layout {
            base: 0,
            shape_and_strides: Self::contiguous_shape_and_strides(shape),
        }
    }

    /// Return the number of dimensions.
    #[inline]
    pub fn ndim(&self) -> usize {
        self.shape_and_strides.len() / 2
    }

    /// Return the number of elements in the array described by this layout.
    pub fn len(&self) -> usize {
        self.shape().iter().product()
    }

    /// Return true if the layout describes no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Return the sizes of each dimension.
    #[inline]
    pub fn shape(&self) -> &[usize] {
        &self.shape_and_strides[0..self.ndim()]
    }

    /// Return the size of dimension `dim`.
    #[inline]
    pub fn size(&self, dim: usize) -> usize {
        self.shape_and_strides[dim]
    }

    /// Return the stride (offset between elements) of each dimension.
    #[inline]
    pub fn strides(&self) -> &[usize] {
        &self.shape_and_strides[self.ndim()..]
    }

    /// Return the stride for a specific dimension.
    #[inline]
    pub fn stride(&self, dim: usize) -> usize {
        self.shape_and_strides[self.ndim() + dim]
    }

    /// Return the flat offset of the element at index `[0, 0, ..., 0]`.
    #[inline]
    pub fn base_offset(&self) -> usize {
        self.base
    }

    /// Map an index to a storage offset, or return `None` if the index has
    /// the wrong number of dimensions or is out of bounds along any
    /// dimension.
    #[inline]
    pub fn try_offset(&self, index: &[usize]) -> Option<usize> {
        let shape = self.shape();
        let strides = self.strides();
        let mut valid = index.len() == shape.len();
        let mut offset = self.base;
        for (idx, (size, stride)) in index.iter().zip(shape.iter().zip(strides.iter())) {
            valid = valid && idx < size;
            offset += idx * stride;
        }
        valid.then_some(offset)
    }

    /// Map an index to a storage offset.
    ///
    /// Panics if the index is out of bounds or has the wrong number of
    /// dimensions.
    #[inline]
    pub fn offset(&self, index: &[usize]) -> usize {
        self.try_offset(index).unwrap_or_else(|| {
            panic!(
                "index {:?} out of bounds for shape {:?}",
                index,
                self.shape()
            );
        })
    }

    /// Return the minimum length required for the element data buffer used
    /// with this layout.
    pub fn min_data_len(&self) -> usize {
        if self.shape().iter().any(|&size| size == 0) {
            return 0;
        }
        let max_offset: usize = zip(self.shape().iter(), self.strides().iter())
            .map(|(size, stride)| (size - 1) * stride)
            .sum();
        self.base + max_offset + 1
    }

    /// Return true if this layout's strides are the canonical row-major
    /// strides for its shape, ie. the logical order of elements matches
    /// the order in which they are stored.
    pub fn is_contiguous(&self) -> bool {
        let mut product = 1;
        for (&size, &stride) in zip(self.shape().iter(), self.strides().iter()).rev() {
            if stride != product {
                return false;
            }
            product *= size;
        }
        true
    }

    /// Return an iterator over all valid indices in this layout.
    pub fn indices(&self) -> Indices {
        Indices::from_shape(self.shape())
    }

    /// Compute the layout obtained by fixing dimension `axis` to `index`.
    ///
    /// The result has one dimension fewer than `self`. The remaining
    /// dimensions keep their relative order and their strides; the base
    /// offset advances by `index * self.stride(axis)`.
    pub fn try_index_axis(&self, axis: usize, index: usize) -> Result<Layout, SliceError> {
        if axis >= self.ndim() {
            return Err(SliceError::InvalidAxis);
        }
        if index >= self.size(axis) {
            return Err(SliceError::InvalidIndex);
        }

        let ndim = self.ndim();
        let mut shape_and_strides = SmallVec::with_capacity((ndim - 1) * 2);
        for (dim, &size) in self.shape().iter().enumerate() {
            if dim != axis {
                shape_and_strides.push(size);
            }
        }
        for (dim, &stride) in self.strides().iter().enumerate() {
            if dim != axis {
                shape_and_strides.push(stride);
            }
        }

        Ok(Layout {
            base: self.base + index * self.stride(axis),
            shape_and_strides,
        })
    }

    /// Variant of [`try_index_axis`](Layout::try_index_axis) which panics if
    /// `axis` or `index` is out of bounds.
    pub fn index_axis(&self, axis: usize, index: usize) -> Layout {
        match self.try_index_axis(axis, index) {
            Ok(layout) => layout,
            Err(SliceError::InvalidAxis) => {
                panic!("axis {} out of bounds for {} dims", axis, self.ndim())
            }
            Err(_) => panic!(
                "index {} out of bounds for axis {} of size {}",
                index,
                axis,
                self.size(axis)
            ),
        }
    }

    /// Compute the layout of a view selected from this layout by `items`.
    ///
    /// There must be exactly one selector per dimension. Each
    /// [`SliceItem::Index`] selector drops its dimension from the result and
    /// advances the base offset; each [`SliceItem::Range`] selector keeps
    /// its dimension, narrowed to the selected start/step/length. The rank
    /// of the result therefore equals the number of range selectors, and
    /// retained dimensions preserve their order from `self`.
    ///
    /// A range may start anywhere up to and including the dimension's size.
    /// A start equal to the size selects an empty dimension; a start beyond
    /// it, or an explicit length that exceeds the indices reachable from the
    /// start, is an error.
    pub fn try_slice(&self, items: &[SliceItem]) -> Result<Layout, SliceError> {
        if items.len() != self.ndim() {
            return Err(SliceError::WrongDimCount);
        }

        let out_dims = items
            .iter()
            .filter(|item| matches!(item, SliceItem::Range(_)))
            .count();
        let mut shape_and_strides = smallvec![0; out_dims * 2];
        let mut base = self.base;
        let mut out_dim = 0;

        for (dim, item) in items.iter().enumerate() {
            let size = self.size(dim);
            let stride = self.stride(dim);

            match *item {
                SliceItem::Index(idx) => {
                    if idx >= size {
                        return Err(SliceError::InvalidIndex);
                    }
                    base += idx * stride;
                }
                SliceItem::Range(range) => {
                    if range.step == 0 {
                        return Err(SliceError::InvalidStep);
                    }
                    if range.start > size {
                        return Err(SliceError::InvalidRange);
                    }
                    let max_steps = range.steps(size);
                    let new_size = match range.len {
                        None => max_steps,
                        Some(len) if len <= max_steps => len,
                        Some(_) => return Err(SliceError::InvalidRange),
                    };
                    base += range.start * stride;
                    shape_and_strides[out_dim] = new_size;
                    shape_and_strides[out_dims + out_dim] = range.step * stride;
                    out_dim += 1;
                }
            }
        }

        Ok(Layout {
            base,
            shape_and_strides,
        })
    }

    /// Variant of [`try_slice`](Layout::try_slice) which panics if the
    /// selectors are invalid for the current layout.
    pub fn slice(&self, items: &[SliceItem]) -> Layout {
        match self.try_slice(items) {
            Ok(layout) => layout,
            Err(SliceError::InvalidIndex) => panic!("slice index is invalid for matrix shape"),
            Err(SliceError::InvalidRange) => panic!("slice range is invalid for matrix shape"),
            Err(SliceError::InvalidStep) => panic!("cannot slice with zero step"),
            Err(err) => panic!("{:?}", err),
        }
    }

    /// Extract the shape as a static-length array. Fails if
    /// `self.ndim() != N`.
    pub fn try_dims<const N: usize>(&self) -> Result<[usize; N], DimensionError> {
        self.shape().try_into().map_err(|_| DimensionError {})
    }

    /// Variant of [`try_dims`](Layout::try_dims) which panics if
    /// `self.ndim() != N`.
    pub fn dims<const N: usize>(&self) -> [usize; N] {
        self.try_dims().unwrap_or_else(|_| {
            panic!(
                "cannot extract {} dim matrix as {} dim array",
                self.ndim(),
                N
            )
        })
    }

    /// Create a shape-and-strides array for a contiguous layout.
    fn contiguous_shape_and_strides(shape: &[usize]) -> SmallVec<[usize; 8]> {
        let mut strides_and_shape: SmallVec<[usize; 8]> = SmallVec::from_slice(shape);
        strides_and_shape.resize(shape.len() * 2, 0);
        let mut stride = 1;
        for i in (0..shape.len()).rev() {
            strides_and_shape[shape.len() + i] = stride;
            stride *= shape[i];
        }
        strides_and_shape
    }
}

#[cfg(test)]
mod tests {
    use ndmatrix_testing::TestCases;

    use super::Layout;
    use crate::errors::SliceError;
    use crate::slice_range::{to_slice_items, SliceItem, SliceRange};

    #[test]
    fn test_from_shape() {
        let layout = Layout::from_shape(&[2, 4, 8]);
        assert_eq!(layout.ndim(), 3);
        assert_eq!(layout.shape(), [2, 4, 8]);
        assert_eq!(layout.strides(), [32, 8, 1]);
        assert_eq!(layout.base_offset(), 0);
        assert_eq!(layout.len(), 64);
        assert!(layout.is_contiguous());
    }

    #[test]
    fn test_from_shape_empty_dim() {
        let layout = Layout::from_shape(&[3, 0, 2]);
        assert_eq!(layout.len(), 0);
        assert!(layout.is_empty());
        assert_eq!(layout.min_data_len(), 0);
    }

    #[test]
    fn test_size_stride() {
        let layout = Layout::from_shape(&[10, 20, 30]);
        for (dim, (&size, &stride)) in layout
            .shape()
            .iter()
            .zip(layout.strides().iter())
            .enumerate()
        {
            assert_eq!(layout.size(dim), size);
            assert_eq!(layout.stride(dim), stride);
        }
    }

    #[test]
    fn test_try_offset() {
        #[derive(Debug)]
        struct Case<'a> {
            shape: &'a [usize],
            index: &'a [usize],
            offset: Option<usize>,
        }

        let cases = [
            Case {
                shape: &[2, 3],
                index: &[0, 0],
                offset: Some(0),
            },
            Case {
                shape: &[2, 3],
                index: &[1, 2],
                offset: Some(5),
            },
            // Out of bounds along one dimension.
            Case {
                shape: &[2, 3],
                index: &[2, 0],
                offset: None,
            },
            // Wrong number of index dimensions.
            Case {
                shape: &[2, 3],
                index: &[1],
                offset: None,
            },
            Case {
                shape: &[2, 3],
                index: &[1, 2, 0],
                offset: None,
            },
        ];

        cases.test_each(|case| {
            let layout = Layout::from_shape(case.shape);
            assert_eq!(layout.try_offset(case.index), case.offset);
        })
    }

    #[test]
    fn test_offset_corners() {
        // First and last elements of a root layout bracket the buffer.
        let layout = Layout::from_shape(&[2, 3, 4]);
        assert_eq!(layout.offset(&[0, 0, 0]), layout.base_offset());
        assert_eq!(
            layout.offset(&[1, 2, 3]),
            layout.base_offset() + layout.len() - 1
        );
    }

    #[test]
    #[should_panic(expected = "out of bounds for shape")]
    fn test_offset_invalid() {
        let layout = Layout::from_shape(&[2, 3]);
        layout.offset(&[0, 3]);
    }

    #[test]
    fn test_index_axis() {
        #[derive(Debug)]
        struct Case<'a> {
            shape: &'a [usize],
            axis: usize,
            index: usize,
            expected_shape: &'a [usize],
            expected_strides: &'a [usize],
            expected_base: usize,
        }

        let cases = [
            Case {
                shape: &[2, 3],
                axis: 0,
                index: 1,
                expected_shape: &[3],
                expected_strides: &[1],
                expected_base: 3,
            },
            Case {
                shape: &[2, 3],
                axis: 1,
                index: 2,
                expected_shape: &[2],
                expected_strides: &[3],
                expected_base: 2,
            },
            Case {
                shape: &[2, 3, 4],
                axis: 1,
                index: 1,
                expected_shape: &[2, 4],
                expected_strides: &[12, 1],
                expected_base: 4,
            },
        ];

        cases.test_each(|case| {
            let layout = Layout::from_shape(case.shape);
            let row = layout.index_axis(case.axis, case.index);
            assert_eq!(row.shape(), case.expected_shape);
            assert_eq!(row.strides(), case.expected_strides);
            assert_eq!(row.base_offset(), case.expected_base);
            assert_eq!(row.len(), case.expected_shape.iter().product::<usize>());
        })
    }

    #[test]
    fn test_index_axis_removes_each_dim() {
        // `index_axis(d, i)` must keep the remaining dims in their original
        // relative order, for every choice of `d` and `i`.
        let shape = [2, 3, 4];
        let layout = Layout::from_shape(&shape);
        for axis in 0..shape.len() {
            let mut expected: Vec<usize> = shape.to_vec();
            expected.remove(axis);
            for index in 0..shape[axis] {
                let row = layout.try_index_axis(axis, index).unwrap();
                assert_eq!(row.shape(), expected);
            }
        }
    }

    #[test]
    fn test_try_index_axis_invalid() {
        let layout = Layout::from_shape(&[2, 3]);
        assert_eq!(
            layout.try_index_axis(2, 0),
            Err(SliceError::InvalidAxis)
        );
        assert_eq!(
            layout.try_index_axis(1, 3),
            Err(SliceError::InvalidIndex)
        );
    }

    #[test]
    fn test_try_slice() {
        #[derive(Debug)]
        struct Case<'a> {
            shape: &'a [usize],
            items: Vec<SliceItem>,
            expected: Result<(usize, Vec<usize>, Vec<usize>), SliceError>,
        }

        let cases = [
            // Narrow one dimension of a 2x3 matrix: base advances by 1,
            // strides are inherited.
            Case {
                shape: &[2, 3],
                items: vec![
                    SliceItem::full_range(),
                    SliceItem::Range(SliceRange::new(1, Some(2), 1)),
                ],
                expected: Ok((1, vec![2, 2], vec![3, 1])),
            },
            // Full-range selectors on every dimension reproduce the source.
            Case {
                shape: &[2, 3],
                items: vec![SliceItem::full_range(), SliceItem::full_range()],
                expected: Ok((0, vec![2, 3], vec![3, 1])),
            },
            // Pick on the first dimension drops it.
            Case {
                shape: &[2, 3],
                items: vec![SliceItem::Index(1), SliceItem::full_range()],
                expected: Ok((3, vec![3], vec![1])),
            },
            // Step of 2 over an extent of 5 keeps indices 0, 2, 4.
            Case {
                shape: &[5],
                items: vec![SliceItem::range(0, None, 2)],
                expected: Ok((0, vec![3], vec![2])),
            },
            // Stepped range with explicit start.
            Case {
                shape: &[6],
                items: vec![SliceItem::range(1, None, 2)],
                expected: Ok((1, vec![3], vec![2])),
            },
            // Pick everything: result is a rank-0 layout addressing one
            // element.
            Case {
                shape: &[2, 3],
                items: vec![SliceItem::Index(1), SliceItem::Index(2)],
                expected: Ok((5, vec![], vec![])),
            },
            // Too few selectors.
            Case {
                shape: &[2, 3],
                items: vec![SliceItem::Index(0)],
                expected: Err(SliceError::WrongDimCount),
            },
            // Too many selectors.
            Case {
                shape: &[2, 3],
                items: vec![SliceItem::Index(0); 3],
                expected: Err(SliceError::WrongDimCount),
            },
            // Pick out of bounds.
            Case {
                shape: &[2, 3],
                items: vec![SliceItem::Index(2), SliceItem::full_range()],
                expected: Err(SliceError::InvalidIndex),
            },
            // Range start beyond the extent.
            Case {
                shape: &[2, 3],
                items: vec![
                    SliceItem::full_range(),
                    SliceItem::range(4, None, 1),
                ],
                expected: Err(SliceError::InvalidRange),
            },
            // Range start at the extent selects an empty dimension.
            Case {
                shape: &[2, 3],
                items: vec![
                    SliceItem::full_range(),
                    SliceItem::range(3, None, 1),
                ],
                expected: Ok((3, vec![2, 0], vec![3, 1])),
            },
            // Explicit length that extends beyond the extent.
            Case {
                shape: &[2, 3],
                items: vec![
                    SliceItem::full_range(),
                    SliceItem::range(1, Some(3), 1),
                ],
                expected: Err(SliceError::InvalidRange),
            },
            // Zero step.
            Case {
                shape: &[2, 3],
                items: vec![
                    SliceItem::full_range(),
                    SliceItem::range(0, None, 0),
                ],
                expected: Err(SliceError::InvalidStep),
            },
        ];

        cases.test_each(|case| {
            let layout = Layout::from_shape(case.shape);
            let result = layout.try_slice(&case.items).map(|sliced| {
                (
                    sliced.base_offset(),
                    sliced.shape().to_vec(),
                    sliced.strides().to_vec(),
                )
            });
            assert_eq!(result, case.expected);
        })
    }

    #[test]
    fn test_slice_full_range_is_identity() {
        let layout = Layout::from_shape(&[2, 3, 4]);
        let items: Vec<SliceItem> = layout.shape().iter().map(|_| SliceItem::full_range()).collect();
        assert_eq!(layout.try_slice(&items).unwrap(), layout);
    }

    #[test]
    fn test_slice_pick_matches_index_axis() {
        // A single pick via `slice` must agree with `index_axis` on the
        // relative ordering of the retained dims, for every axis.
        let layout = Layout::from_shape(&[2, 3, 4]);
        for axis in 0..layout.ndim() {
            let items: Vec<SliceItem> = (0..layout.ndim())
                .map(|dim| {
                    if dim == axis {
                        SliceItem::Index(1)
                    } else {
                        SliceItem::full_range()
                    }
                })
                .collect();
            let sliced = layout.try_slice(&items).unwrap();
            let row = layout.try_index_axis(axis, 1).unwrap();
            assert_eq!(sliced, row);
        }
    }

    #[test]
    fn test_slice_all_picks_matches_offset() {
        let layout = Layout::from_shape(&[2, 3, 4]);
        for index in layout.indices() {
            let items = to_slice_items(&index);
            let sliced = layout.try_slice(&items).unwrap();
            assert_eq!(sliced.ndim(), 0);
            assert_eq!(sliced.len(), 1);
            assert_eq!(sliced.base_offset(), layout.offset(&index));
        }
    }

    #[test]
    fn test_slice_of_slice() {
        // Slicing a non-root layout composes offsets and strides.
        let layout = Layout::from_shape(&[4, 6]);
        let outer = layout
            .try_slice(&[SliceItem::range(1, None, 2), SliceItem::range(0, None, 3)])
            .unwrap();
        assert_eq!(outer.shape(), [2, 2]);
        assert_eq!(outer.strides(), [12, 3]);
        assert_eq!(outer.base_offset(), 6);

        let inner = outer
            .try_slice(&[SliceItem::Index(1), SliceItem::range(1, None, 1)])
            .unwrap();
        assert_eq!(inner.shape(), [1]);
        assert_eq!(inner.strides(), [3]);
        assert_eq!(inner.base_offset(), 6 + 12 + 3);
    }

    #[test]
    #[should_panic(expected = "slice index is invalid for matrix shape")]
    fn test_slice_invalid_index() {
        let layout = Layout::from_shape(&[3, 5]);
        layout.slice(&[SliceItem::Index(4), SliceItem::Index(0)]);
    }

    #[test]
    #[should_panic(expected = "slice range is invalid for matrix shape")]
    fn test_slice_invalid_range() {
        let layout = Layout::from_shape(&[3, 5]);
        layout.slice(&[SliceItem::range(4, None, 1), SliceItem::Index(0)]);
    }

    #[test]
    #[should_panic(expected = "cannot slice with zero step")]
    fn test_slice_zero_step() {
        let layout = Layout::from_shape(&[3, 5]);
        layout.slice(&[SliceItem::full_range(), SliceItem::range(0, None, 0)]);
    }

    #[test]
    fn test_min_data_len() {
        let layout = Layout::from_shape(&[2, 3]);
        assert_eq!(layout.min_data_len(), 6);

        // A stepped slice addresses a sparse subset of the parent buffer.
        let sliced = layout
            .try_slice(&[SliceItem::full_range(), SliceItem::range(0, None, 2)])
            .unwrap();
        assert_eq!(sliced.shape(), [2, 2]);
        assert_eq!(sliced.min_data_len(), 6);
    }

    #[test]
    fn test_dims() {
        let layout = Layout::from_shape(&[2, 3]);
        let [rows, cols] = layout.dims();
        assert_eq!(rows, 2);
        assert_eq!(cols, 3);
        assert!(layout.try_dims::<3>().is_err());
    }

    #[test]
    #[should_panic(expected = "cannot extract 2 dim matrix as 3 dim array")]
    fn test_dims_invalid() {
        let layout = Layout::from_shape(&[2, 3]);
        layout.dims::<3>();
    }
}
