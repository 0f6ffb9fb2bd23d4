//! Iterators over the elements and subviews of a matrix.

use crate::index_iterator::Indices;
use crate::layout::Layout;
use crate::matrix::{AsView, MatrixView};

/// Iterator over the elements of a matrix, in logical (row-major) order.
///
/// Elements are visited in the order produced by iterating over the last
/// dimension's indices fastest, regardless of how the view's elements are
/// arranged in the underlying buffer.
pub struct Iter<'a, T> {
    data: &'a [T],
    layout: Layout,
    indices: Indices,
}

impl<'a, T> Iter<'a, T> {
    pub(crate) fn new(data: &'a [T], layout: &Layout) -> Iter<'a, T> {
        debug_assert!(
            data.len() >= layout.min_data_len(),
            "data length {} is too short for layout",
            data.len()
        );
        Iter {
            data,
            layout: layout.clone(),
            indices: layout.indices(),
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        let index = self.indices.next()?;
        // Indices produced by the layout are always in bounds for it.
        let offset = self.layout.offset(&index);
        Some(&self.data[offset])
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.indices.size_hint()
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> std::iter::FusedIterator for Iter<'_, T> {}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Iter {
            data: self.data,
            layout: self.layout.clone(),
            indices: self.indices.clone(),
        }
    }
}

/// Iterator over views of a matrix obtained by fixing one axis to each of
/// its valid indices in turn.
///
/// Each view has one dimension fewer than the source.
pub struct AxisIter<'a, T> {
    view: MatrixView<'a, T>,
    axis: usize,
    index: usize,
}

impl<'a, T> AxisIter<'a, T> {
    pub(crate) fn new(view: MatrixView<'a, T>, axis: usize) -> AxisIter<'a, T> {
        assert!(axis < view.layout().ndim(), "axis is out of bounds");
        AxisIter {
            view,
            axis,
            index: 0,
        }
    }
}

impl<'a, T> Iterator for AxisIter<'a, T> {
    type Item = MatrixView<'a, T>;

    fn next(&mut self) -> Option<MatrixView<'a, T>> {
        if self.index >= self.view.layout().size(self.axis) {
            None
        } else {
            let view = self.view.index_axis(self.axis, self.index);
            self.index += 1;
            Some(view)
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.view.layout().size(self.axis) - self.index;
        (remaining, Some(remaining))
    }
}

impl<T> ExactSizeIterator for AxisIter<'_, T> {}

impl<T> std::iter::FusedIterator for AxisIter<'_, T> {}

impl<T> Clone for AxisIter<'_, T> {
    fn clone(&self) -> Self {
        AxisIter {
            view: self.view.clone(),
            axis: self.axis,
            index: self.index,
        }
    }
}
