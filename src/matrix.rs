use std::ops::{Index, IndexMut};

use crate::errors::{DimensionError, ShapeError, SliceError};
use crate::index_iterator::Indices;
use crate::iterators::{AxisIter, Iter};
use crate::layout::Layout;
use crate::nested::NestedList;
pub use crate::nested::Scalar;
use crate::slice_range::IntoSliceItems;

/// Storage for the elements of a matrix.
///
/// The storage determines the element type and whether the matrix owns or
/// borrows its elements.
pub trait Storage {
    type Elem;

    /// Return the stored elements.
    fn as_slice(&self) -> &[Self::Elem];
}

/// Storage which allows elements to be mutated.
pub trait StorageMut: Storage {
    fn as_mut_slice(&mut self) -> &mut [Self::Elem];
}

impl<T> Storage for Vec<T> {
    type Elem = T;

    fn as_slice(&self) -> &[T] {
        self
    }
}

impl<T> StorageMut for Vec<T> {
    fn as_mut_slice(&mut self) -> &mut [T] {
        self
    }
}

impl<'a, T> Storage for &'a [T] {
    type Elem = T;

    fn as_slice(&self) -> &[T] {
        self
    }
}

impl<'a, T> Storage for &'a mut [T] {
    type Elem = T;

    fn as_slice(&self) -> &[T] {
        self
    }
}

impl<'a, T> StorageMut for &'a mut [T] {
    fn as_mut_slice(&mut self) -> &mut [T] {
        self
    }
}

/// The base type for N-dimensional arrays.
///
/// A matrix combines a storage `S` with a [`Layout`] that maps indices to
/// offsets in the storage. The rank is fixed when the matrix is created;
/// matrices of a different rank are obtained as new values, by indexing
/// along an axis or slicing. This type is not normally used directly but
/// instead via one of the aliases which specify the data ownership:
/// [`Matrix`], [`MatrixView`] or [`MatrixViewMut`].
///
/// Views share the buffer of the matrix they are derived from: taking a
/// view copies no elements, only a layout addressing a subset of that
/// buffer.
#[derive(Clone)]
pub struct MatrixBase<S: Storage> {
    data: S,
    layout: Layout,
}

/// N-dimensional array which owns its elements, using a `Vec<T>` as the
/// backing storage.
pub type Matrix<T> = MatrixBase<Vec<T>>;

/// Borrowed view of a matrix.
pub type MatrixView<'a, T> = MatrixBase<&'a [T]>;

/// Mutably borrowed view of a matrix.
pub type MatrixViewMut<'a, T> = MatrixBase<&'a mut [T]>;

/// Trait for querying and non-destructively transforming a matrix,
/// implemented for owned matrices and views alike.
///
/// Methods which return a view borrow from `self`. When chaining
/// transformations on a [`MatrixView`], prefer the inherent methods of the
/// same names, which return views borrowing from the underlying buffer and
/// hence able to outlive the intermediate view.
pub trait AsView {
    type Elem;

    /// Return a borrowed view of this matrix.
    fn view(&self) -> MatrixView<'_, Self::Elem>;

    /// Return the layout describing this matrix's shape, strides and base
    /// offset.
    fn layout(&self) -> &Layout;

    /// Return the number of dimensions.
    fn ndim(&self) -> usize {
        self.layout().ndim()
    }

    /// Return the number of elements.
    fn len(&self) -> usize {
        self.layout().len()
    }

    /// Return true if the matrix has no elements.
    fn is_empty(&self) -> bool {
        self.layout().is_empty()
    }

    /// Return the size of each dimension.
    fn shape(&self) -> &[usize] {
        self.layout().shape()
    }

    /// Return the size of dimension `dim`.
    fn size(&self, dim: usize) -> usize {
        self.layout().size(dim)
    }

    /// Return the stride of each dimension.
    fn strides(&self) -> &[usize] {
        self.layout().strides()
    }

    /// Return the stride of dimension `dim`.
    fn stride(&self, dim: usize) -> usize {
        self.layout().stride(dim)
    }

    /// Return true if the logical order of elements matches the order in
    /// which they are stored.
    fn is_contiguous(&self) -> bool {
        self.layout().is_contiguous()
    }

    /// Return an iterator over all valid indices of this matrix.
    fn indices(&self) -> Indices {
        self.layout().indices()
    }

    /// Extract the shape as a static-length array. Panics if
    /// `self.ndim() != N`.
    fn dims<const N: usize>(&self) -> [usize; N] {
        self.layout().dims()
    }

    /// Fallible variant of [`dims`](AsView::dims).
    fn try_dims<const N: usize>(&self) -> Result<[usize; N], DimensionError> {
        self.layout().try_dims()
    }

    /// Return a reference to the element at a given index, or `None` if the
    /// index is out of bounds or has the wrong number of dimensions.
    fn get<I: AsRef<[usize]>>(&self, index: I) -> Option<&Self::Elem> {
        self.view().get(index)
    }

    /// Return the sole element if the matrix has exactly one.
    fn item(&self) -> Option<&Self::Elem> {
        self.view().item()
    }

    /// Return an iterator over elements in logical order.
    fn iter(&self) -> Iter<'_, Self::Elem> {
        self.view().iter()
    }

    /// Return an iterator over views formed by fixing `axis` to each of its
    /// valid indices in turn.
    ///
    /// Panics if `axis` is out of bounds.
    fn axis_iter(&self, axis: usize) -> AxisIter<'_, Self::Elem> {
        AxisIter::new(self.view(), axis)
    }

    /// Return a view with one dimension fewer, formed by fixing dimension
    /// `axis` to `index`.
    ///
    /// Panics if `axis` or `index` is out of bounds.
    fn index_axis(&self, axis: usize, index: usize) -> MatrixView<'_, Self::Elem> {
        self.view().index_axis(axis, index)
    }

    /// Fallible variant of [`index_axis`](AsView::index_axis).
    fn try_index_axis(
        &self,
        axis: usize,
        index: usize,
    ) -> Result<MatrixView<'_, Self::Elem>, SliceError> {
        self.view().try_index_axis(axis, index)
    }

    /// Return a view selected by a sequence of indices and/or ranges, one
    /// per dimension of `self`.
    ///
    /// Each index selector removes its dimension from the result; each
    /// range selector keeps its dimension, narrowed to the selected
    /// indices. Panics if the selectors are invalid for this matrix's
    /// shape.
    fn slice<I: IntoSliceItems>(&self, items: I) -> MatrixView<'_, Self::Elem> {
        self.view().slice(items)
    }

    /// Fallible variant of [`slice`](AsView::slice).
    fn try_slice<I: IntoSliceItems>(
        &self,
        items: I,
    ) -> Result<MatrixView<'_, Self::Elem>, SliceError> {
        self.view().try_slice(items)
    }

    /// Return the underlying elements as a slice, if the logical and stored
    /// element orders match.
    fn data(&self) -> Option<&[Self::Elem]> {
        self.view().data()
    }

    /// Return a copy of the elements in logical order.
    fn to_vec(&self) -> Vec<Self::Elem>
    where
        Self::Elem: Clone,
    {
        let view = self.view();
        if let Some(data) = view.data() {
            data.to_vec()
        } else {
            view.iter().cloned().collect()
        }
    }

    /// Return an owned copy of this matrix, with the same shape and a
    /// contiguous layout.
    fn to_matrix(&self) -> Matrix<Self::Elem>
    where
        Self::Elem: Clone,
    {
        MatrixBase {
            data: self.to_vec(),
            layout: Layout::from_shape(self.shape()),
        }
    }

    /// Return a new matrix of the same shape, with each element produced by
    /// applying `f` to the corresponding element of `self`.
    fn map<F, U>(&self, f: F) -> Matrix<U>
    where
        F: Fn(&Self::Elem) -> U,
    {
        let data: Vec<U> = self.view().iter().map(f).collect();
        MatrixBase {
            data,
            layout: Layout::from_shape(self.shape()),
        }
    }
}

impl<S: Storage> AsView for MatrixBase<S> {
    type Elem = S::Elem;

    fn view(&self) -> MatrixView<'_, S::Elem> {
        MatrixBase {
            data: self.data.as_slice(),
            layout: self.layout.clone(),
        }
    }

    fn layout(&self) -> &Layout {
        &self.layout
    }
}

/// Variants of [`AsView`] methods whose results borrow from the view's
/// underlying buffer rather than from the view itself.
impl<'a, T> MatrixView<'a, T> {
    pub fn get<I: AsRef<[usize]>>(&self, index: I) -> Option<&'a T> {
        let offset = self.layout.try_offset(index.as_ref())?;
        self.data.get(offset)
    }

    pub fn item(&self) -> Option<&'a T> {
        if self.layout.len() == 1 {
            self.iter().next()
        } else {
            None
        }
    }

    pub fn iter(&self) -> Iter<'a, T> {
        Iter::new(self.data, &self.layout)
    }

    pub fn axis_iter(&self, axis: usize) -> AxisIter<'a, T> {
        AxisIter::new(self.clone(), axis)
    }

    pub fn index_axis(&self, axis: usize, index: usize) -> MatrixView<'a, T> {
        MatrixBase {
            data: self.data,
            layout: self.layout.index_axis(axis, index),
        }
    }

    pub fn try_index_axis(
        &self,
        axis: usize,
        index: usize,
    ) -> Result<MatrixView<'a, T>, SliceError> {
        let layout = self.layout.try_index_axis(axis, index)?;
        Ok(MatrixBase {
            data: self.data,
            layout,
        })
    }

    pub fn slice<I: IntoSliceItems>(&self, items: I) -> MatrixView<'a, T> {
        let layout = self.layout.slice(items.into_slice_items().as_ref());
        MatrixBase {
            data: self.data,
            layout,
        }
    }

    pub fn try_slice<I: IntoSliceItems>(&self, items: I) -> Result<MatrixView<'a, T>, SliceError> {
        let layout = self.layout.try_slice(items.into_slice_items().as_ref())?;
        Ok(MatrixBase {
            data: self.data,
            layout,
        })
    }

    pub fn data(&self) -> Option<&'a [T]> {
        if !self.layout.is_contiguous() {
            return None;
        }
        let base = self.layout.base_offset();
        self.data.get(base..base + self.layout.len())
    }
}

impl<S: StorageMut> MatrixBase<S> {
    /// Return a mutable view of this matrix.
    pub fn view_mut(&mut self) -> MatrixViewMut<'_, S::Elem> {
        MatrixBase {
            data: self.data.as_mut_slice(),
            layout: self.layout.clone(),
        }
    }

    /// Return a mutable reference to the element at a given index, or
    /// `None` if the index is out of bounds or has the wrong number of
    /// dimensions.
    pub fn get_mut<I: AsRef<[usize]>>(&mut self, index: I) -> Option<&mut S::Elem> {
        let offset = self.layout.try_offset(index.as_ref())?;
        self.data.as_mut_slice().get_mut(offset)
    }

    /// Return a mutable reference to the sole element if the matrix has
    /// exactly one.
    pub fn item_mut(&mut self) -> Option<&mut S::Elem> {
        if self.layout.len() == 1 {
            // The sole element of a single-element layout is at the base
            // offset.
            let offset = self.layout.base_offset();
            self.data.as_mut_slice().get_mut(offset)
        } else {
            None
        }
    }

    /// Mutable variant of [`index_axis`](AsView::index_axis).
    pub fn index_axis_mut(&mut self, axis: usize, index: usize) -> MatrixViewMut<'_, S::Elem> {
        MatrixBase {
            layout: self.layout.index_axis(axis, index),
            data: self.data.as_mut_slice(),
        }
    }

    /// Fallible variant of [`index_axis_mut`](MatrixBase::index_axis_mut).
    pub fn try_index_axis_mut(
        &mut self,
        axis: usize,
        index: usize,
    ) -> Result<MatrixViewMut<'_, S::Elem>, SliceError> {
        let layout = self.layout.try_index_axis(axis, index)?;
        Ok(MatrixBase {
            data: self.data.as_mut_slice(),
            layout,
        })
    }

    /// Mutable variant of [`slice`](AsView::slice).
    pub fn slice_mut<I: IntoSliceItems>(&mut self, items: I) -> MatrixViewMut<'_, S::Elem> {
        let layout = self.layout.slice(items.into_slice_items().as_ref());
        MatrixBase {
            data: self.data.as_mut_slice(),
            layout,
        }
    }

    /// Fallible variant of [`slice_mut`](MatrixBase::slice_mut).
    pub fn try_slice_mut<I: IntoSliceItems>(
        &mut self,
        items: I,
    ) -> Result<MatrixViewMut<'_, S::Elem>, SliceError> {
        let layout = self.layout.try_slice(items.into_slice_items().as_ref())?;
        Ok(MatrixBase {
            data: self.data.as_mut_slice(),
            layout,
        })
    }

    /// Return the underlying elements as a mutable slice, if the logical
    /// and stored element orders match.
    pub fn data_mut(&mut self) -> Option<&mut [S::Elem]> {
        if !self.layout.is_contiguous() {
            return None;
        }
        let base = self.layout.base_offset();
        let len = self.layout.len();
        self.data.as_mut_slice().get_mut(base..base + len)
    }

    /// Set every element addressed by this matrix to `value`.
    pub fn fill(&mut self, value: S::Elem)
    where
        S::Elem: Clone,
    {
        if let Some(data) = self.data_mut() {
            data.fill(value);
            return;
        }
        for index in self.layout.indices() {
            let offset = self.layout.offset(&index);
            self.data.as_mut_slice()[offset] = value.clone();
        }
    }
}

impl<T> Matrix<T> {
    /// Construct a matrix from its shape and elements in logical
    /// (row-major) order.
    ///
    /// Fails if the shape has no dimensions or the element count does not
    /// match the product of the dimension sizes.
    pub fn try_from_data(shape: &[usize], data: Vec<T>) -> Result<Matrix<T>, ShapeError> {
        if shape.is_empty() {
            return Err(ShapeError::ZeroRank);
        }
        let layout = Layout::from_shape(shape);
        if layout.len() != data.len() {
            return Err(ShapeError::LengthMismatch);
        }
        Ok(MatrixBase { data, layout })
    }

    /// Variant of [`try_from_data`](Matrix::try_from_data) which panics if
    /// the shape and data are inconsistent.
    pub fn from_data(shape: &[usize], data: Vec<T>) -> Matrix<T> {
        Self::try_from_data(shape, data).unwrap_or_else(|err| panic!("{}", err))
    }

    /// Construct a matrix from a nested list literal, with one nesting
    /// level per dimension.
    ///
    /// The extents are derived from the lengths of the lists at each level,
    /// which must be consistent across the literal. Fails with
    /// [`ShapeError::Jagged`] if two lists at the same level have different
    /// lengths.
    pub fn try_from_nested<L: NestedList<T>>(list: L) -> Result<Matrix<T>, ShapeError> {
        let mut shape = vec![0; L::RANK];
        list.derive_extents(&mut shape)?;
        let layout = Layout::from_shape(&shape);
        let mut data = Vec::with_capacity(layout.len());
        list.flatten_into(&mut data);
        debug_assert_eq!(data.len(), layout.len());
        Ok(MatrixBase { data, layout })
    }

    /// Variant of [`try_from_nested`](Matrix::try_from_nested) which panics
    /// if the literal is jagged.
    pub fn from_nested<L: NestedList<T>>(list: L) -> Matrix<T> {
        Self::try_from_nested(list).unwrap_or_else(|err| panic!("{}", err))
    }

    /// Construct a matrix with a given shape and all elements set to
    /// `value`.
    pub fn full(shape: &[usize], value: T) -> Matrix<T>
    where
        T: Clone,
    {
        let len = shape.iter().product();
        Self::from_data(shape, vec![value; len])
    }

    /// Construct a matrix with a given shape and all elements set to the
    /// default value of `T`.
    pub fn zeros(shape: &[usize]) -> Matrix<T>
    where
        T: Clone + Default,
    {
        Self::full(shape, T::default())
    }

    /// Construct a matrix with a given shape, with each element produced
    /// by calling `f` with the element's index.
    pub fn from_fn<F: FnMut(&[usize]) -> T>(shape: &[usize], mut f: F) -> Matrix<T> {
        let layout = Layout::from_shape(shape);
        let data: Vec<T> = layout.indices().map(|index| f(&index)).collect();
        Self::from_data(shape, data)
    }

    /// Consume the matrix and return its elements in logical order.
    pub fn into_data(self) -> Vec<T> {
        // Owned matrices always have a contiguous root layout.
        self.data
    }
}

impl<T: Clone + Scalar> From<Vec<T>> for Matrix<T> {
    /// Construct a 1D matrix from a vector of elements.
    fn from(data: Vec<T>) -> Matrix<T> {
        let len = data.len();
        Matrix::from_data(&[len], data)
    }
}

impl<T: Clone + Scalar, const D0: usize> From<[T; D0]> for Matrix<T> {
    /// Construct a 1D matrix from an array of elements.
    fn from(data: [T; D0]) -> Matrix<T> {
        Matrix::from_data(&[D0], data.to_vec())
    }
}

impl<T: Clone + Scalar, const D0: usize, const D1: usize> From<[[T; D1]; D0]> for Matrix<T> {
    /// Construct a 2D matrix from a nested array of elements.
    fn from(data: [[T; D1]; D0]) -> Matrix<T> {
        let elts: Vec<T> = data.iter().flatten().cloned().collect();
        Matrix::from_data(&[D0, D1], elts)
    }
}

impl<T: Clone + Scalar, const D0: usize, const D1: usize, const D2: usize>
    From<[[[T; D2]; D1]; D0]> for Matrix<T>
{
    /// Construct a 3D matrix from a nested array of elements.
    fn from(data: [[[T; D2]; D1]; D0]) -> Matrix<T> {
        let elts: Vec<T> = data.iter().flatten().flatten().cloned().collect();
        Matrix::from_data(&[D0, D1, D2], elts)
    }
}

impl<S: Storage, I: AsRef<[usize]>> Index<I> for MatrixBase<S> {
    type Output = S::Elem;

    /// Return the element at a given index.
    ///
    /// Panics if the index is out of bounds or has the wrong number of
    /// dimensions.
    fn index(&self, index: I) -> &S::Elem {
        let offset = self.layout.offset(index.as_ref());
        &self.data.as_slice()[offset]
    }
}

impl<S: StorageMut, I: AsRef<[usize]>> IndexMut<I> for MatrixBase<S> {
    /// Return the element at a given index.
    ///
    /// Panics if the index is out of bounds or has the wrong number of
    /// dimensions.
    fn index_mut(&mut self, index: I) -> &mut S::Elem {
        let offset = self.layout.offset(index.as_ref());
        &mut self.data.as_mut_slice()[offset]
    }
}

impl<S: Storage, S2: Storage<Elem = S::Elem>> PartialEq<MatrixBase<S2>> for MatrixBase<S>
where
    S::Elem: PartialEq,
{
    /// Return true if `other` has the same shape and elements, in logical
    /// order, as this matrix. Strides and base offsets are not compared.
    fn eq(&self, other: &MatrixBase<S2>) -> bool {
        self.shape() == other.shape() && self.iter().eq(other.iter())
    }
}
