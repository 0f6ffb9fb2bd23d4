//! ndmatrix provides N-dimensional arrays with constant-time element access
//! and copy-free slicing.
//!
//! # Storage and layout
//!
//! A matrix is a combination of data storage and a [`Layout`]. The storage
//! determines the element type and how the data is owned. A matrix can be:
//!
//! - Owned (like `Vec<T>`)
//! - Borrowed (like `&[T]` or `&mut [T]`)
//!
//! The layout determines the number of dimensions (the _rank_), the size of
//! each (the _shape_) and how indices map to offsets in the storage. The
//! rank is fixed when a matrix is created; matrices of a different rank are
//! obtained as new values by indexing or slicing.
//!
//! # Matrix types and traits
//!
//! The base type for all matrices is [`MatrixBase`]. This is not normally
//! used directly but instead via a type alias which specifies the data
//! ownership: [`Matrix`] (owned), [`MatrixView`] (borrowed) or
//! [`MatrixViewMut`] (mutably borrowed).
//!
//! Querying, indexing and slicing are provided by the [`AsView`] trait,
//! implemented for owned matrices and views alike. Conceptually it is
//! similar to how [`Deref`](std::ops::Deref) allows accessing methods for
//! `&[T]` on a `Vec<T>`. The preferred way to import it is via the prelude:
//!
//! ```
//! use ndmatrix::prelude::*;
//! use ndmatrix::Matrix;
//!
//! let matrix = Matrix::from([[1, 2, 3], [4, 5, 6]]);
//!
//! let column = matrix.slice((.., 1));
//! let elems: Vec<_> = column.iter().copied().collect();
//! assert_eq!(elems, [2, 5]);
//! ```
//!
//! # Views
//!
//! A view selects a subset of the elements of another matrix, without
//! copying them. Each dimension of the source is either _picked_ (a single
//! index, removing the dimension) or _narrowed_ (a range with an optional
//! step, keeping the dimension):
//!
//! ```
//! use ndmatrix::prelude::*;
//! use ndmatrix::{Matrix, SliceRange};
//!
//! let matrix = Matrix::from_fn(&[4, 6], |ix| ix[0] * 10 + ix[1]);
//!
//! // Pick row 1, keep every other column.
//! let view = matrix.slice((1, SliceRange::new(0, None, 2)));
//! assert_eq!(view.to_vec(), [10, 12, 14]);
//! ```

pub mod errors;
pub mod iterators;
pub mod layout;
pub mod slice_range;

mod impl_debug;
mod index_iterator;
mod matrix;
mod nested;

// Re-exports for convenience.
pub use index_iterator::{DynIndex, Indices};
pub use layout::Layout;
pub use matrix::{
    AsView, Matrix, MatrixBase, MatrixView, MatrixViewMut, Scalar, Storage, StorageMut,
};
pub use nested::NestedList;
pub use slice_range::{IntoSliceItems, SliceItem, SliceRange};

/// This module provides a convenient way to import the most common traits
/// from this library via a glob import.
pub mod prelude {
    pub use super::AsView;
}
