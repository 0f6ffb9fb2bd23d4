use std::iter::zip;

use smallvec::{smallvec, SmallVec};

use crate::errors::ShapeError;

/// Marker trait for scalar (ie. non-list) element types.
///
/// This is used as a bound on the leaf type of [`NestedList`] impls and on
/// nested-array conversions to avoid conflicting impls for different
/// nesting depths.
pub trait Scalar {}

macro_rules! impl_scalar {
    ($($type:ty),*) => {
        $(impl Scalar for $type {})*
    };
}
impl_scalar!(bool, u8, i8, u16, i16, u32, i32, u64, i64, f32, f64, usize, isize);

/// A nested list literal with scalar element type `T` and a nesting depth
/// fixed by the implementing type.
///
/// The extents of such a literal are not encoded in its type: each level may
/// contain inner lists of any length, so a literal must be validated as
/// rectangular before it can describe an array.
/// [`derive_extents`](NestedList::derive_extents) performs that validation
/// and reports the common extent of every level, and
/// [`flatten_into`](NestedList::flatten_into) copies the elements out in
/// logical order.
///
/// Impls are provided for `Vec` nestings up to depth 6.
pub trait NestedList<T> {
    /// Nesting depth of this list type. A `Vec<T>` has rank 1.
    const RANK: usize;

    /// Fill `extents` with the length of the lists at each nesting level.
    ///
    /// `extents` must have length [`RANK`](NestedList::RANK). Fails with
    /// [`ShapeError::Jagged`] if two lists at the same level have different
    /// lengths. The reported depth is the 1-based nesting level of the
    /// mismatching lists, counting the outermost list as level 1.
    fn derive_extents(&self, extents: &mut [usize]) -> Result<(), ShapeError>;

    /// Append every element to `out` in logical (row-major) order.
    fn flatten_into(&self, out: &mut Vec<T>);
}

/// Bump the nesting level of a jaggedness error by one, for propagation
/// from an inner list to its parent.
fn deepen(err: ShapeError) -> ShapeError {
    match err {
        ShapeError::Jagged { depth } => ShapeError::Jagged { depth: depth + 1 },
        err => err,
    }
}

/// Derive the extents of a list whose items are themselves nested lists.
///
/// The first item determines the inner extents; every other item must
/// match them. An empty outer list has zero extents at every inner level.
fn derive_outer<T, L: NestedList<T>>(
    items: &[L],
    extents: &mut [usize],
) -> Result<(), ShapeError> {
    extents[0] = items.len();

    let Some((first, rest)) = items.split_first() else {
        extents[1..].fill(0);
        return Ok(());
    };
    first.derive_extents(&mut extents[1..]).map_err(deepen)?;

    let mut item_extents: SmallVec<[usize; 8]> = smallvec![0; extents.len() - 1];
    for item in rest {
        item.derive_extents(&mut item_extents).map_err(deepen)?;
        let mismatch =
            zip(item_extents.iter(), extents[1..].iter()).position(|(a, b)| a != b);
        if let Some(pos) = mismatch {
            return Err(ShapeError::Jagged { depth: pos + 2 });
        }
    }
    Ok(())
}

impl<T: Clone + Scalar> NestedList<T> for Vec<T> {
    const RANK: usize = 1;

    fn derive_extents(&self, extents: &mut [usize]) -> Result<(), ShapeError> {
        extents[0] = self.len();
        Ok(())
    }

    fn flatten_into(&self, out: &mut Vec<T>) {
        out.extend_from_slice(self);
    }
}

macro_rules! impl_nested_list {
    ($rank:literal, $list:ty) => {
        impl<T: Clone + Scalar> NestedList<T> for $list {
            const RANK: usize = $rank;

            fn derive_extents(&self, extents: &mut [usize]) -> Result<(), ShapeError> {
                derive_outer(self, extents)
            }

            fn flatten_into(&self, out: &mut Vec<T>) {
                for item in self {
                    item.flatten_into(out);
                }
            }
        }
    };
}

impl_nested_list!(2, Vec<Vec<T>>);
impl_nested_list!(3, Vec<Vec<Vec<T>>>);
impl_nested_list!(4, Vec<Vec<Vec<Vec<T>>>>);
impl_nested_list!(5, Vec<Vec<Vec<Vec<Vec<T>>>>>);
impl_nested_list!(6, Vec<Vec<Vec<Vec<Vec<Vec<T>>>>>>);
