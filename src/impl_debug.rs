use std::fmt::{Debug, Error, Formatter};

use crate::matrix::{AsView, MatrixBase, MatrixView, Storage};

/// Maximum number of entries to print per dimension before eliding.
const MAX_ENTRIES: usize = 10;

/// Format one nesting level of a matrix as a bracketed list.
///
/// `view` must have a rank of at least 1.
fn write_level<T: Debug>(f: &mut Formatter<'_>, view: &MatrixView<'_, T>) -> Result<(), Error> {
    write!(f, "[")?;
    let size = view.size(0);
    for i in 0..size.min(MAX_ENTRIES) {
        if i > 0 {
            write!(f, ", ")?;
        }
        let inner = view.index_axis(0, i);
        if inner.ndim() == 0 {
            if let Some(item) = inner.item() {
                write!(f, "{:?}", item)?;
            }
        } else {
            write_level(f, &inner)?;
        }
    }
    if size > MAX_ENTRIES {
        write!(f, ", ...")?;
    }
    write!(f, "]")
}

impl<S: Storage> Debug for MatrixBase<S>
where
    S::Elem: Debug,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        let view = self.view();
        if view.ndim() == 0 {
            if let Some(item) = view.item() {
                write!(f, "({:?})", item)?;
            }
        } else {
            write_level(f, &view)?;
        }
        write!(
            f,
            ", shape={:?}, strides={:?}",
            self.shape(),
            self.strides()
        )
    }
}
