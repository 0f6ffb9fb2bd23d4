use smallvec::{smallvec, SmallVec};

/// Index of an element in a dynamic-rank array.
pub type DynIndex = SmallVec<[usize; 5]>;

/// Iterator over all valid indices of a shape, in logical (row-major)
/// order, ie. the last index component varies fastest.
///
/// A rank-0 shape has exactly one valid index, the empty index.
#[derive(Clone)]
pub struct Indices {
    shape: DynIndex,

    /// Next index to yield, or `None` once iteration is complete.
    next: Option<DynIndex>,

    remaining: usize,
}

impl Indices {
    pub fn from_shape(shape: &[usize]) -> Indices {
        let remaining = shape.iter().product();
        let next = (remaining > 0).then(|| smallvec![0; shape.len()]);
        Indices {
            shape: SmallVec::from_slice(shape),
            next,
            remaining,
        }
    }
}

impl Iterator for Indices {
    type Item = DynIndex;

    fn next(&mut self) -> Option<DynIndex> {
        let current = self.next.as_mut()?;
        let result = current.clone();
        self.remaining -= 1;

        // Advance the index, wrapping each trailing component that reaches
        // its dimension size.
        let mut done = true;
        for dim in (0..current.len()).rev() {
            current[dim] += 1;
            if current[dim] < self.shape[dim] {
                done = false;
                break;
            }
            current[dim] = 0;
        }
        if done {
            self.next = None;
        }

        Some(result)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Indices {}

impl std::iter::FusedIterator for Indices {}

#[cfg(test)]
mod tests {
    use ndmatrix_testing::TestCases;

    use super::Indices;

    #[test]
    fn test_indices() {
        #[derive(Debug)]
        struct Case<'a> {
            shape: &'a [usize],
            expected: Vec<Vec<usize>>,
        }

        let cases = [
            // A rank-0 shape has a single empty index.
            Case {
                shape: &[],
                expected: vec![vec![]],
            },
            Case {
                shape: &[3],
                expected: vec![vec![0], vec![1], vec![2]],
            },
            // The last component varies fastest.
            Case {
                shape: &[2, 2],
                expected: vec![vec![0, 0], vec![0, 1], vec![1, 0], vec![1, 1]],
            },
            // Any zero-sized dimension empties the iterator.
            Case {
                shape: &[2, 0, 2],
                expected: vec![],
            },
        ];

        cases.test_each(|case| {
            let indices: Vec<Vec<usize>> = Indices::from_shape(case.shape)
                .map(|ix| ix.to_vec())
                .collect();
            assert_eq!(indices, case.expected);
        })
    }

    #[test]
    fn test_indices_len() {
        let mut iter = Indices::from_shape(&[2, 3]);
        assert_eq!(iter.len(), 6);
        iter.next();
        assert_eq!(iter.len(), 5);
        assert_eq!(iter.by_ref().count(), 5);
        assert_eq!(iter.next(), None);
    }
}
