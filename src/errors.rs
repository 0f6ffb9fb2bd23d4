//! Error types that are reported by matrix construction and view operations.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Errors that can occur when constructing a matrix from nested literal data
/// or from a shape plus a flat buffer.
#[derive(Debug, PartialEq)]
pub enum ShapeError {
    /// The nested data is not rectangular: two sibling lists at the same
    /// nesting depth derived different shapes.
    Jagged {
        /// Nesting depth (1-indexed, outermost level is 1) at which the
        /// mismatch was found.
        depth: usize,
    },

    /// A rank of zero was requested. A matrix always has at least one
    /// dimension.
    ZeroRank,

    /// The storage length was expected to exactly match the product of the
    /// shape, and it did not.
    LengthMismatch,
}

impl Display for ShapeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ShapeError::Jagged { depth } => {
                write!(f, "nested data is jagged at depth {}", depth)
            }
            ShapeError::ZeroRank => write!(f, "rank must be at least 1"),
            ShapeError::LengthMismatch => write!(f, "data length does not match shape"),
        }
    }
}

impl Error for ShapeError {}

/// Error in a matrix operation if the dimension count is incorrect.
#[derive(Debug, PartialEq)]
pub struct DimensionError {}

impl Display for DimensionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "dim count is incorrect")
    }
}

impl Error for DimensionError {}

/// Errors that can occur when slicing a matrix or extracting a row.
#[derive(Clone, Debug, PartialEq)]
pub enum SliceError {
    /// The number of selectors does not equal the matrix's dimension count.
    WrongDimCount,

    /// A referenced axis is out of bounds for the matrix's dimension count.
    InvalidAxis,

    /// An index selector is out of bounds for the corresponding matrix
    /// dimension.
    InvalidIndex,

    /// A range selector starts beyond the end of, or requests a length that
    /// extends beyond, the corresponding matrix dimension.
    InvalidRange,

    /// A range selector has a step of zero.
    InvalidStep,
}

impl Display for SliceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SliceError::WrongDimCount => {
                write!(f, "selector count does not match dim count")
            }
            SliceError::InvalidAxis => write!(f, "axis is invalid"),
            SliceError::InvalidIndex => write!(f, "slice index is invalid"),
            SliceError::InvalidRange => write!(f, "slice range is invalid"),
            SliceError::InvalidStep => write!(f, "slice step is invalid"),
        }
    }
}

impl Error for SliceError {}
