//! Container and cursor error types.

use std::error::Error;
use std::fmt;

/// Errors that can occur during container or cursor operations.
///
/// Every variant is a contract violation reported to the immediate caller.
/// Allocation failure is not represented here: it aborts via
/// [`std::alloc::handle_alloc_error`].
#[derive(Clone, Debug, PartialEq)]
pub enum ArrayError {
    /// Requested initial capacity was zero.
    InvalidCapacity {
        /// The rejected capacity.
        requested: usize,
    },
    /// Growth factor is not a finite number strictly greater than 1.0.
    InvalidGrowthFactor {
        /// The rejected factor.
        factor: f64,
    },
    /// Index falls outside the valid range for the operation.
    IndexOutOfRange {
        /// The offending index.
        index: usize,
        /// Logical length of the container at the time of the call.
        len: usize,
    },
    /// `current` or `assign` was called on a cursor that has run off the end.
    CursorExhausted,
    /// The container was structurally mutated after the cursor was created.
    CursorInvalidated {
        /// Generation recorded by the cursor at creation.
        expected: u64,
        /// Generation of the container when the cursor was next used.
        found: u64,
    },
}

impl fmt::Display for ArrayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCapacity { requested } => {
                write!(f, "invalid capacity: {requested} (must be at least 1)")
            }
            Self::InvalidGrowthFactor { factor } => {
                write!(f, "invalid growth factor: {factor} (must be finite and > 1.0)")
            }
            Self::IndexOutOfRange { index, len } => {
                write!(f, "index {index} out of range for length {len}")
            }
            Self::CursorExhausted => write!(f, "cursor is exhausted"),
            Self::CursorInvalidated { expected, found } => {
                write!(
                    f,
                    "cursor invalidated: created at generation {expected}, container now at {found}"
                )
            }
        }
    }
}

impl Error for ArrayError {}
