//! Arena-specific error types.

use std::error::Error;
use std::fmt;

/// Errors that can occur during arena operations.
///
/// Capacity exhaustion during `allocate` is deliberately *not* an error:
/// a valid request that no free block can satisfy returns `Ok(None)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ArenaError {
    /// The arena is too small to hold even one minimum-size block.
    OutOfMemory {
        /// Capacity requested for the arena, in bytes.
        capacity: usize,
        /// Smallest admissible block span for the configured element size.
        min_block: usize,
    },
    /// `allocate` was called with a zero element count.
    InvalidRequest {
        /// The offending count.
        count: usize,
    },
    /// An offset that is not a currently-live allocation of this arena.
    ///
    /// Raised for foreign offsets, double frees, and out-of-block
    /// element access through the typed layer.
    InvalidArgument {
        /// The offending byte offset.
        offset: usize,
    },
}

impl fmt::Display for ArenaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfMemory {
                capacity,
                min_block,
            } => {
                write!(
                    f,
                    "arena of {capacity} bytes cannot hold one minimum block of {min_block} bytes"
                )
            }
            Self::InvalidRequest { count } => {
                write!(f, "invalid allocation request: count {count}")
            }
            Self::InvalidArgument { offset } => {
                write!(f, "offset {offset} is not a live allocation")
            }
        }
    }
}

impl Error for ArenaError {}
