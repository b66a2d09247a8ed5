//! Arena-specific error types.

use std::error::Error;
use std::fmt;

/// Errors that can occur during arena allocation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArenaError {
    /// The request cannot fit in a block even after worst-case alignment
    /// padding. The arena grows by whole blocks, so a single allocation is
    /// bounded by the block size chosen at construction.
    CapacityExceeded {
        /// Number of bytes requested, including worst-case padding.
        requested: usize,
        /// The arena's block size in bytes.
        block_size: usize,
    },
}

impl fmt::Display for ArenaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CapacityExceeded {
                requested,
                block_size,
            } => write!(
                f,
                "allocation of {requested} bytes cannot fit a {block_size} byte block"
            ),
        }
    }
}

impl Error for ArenaError {}
