//! Error types for the storage crate.
//!
//! Staleness on lookup is not an error anywhere in this crate — lookups
//! return `Option`. The types here cover the conditions that indicate a
//! sizing limit or a caller bug and are always propagated.

use std::error::Error;
use std::fmt;

use strata_core::ElementType;

/// Errors from the slot allocator and slot map.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlotError {
    /// The sparse table reached the reserved index range and no retired
    /// slot is available for reuse. A sizing concern, never transient.
    CapacityExceeded {
        /// Number of sparse slots at the point of failure.
        slots: usize,
    },
    /// A removal was attempted with a key that is not currently live.
    ///
    /// Lookups tolerate staleness; removal of something already gone is a
    /// logic error and is surfaced as one.
    InvalidKey,
}

impl fmt::Display for SlotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CapacityExceeded { slots } => {
                write!(f, "slot index space exhausted at {slots} slots")
            }
            Self::InvalidKey => write!(f, "key does not refer to a live slot"),
        }
    }
}

impl Error for SlotError {}

/// Errors from type-erased buffer access.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BufferError {
    /// A typed accessor presented a type other than the buffer's bound type.
    TypeMismatch {
        /// The type the buffer is bound to.
        expected: ElementType,
        /// The type the caller presented.
        found: ElementType,
    },
    /// A positional accessor was given a position at or past the element count.
    OutOfBounds {
        /// The requested position.
        position: usize,
        /// The element count at the time of the call.
        len: usize,
    },
    /// A pop or swap-remove was attempted on an empty buffer.
    Empty,
}

impl fmt::Display for BufferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TypeMismatch { expected, found } => {
                write!(f, "buffer holds {expected}, access presented {found}")
            }
            Self::OutOfBounds { position, len } => {
                write!(f, "position {position} out of bounds for length {len}")
            }
            Self::Empty => write!(f, "attempted to pop an empty buffer"),
        }
    }
}

impl Error for BufferError {}

/// Errors from table operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TableError {
    /// The row key does not refer to a live row.
    UnknownRow,
    /// The column key does not refer to a live column.
    UnknownColumn,
    /// A cell or row access failed inside the row's buffer.
    Buffer(BufferError),
    /// Creating a row or column exhausted the corresponding key space.
    Slot(SlotError),
}

impl fmt::Display for TableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownRow => write!(f, "row key does not refer to a live row"),
            Self::UnknownColumn => write!(f, "column key does not refer to a live column"),
            Self::Buffer(e) => write!(f, "row buffer access failed: {e}"),
            Self::Slot(e) => write!(f, "key allocation failed: {e}"),
        }
    }
}

impl Error for TableError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Buffer(e) => Some(e),
            Self::Slot(e) => Some(e),
            _ => None,
        }
    }
}

impl From<BufferError> for TableError {
    fn from(e: BufferError) -> Self {
        Self::Buffer(e)
    }
}

impl From<SlotError> for TableError {
    fn from(e: SlotError) -> Self {
        Self::Slot(e)
    }
}
