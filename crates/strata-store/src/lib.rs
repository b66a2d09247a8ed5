//! Handle-addressed dense storage for the Strata toolkit.
//!
//! This crate is the core of the workspace. It layers four components:
//!
//! ```text
//! Table (rows × columns, per-column key addressing)
//! ├── SlotAllocator (columns: versioned keys → dense positions)
//! └── SlotMap<ErasedVec> (rows)
//!     ├── SlotAllocator (rows)
//!     └── ErasedVec (type-erased cells)
//!         └── RawBuffer (bounded unsafe: aligned allocation)
//! ```
//!
//! [`SlotAllocator`] issues versioned [`Key`]s and maps them to positions in
//! a gap-free dense array. [`SlotMap`] pairs an allocator with a `Vec<T>` for
//! stable-key value storage. [`ErasedVec`] stores one `Pod` element type as
//! raw bytes behind a non-generic interface, and [`Table`] composes a column
//! allocator with a row map of erased buffers.
//!
//! # Key stability vs. pointer instability
//!
//! Growth can reallocate any backing buffer, so references and slices
//! obtained from these containers are invalidated by later insertions (the
//! borrow checker enforces this). Keys are never invalidated by growth —
//! only by removal of the element they refer to. That distinction is the
//! contract the whole crate is built around.
//!
//! # Concurrency
//!
//! None. Every component assumes a single writer; share instances across
//! threads only under ordinary shared-read/exclusive-write discipline.
//!
//! All `unsafe` code in this crate lives in the `raw` module.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

pub mod erased;
pub mod error;
pub mod map;
mod raw;
pub mod slot;
pub mod table;

pub use erased::ErasedVec;
pub use error::{BufferError, SlotError, TableError};
pub use map::SlotMap;
pub use slot::SlotAllocator;
pub use table::{ColumnKey, ColumnTag, RowKey, RowTag, Table};

// Re-exported so downstream code can name key types without a second import.
pub use strata_core::{DefaultTag, ElementType, Key};
