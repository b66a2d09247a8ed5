//! Scoped bump allocation for the Strata toolkit.
//!
//! [`Arena`] bump-allocates out of fixed-size blocks, appending a new block
//! when the current one cannot satisfy a request. Individual deallocation
//! does not exist; memory is reclaimed in bulk, either with
//! [`Arena::reset`] or by dropping a [`Checkpoint`] taken earlier.
//!
//! This crate is independent of the handle/table subsystem — it shares no
//! data with `strata-store` and can be used on its own.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod arena;
pub mod checkpoint;
pub mod error;

pub use arena::{Arena, ArenaSlice};
pub use checkpoint::Checkpoint;
pub use error::ArenaError;
