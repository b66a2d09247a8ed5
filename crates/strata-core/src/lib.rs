//! Core primitives for the Strata storage toolkit.
//!
//! This is the leaf crate with zero internal dependencies. It defines the
//! two types every other Strata crate builds on: [`Key`], the versioned
//! `(index, generation)` handle, and [`ElementType`], the identity tag that
//! binds a type-erased buffer to one concrete element type.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod element;
pub mod key;

pub use element::ElementType;
pub use key::{DefaultTag, Key};
