//! Strata: generation-checked handles, dense slot storage, type-erased
//! tables, and scoped bump arenas.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all Strata sub-crates. For most users, adding `strata` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use strata::prelude::*;
//!
//! // A slot map hands out keys that outlive the slot they point at:
//! // a stale key is rejected, never silently re-resolved.
//! let mut healths: SlotMap<f32> = SlotMap::new();
//! let player = healths.insert(100.0).unwrap();
//! let goblin = healths.insert(25.0).unwrap();
//!
//! assert_eq!(healths.get(player), Some(&100.0));
//! assert_eq!(healths.remove(goblin), Ok(25.0));
//! assert_eq!(healths.get(goblin), None);
//!
//! // A scoped arena reclaims everything allocated in a scope at once.
//! let mut arena = Arena::new();
//! {
//!     let mut scope = arena.checkpoint();
//!     let scratch = scope.alloc_slice::<f32>(256).unwrap();
//!     scope.slice_mut::<f32>(scratch).fill(0.0);
//! }
//! assert_eq!(arena.used_bytes(), 0);
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in the
//! prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `strata-core` | [`types::Key`], key tags, [`types::ElementType`] |
//! | [`store`] | `strata-store` | `SlotAllocator`, `SlotMap`, `ErasedVec`, `Table` |
//! | [`arena`] | `strata-arena` | `Arena`, `ArenaSlice`, `Checkpoint` |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Keys, key tags, and runtime element descriptors (`strata-core`).
///
/// The fundamental [`types::Key`] type lives here; everything in
/// `strata-store` is addressed by it.
pub use strata_core as types;

/// Handle-addressed dense storage (`strata-store`).
///
/// The generational [`store::SlotAllocator`], the [`store::SlotMap`] value
/// container, the type-erased [`store::ErasedVec`], and the row/column
/// [`store::Table`] composing them.
pub use strata_store as store;

/// Scoped bump allocation (`strata-arena`).
///
/// [`arena::Arena`] with [`arena::Checkpoint`] guards for bulk, scope-tied
/// reclamation.
pub use strata_arena as arena;

/// Common imports for typical Strata usage.
///
/// ```rust
/// use strata::prelude::*;
/// ```
pub mod prelude {
    // Keys and element descriptors
    pub use strata_core::{DefaultTag, ElementType, Key};

    // Storage
    pub use strata_store::{
        ColumnKey, ErasedVec, RowKey, SlotAllocator, SlotMap, Table,
    };

    // Errors
    pub use strata_arena::ArenaError;
    pub use strata_store::{BufferError, SlotError, TableError};

    // Arena
    pub use strata_arena::{Arena, ArenaSlice, Checkpoint};
}
