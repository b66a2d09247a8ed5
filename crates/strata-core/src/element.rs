//! Element type tags for type-erased storage.
//!
//! [`ElementType`] records the layout of one concrete element type together
//! with its [`TypeId`]. Buffers bind to an `ElementType` at construction and
//! compare tags by identity before reinterpreting bytes, so two structurally
//! identical but distinct types are never confused.

use std::any::TypeId;
use std::fmt;

use bytemuck::Pod;

/// Identity and layout of a concrete element type.
///
/// The `Pod` bound is the static precondition for erased storage: only
/// trivially copyable, standard-layout types can be stored as raw bytes and
/// moved with `memcpy`-style operations. Types that don't satisfy it fail to
/// compile, not at runtime.
#[derive(Clone, Copy, Debug)]
pub struct ElementType {
    id: TypeId,
    name: &'static str,
    size: usize,
    align: usize,
}

impl ElementType {
    /// The element type descriptor for `T`.
    pub fn of<T: Pod>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
            size: std::mem::size_of::<T>(),
            align: std::mem::align_of::<T>(),
        }
    }

    /// Whether this tag describes `T`.
    pub fn is<T: Pod>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }

    /// Size of one element in bytes.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Alignment of the element type in bytes.
    pub fn align(&self) -> usize {
        self.align
    }

    /// The element type's name, for diagnostics only.
    ///
    /// Names are not stable across compiler versions and are never used for
    /// comparison — identity is the [`TypeId`] alone.
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for ElementType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ElementType {}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
