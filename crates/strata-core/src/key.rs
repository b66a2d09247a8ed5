//! Versioned keys: stable external references to dense storage.
//!
//! A [`Key`] pairs a slot index with the generation the slot carried when
//! the key was issued. A key resolves only while the allocator's slot still
//! holds that generation, so a key that outlives its element reads as
//! absent rather than aliasing whatever was recycled into the slot.
//!
//! The `Tag` parameter is a zero-cost phantom marker: keys minted for one
//! domain (say, rows) cannot be passed where another domain's keys (say,
//! columns) are expected. It has no runtime representation.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

/// The tag used when no caller-specific key domain is needed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DefaultTag;

/// A versioned `(index, generation)` reference into a slot allocator.
///
/// Keys are opaque lookup tokens. They carry no ownership: removing the
/// referenced element invalidates every copy of its key, and lookups with
/// an invalidated key return absence. Forged or default keys are harmless —
/// they simply never resolve.
///
/// ```
/// use strata_core::Key;
///
/// struct Widgets;
/// struct Sounds;
///
/// fn lookup(_key: Key<Widgets>) {}
///
/// let widget: Key<Widgets> = Key::null();
/// lookup(widget);
/// // lookup(Key::<Sounds>::null()); // does not compile: wrong domain
/// ```
#[must_use]
pub struct Key<Tag = DefaultTag> {
    index: u32,
    generation: u32,
    _tag: PhantomData<fn() -> Tag>,
}

impl<Tag> Key<Tag> {
    /// Index reserved for keys that can never resolve.
    pub const INVALID_INDEX: u32 = u32::MAX;

    /// Assemble a key from raw parts.
    ///
    /// Intended for the allocator and for serialization shims. A key built
    /// from arbitrary parts is safe to use everywhere a key is accepted; it
    /// just resolves to nothing unless the parts match a live slot.
    #[doc(hidden)]
    pub fn from_parts(index: u32, generation: u32) -> Self {
        Self {
            index,
            generation,
            _tag: PhantomData,
        }
    }

    /// A key that never resolves, for slots that want an explicit "no key".
    pub fn null() -> Self {
        Self::from_parts(Self::INVALID_INDEX, 0)
    }

    /// Whether this is the explicit null key.
    pub fn is_null(&self) -> bool {
        self.index == Self::INVALID_INDEX
    }

    /// The slot index this key refers to.
    pub fn index(&self) -> u32 {
        self.index
    }

    /// The generation the slot carried when this key was issued.
    pub fn generation(&self) -> u32 {
        self.generation
    }
}

// Manual impls: derives would bound `Tag`, but the tag is phantom.

impl<Tag> Clone for Key<Tag> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<Tag> Copy for Key<Tag> {}

impl<Tag> PartialEq for Key<Tag> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index && self.generation == other.generation
    }
}

impl<Tag> Eq for Key<Tag> {}

impl<Tag> Hash for Key<Tag> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (u64::from(self.index) | (u64::from(self.generation) << 32)).hash(state);
    }
}

impl<Tag> Default for Key<Tag> {
    fn default() -> Self {
        Self::null()
    }
}

impl<Tag> fmt::Debug for Key<Tag> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Key({}v{})", self.index, self.generation)
    }
}

impl<Tag> fmt::Display for Key<Tag> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}v{}", self.index, self.generation)
    }
}
