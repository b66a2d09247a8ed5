//! Key-addressed value storage over a dense array.
//!
//! [`SlotMap`] pairs a [`SlotAllocator`] with a `Vec<T>` kept index-aligned
//! with the allocator's dense array: the value for a key always lives at
//! the dense position the allocator reports for it.

use std::fmt;

use strata_core::{DefaultTag, Key};

use crate::error::SlotError;
use crate::slot::SlotAllocator;

/// Stable-key storage with O(1) amortized insert and remove.
///
/// Values are packed contiguously; removal swap-removes, so iteration order
/// is dense order — not insertion order, and not stable across removals.
///
/// ```
/// use strata_store::SlotMap;
///
/// let mut map: SlotMap<&str> = SlotMap::new();
/// let hello = map.insert("hello").unwrap();
/// let world = map.insert("world").unwrap();
/// map.remove(hello).unwrap();
/// assert_eq!(map.get(hello), None);
/// assert_eq!(map.get(world), Some(&"world"));
/// ```
pub struct SlotMap<T, Tag = DefaultTag> {
    slots: SlotAllocator<Tag>,
    values: Vec<T>,
}

impl<T, Tag> SlotMap<T, Tag> {
    /// Create an empty map.
    pub fn new() -> Self {
        Self {
            slots: SlotAllocator::new(),
            values: Vec::new(),
        }
    }

    /// Create an empty map with pre-sized backing storage.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: SlotAllocator::with_capacity(capacity),
            values: Vec::with_capacity(capacity),
        }
    }

    /// Insert a value and return its key.
    pub fn insert(&mut self, value: T) -> Result<Key<Tag>, SlotError> {
        let key = self.slots.allocate()?;
        // A fresh key's dense position is always the back of the array.
        self.values.push(value);
        Ok(key)
    }

    /// The value for `key`, or `None` if the key is stale or unknown.
    pub fn get(&self, key: Key<Tag>) -> Option<&T> {
        let position = self.slots.resolve(key)?;
        Some(&self.values[position])
    }

    /// The value for `key`, mutably.
    pub fn get_mut(&mut self, key: Key<Tag>) -> Option<&mut T> {
        let position = self.slots.resolve(key)?;
        Some(&mut self.values[position])
    }

    /// Whether `key` refers to a live value.
    pub fn contains(&self, key: Key<Tag>) -> bool {
        self.slots.contains(key)
    }

    /// Remove the value for `key`, returning it by move.
    ///
    /// Unlike lookup, removal does not tolerate staleness: removing
    /// something already gone is a logic error and fails with
    /// [`SlotError::InvalidKey`].
    ///
    /// The allocator's swap-remove and the value array's swap-remove happen
    /// inside this one call, so no caller can observe the two out of sync.
    pub fn remove(&mut self, key: Key<Tag>) -> Result<T, SlotError> {
        let position = self.slots.release(key).ok_or(SlotError::InvalidKey)?;
        Ok(self.values.swap_remove(position))
    }

    /// Number of live values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the map holds no values.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Drop every value and reset the key space.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.values.clear();
    }

    /// Live keys in dense order.
    pub fn keys(&self) -> impl Iterator<Item = Key<Tag>> + '_ {
        self.slots.keys()
    }

    /// Live values in dense order.
    pub fn values(&self) -> std::slice::Iter<'_, T> {
        self.values.iter()
    }

    /// Live values in dense order, mutably.
    pub fn values_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.values.iter_mut()
    }

    /// Key/value pairs in dense order.
    pub fn iter(&self) -> impl Iterator<Item = (Key<Tag>, &T)> + '_ {
        self.slots.keys().zip(self.values.iter())
    }

    /// Key/value pairs in dense order, with mutable values.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Key<Tag>, &mut T)> + '_ {
        self.slots.keys().zip(self.values.iter_mut())
    }
}

impl<T, Tag> Default for SlotMap<T, Tag> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone, Tag> Clone for SlotMap<T, Tag> {
    fn clone(&self) -> Self {
        Self {
            slots: self.slots.clone(),
            values: self.values.clone(),
        }
    }
}

impl<T: fmt::Debug, Tag> fmt::Debug for SlotMap<T, Tag> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<'a, T, Tag> IntoIterator for &'a SlotMap<T, Tag> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

impl<'a, T, Tag> IntoIterator for &'a mut SlotMap<T, Tag> {
    type Item = &'a mut T;
    type IntoIter = std::slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter_mut()
    }
}
