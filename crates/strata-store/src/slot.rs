//! The generational slot allocator.
//!
//! [`SlotAllocator`] issues versioned [`Key`]s and maps each live key to a
//! position in a gap-free dense array. The sparse table gives keys a stable
//! index for their whole lifetime; the dense array gives the storage built
//! on top a compact, iteration-friendly layout. Removal swap-removes the
//! dense entry, so positions move but keys never do.

use std::fmt;
use std::marker::PhantomData;

use strata_core::{DefaultTag, Key};

use crate::error::SlotError;

/// Sentinel terminating the free list.
const FREE_LIST_END: u32 = u32::MAX - 1;

/// Upper bound on sparse indices; leaves room for the reserved sentinels.
const MAX_SLOTS: u32 = u32::MAX - 2;

/// A slot whose generation reaches this value is permanently retired.
///
/// Retiring instead of wrapping trades a leaked index for an absolute
/// guarantee that a stale key can never alias a recycled slot.
const RETIRED_GENERATION: u32 = u32::MAX;

/// State of one sparse slot.
///
/// The discriminant makes the live/free invariant explicit: a slot is
/// either live (its `dense` position points back at it) or reachable from
/// the free list through `next` — never both.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SlotState {
    /// The slot backs a live key; `dense` is its position in the dense array.
    Live { dense: u32 },
    /// The slot is retired; `next` links the free list.
    Free { next: u32 },
}

#[derive(Clone, Copy, Debug)]
struct Slot {
    state: SlotState,
    generation: u32,
}

/// Issues, validates, and recycles versioned keys.
///
/// `Tag` is the key domain: a `SlotAllocator<Rows>` only accepts
/// `Key<Rows>`, at zero runtime cost.
///
/// # Free list
///
/// Retired slots form a LIFO list threaded through [`SlotState::Free`].
/// LIFO is not required for correctness; it keeps recently used indices hot.
pub struct SlotAllocator<Tag = DefaultTag> {
    sparse: Vec<Slot>,
    /// `dense[i]` is the sparse index whose live position is `i`.
    dense: Vec<u32>,
    free_head: u32,
    _tag: PhantomData<fn() -> Tag>,
}

impl<Tag> SlotAllocator<Tag> {
    /// Create an empty allocator.
    pub fn new() -> Self {
        Self {
            sparse: Vec::new(),
            dense: Vec::new(),
            free_head: FREE_LIST_END,
            _tag: PhantomData,
        }
    }

    /// Create an empty allocator with pre-sized backing storage.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            sparse: Vec::with_capacity(capacity),
            dense: Vec::with_capacity(capacity),
            free_head: FREE_LIST_END,
            _tag: PhantomData,
        }
    }

    /// Issue a new key.
    ///
    /// Reuses the most recently retired slot if one is available (with its
    /// current generation), otherwise appends a fresh slot at generation 0.
    /// The new key's dense position is always `len() - 1` on return.
    ///
    /// Fails with [`SlotError::CapacityExceeded`] once the sparse table
    /// would grow into the reserved sentinel range.
    pub fn allocate(&mut self) -> Result<Key<Tag>, SlotError> {
        let dense_pos = self.dense.len() as u32;
        let index = match self.pop_free() {
            Some(index) => {
                self.sparse[index as usize].state = SlotState::Live { dense: dense_pos };
                index
            }
            None => {
                if self.sparse.len() >= MAX_SLOTS as usize {
                    return Err(SlotError::CapacityExceeded {
                        slots: self.sparse.len(),
                    });
                }
                let index = self.sparse.len() as u32;
                self.sparse.push(Slot {
                    state: SlotState::Live { dense: dense_pos },
                    generation: 0,
                });
                index
            }
        };
        self.dense.push(index);
        Ok(Key::from_parts(index, self.sparse[index as usize].generation))
    }

    /// The dense position of `key`'s element, or `None` if the key is stale
    /// or unknown.
    ///
    /// Staleness is an expected steady-state condition, not an error.
    pub fn resolve(&self, key: Key<Tag>) -> Option<usize> {
        let slot = self.sparse.get(key.index() as usize)?;
        if slot.generation != key.generation() {
            return None;
        }
        match slot.state {
            SlotState::Live { dense } => Some(dense as usize),
            SlotState::Free { .. } => None,
        }
    }

    /// Whether `key` is currently live.
    pub fn contains(&self, key: Key<Tag>) -> bool {
        self.resolve(key).is_some()
    }

    /// Retire `key`, returning the dense position it vacated.
    ///
    /// The last dense entry is swapped into the vacated position and its
    /// slot's bookkeeping updated before this returns, so storage layered on
    /// top can mirror the move with a `swap_remove` at the returned position
    /// and stay index-aligned. Returns `None` if the key was stale or
    /// unknown.
    ///
    /// The freed slot's generation is incremented and the slot is pushed
    /// onto the free list — unless the increment reaches the retirement
    /// sentinel, in which case the index is permanently taken out of
    /// circulation.
    pub fn release(&mut self, key: Key<Tag>) -> Option<usize> {
        let dense_pos = self.resolve(key)?;

        self.dense.swap_remove(dense_pos);
        if let Some(&moved) = self.dense.get(dense_pos) {
            self.sparse[moved as usize].state = SlotState::Live {
                dense: dense_pos as u32,
            };
        }

        let slot = &mut self.sparse[key.index() as usize];
        slot.generation += 1;
        if slot.generation == RETIRED_GENERATION {
            // Never recycled: leak the index rather than risk generation
            // wraparound aliasing.
            slot.state = SlotState::Free {
                next: FREE_LIST_END,
            };
        } else {
            slot.state = SlotState::Free {
                next: self.free_head,
            };
            self.free_head = key.index();
        }
        Some(dense_pos)
    }

    /// Number of live keys.
    pub fn len(&self) -> usize {
        self.dense.len()
    }

    /// Whether no keys are live.
    pub fn is_empty(&self) -> bool {
        self.dense.is_empty()
    }

    /// Drop all slots and reset the free list.
    ///
    /// Every outstanding key becomes unknown. Indices and generations start
    /// over, so keys issued before the clear must not be mixed with keys
    /// issued after it.
    pub fn clear(&mut self) {
        self.sparse.clear();
        self.dense.clear();
        self.free_head = FREE_LIST_END;
    }

    /// Live keys in dense order.
    ///
    /// Dense order is not insertion order and is not stable across
    /// [`release`](Self::release).
    pub fn keys(&self) -> impl Iterator<Item = Key<Tag>> + '_ {
        self.dense
            .iter()
            .map(move |&index| Key::from_parts(index, self.sparse[index as usize].generation))
    }

    fn pop_free(&mut self) -> Option<u32> {
        if self.free_head == FREE_LIST_END {
            return None;
        }
        let index = self.free_head;
        self.free_head = match self.sparse[index as usize].state {
            SlotState::Free { next } => next,
            SlotState::Live { .. } => {
                unreachable!("free list head always refers to a free slot")
            }
        };
        Some(index)
    }

    /// Fast-forward a slot's generation so tests can reach the retirement
    /// sentinel without exhausting a real `u32` counter.
    #[cfg(test)]
    fn force_generation(&mut self, index: u32, generation: u32) {
        self.sparse[index as usize].generation = generation;
    }
}

impl<Tag> Clone for SlotAllocator<Tag> {
    fn clone(&self) -> Self {
        Self {
            sparse: self.sparse.clone(),
            dense: self.dense.clone(),
            free_head: self.free_head,
            _tag: PhantomData,
        }
    }
}

impl<Tag> Default for SlotAllocator<Tag> {
    fn default() -> Self {
        Self::new()
    }
}

// Not derived: a derive would bound the phantom `Tag`.
impl<Tag> fmt::Debug for SlotAllocator<Tag> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SlotAllocator")
            .field("live", &self.dense.len())
            .field("slots", &self.sparse.len())
            .finish()
    }
}
