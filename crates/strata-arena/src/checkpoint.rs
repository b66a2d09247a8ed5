//! Scoped rewind guards for the arena.

use std::ops::{Deref, DerefMut};

use crate::arena::Arena;

/// A scope guard that rewinds the arena when dropped.
///
/// Created by [`Arena::checkpoint`]. While the guard is alive it is the
/// only path to the arena — it borrows the arena exclusively and derefs to
/// it, so allocations made through the guard land in the arena as usual.
/// When the guard drops, every block and cursor position advanced since
/// the checkpoint is reclaimed, and the reclaimed region of the surviving
/// block is zeroed so later allocations see fresh bytes. An
/// [`Arena::reset`] inside the scope supersedes the checkpoint; the guard
/// then rewinds nothing.
///
/// Nested checkpoints borrow the enclosing guard, which makes out-of-order
/// release a compile error rather than a runtime hazard:
///
/// ```
/// use strata_arena::Arena;
///
/// let mut arena = Arena::new();
/// let keep = arena.alloc_slice::<u32>(4).unwrap();
///
/// {
///     let mut scope = arena.checkpoint();
///     let scratch = scope.alloc_slice::<u32>(1000).unwrap();
///     scope.slice_mut::<u32>(scratch).fill(7);
///     // `scratch` dies with the scope.
/// }
///
/// assert_eq!(arena.slice::<u32>(keep).len(), 4);
/// ```
pub struct Checkpoint<'a> {
    arena: &'a mut Arena,
    blocks: usize,
    cursor: usize,
    epoch: u64,
}

impl<'a> Checkpoint<'a> {
    pub(crate) fn new(arena: &'a mut Arena) -> Self {
        let (blocks, cursor, epoch) = arena.snapshot();
        Self {
            arena,
            blocks,
            cursor,
            epoch,
        }
    }
}

impl Deref for Checkpoint<'_> {
    type Target = Arena;

    fn deref(&self) -> &Arena {
        self.arena
    }
}

impl DerefMut for Checkpoint<'_> {
    fn deref_mut(&mut self) -> &mut Arena {
        self.arena
    }
}

impl Drop for Checkpoint<'_> {
    fn drop(&mut self) {
        self.arena.rewind_to(self.blocks, self.cursor, self.epoch);
    }
}

#[cfg(test)]
mod tests {
    use crate::arena::Arena;

    #[test]
    fn drop_rewinds_cursor_and_blocks() {
        let mut arena = Arena::with_block_size(128);
        arena.alloc(32, 1).unwrap();
        let before = (arena.block_count(), arena.used_bytes());

        {
            let mut scope = arena.checkpoint();
            scope.alloc(64, 1).unwrap();
            scope.alloc(100, 1).unwrap(); // spills into a second block
            assert_eq!(scope.block_count(), 2);
        }

        assert_eq!((arena.block_count(), arena.used_bytes()), before);
    }

    #[test]
    fn rewound_memory_is_reused() {
        let mut arena = Arena::with_block_size(128);
        {
            let mut scope = arena.checkpoint();
            scope.alloc(64, 1).unwrap();
        }
        let slice = arena.alloc(64, 1).unwrap();
        // Same block, same offset: the scope's memory came back.
        assert_eq!(arena.block_count(), 1);
        assert_eq!(arena.used_bytes(), 64);
        assert_eq!(arena.bytes(slice).len(), 64);
    }

    #[test]
    fn nested_checkpoints_release_in_lifo_order() {
        let mut arena = Arena::with_block_size(256);
        arena.alloc(16, 1).unwrap();

        let mut outer = arena.checkpoint();
        outer.alloc(32, 1).unwrap();
        {
            let mut inner = outer.checkpoint();
            inner.alloc(64, 1).unwrap();
            assert_eq!(inner.used_bytes(), 112);
        }
        // Inner scope gone, outer allocation intact.
        assert_eq!(outer.used_bytes(), 48);
        drop(outer);
        assert_eq!(arena.used_bytes(), 16);
    }

    #[test]
    fn memory_reclaimed_by_rewind_is_rezeroed() {
        let mut arena = Arena::with_block_size(128);
        // Pin the block so the scope's scratch lands after the cursor.
        arena.alloc(4, 1).unwrap();

        {
            let mut scope = arena.checkpoint();
            let scratch = scope.alloc_slice::<u32>(8).unwrap();
            scope.slice_mut::<u32>(scratch).fill(7);
        }

        // The same region comes back zeroed, not holding the scope's bytes.
        let reused = arena.alloc_slice::<u32>(8).unwrap();
        assert_eq!(arena.slice::<u32>(reused), &[0; 8]);
    }

    #[test]
    fn reset_inside_scope_supersedes_the_checkpoint() {
        let mut arena = Arena::with_block_size(128);
        arena.alloc(64, 1).unwrap();

        let after_reset;
        {
            let mut scope = arena.checkpoint();
            scope.reset();
            after_reset = scope.alloc_slice::<u32>(4).unwrap();
            scope.slice_mut::<u32>(after_reset).fill(3);
        }

        // The guard must not rewind over allocations made after the reset.
        assert_eq!(arena.block_count(), 1);
        assert_eq!(arena.used_bytes(), 16);
        assert_eq!(arena.slice::<u32>(after_reset), &[3; 4]);
    }

    #[test]
    fn checkpoint_on_empty_arena() {
        let mut arena = Arena::with_block_size(64);
        {
            let mut scope = arena.checkpoint();
            scope.alloc(10, 1).unwrap();
        }
        assert_eq!(arena.block_count(), 0);
        assert_eq!(arena.used_bytes(), 0);
    }

    #[test]
    fn allocations_before_checkpoint_survive() {
        let mut arena = Arena::with_block_size(128);
        let keep = arena.alloc_slice::<u32>(4).unwrap();
        arena.slice_mut::<u32>(keep).copy_from_slice(&[1, 2, 3, 4]);

        {
            let mut scope = arena.checkpoint();
            let scratch = scope.alloc_slice::<u32>(8).unwrap();
            scope.slice_mut::<u32>(scratch).fill(9);
        }

        assert_eq!(arena.slice::<u32>(keep), &[1, 2, 3, 4]);
    }
}
