//! Block-based bump allocation.
//!
//! An [`Arena`] owns an ordered sequence of fixed-size byte blocks and
//! bump-allocates within the newest one, honouring requested alignment
//! against the block's actual base address. Allocations return an
//! [`ArenaSlice`] — a (block, offset, length) locator — rather than a
//! reference, so any number of allocations can be live at once and
//! resolved on demand.

use bytemuck::Pod;

use crate::error::ArenaError;

/// Default block size in bytes.
pub const DEFAULT_BLOCK_SIZE: usize = 4096;

/// A single fixed-size block with a bump cursor.
///
/// The backing `Vec` is created at full length and never grown, so its
/// heap buffer — and therefore every offset aligned against it — is stable
/// for the block's lifetime.
struct Block {
    data: Vec<u8>,
    cursor: usize,
}

impl Block {
    fn new(size: usize) -> Self {
        Self {
            data: vec![0; size],
            cursor: 0,
        }
    }

    /// Bump-allocate `len` bytes at `align`, or `None` if they don't fit.
    fn try_alloc(&mut self, len: usize, align: usize) -> Option<usize> {
        let base = self.data.as_ptr() as usize;
        let start = (base + self.cursor + align - 1) & !(align - 1);
        let offset = start - base;
        if offset + len > self.data.len() {
            return None;
        }
        self.cursor = offset + len;
        Some(offset)
    }
}

/// Locator for one arena allocation.
///
/// Resolved against the owning arena with [`Arena::bytes`] /
/// [`Arena::slice`]. A slice taken before a [`reset`](Arena::reset) or
/// before a checkpoint rewind must not be resolved afterwards; the arena
/// detects gross misuse (a dropped block) by panicking, but a rewound
/// offset within a surviving block simply reads scrubbed or reused memory.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[must_use]
pub struct ArenaSlice {
    block: usize,
    offset: usize,
    len: usize,
}

impl ArenaSlice {
    /// Length of the allocation in bytes.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether this is a zero-length allocation.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// A bump allocator over fixed-size blocks with bulk reclamation.
///
/// Freeing individual allocations is not supported — that is the point:
/// allocation is a cursor bump, and everything allocated since a
/// [`checkpoint`](Self::checkpoint) (or since creation, via
/// [`reset`](Self::reset)) is reclaimed at once.
///
/// ```
/// use strata_arena::Arena;
///
/// let mut arena = Arena::new();
/// let temps = arena.alloc_slice::<f32>(128).unwrap();
/// arena.slice_mut::<f32>(temps).fill(1.0);
/// assert_eq!(arena.slice::<f32>(temps)[0], 1.0);
/// ```
pub struct Arena {
    blocks: Vec<Block>,
    block_size: usize,
    /// Bumped by [`reset`](Self::reset); lets a checkpoint detect that the
    /// blocks it snapshotted no longer exist.
    epoch: u64,
}

impl Arena {
    /// Create an arena with the default block size.
    pub fn new() -> Self {
        Self::with_block_size(DEFAULT_BLOCK_SIZE)
    }

    /// Create an arena with the given block size in bytes.
    pub fn with_block_size(block_size: usize) -> Self {
        assert!(block_size > 0);
        Self {
            blocks: Vec::new(),
            block_size,
            epoch: 0,
        }
    }

    /// Bump-allocate `len` bytes at the given alignment.
    ///
    /// Appends a fresh block when the current one cannot satisfy the
    /// request. Fails with [`ArenaError::CapacityExceeded`] if the request
    /// cannot fit a fresh block even after worst-case alignment padding.
    ///
    /// # Panics
    ///
    /// Panics if `align` is not a power of two.
    pub fn alloc(&mut self, len: usize, align: usize) -> Result<ArenaSlice, ArenaError> {
        assert!(align.is_power_of_two(), "alignment must be a power of two");

        // A fresh block's base address is arbitrary, so worst-case padding
        // must be budgeted when deciding whether a request can ever fit.
        let worst_case = len.saturating_add(align - 1);
        if worst_case > self.block_size {
            return Err(ArenaError::CapacityExceeded {
                requested: worst_case,
                block_size: self.block_size,
            });
        }

        if let Some(block) = self.blocks.last_mut() {
            if let Some(offset) = block.try_alloc(len, align) {
                return Ok(ArenaSlice {
                    block: self.blocks.len() - 1,
                    offset,
                    len,
                });
            }
        }

        let mut block = Block::new(self.block_size);
        let offset = block
            .try_alloc(len, align)
            .expect("size-checked request always fits a fresh block");
        self.blocks.push(block);
        Ok(ArenaSlice {
            block: self.blocks.len() - 1,
            offset,
            len,
        })
    }

    /// Allocate space for `count` elements of `T`, zero-initialised.
    pub fn alloc_slice<T: Pod>(&mut self, count: usize) -> Result<ArenaSlice, ArenaError> {
        let len = std::mem::size_of::<T>().saturating_mul(count);
        self.alloc(len, std::mem::align_of::<T>())
    }

    /// Resolve an allocation to its bytes.
    ///
    /// # Panics
    ///
    /// Panics if `slice` refers to a block dropped by a reset or rewind.
    pub fn bytes(&self, slice: ArenaSlice) -> &[u8] {
        &self.blocks[slice.block].data[slice.offset..slice.offset + slice.len]
    }

    /// Resolve an allocation to its bytes, mutably.
    pub fn bytes_mut(&mut self, slice: ArenaSlice) -> &mut [u8] {
        &mut self.blocks[slice.block].data[slice.offset..slice.offset + slice.len]
    }

    /// Resolve an allocation made with [`alloc_slice`](Self::alloc_slice)
    /// to a typed slice.
    ///
    /// # Panics
    ///
    /// Panics if the allocation's length or alignment does not match `T` —
    /// i.e. if `slice` was allocated for a different element type.
    pub fn slice<T: Pod>(&self, slice: ArenaSlice) -> &[T] {
        bytemuck::cast_slice(self.bytes(slice))
    }

    /// Resolve a typed allocation mutably.
    pub fn slice_mut<T: Pod>(&mut self, slice: ArenaSlice) -> &mut [T] {
        bytemuck::cast_slice_mut(self.bytes_mut(slice))
    }

    /// Drop every block. All outstanding [`ArenaSlice`]s become invalid.
    ///
    /// A checkpoint taken before a reset no longer has anything to rewind;
    /// its guard becomes a no-op on drop.
    pub fn reset(&mut self) {
        self.blocks.clear();
        self.epoch += 1;
    }

    /// Take a checkpoint; dropping it reclaims everything allocated since.
    ///
    /// The guard borrows the arena exclusively, so checkpoints nest in
    /// strict LIFO order by construction.
    pub fn checkpoint(&mut self) -> crate::Checkpoint<'_> {
        crate::Checkpoint::new(self)
    }

    /// Number of blocks currently allocated.
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Total backing memory in bytes.
    pub fn allocated_bytes(&self) -> usize {
        self.blocks.len() * self.block_size
    }

    /// Bytes consumed by allocations, including alignment padding.
    pub fn used_bytes(&self) -> usize {
        self.blocks.iter().map(|b| b.cursor).sum()
    }

    pub(crate) fn snapshot(&self) -> (usize, usize, u64) {
        let cursor = self.blocks.last().map_or(0, |b| b.cursor);
        (self.blocks.len(), cursor, self.epoch)
    }

    pub(crate) fn rewind_to(&mut self, blocks: usize, cursor: usize, epoch: u64) {
        if epoch != self.epoch {
            // The snapshotted blocks were dropped by a reset; everything the
            // checkpoint would reclaim is already gone.
            return;
        }
        assert!(self.blocks.len() >= blocks);
        self.blocks.truncate(blocks);
        if let Some(last) = self.blocks.last_mut() {
            // Scrub the reclaimed tail so reused memory reads zeroed, the
            // same guarantee fresh blocks give.
            last.data[cursor..last.cursor].fill(0);
            last.cursor = cursor;
        }
    }
}

impl Default for Arena {
    fn default() -> Self {
        Self::new()
    }
}
