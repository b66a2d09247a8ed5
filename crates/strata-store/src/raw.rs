//! Aligned raw allocation for [`crate::ErasedVec`].
//!
//! This module is the crate's only `unsafe` boundary. It owns exactly one
//! concern: a byte region allocated at a caller-specified element layout.
//! Everything above it works on the `&[u8]` views returned here and on
//! `bytemuck` casts, in safe code.
//!
//! Invariant: every allocated byte is initialized (allocation is zeroing),
//! so any range within capacity may be exposed as `&[u8]`.

#![allow(unsafe_code)]

use std::alloc::{alloc_zeroed, dealloc, handle_alloc_error, Layout};
use std::ptr::NonNull;

/// An owned byte region sized in elements of one fixed layout.
pub(crate) struct RawBuffer {
    ptr: NonNull<u8>,
    /// Capacity in elements, not bytes.
    capacity: usize,
    size: usize,
    align: usize,
}

impl RawBuffer {
    /// An empty buffer for elements of the given layout. Does not allocate.
    pub(crate) fn new(size: usize, align: usize) -> Self {
        assert!(size > 0, "zero-sized elements are not supported");
        assert!(align.is_power_of_two());
        Self {
            // Aligned dangling pointer; never dereferenced at capacity 0.
            ptr: unsafe { NonNull::new_unchecked(align as *mut u8) },
            capacity: 0,
            size,
            align,
        }
    }

    /// A zeroed buffer with room for exactly `capacity` elements.
    pub(crate) fn with_capacity(size: usize, align: usize, capacity: usize) -> Self {
        let mut buf = Self::new(size, align);
        if capacity > 0 {
            buf.grow_to(capacity);
        }
        buf
    }

    /// Capacity in elements.
    pub(crate) fn capacity(&self) -> usize {
        self.capacity
    }

    /// Reallocate to hold `new_capacity` elements, copying the existing
    /// bytes and zeroing the remainder.
    ///
    /// # Panics
    ///
    /// Panics if the byte size overflows `isize`; aborts on allocation
    /// failure (the standard library's OOM path).
    pub(crate) fn grow_to(&mut self, new_capacity: usize) {
        debug_assert!(new_capacity > self.capacity);
        let new_layout = Layout::from_size_align(
            new_capacity
                .checked_mul(self.size)
                .expect("buffer capacity overflow"),
            self.align,
        )
        .expect("buffer capacity overflow");

        // SAFETY: `new_layout` has non-zero size (size > 0, new_capacity >
        // capacity >= 0 and new_capacity > 0 here).
        let new_ptr = unsafe { alloc_zeroed(new_layout) };
        let Some(new_ptr) = NonNull::new(new_ptr) else {
            handle_alloc_error(new_layout);
        };

        if self.capacity > 0 {
            // SAFETY: both regions are live, disjoint, and at least
            // `capacity * size` bytes long.
            unsafe {
                std::ptr::copy_nonoverlapping(
                    self.ptr.as_ptr(),
                    new_ptr.as_ptr(),
                    self.capacity * self.size,
                );
                dealloc(self.ptr.as_ptr(), self.layout());
            }
        }

        self.ptr = new_ptr;
        self.capacity = new_capacity;
    }

    /// The first `count` elements as bytes.
    pub(crate) fn bytes(&self, count: usize) -> &[u8] {
        debug_assert!(count <= self.capacity);
        // SAFETY: `count * size` bytes are within the allocation and
        // initialized (zeroing allocation); the pointer is aligned and
        // non-null, and valid for zero-length views even when dangling.
        unsafe { std::slice::from_raw_parts(self.ptr.as_ptr(), count * self.size) }
    }

    /// The first `count` elements as mutable bytes.
    pub(crate) fn bytes_mut(&mut self, count: usize) -> &mut [u8] {
        debug_assert!(count <= self.capacity);
        // SAFETY: as for `bytes`, plus `&mut self` guarantees uniqueness.
        unsafe { std::slice::from_raw_parts_mut(self.ptr.as_ptr(), count * self.size) }
    }

    fn layout(&self) -> Layout {
        // Cannot fail: an identical layout was validated when allocating.
        Layout::from_size_align(self.capacity * self.size, self.align)
            .expect("existing allocation layout is valid")
    }
}

impl Drop for RawBuffer {
    fn drop(&mut self) {
        if self.capacity > 0 {
            // SAFETY: the pointer was returned by `alloc_zeroed` with this
            // exact layout and has not been freed.
            unsafe { dealloc(self.ptr.as_ptr(), self.layout()) };
        }
    }
}

// SAFETY: RawBuffer exclusively owns its allocation; the raw pointer is
// never shared outside the struct.
unsafe impl Send for RawBuffer {}
unsafe impl Sync for RawBuffer {}
