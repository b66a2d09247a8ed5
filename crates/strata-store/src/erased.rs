//! The type-erased growable buffer.
//!
//! [`ErasedVec`] stores elements of one `Pod` type as raw bytes, bound to
//! that type at construction. The byte-level operations (grow, pop,
//! swap-remove, resize) need no type information, which is what lets a
//! [`Table`](crate::Table) manage rows of differing element types through
//! one non-generic interface. Typed access re-enters the type system
//! through an [`ElementType`] identity check.

use std::fmt;

use bytemuck::Pod;
use strata_core::ElementType;

use crate::error::BufferError;
use crate::raw::RawBuffer;

/// A growable buffer for one statically known `Pod` element type.
///
/// Capacity doubles from 1 when full. Growth reallocates, invalidating any
/// previously obtained views (the borrow checker enforces this); element
/// positions are only disturbed by [`swap_remove`](Self::swap_remove).
///
/// New cells — from [`push_zeroed`](Self::push_zeroed) or a growing
/// [`resize`](Self::resize) — are zero-initialised, which is a valid value
/// for every `Pod` type. Callers that need a different value write it
/// before reading, but reading first is never undefined.
///
/// ```
/// use strata_store::ErasedVec;
///
/// let mut vec = ErasedVec::of::<u32>();
/// vec.push(7u32).unwrap();
/// vec.push(9u32).unwrap();
/// assert_eq!(vec.as_slice::<u32>().unwrap(), &[7, 9]);
/// assert!(vec.as_slice::<i32>().is_err());
/// ```
pub struct ErasedVec {
    raw: RawBuffer,
    len: usize,
    element: ElementType,
}

impl ErasedVec {
    /// An empty buffer bound to element type `T`.
    ///
    /// The `Pod` bound is the static precondition: only trivially copyable,
    /// standard-layout types may be erased. Zero-sized types are rejected
    /// at construction.
    pub fn of<T: Pod>() -> Self {
        let element = ElementType::of::<T>();
        Self {
            raw: RawBuffer::new(element.size(), element.align()),
            len: 0,
            element,
        }
    }

    /// The element type this buffer is bound to.
    pub fn element(&self) -> ElementType {
        self.element
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the buffer holds no elements.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of elements the buffer can hold without reallocating.
    pub fn capacity(&self) -> usize {
        self.raw.capacity()
    }

    /// Drop all elements. Capacity is retained.
    pub fn clear(&mut self) {
        self.len = 0;
    }

    /// Append one zeroed element and return its bytes.
    ///
    /// This is the untyped growth primitive: it needs no knowledge of the
    /// element type beyond the layout fixed at construction, so callers
    /// holding buffers of differing types can grow them in lockstep.
    pub fn push_zeroed(&mut self) -> &mut [u8] {
        if self.len == self.raw.capacity() {
            self.raw.grow_to(next_capacity(self.raw.capacity()));
        }
        self.len += 1;
        let size = self.element.size();
        let slot = &mut self.raw.bytes_mut(self.len)[(self.len - 1) * size..];
        // The slot may hold stale bytes from a previously popped element.
        slot.fill(0);
        slot
    }

    /// Append a value of the bound type.
    pub fn push<T: Pod>(&mut self, value: T) -> Result<(), BufferError> {
        self.check_type::<T>()?;
        self.push_zeroed().copy_from_slice(bytemuck::bytes_of(&value));
        Ok(())
    }

    /// Remove the last element.
    ///
    /// The backing bytes are left as-is; they are simply no longer
    /// reachable. Fails with [`BufferError::Empty`] on an empty buffer —
    /// popping nothing is almost certainly a caller bug.
    pub fn pop(&mut self) -> Result<(), BufferError> {
        if self.is_empty() {
            return Err(BufferError::Empty);
        }
        self.len -= 1;
        Ok(())
    }

    /// Remove the element at `position` by overwriting it with the last
    /// element's bytes and shrinking by one.
    ///
    /// O(1), order-destroying. This is the removal primitive both the slot
    /// map and the table's column removal are built on.
    pub fn swap_remove(&mut self, position: usize) -> Result<(), BufferError> {
        if self.is_empty() {
            return Err(BufferError::Empty);
        }
        self.check_bounds(position)?;
        let size = self.element.size();
        let last = self.len - 1;
        if position != last {
            self.raw
                .bytes_mut(self.len)
                .copy_within(last * size..(last + 1) * size, position * size);
        }
        self.len -= 1;
        Ok(())
    }

    /// Grow capacity to at least `capacity` elements. Never shrinks.
    pub fn reserve(&mut self, capacity: usize) {
        if capacity > self.raw.capacity() {
            self.raw.grow_to(capacity);
        }
    }

    /// Resize to exactly `count` elements.
    ///
    /// Shrinking truncates without touching the bytes (elements are `Pod`,
    /// nothing needs destruction). Growing exposes zeroed cells.
    pub fn resize(&mut self, count: usize) {
        if count <= self.len {
            self.len = count;
            return;
        }
        let mut capacity = self.raw.capacity();
        if capacity < count {
            while capacity < count {
                capacity = next_capacity(capacity);
            }
            self.raw.grow_to(capacity);
        }
        let size = self.element.size();
        let old_len = self.len;
        self.len = count;
        self.raw.bytes_mut(count)[old_len * size..].fill(0);
    }

    /// The element at `position`.
    pub fn get<T: Pod>(&self, position: usize) -> Result<&T, BufferError> {
        self.check_bounds(position)?;
        self.check_type::<T>()?;
        let size = self.element.size();
        let bytes = self.raw.bytes(self.len);
        Ok(bytemuck::from_bytes(
            &bytes[position * size..(position + 1) * size],
        ))
    }

    /// The element at `position`, mutably.
    pub fn get_mut<T: Pod>(&mut self, position: usize) -> Result<&mut T, BufferError> {
        self.check_bounds(position)?;
        self.check_type::<T>()?;
        let size = self.element.size();
        let bytes = self.raw.bytes_mut(self.len);
        Ok(bytemuck::from_bytes_mut(
            &mut bytes[position * size..(position + 1) * size],
        ))
    }

    /// All elements as a typed slice.
    pub fn as_slice<T: Pod>(&self) -> Result<&[T], BufferError> {
        self.check_type::<T>()?;
        Ok(bytemuck::cast_slice(self.raw.bytes(self.len)))
    }

    /// All elements as a mutable typed slice.
    pub fn as_mut_slice<T: Pod>(&mut self) -> Result<&mut [T], BufferError> {
        self.check_type::<T>()?;
        Ok(bytemuck::cast_slice_mut(self.raw.bytes_mut(self.len)))
    }

    /// Replace this buffer's contents with a copy of `other`'s.
    ///
    /// The checked assignment: fails with [`BufferError::TypeMismatch`] if
    /// the two buffers are bound to different element types, leaving both
    /// unmodified. On success the bytes are duplicated into a freshly sized
    /// buffer.
    pub fn copy_from(&mut self, other: &ErasedVec) -> Result<(), BufferError> {
        if self.element != other.element {
            return Err(BufferError::TypeMismatch {
                expected: self.element,
                found: other.element,
            });
        }
        let mut raw =
            RawBuffer::with_capacity(self.element.size(), self.element.align(), other.len);
        raw.bytes_mut(other.len)
            .copy_from_slice(other.raw.bytes(other.len));
        self.raw = raw;
        self.len = other.len;
        Ok(())
    }

    fn check_type<T: Pod>(&self) -> Result<(), BufferError> {
        if self.element.is::<T>() {
            Ok(())
        } else {
            Err(BufferError::TypeMismatch {
                expected: self.element,
                found: ElementType::of::<T>(),
            })
        }
    }

    fn check_bounds(&self, position: usize) -> Result<(), BufferError> {
        if position < self.len {
            Ok(())
        } else {
            Err(BufferError::OutOfBounds {
                position,
                len: self.len,
            })
        }
    }
}

/// Doubling growth from a floor of one element.
fn next_capacity(capacity: usize) -> usize {
    if capacity == 0 {
        1
    } else {
        capacity * 2
    }
}

impl Clone for ErasedVec {
    fn clone(&self) -> Self {
        let mut raw =
            RawBuffer::with_capacity(self.element.size(), self.element.align(), self.len);
        raw.bytes_mut(self.len)
            .copy_from_slice(self.raw.bytes(self.len));
        Self {
            raw,
            len: self.len,
            element: self.element,
        }
    }
}

impl fmt::Debug for ErasedVec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErasedVec")
            .field("element", &self.element.name())
            .field("len", &self.len)
            .field("capacity", &self.raw.capacity())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_round_trip() {
        let mut vec = ErasedVec::of::<u64>();
        vec.push(10u64).unwrap();
        vec.push(20u64).unwrap();
        vec.push(30u64).unwrap();
        assert_eq!(vec.len(), 3);
        assert_eq!(*vec.get::<u64>(1).unwrap(), 20);
        assert_eq!(vec.as_slice::<u64>().unwrap(), &[10, 20, 30]);
    }

    #[test]
    fn capacity_doubles_from_one() {
        let mut vec = ErasedVec::of::<u8>();
        assert_eq!(vec.capacity(), 0);
        vec.push_zeroed();
        assert_eq!(vec.capacity(), 1);
        vec.push_zeroed();
        assert_eq!(vec.capacity(), 2);
        vec.push_zeroed();
        assert_eq!(vec.capacity(), 4);
        vec.push_zeroed();
        vec.push_zeroed();
        assert_eq!(vec.capacity(), 8);
    }

    #[test]
    fn wrong_type_is_rejected_everywhere() {
        let mut vec = ErasedVec::of::<u32>();
        vec.push(1u32).unwrap();
        assert!(matches!(
            vec.get::<f32>(0),
            Err(BufferError::TypeMismatch { .. })
        ));
        assert!(matches!(
            vec.as_slice::<f32>(),
            Err(BufferError::TypeMismatch { .. })
        ));
        assert!(matches!(
            vec.push(1.0f32),
            Err(BufferError::TypeMismatch { .. })
        ));
        // Nothing was appended by the failed push.
        assert_eq!(vec.len(), 1);
    }

    #[test]
    fn pop_on_empty_fails() {
        let mut vec = ErasedVec::of::<u32>();
        assert_eq!(vec.pop(), Err(BufferError::Empty));
        vec.push(1u32).unwrap();
        vec.pop().unwrap();
        assert!(vec.is_empty());
    }

    #[test]
    fn swap_remove_moves_last_into_gap() {
        let mut vec = ErasedVec::of::<u32>();
        for v in [10u32, 20, 30, 40] {
            vec.push(v).unwrap();
        }
        vec.swap_remove(1).unwrap();
        assert_eq!(vec.as_slice::<u32>().unwrap(), &[10, 40, 30]);
        // Removing the last element needs no copy.
        vec.swap_remove(2).unwrap();
        assert_eq!(vec.as_slice::<u32>().unwrap(), &[10, 40]);
    }

    #[test]
    fn swap_remove_bounds_and_empty_errors() {
        let mut vec = ErasedVec::of::<u32>();
        assert_eq!(vec.swap_remove(0), Err(BufferError::Empty));
        vec.push(1u32).unwrap();
        assert_eq!(
            vec.swap_remove(1),
            Err(BufferError::OutOfBounds { position: 1, len: 1 })
        );
        assert_eq!(vec.len(), 1);
    }

    #[test]
    fn get_out_of_bounds() {
        let mut vec = ErasedVec::of::<u32>();
        vec.push(1u32).unwrap();
        assert_eq!(
            vec.get::<u32>(3),
            Err(BufferError::OutOfBounds { position: 3, len: 1 })
        );
    }

    #[test]
    fn reserve_never_shrinks() {
        let mut vec = ErasedVec::of::<u32>();
        vec.reserve(10);
        assert_eq!(vec.capacity(), 10);
        vec.reserve(4);
        assert_eq!(vec.capacity(), 10);
        assert_eq!(vec.len(), 0);
    }

    #[test]
    fn resize_truncates_and_grows_zeroed() {
        let mut vec = ErasedVec::of::<u16>();
        vec.push(7u16).unwrap();
        vec.push(8u16).unwrap();
        vec.resize(1);
        assert_eq!(vec.as_slice::<u16>().unwrap(), &[7]);
        vec.resize(4);
        // The formerly truncated cell is re-exposed zeroed, not stale.
        assert_eq!(vec.as_slice::<u16>().unwrap(), &[7, 0, 0, 0]);
    }

    #[test]
    fn pushed_slot_is_zeroed_after_pop_left_stale_bytes() {
        let mut vec = ErasedVec::of::<u32>();
        vec.push(0xDEAD_BEEFu32).unwrap();
        vec.pop().unwrap();
        let slot = vec.push_zeroed();
        assert!(slot.iter().all(|&b| b == 0));
        assert_eq!(*vec.get::<u32>(0).unwrap(), 0);
    }

    #[test]
    fn copy_from_duplicates_bytes() {
        let mut src = ErasedVec::of::<u32>();
        src.push(5u32).unwrap();
        src.push(6u32).unwrap();
        let mut dst = ErasedVec::of::<u32>();
        dst.push(99u32).unwrap();

        dst.copy_from(&src).unwrap();
        assert_eq!(dst.as_slice::<u32>().unwrap(), &[5, 6]);

        // The copy is independent of the source.
        *src.get_mut::<u32>(0).unwrap() = 42;
        assert_eq!(*dst.get::<u32>(0).unwrap(), 5);
    }

    #[test]
    fn copy_from_mismatched_types_leaves_both_unmodified() {
        let mut ints = ErasedVec::of::<u32>();
        ints.push(1u32).unwrap();
        let mut floats = ErasedVec::of::<f32>();
        floats.push(2.5f32).unwrap();

        assert!(matches!(
            ints.copy_from(&floats),
            Err(BufferError::TypeMismatch { .. })
        ));
        assert_eq!(ints.as_slice::<u32>().unwrap(), &[1]);
        assert_eq!(floats.as_slice::<f32>().unwrap(), &[2.5]);
    }

    #[test]
    fn clone_is_independent() {
        let mut vec = ErasedVec::of::<u64>();
        vec.push(1u64).unwrap();
        let clone = vec.clone();
        vec.push(2u64).unwrap();
        assert_eq!(clone.as_slice::<u64>().unwrap(), &[1]);
        assert_eq!(clone.capacity(), 1);
    }

    #[test]
    fn high_alignment_element() {
        let mut vec = ErasedVec::of::<u128>();
        vec.push(u128::MAX).unwrap();
        vec.push_zeroed();
        assert_eq!(*vec.get::<u128>(0).unwrap(), u128::MAX);
        assert_eq!(*vec.get::<u128>(1).unwrap(), 0);
        // The typed view is correctly aligned for the widest elements.
        assert_eq!(vec.as_slice::<u128>().unwrap().len(), 2);
    }

    #[cfg(not(miri))]
    mod proptests {
        use super::*;
        use proptest::prelude::*;

        #[derive(Clone, Debug)]
        enum Op {
            Push(u64),
            Pop,
            SwapRemove(usize),
        }

        fn op() -> impl Strategy<Value = Op> {
            prop_oneof![
                3 => any::<u64>().prop_map(Op::Push),
                1 => Just(Op::Pop),
                1 => any::<usize>().prop_map(Op::SwapRemove),
            ]
        }

        proptest! {
            /// ErasedVec agrees with `Vec<u64>` under the same operations.
            #[test]
            fn matches_reference_vec(ops in proptest::collection::vec(op(), 1..200)) {
                let mut erased = ErasedVec::of::<u64>();
                let mut reference: Vec<u64> = Vec::new();

                for op in ops {
                    match op {
                        Op::Push(v) => {
                            erased.push(v).unwrap();
                            reference.push(v);
                        }
                        Op::Pop => {
                            prop_assert_eq!(erased.pop().is_ok(), reference.pop().is_some());
                        }
                        Op::SwapRemove(i) => {
                            if !reference.is_empty() {
                                let i = i % reference.len();
                                erased.swap_remove(i).unwrap();
                                reference.swap_remove(i);
                            } else {
                                prop_assert_eq!(erased.swap_remove(i), Err(BufferError::Empty));
                            }
                        }
                    }
                    prop_assert_eq!(erased.len(), reference.len());
                }
                prop_assert_eq!(erased.as_slice::<u64>().unwrap(), reference.as_slice());
            }
        }
    }
}
