#![cfg_attr(feature = "no_std", no_std)]
#![cfg_attr(feature = "allocator_api", feature(allocator_api))]
#![cfg_attr(feature = "error_in_core", feature(error_in_core))]
#![warn(missing_docs)]
#![doc = include_str!("../doc/crate.md")]

#[cfg(feature = "no_std")]
extern crate alloc;

mod common;
pub mod cursor;
pub mod error;
pub mod memory;
pub mod range;
pub mod raw;
pub mod tracker;
mod types;

pub use cursor::Cursor;
pub use error::{CursorError, MemoryError, SequenceError};
pub use memory::{DefaultMemoryManager, ManageMemory};
pub use range::SlotRange;

use core::{
    fmt,
    mem::size_of,
    ops::{Deref, DerefMut},
    ptr,
};

use common::grown_capacity;
use raw::RawBlock;
use tracker::SlotTracker;

/// A growable sequence of `T` values stored in one contiguous block of
/// memory.
///
/// Elements occupy slots `[0, len)` of the block in insertion order. When an
/// append or insert doesn't fit, a larger block is allocated, every element is
/// moved into it and the old block is released. Handles obtained through
/// [`Cursor`]s are checked against that history, so use of a handle that was
/// invalidated by a mutation is reported instead of reading stale memory.
///
/// Type argument `A` specifies the [memory manager](ManageMemory) that
/// provides storage blocks.
///
/// # Example
///
/// ```rust
#[doc = include_str!("../demos/cursors.rs")]
/// ```
pub struct Sequence<T, A: ManageMemory = DefaultMemoryManager> {
    block: RawBlock<T, A>,
    len: usize,
    tracker: SlotTracker,
}

impl<T> Sequence<T> {
    /// Creates a new empty `Sequence` which doesn't own a storage block yet.
    pub fn new() -> Self {
        Self::new_in(DefaultMemoryManager)
    }

    /// Creates a new `Sequence` with a storage block able to hold exactly
    /// `capacity` elements.
    ///
    /// # Panics
    ///
    /// Panics if capacity exceeds `isize::MAX` bytes or the allocator can't
    /// provide required amount of memory.
    pub fn with_capacity(capacity: usize) -> Self {
        match Self::try_with_capacity(capacity) {
            Ok(it) => it,
            Err(err) => panic!("unable to allocate sequence storage: {:?}", err),
        }
    }

    /// Creates a new `Sequence` with a storage block able to hold exactly
    /// `capacity` elements, or returns a [`MemoryError`] if the block can't be
    /// allocated.
    pub fn try_with_capacity(capacity: usize) -> Result<Self, MemoryError> {
        Self::with_capacity_in(capacity, DefaultMemoryManager)
    }
}

impl<T, A: ManageMemory> Sequence<T, A> {
    /// Creates a new empty `Sequence` whose storage blocks will be provided
    /// by `alloc`.
    pub fn new_in(alloc: A) -> Self {
        Sequence {
            block: RawBlock::new_in(alloc),
            len: 0,
            tracker: SlotTracker::new(),
        }
    }

    /// Creates a new `Sequence` with a block of `capacity` slots provided by
    /// `alloc`.
    pub fn with_capacity_in(capacity: usize, alloc: A) -> Result<Self, MemoryError> {
        Ok(Sequence {
            block: RawBlock::with_capacity_in(capacity, alloc)?,
            len: 0,
            tracker: SlotTracker::new(),
        })
    }

    /// Returns the number of stored elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the sequence holds no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of elements the current storage block can hold
    /// without reallocating.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.block.capacity()
    }

    /// Returns the base address of the storage block.
    ///
    /// Comparing values returned before and after a mutation tells whether
    /// the block was replaced. The pointer is dangling while no block is
    /// allocated and must not be read after any mutation of the sequence.
    #[inline]
    pub fn as_ptr(&self) -> *const T {
        self.block.as_ptr()
    }

    /// Returns a mutable pointer to the base of the storage block.
    ///
    /// See [`Sequence::as_ptr`].
    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.block.as_ptr()
    }

    /// Returns the number of times the storage block was replaced.
    ///
    /// Every cursor created in an earlier epoch is invalid.
    #[inline]
    pub fn epoch(&self) -> u64 {
        self.tracker.epoch()
    }

    /// Returns the memory manager used by this sequence.
    #[inline]
    pub fn manager(&self) -> &A {
        self.block.manager()
    }

    /// Returns stored elements as a slice.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        unsafe { core::slice::from_raw_parts(self.block.as_ptr(), self.len) }
    }

    /// Returns stored elements as a mutable slice.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        unsafe { core::slice::from_raw_parts_mut(self.block.as_ptr(), self.len) }
    }

    /// Ensures the storage block can hold at least `capacity` elements,
    /// returning the new base address if the block had to be replaced.
    ///
    /// Requests that don't exceed current capacity are no-ops and never
    /// shrink the block. Growing the block invalidates every cursor.
    ///
    /// # Errors
    ///
    /// Returns a [`MemoryError`] if the new block can't be allocated. The
    /// sequence is left unchanged in that case.
    pub fn try_reserve(&mut self, capacity: usize) -> Result<Option<*const T>, MemoryError> {
        if capacity <= self.capacity() {
            log::debug!(
                "reserve({}) within capacity {}, block kept",
                capacity,
                self.capacity()
            );
            return Ok(None);
        }
        self.relocate(capacity).map(Some)
    }

    /// Ensures the storage block can hold at least `capacity` elements.
    ///
    /// See [`Sequence::try_reserve`].
    ///
    /// # Panics
    ///
    /// Panics if the new block can't be allocated.
    pub fn reserve(&mut self, capacity: usize) -> Option<*const T> {
        match self.try_reserve(capacity) {
            Ok(it) => it,
            Err(err) => panic!("unable to grow sequence storage: {:?}", err),
        }
    }

    /// Ensures at least `additional` more elements can be appended without
    /// reallocating.
    ///
    /// Unlike [`Sequence::try_reserve`] this applies the regular growth policy,
    /// so the resulting capacity may exceed `len + additional`.
    pub fn try_reserve_additional(
        &mut self,
        additional: usize,
    ) -> Result<Option<*const T>, MemoryError> {
        let required = self
            .len
            .checked_add(additional)
            .ok_or(MemoryError::TooLarge)?;
        if required <= self.capacity() {
            return Ok(None);
        }
        let target = grown_capacity::<T>(self.capacity(), required)?;
        self.relocate(target).map(Some)
    }

    /// Ensures at least `additional` more elements can be appended without
    /// reallocating.
    ///
    /// # Panics
    ///
    /// Panics if the new block can't be allocated.
    pub fn reserve_additional(&mut self, additional: usize) -> Option<*const T> {
        match self.try_reserve_additional(additional) {
            Ok(it) => it,
            Err(err) => panic!("unable to grow sequence storage: {:?}", err),
        }
    }

    /// Replaces the storage block with one holding exactly `len` elements,
    /// returning the new base address if the block was replaced.
    ///
    /// Replacing the block invalidates every cursor.
    pub fn shrink_to_fit(&mut self) -> Result<Option<*const T>, MemoryError> {
        if size_of::<T>() == 0 || self.capacity() == self.len {
            log::debug!("shrink_to_fit on a tight block, block kept");
            return Ok(None);
        }
        self.relocate(self.len).map(Some)
    }

    fn relocate(&mut self, new_capacity: usize) -> Result<*const T, MemoryError> {
        let old_base = self.as_ptr();
        let old_capacity = self.capacity();
        self.block.relocate(new_capacity, self.len)?;
        self.tracker.bump_epoch();
        log::trace!(
            "sequence storage moved {:p} -> {:p}, capacity {} -> {}, epoch {}",
            old_base,
            self.as_ptr(),
            old_capacity,
            self.capacity(),
            self.epoch()
        );
        Ok(self.as_ptr())
    }

    /// Makes room for one more element, growing the block when it's full.
    fn reserve_slot(&mut self) -> Result<(), MemoryError> {
        self.tracker.try_reserve(1)?;
        if self.len < self.capacity() {
            return Ok(());
        }
        let required = self.len.checked_add(1).ok_or(MemoryError::TooLarge)?;
        let target = grown_capacity::<T>(self.capacity(), required)?;
        self.relocate(target).map(|_| ())
    }

    /// Appends `value` as the last element and returns a cursor to it.
    ///
    /// If the block is full it is replaced by a larger one and every existing
    /// cursor becomes invalid. Otherwise only the past-the-end cursor is
    /// invalidated.
    ///
    /// # Errors
    ///
    /// Returns a [`MemoryError`] if a larger block can't be allocated. The
    /// sequence is left unchanged and `value` is dropped.
    pub fn try_push(&mut self, value: T) -> Result<Cursor<T>, MemoryError> {
        self.reserve_slot()?;
        let position = self.len;
        unsafe {
            self.block.as_ptr().add(position).write(value);
        }
        self.len += 1;
        self.tracker.inserted(position);
        Ok(self.cursor_unchecked(position))
    }

    /// Appends `value` as the last element and returns a cursor to it.
    ///
    /// See [`Sequence::try_push`].
    ///
    /// # Panics
    ///
    /// Panics if a larger block can't be allocated.
    pub fn push(&mut self, value: T) -> Cursor<T> {
        match self.try_push(value) {
            Ok(it) => it,
            Err(err) => panic!("unable to grow sequence storage: {:?}", err),
        }
    }

    /// Inserts `value` before the element at `position` and returns a cursor
    /// to it. Inserting at `len` appends.
    ///
    /// Elements at `position` and after it move one slot right, so their
    /// cursors and the past-the-end cursor are invalidated. Cursors before
    /// `position` stay valid unless the block had to grow, in which case every
    /// cursor is invalidated.
    ///
    /// # Errors
    ///
    /// - [`SequenceError::OutOfBounds`] if `position > len`.
    /// - [`SequenceError::Memory`] if a larger block can't be allocated.
    ///
    /// The sequence is left unchanged when an error is returned.
    pub fn insert(&mut self, position: usize, value: T) -> Result<Cursor<T>, SequenceError> {
        if position > self.len {
            return Err(SequenceError::OutOfBounds {
                index: position,
                len: self.len,
            });
        }
        self.reserve_slot()?;
        unsafe {
            let slot = self.block.as_ptr().add(position);
            ptr::copy(slot, slot.add(1), self.len - position);
            slot.write(value);
        }
        self.len += 1;
        self.tracker.inserted(position);
        Ok(self.cursor_unchecked(position))
    }

    /// Removes and returns the element at `position`.
    ///
    /// Later elements move one slot left; capacity is unchanged. Cursors at
    /// `position` and after it, and the past-the-end cursor, are invalidated.
    pub fn remove(&mut self, position: usize) -> Result<T, SequenceError> {
        if position >= self.len {
            return Err(SequenceError::OutOfBounds {
                index: position,
                len: self.len,
            });
        }
        let value = unsafe {
            let slot = self.block.as_ptr().add(position);
            let value = slot.read();
            ptr::copy(slot.add(1), slot, self.len - position - 1);
            value
        };
        self.len -= 1;
        self.tracker.removed(position);
        Ok(value)
    }

    /// Drops the element at `position` and returns a cursor to the element
    /// that followed it, or the past-the-end cursor if it was the last one.
    ///
    /// Invalidation follows [`Sequence::remove`].
    pub fn erase(&mut self, position: usize) -> Result<Cursor<T>, SequenceError> {
        let removed = self.remove(position)?;
        drop(removed);
        Ok(self.cursor_unchecked(position))
    }

    /// Removes the last element and returns it, or `None` if the sequence is
    /// empty.
    pub fn pop(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        self.len -= 1;
        self.tracker.removed(self.len);
        Some(unsafe { self.block.as_ptr().add(self.len).read() })
    }

    /// Drops every element from `len` onward. Has no effect if the sequence
    /// isn't longer than `len`.
    pub fn truncate(&mut self, len: usize) {
        if len >= self.len {
            return;
        }
        let removed = self.len - len;
        // length is updated first so a panicking destructor can't cause a
        // double drop
        self.len = len;
        self.tracker.truncated(len);
        unsafe {
            let tail = ptr::slice_from_raw_parts_mut(self.block.as_ptr().add(len), removed);
            ptr::drop_in_place(tail);
        }
    }

    /// Drops every element. Capacity is unchanged.
    pub fn clear(&mut self) {
        self.truncate(0)
    }

    fn cursor_unchecked(&self, index: usize) -> Cursor<T> {
        // index <= len always has a stamp
        let stamp = self.tracker.stamp(index).unwrap_or(u64::MAX);
        Cursor::new(index, self.tracker.epoch(), stamp)
    }

    /// Returns a cursor to the first element, or the past-the-end cursor if
    /// the sequence is empty.
    pub fn begin(&self) -> Cursor<T> {
        self.cursor_unchecked(0)
    }

    /// Returns the past-the-end cursor.
    pub fn end(&self) -> Cursor<T> {
        self.cursor_unchecked(self.len)
    }

    /// Returns a cursor to slot `index`; `index == len` yields the
    /// past-the-end cursor.
    pub fn cursor(&self, index: usize) -> Result<Cursor<T>, SequenceError> {
        if index > self.len {
            return Err(SequenceError::OutOfBounds {
                index,
                len: self.len,
            });
        }
        Ok(self.cursor_unchecked(index))
    }

    /// Returns the current index of the slot `cursor` denotes if it's still
    /// valid. A valid past-the-end cursor resolves to `len`.
    pub fn index_of(&self, cursor: &Cursor<T>) -> Result<usize, CursorError> {
        self.tracker
            .check(cursor.epoch, cursor.index, cursor.stamp)
            .map(|_| cursor.index)
    }

    /// Returns `true` if `cursor` still denotes the slot it was created for.
    pub fn is_valid(&self, cursor: &Cursor<T>) -> bool {
        self.index_of(cursor).is_ok()
    }

    /// Returns a reference to the element `cursor` denotes.
    ///
    /// # Errors
    ///
    /// - [`CursorError::Reallocated`] if the block was replaced after the
    ///   cursor was created.
    /// - [`CursorError::Shifted`] if the slot's content changed.
    /// - [`CursorError::PastTheEnd`] for a valid past-the-end cursor.
    pub fn get_at(&self, cursor: &Cursor<T>) -> Result<&T, CursorError> {
        let index = self.index_of(cursor)?;
        self.as_slice().get(index).ok_or(CursorError::PastTheEnd)
    }

    /// Returns a mutable reference to the element `cursor` denotes.
    ///
    /// See [`Sequence::get_at`].
    pub fn get_mut_at(&mut self, cursor: &Cursor<T>) -> Result<&mut T, CursorError> {
        let index = self.index_of(cursor)?;
        self.as_mut_slice()
            .get_mut(index)
            .ok_or(CursorError::PastTheEnd)
    }
}

impl<T, A: ManageMemory> Drop for Sequence<T, A> {
    fn drop(&mut self) {
        unsafe {
            ptr::drop_in_place(self.as_mut_slice() as *mut [T]);
        }
    }
}

impl<T, A: ManageMemory> Deref for Sequence<T, A> {
    type Target = [T];

    #[inline]
    fn deref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T, A: ManageMemory> DerefMut for Sequence<T, A> {
    #[inline]
    fn deref_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T, A: ManageMemory + Default> Default for Sequence<T, A> {
    fn default() -> Self {
        Self::new_in(A::default())
    }
}

impl<T: Clone, A: ManageMemory + Clone> Clone for Sequence<T, A> {
    fn clone(&self) -> Self {
        let mut result = match Self::with_capacity_in(self.len, self.manager().clone()) {
            Ok(it) => it,
            Err(err) => panic!("unable to allocate sequence storage: {:?}", err),
        };
        for value in self.iter() {
            result.push(value.clone());
        }
        result
    }
}

impl<T: fmt::Debug, A: ManageMemory> fmt::Debug for Sequence<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T, U, A: ManageMemory, B: ManageMemory> PartialEq<Sequence<U, B>> for Sequence<T, A>
where
    T: PartialEq<U>,
{
    fn eq(&self, other: &Sequence<U, B>) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Eq, A: ManageMemory> Eq for Sequence<T, A> {}

impl<T, U, A: ManageMemory> PartialEq<[U]> for Sequence<T, A>
where
    T: PartialEq<U>,
{
    fn eq(&self, other: &[U]) -> bool {
        self.as_slice() == other
    }
}

impl<T, U, A: ManageMemory> PartialEq<&[U]> for Sequence<T, A>
where
    T: PartialEq<U>,
{
    fn eq(&self, other: &&[U]) -> bool {
        self.as_slice() == *other
    }
}

impl<T, U, A: ManageMemory, const N: usize> PartialEq<[U; N]> for Sequence<T, A>
where
    T: PartialEq<U>,
{
    fn eq(&self, other: &[U; N]) -> bool {
        self.as_slice() == &other[..]
    }
}

impl<T, A: ManageMemory> Extend<T> for Sequence<T, A> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        self.reserve_additional(iter.size_hint().0);
        for value in iter {
            self.push(value);
        }
    }
}

impl<T> FromIterator<T> for Sequence<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut result = Sequence::new();
        result.extend(iter);
        result
    }
}

impl<'a, T, A: ManageMemory> IntoIterator for &'a Sequence<T, A> {
    type Item = &'a T;
    type IntoIter = core::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T, A: ManageMemory> IntoIterator for &'a mut Sequence<T, A> {
    type Item = &'a mut T;
    type IntoIter = core::slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}
