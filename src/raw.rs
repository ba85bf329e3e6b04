//! Owned storage block backing a [`Sequence`](crate::Sequence).

use core::{marker::PhantomData, mem::size_of, ptr::NonNull};

use crate::{
    common::array_layout,
    error::MemoryError,
    memory::{DefaultMemoryManager, ManageMemory},
};

/// One contiguous block of `capacity` slots for values of type `T`.
///
/// The block never tracks which slots are initialized; that's the job of the
/// owning container. Dropping a `RawBlock` only releases memory.
pub struct RawBlock<T, A: ManageMemory = DefaultMemoryManager> {
    base: NonNull<T>,
    capacity: usize,
    alloc: A,
    _owned: PhantomData<T>,
}

impl<T, A: ManageMemory> RawBlock<T, A> {
    const IS_ZST: bool = size_of::<T>() == 0;

    /// Creates a block that owns no memory yet.
    ///
    /// Blocks of zero-sized types report a capacity of `usize::MAX` and never
    /// allocate.
    pub fn new_in(alloc: A) -> Self {
        RawBlock {
            base: NonNull::dangling(),
            capacity: if Self::IS_ZST { usize::MAX } else { 0 },
            alloc,
            _owned: PhantomData,
        }
    }

    /// Allocates a block able to hold exactly `capacity` values.
    pub fn with_capacity_in(capacity: usize, alloc: A) -> Result<Self, MemoryError> {
        let mut result = Self::new_in(alloc);
        if capacity > result.capacity {
            result.relocate(capacity, 0)?;
        }
        Ok(result)
    }

    /// Returns the number of slots in this block.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the address of the first slot.
    ///
    /// The pointer is dangling (but aligned) while no memory is owned.
    #[inline]
    pub fn as_ptr(&self) -> *mut T {
        self.base.as_ptr()
    }

    /// Returns the memory manager used by this block.
    #[inline]
    pub fn manager(&self) -> &A {
        &self.alloc
    }

    /// Returns `true` if this block currently owns allocated memory.
    #[inline]
    pub fn is_allocated(&self) -> bool {
        !Self::IS_ZST && self.capacity > 0
    }

    /// Moves the first `live` values into a newly allocated block of
    /// `new_capacity` slots and releases the current one.
    ///
    /// The new block is obtained before anything is moved, so an allocation
    /// failure leaves this block and its contents untouched.
    ///
    /// Passing a `new_capacity` of 0 releases the block.
    pub fn relocate(&mut self, new_capacity: usize, live: usize) -> Result<(), MemoryError> {
        debug_assert!(live <= new_capacity && live <= self.capacity);
        if Self::IS_ZST {
            return Ok(());
        }

        let new_base = if new_capacity == 0 {
            NonNull::dangling()
        } else {
            let layout = array_layout::<T>(new_capacity)?;
            self.alloc.allocate(layout)?.cast::<T>()
        };

        unsafe {
            // SAFETY: blocks are distinct live allocations (or `live` is 0)
            core::ptr::copy_nonoverlapping(self.base.as_ptr(), new_base.as_ptr(), live);
            self.release();
        }

        self.base = new_base;
        self.capacity = new_capacity;
        Ok(())
    }

    /// Deallocates owned memory without touching `base` or `capacity`.
    unsafe fn release(&mut self) {
        if !self.is_allocated() {
            return;
        }
        // SAFETY: layout was valid when the block was allocated
        if let Ok(layout) = array_layout::<T>(self.capacity) {
            self.alloc.deallocate(self.base.cast::<u8>(), layout);
        }
    }
}

impl<T, A: ManageMemory> Drop for RawBlock<T, A> {
    fn drop(&mut self) {
        unsafe { self.release() }
    }
}

unsafe impl<T: Send, A: ManageMemory + Send> Send for RawBlock<T, A> {}
unsafe impl<T: Sync, A: ManageMemory + Sync> Sync for RawBlock<T, A> {}

#[cfg(feature = "debug")]
impl<T, A: ManageMemory> core::fmt::Debug for RawBlock<T, A> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RawBlock")
            .field("base", &self.base)
            .field("capacity", &self.capacity)
            .finish()
    }
}
