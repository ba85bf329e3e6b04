//! Structs and code for memory management.

use core::{alloc::Layout, ptr::NonNull};

use crate::error::MemoryError;

#[cfg(feature = "no_std")]
use ::alloc::alloc;
#[cfg(not(feature = "no_std"))]
use std::alloc;

#[cfg(feature = "allocator_api")]
use core::alloc::Allocator;

/// Memory manager controls allocation and deallocation of storage blocks
/// used by a [`Sequence`](crate::Sequence).
///
/// Growing a sequence never resizes a block in place: a new block is
/// allocated, live elements are moved into it and only then is the old block
/// deallocated. Implementations therefore only need to provide fresh blocks
/// and take them back.
///
/// [`Layout`] arguments passed by the crate always have a non-zero size.
///
/// Default implementation is [`DefaultMemoryManager`].
///
/// If `allocator_api` feature is enabled, this trait is implemented for all
/// [allocators](core::alloc::Allocator).
pub trait ManageMemory {
    /// Allocates a block of memory with size and alignment specified by
    /// `layout` argument.
    ///
    /// # Errors
    ///
    /// Returns [`MemoryError::Allocator`] if the block can't be provided.
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, MemoryError>;

    /// Deallocates a block of memory of provided `layout` at the specified
    /// `address`.
    ///
    /// # Safety
    ///
    /// `address` must have been returned by [`ManageMemory::allocate`] on
    /// this manager with the same `layout` and not deallocated since.
    unsafe fn deallocate(&self, address: NonNull<u8>, layout: Layout);
}

/// Default [memory manager](ManageMemory) that uses the methods exposed by
/// [`alloc`] module.
#[cfg_attr(feature = "debug", derive(Debug))]
#[derive(Clone, Copy, Default)]
pub struct DefaultMemoryManager;

impl ManageMemory for DefaultMemoryManager {
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, MemoryError> {
        debug_assert!(layout.size() > 0, "zero-sized block requested");
        let ptr = unsafe { alloc::alloc(layout) };
        NonNull::new(ptr).ok_or_else(|| {
            log::error!(
                "allocator failed to provide {} bytes aligned to {}",
                layout.size(),
                layout.align()
            );
            MemoryError::allocator()
        })
    }

    unsafe fn deallocate(&self, address: NonNull<u8>, layout: Layout) {
        alloc::dealloc(address.as_ptr(), layout);
    }
}

#[cfg(feature = "allocator_api")]
impl<A: Allocator> ManageMemory for A {
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, MemoryError> {
        Allocator::allocate(self, layout)
            .map(|it| it.cast::<u8>())
            .map_err(|err| {
                log::error!(
                    "allocator failed to provide {} bytes aligned to {}",
                    layout.size(),
                    layout.align()
                );
                MemoryError::from(err)
            })
    }

    unsafe fn deallocate(&self, address: NonNull<u8>, layout: Layout) {
        Allocator::deallocate(self, address, layout)
    }
}
