//! Errors produced by the crate.

#[cfg(any(feature = "error_in_core", not(feature = "no_std")))]
use crate::types::Error;

#[cfg(any(not(feature = "no_std"), feature = "error_in_core"))]
use core::fmt::{Display, Formatter, Result as FmtResult};

/// Represents a class of errors returned by invalid memory operations and
/// allocator failiure.
///
/// When one of these is returned by a growing operation the container is
/// left exactly as it was before the call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryError {
    /// Tried allocating container capacity larger than `isize::MAX` bytes.
    TooLarge,
    /// Allocation failure caused by either resource exhaustion or invalid
    /// arguments being provided to an allocator.
    Allocator(
        #[cfg(feature = "allocator_api")] core::alloc::AllocError,
        #[cfg(not(feature = "allocator_api"))] (),
    ),
}

impl MemoryError {
    #[cfg(not(feature = "allocator_api"))]
    pub(crate) const fn allocator() -> Self {
        MemoryError::Allocator(())
    }

    #[cfg(feature = "allocator_api")]
    pub(crate) const fn allocator() -> Self {
        MemoryError::Allocator(core::alloc::AllocError)
    }
}

#[cfg(any(not(feature = "no_std"), feature = "error_in_core"))]
impl Display for MemoryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            MemoryError::TooLarge => write!(
                f,
                "Tried allocating container capacity larger than `isize::MAX`"
            ),
            MemoryError::Allocator(_) => write!(f, "Allocator error"),
        }
    }
}

#[cfg(any(not(feature = "no_std"), feature = "error_in_core"))]
impl Error for MemoryError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            #[cfg(feature = "allocator_api")]
            MemoryError::Allocator(inner) => Some(inner),
            _ => None,
        }
    }
}

#[cfg(feature = "allocator_api")]
impl From<core::alloc::AllocError> for MemoryError {
    fn from(err: core::alloc::AllocError) -> Self {
        MemoryError::Allocator(err)
    }
}

/// Error returned by positional operations on a
/// [`Sequence`](crate::Sequence).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceError {
    /// Provided `index` isn't a valid position in a sequence of `len`
    /// elements.
    OutOfBounds {
        /// Requested position.
        index: usize,
        /// Length of the sequence at the time of the call.
        len: usize,
    },
    /// Growing the storage block failed.
    Memory(MemoryError),
}

impl From<MemoryError> for SequenceError {
    fn from(err: MemoryError) -> Self {
        SequenceError::Memory(err)
    }
}

#[cfg(any(not(feature = "no_std"), feature = "error_in_core"))]
impl Display for SequenceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            SequenceError::OutOfBounds { index, len } => write!(
                f,
                "Position {} is out of bounds for sequence of length {}",
                index, len
            ),
            SequenceError::Memory(_) => write!(f, "Unable to grow sequence storage"),
        }
    }
}

#[cfg(any(not(feature = "no_std"), feature = "error_in_core"))]
impl Error for SequenceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            SequenceError::Memory(inner) => Some(inner),
            _ => None,
        }
    }
}

/// Error returned when a [`Cursor`](crate::Cursor) no longer denotes the
/// element it was created for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorError {
    /// Storage block was replaced after the cursor was created.
    Reallocated {
        /// Epoch the cursor was created in.
        cursor_epoch: u64,
        /// Current epoch of the sequence.
        current_epoch: u64,
    },
    /// Content of the referenced slot was shifted, removed or replaced.
    Shifted {
        /// Slot index the cursor points to.
        index: usize,
    },
    /// Cursor denotes the past-the-end position which holds no element.
    PastTheEnd,
}

#[cfg(any(not(feature = "no_std"), feature = "error_in_core"))]
impl Display for CursorError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            CursorError::Reallocated {
                cursor_epoch,
                current_epoch,
            } => write!(
                f,
                "Cursor from epoch {} was invalidated by reallocation (current epoch {})",
                cursor_epoch, current_epoch
            ),
            CursorError::Shifted { index } => write!(
                f,
                "Cursor to slot {} was invalidated by a shifting operation",
                index
            ),
            CursorError::PastTheEnd => write!(f, "Dereferenced past-the-end cursor"),
        }
    }
}

#[cfg(any(not(feature = "no_std"), feature = "error_in_core"))]
impl Error for CursorError {}
