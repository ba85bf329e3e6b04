//! Positional handles into a [`Sequence`](crate::Sequence).
//!
//! A [`Cursor`] plays the role of an iterator/pointer/reference obtained from
//! a growable contiguous container. It doesn't borrow the sequence, so it can
//! be kept across mutations; the sequence then tells whether it still denotes
//! the element it was created for:
//!
//! - growing the storage block (append at full capacity, reserve, shrink)
//!   invalidates every cursor,
//! - appending without growth invalidates only the past-the-end cursor,
//! - inserting or erasing at `position` invalidates cursors at `position` and
//!   after it, including the past-the-end cursor.
//!
//! A cursor must only be used with the sequence that produced it.

use core::{fmt, hash::Hash, marker::PhantomData};

/// A copyable handle to a slot of a [`Sequence`](crate::Sequence) or to its
/// past-the-end position.
///
/// See [module documentation](crate::cursor) for invalidation rules.
pub struct Cursor<T> {
    pub(crate) index: usize,
    pub(crate) epoch: u64,
    pub(crate) stamp: u64,
    pub(crate) _phantom: PhantomData<fn() -> T>,
}

impl<T> Cursor<T> {
    pub(crate) fn new(index: usize, epoch: u64, stamp: u64) -> Self {
        Cursor {
            index,
            epoch,
            stamp,
            _phantom: PhantomData,
        }
    }

    /// Returns the slot index this cursor was created for.
    ///
    /// The index is returned even if the cursor was invalidated since.
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Returns the storage epoch this cursor was created in.
    #[inline]
    pub fn epoch(&self) -> u64 {
        self.epoch
    }
}

impl<T> Clone for Cursor<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Cursor<T> {}

impl<T> PartialEq for Cursor<T> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index && self.epoch == other.epoch && self.stamp == other.stamp
    }
}

impl<T> Eq for Cursor<T> {}

impl<T> Hash for Cursor<T> {
    fn hash<H: core::hash::Hasher>(&self, state: &mut H) {
        self.index.hash(state);
        self.epoch.hash(state);
        self.stamp.hash(state);
    }
}

impl<T> fmt::Debug for Cursor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor")
            .field("index", &self.index)
            .field("epoch", &self.epoch)
            .field("stamp", &self.stamp)
            .finish()
    }
}
