//! Bookkeeping that decides whether a [`Cursor`](crate::Cursor) is still
//! valid.
//!
//! Every slot of a sequence, plus the past-the-end position, carries a stamp.
//! A stamp is renewed whenever the slot's content changes identity (an
//! element is shifted into it, removed from it, or it turns into or stops
//! being the end position). Replacing the storage block bumps the epoch,
//! which invalidates every cursor at once.

use crate::{error::CursorError, error::MemoryError, range::SlotRange};

#[cfg(feature = "no_std")]
use crate::types::{vec, Vec};

/// Keeps per-slot stamps and the storage epoch of a sequence.
///
/// Holds exactly `len + 1` stamps where the last one belongs to the
/// past-the-end position.
#[derive(Clone)]
pub struct SlotTracker {
    epoch: u64,
    next_stamp: u64,
    stamps: Vec<u64>,
}

impl SlotTracker {
    /// Constructs a tracker for an empty sequence.
    pub fn new() -> Self {
        SlotTracker {
            epoch: 0,
            next_stamp: 1,
            stamps: vec![0],
        }
    }

    /// Constructs a tracker for a sequence already holding `len` elements.
    pub fn with_len(len: usize) -> Self {
        let mut tracker = SlotTracker::new();
        tracker.stamps.clear();
        tracker.stamps.extend(1..=len as u64 + 1);
        tracker.next_stamp = len as u64 + 2;
        tracker
    }

    /// Returns the number of storage blocks the tracked sequence went
    /// through, minus one.
    #[inline]
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Returns the current stamp of slot `index`, if it's within the tracked
    /// `[0, len]` range.
    #[inline]
    pub fn stamp(&self, index: usize) -> Option<u64> {
        self.stamps.get(index).copied()
    }

    /// Returns a [`SlotRange`] of every tracked position (live slots and the
    /// end position).
    #[inline]
    pub fn whole_range(&self) -> SlotRange {
        SlotRange(0, self.stamps.len())
    }

    /// Makes room for `additional` stamps so that following mutations can't
    /// fail.
    pub fn try_reserve(&mut self, additional: usize) -> Result<(), MemoryError> {
        self.stamps
            .try_reserve(additional)
            .map_err(|_| MemoryError::allocator())
    }

    fn fresh(&mut self) -> u64 {
        let stamp = self.next_stamp;
        self.next_stamp += 1;
        stamp
    }

    /// Renews stamps of every tracked position in `region`.
    pub fn restamp(&mut self, region: SlotRange) {
        let region = region.clamp_to(self.whole_range());
        for i in region.0..region.1 {
            let stamp = self.fresh();
            self.stamps[i] = stamp;
        }
    }

    /// Marks the storage block as replaced.
    pub fn bump_epoch(&mut self) {
        self.epoch += 1;
    }

    /// Records that an element was placed into slot `position` and every
    /// element from `position` onward moved one slot right.
    ///
    /// Appending is the case where `position` is the old length.
    pub fn inserted(&mut self, position: usize) {
        let stamp = self.fresh();
        self.stamps.push(stamp);
        let end = self.stamps.len();
        self.restamp(SlotRange(position, end));
    }

    /// Records that the element in slot `position` was removed and every
    /// later element moved one slot left.
    pub fn removed(&mut self, position: usize) {
        self.stamps.pop();
        let end = self.stamps.len();
        self.restamp(SlotRange(position, end));
    }

    /// Records that every element from `new_len` onward was removed.
    pub fn truncated(&mut self, new_len: usize) {
        if new_len + 1 >= self.stamps.len() {
            return;
        }
        self.stamps.truncate(new_len + 1);
        self.restamp(SlotRange::through(new_len, new_len));
    }

    /// Checks whether a cursor created in `epoch` for slot `index` with the
    /// provided `stamp` still denotes the same slot content.
    pub fn check(&self, epoch: u64, index: usize, stamp: u64) -> Result<(), CursorError> {
        if epoch != self.epoch {
            return Err(CursorError::Reallocated {
                cursor_epoch: epoch,
                current_epoch: self.epoch,
            });
        }
        match self.stamp(index) {
            Some(current) if current == stamp => Ok(()),
            _ => Err(CursorError::Shifted { index }),
        }
    }
}

impl Default for SlotTracker {
    fn default() -> Self {
        SlotTracker::new()
    }
}

#[cfg(feature = "debug")]
impl core::fmt::Debug for SlotTracker {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SlotTracker")
            .field("epoch", &self.epoch)
            .field("next_stamp", &self.next_stamp)
            .field("stamps", &self.stamps)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stamps(tracker: &SlotTracker) -> Vec<u64> {
        (0..tracker.whole_range().1)
            .map(|i| tracker.stamp(i).unwrap())
            .collect()
    }

    #[test]
    fn new_slot_tracker() {
        let tracker = SlotTracker::new();
        assert_eq!(tracker.epoch(), 0);
        assert_eq!(tracker.whole_range(), SlotRange(0, 1));
        assert_eq!(tracker.check(0, 0, 0), Ok(()));
    }

    #[test]
    fn append_renews_only_old_end() {
        let mut tracker = SlotTracker::with_len(3);
        let before = stamps(&tracker);

        tracker.inserted(3);
        let after = stamps(&tracker);

        assert_eq!(after.len(), 5);
        assert_eq!(&before[..3], &after[..3]);
        assert_ne!(before[3], after[3]);
    }

    #[test]
    fn insert_renews_tail() {
        let mut tracker = SlotTracker::with_len(4);
        let before = stamps(&tracker);

        tracker.inserted(1);
        let after = stamps(&tracker);

        assert_eq!(before[0], after[0]);
        for i in 1..after.len() {
            assert!(!before.contains(&after[i]), "slot {} kept a stale stamp", i);
        }
    }

    #[test]
    fn removal_renews_tail() {
        let mut tracker = SlotTracker::with_len(4);
        let before = stamps(&tracker);

        tracker.removed(2);
        assert_eq!(tracker.whole_range(), SlotRange(0, 4));
        assert_eq!(tracker.check(0, 1, before[1]), Ok(()));
        assert_eq!(
            tracker.check(0, 2, before[2]),
            Err(CursorError::Shifted { index: 2 })
        );
        assert_eq!(
            tracker.check(0, 4, before[4]),
            Err(CursorError::Shifted { index: 4 })
        );
    }

    #[test]
    fn truncation_renews_new_end() {
        let mut tracker = SlotTracker::with_len(5);
        let before = stamps(&tracker);

        tracker.truncated(2);
        assert_eq!(tracker.whole_range(), SlotRange(0, 3));
        assert_eq!(tracker.check(0, 1, before[1]), Ok(()));
        assert!(tracker.check(0, 2, before[2]).is_err());

        tracker.truncated(7);
        assert_eq!(tracker.whole_range(), SlotRange(0, 3));
    }

    #[test]
    fn epoch_invalidates_everything() {
        let mut tracker = SlotTracker::with_len(2);
        let first = tracker.stamp(0).unwrap();
        tracker.bump_epoch();
        assert_eq!(
            tracker.check(0, 0, first),
            Err(CursorError::Reallocated {
                cursor_epoch: 0,
                current_epoch: 1
            })
        );
        assert_eq!(tracker.check(1, 0, first), Ok(()));
    }
}
