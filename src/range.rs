//! Module housing [`SlotRange`].

use core::fmt::Display;

/// Represents a range of element slots in a
/// [`Sequence`](crate::Sequence) storage block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotRange(
    /// **Inclusive** lower bound of this slot range.
    pub usize,
    /// **Exclusive** upper bound of this slot range.
    pub usize,
);

impl SlotRange {
    /// Constructs a new slot range, ensuring that `from` and `to` are ordered
    /// correctly.
    pub fn new(from: usize, to: usize) -> Self {
        SlotRange(from.min(to), to.max(from))
    }

    /// Constructs a new slot range without checking `from` and `to` ordering.
    pub fn new_unchecked(from: usize, to: usize) -> Self {
        SlotRange(from, to)
    }

    /// Returns a range covering everything from `from` up to and including
    /// slot `last`.
    pub fn through(from: usize, last: usize) -> Self {
        SlotRange::new(from, last + 1)
    }

    /// Returns number of slots in this range.
    pub fn len(&self) -> usize {
        self.1 - self.0
    }

    /// Returns `true` if this range covers no slots.
    pub fn is_empty(&self) -> bool {
        self.0 == self.1
    }

    /// Returns `true` if `index` falls within this range.
    pub fn contains_index(&self, index: usize) -> bool {
        self.0 <= index && index < self.1
    }

    /// Returns `true` if this slot range contains another slot range `other`.
    pub fn contains(&self, other: Self) -> bool {
        self.0 <= other.0 && other.1 <= self.1
    }

    /// Returns the part of this range that lies within `other`.
    pub fn clamp_to(&self, other: Self) -> Self {
        let from = self.0.max(other.0);
        let to = self.1.min(other.1);
        if from >= to {
            SlotRange(from, from)
        } else {
            SlotRange(from, to)
        }
    }
}

impl Display for SlotRange {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "[{}, {})", self.0, self.1)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn slotrange_ordering_works() {
        let range = SlotRange::new(10, 2);
        assert_eq!(range, SlotRange(2, 10));
        assert_eq!(range.len(), 8);
        assert!(!range.is_empty());
        assert!(SlotRange::new_unchecked(4, 4).is_empty());
    }

    #[test]
    fn slotrange_through_is_inclusive() {
        let range = SlotRange::through(2, 6);
        assert_eq!(range, SlotRange(2, 7));
        assert!(range.contains_index(6));
        assert!(!range.contains_index(7));
    }

    #[test]
    fn slotrange_clamping_works() {
        let whole = SlotRange(0, 5);
        assert_eq!(SlotRange(3, 9).clamp_to(whole), SlotRange(3, 5));
        assert!(SlotRange(6, 9).clamp_to(whole).is_empty());
        assert!(whole.contains(SlotRange(1, 4)));
        assert!(!whole.contains(SlotRange(4, 6)));
    }
}
