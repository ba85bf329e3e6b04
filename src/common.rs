//! Growth policy and layout helpers shared by the storage code.

use core::alloc::Layout;
use core::mem::size_of;

use crate::error::MemoryError;

pub(crate) const fn is_layout_valid(size: usize, align: usize) -> bool {
    if !align.is_power_of_two() {
        return false;
    };

    size <= isize::MAX as usize - (align - 1)
}

/// Returns the layout of a block holding `capacity` values of type `T`, or a
/// [`MemoryError::TooLarge`] error if it can't be represented.
pub(crate) fn array_layout<T>(capacity: usize) -> Result<Layout, MemoryError> {
    let layout = Layout::new::<T>();
    let size = layout
        .size()
        .checked_mul(capacity)
        .ok_or(MemoryError::TooLarge)?;
    if !is_layout_valid(size, layout.align()) {
        return Err(MemoryError::TooLarge);
    }
    Layout::from_size_align(size, layout.align()).map_err(|_| MemoryError::TooLarge)
}

/// Smallest non-zero capacity a block of `T` grows to.
///
/// Tiny blocks would otherwise reallocate on almost every append.
pub(crate) const fn min_non_zero_capacity<T>() -> usize {
    if size_of::<T>() == 1 {
        8
    } else if size_of::<T>() <= 1024 {
        4
    } else {
        1
    }
}

/// Returns the capacity a block of `T` with `current` capacity grows to when
/// it has to hold at least `required` values.
///
/// Capacity doubles, which keeps appends amortized constant time.
pub(crate) fn grown_capacity<T>(current: usize, required: usize) -> Result<usize, MemoryError> {
    if required <= current {
        return Ok(current);
    }
    let doubled = current.saturating_mul(2);
    let target = doubled.max(required).max(min_non_zero_capacity::<T>());
    // the doubled value may overflow the layout while `required` doesn't
    if array_layout::<T>(target).is_ok() {
        Ok(target)
    } else {
        array_layout::<T>(required).map(|_| required)
    }
}

#[cfg(all(test, not(feature = "no_std")))]
mod test {
    use super::*;

    #[test]
    fn growth_doubles_capacity() {
        assert_eq!(grown_capacity::<u32>(4, 5).unwrap(), 8);
        assert_eq!(grown_capacity::<u32>(8, 9).unwrap(), 16);
        assert_eq!(grown_capacity::<u32>(8, 40).unwrap(), 40);
    }

    #[test]
    fn growth_starts_at_minimum() {
        assert_eq!(grown_capacity::<u8>(0, 1).unwrap(), 8);
        assert_eq!(grown_capacity::<u64>(0, 1).unwrap(), 4);
        assert_eq!(grown_capacity::<[u8; 2048]>(0, 1).unwrap(), 1);
    }

    #[test]
    fn growth_without_requirement_is_noop() {
        assert_eq!(grown_capacity::<u32>(16, 3).unwrap(), 16);
    }

    #[test]
    fn oversized_layout_is_rejected() {
        assert_eq!(array_layout::<u64>(usize::MAX), Err(MemoryError::TooLarge));
        assert_eq!(
            grown_capacity::<u64>(0, usize::MAX / 4),
            Err(MemoryError::TooLarge)
        );
    }

    #[test]
    fn growth_falls_back_to_required_near_limit() {
        let limit = isize::MAX as usize / 8;
        let current = limit / 2 + 1;
        assert_eq!(grown_capacity::<u64>(current, current + 1).unwrap(), current + 1);
    }
}
