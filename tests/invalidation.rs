use contiguous_seq::*;

fn filled(values: impl IntoIterator<Item = i32>, capacity: usize) -> Sequence<i32> {
    let mut sequence = Sequence::with_capacity(capacity);
    for value in values {
        sequence.push(value);
    }
    sequence
}

#[test]
fn push_within_capacity_keeps_element_cursors() {
    let mut sequence = filled([5, 6, 7], 8);
    let cursors: Vec<_> = (0..3).map(|i| sequence.cursor(i).unwrap()).collect();
    let end = sequence.end();

    sequence.push(8);

    for (cursor, expected) in cursors.iter().zip([5, 6, 7]) {
        assert_eq!(*sequence.get_at(cursor).unwrap(), expected);
    }
    assert!(!sequence.is_valid(&end));
    assert_eq!(sequence.index_of(&sequence.end()), Ok(4));
}

#[test]
fn push_at_capacity_invalidates_everything() {
    let mut sequence = filled([1, 2, 3, 4], 4);
    let first = sequence.begin();
    let last = sequence.cursor(3).unwrap();
    let end = sequence.end();
    let base = sequence.as_ptr();
    let epoch = sequence.epoch();

    sequence.push(5);

    assert_ne!(sequence.as_ptr(), base);
    assert!(sequence.capacity() >= 5);
    assert_eq!(sequence.epoch(), epoch + 1);
    for cursor in [first, last, end] {
        assert_eq!(
            sequence.get_at(&cursor),
            Err(CursorError::Reallocated {
                cursor_epoch: epoch,
                current_epoch: epoch + 1
            })
        );
    }
    assert_eq!(sequence, [1, 2, 3, 4, 5]);
}

#[test]
fn reserve_is_monotonic() {
    let mut sequence: Sequence<i32> = Sequence::new();
    assert!(sequence.reserve(50).is_some());
    assert_eq!(sequence.capacity(), 50);

    let base = sequence.as_ptr();
    assert_eq!(sequence.reserve(20), None);
    assert_eq!(sequence.reserve(50), None);
    assert_eq!(sequence.capacity(), 50);
    assert_eq!(sequence.as_ptr(), base);
}

#[test]
fn reserve_within_capacity_keeps_cursors() {
    let mut sequence = filled([1, 2], 10);
    let first = sequence.begin();
    let end = sequence.end();

    sequence.reserve(10);
    sequence.reserve(3);

    assert!(sequence.is_valid(&first));
    assert!(sequence.is_valid(&end));
}

#[test]
fn reserve_beyond_capacity_invalidates_everything() {
    let mut sequence = filled([1, 2], 2);
    let first = sequence.begin();
    let end = sequence.end();
    let base = sequence.as_ptr();

    let moved = sequence.reserve(3);

    assert_eq!(moved, Some(sequence.as_ptr()));
    assert_ne!(sequence.as_ptr(), base);
    assert_eq!(sequence.capacity(), 3);
    assert!(!sequence.is_valid(&first));
    assert!(!sequence.is_valid(&end));
    assert_eq!(sequence, [1, 2]);
}

#[test]
fn insert_shifts_right() {
    let mut sequence = filled([10, 20, 30, 40], 4);
    let inserted = sequence.insert(1, 15).unwrap();

    assert_eq!(sequence, [10, 15, 20, 30, 40]);
    assert_eq!(sequence.len(), 5);
    assert_eq!(*sequence.get_at(&inserted).unwrap(), 15);

    sequence.insert(5, 50).unwrap();
    sequence.insert(0, 5).unwrap();
    assert_eq!(sequence, [5, 10, 15, 20, 30, 40, 50]);
}

#[test]
fn insert_without_growth_invalidates_from_position() {
    let mut sequence = filled(0..6, 100);
    let before = sequence.cursor(1).unwrap();
    let at = sequence.cursor(2).unwrap();
    let after = sequence.cursor(4).unwrap();
    let end = sequence.end();
    let base = sequence.as_ptr();

    sequence.insert(2, 99).unwrap();

    assert_eq!(sequence.as_ptr(), base);
    assert_eq!(*sequence.get_at(&before).unwrap(), 1);
    assert_eq!(sequence.get_at(&at), Err(CursorError::Shifted { index: 2 }));
    assert_eq!(sequence.get_at(&after), Err(CursorError::Shifted { index: 4 }));
    assert!(!sequence.is_valid(&end));
}

#[test]
fn insert_with_growth_invalidates_everything() {
    let mut sequence = filled([1, 2, 3], 3);
    let before = sequence.begin();

    sequence.insert(3, 4).unwrap();

    assert!(matches!(
        sequence.get_at(&before),
        Err(CursorError::Reallocated { .. })
    ));
}

#[test]
fn insert_out_of_bounds_is_reported() {
    let mut sequence = filled([1, 2], 4);
    let first = sequence.begin();

    assert_eq!(
        sequence.insert(3, 9),
        Err(SequenceError::OutOfBounds { index: 3, len: 2 })
    );
    assert_eq!(sequence, [1, 2]);
    assert!(sequence.is_valid(&first));
}

#[test]
fn erase_shifts_left_and_returns_next() {
    let mut sequence = filled([1, 2, 3, 4], 8);
    let before = sequence.begin();
    let erased = sequence.cursor(1).unwrap();
    let after = sequence.cursor(3).unwrap();
    let capacity = sequence.capacity();

    let next = sequence.erase(1).unwrap();

    assert_eq!(sequence, [1, 3, 4]);
    assert_eq!(sequence.capacity(), capacity);
    assert_eq!(*sequence.get_at(&next).unwrap(), 3);
    assert_eq!(*sequence.get_at(&before).unwrap(), 1);
    assert!(!sequence.is_valid(&erased));
    assert!(!sequence.is_valid(&after));
}

#[test]
fn erase_last_returns_end() {
    let mut sequence = filled([1, 2, 3], 3);
    let next = sequence.erase(2).unwrap();

    assert_eq!(next, sequence.end());
    assert_eq!(sequence.index_of(&next), Ok(2));
    assert_eq!(sequence.get_at(&next), Err(CursorError::PastTheEnd));
}

#[test]
fn erase_out_of_bounds_is_reported() {
    let mut sequence = filled([1], 1);
    assert_eq!(
        sequence.erase(1),
        Err(SequenceError::OutOfBounds { index: 1, len: 1 })
    );
    let mut empty: Sequence<i32> = Sequence::new();
    assert!(empty.erase(0).is_err());
}

#[test]
fn reserve_then_push_keeps_base() {
    let mut sequence = Sequence::new();
    sequence.push(1);
    sequence.reserve(100);
    let base = sequence.as_ptr();
    let first = sequence.begin();

    for value in 10..20 {
        sequence.push(value);
        assert_eq!(sequence.as_ptr(), base);
    }

    assert_eq!(sequence, [1, 10, 11, 12, 13, 14, 15, 16, 17, 18, 19]);
    assert_eq!(sequence.len(), 11);
    assert!(sequence.capacity() >= 100);
    assert_eq!(*sequence.get_at(&first).unwrap(), 1);
}

#[test]
fn insert_then_erase_scenario() {
    let mut sequence = Sequence::new();
    sequence.reserve(100);
    sequence.extend(0..6);

    sequence.insert(2, 99).unwrap();
    assert_eq!(sequence, [0, 1, 99, 2, 3, 4, 5]);
    assert_eq!(sequence[3], 2);

    let next = sequence.erase(3).unwrap();
    assert_eq!(sequence, [0, 1, 99, 3, 4, 5]);
    assert_eq!(*sequence.get_at(&next).unwrap(), 3);
}

#[test]
fn remove_returns_value() {
    let mut sequence: Sequence<String> = ["a", "b", "c"].iter().map(|it| it.to_string()).collect();
    let first = sequence.begin();
    let last = sequence.cursor(2).unwrap();

    assert_eq!(sequence.remove(1).unwrap(), "b");
    assert_eq!(sequence.len(), 2);
    assert_eq!(sequence.get_at(&first).unwrap(), "a");
    assert!(!sequence.is_valid(&last));
    assert_eq!(sequence[1], "c");
}

#[test]
fn borrowed_iteration() {
    let mut sequence = filled(1..=4, 4);
    for value in &mut sequence {
        *value *= 10;
    }
    let collected: Vec<i32> = (&sequence).into_iter().copied().collect();
    assert_eq!(collected, vec![10, 20, 30, 40]);
    assert_eq!(sequence.iter().sum::<i32>(), 100);
}
