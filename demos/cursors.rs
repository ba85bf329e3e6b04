use contiguous_seq::*;

fn main() {
    let mut sequence = Sequence::with_capacity(8);
    sequence.extend([0u32, 1, 2, 3]);

    let before = sequence.cursor(1).unwrap();
    let at = sequence.cursor(2).unwrap();

    // no reallocation: only cursors at and after the insertion point move
    let inserted = sequence.insert(2, 99).unwrap();
    assert_eq!(sequence, [0, 1, 99, 2, 3]);
    assert_eq!(*sequence.get_at(&before).unwrap(), 1);
    assert_eq!(*sequence.get_at(&inserted).unwrap(), 99);
    assert!(matches!(
        sequence.get_at(&at),
        Err(CursorError::Shifted { index: 2 })
    ));

    // growing the block invalidates everything
    let base = sequence.as_ptr();
    sequence.reserve(64);
    assert_ne!(sequence.as_ptr(), base);
    assert!(!sequence.is_valid(&before));
}
