//! Walks through the invalidation rules of [`Sequence`] operations.
//!
//! Run with `RUST_LOG=contiguous_seq=trace` to also see storage relocations.

use std::fmt::Display;

use contiguous_seq::*;
use tracing_subscriber::EnvFilter;

fn print_sequence<T: Display>(sequence: &Sequence<T>, title: &str) {
    if !title.is_empty() {
        println!("\n== {} ==", title);
    }
    let values: Vec<String> = sequence.iter().map(|it| it.to_string()).collect();
    println!(
        "size={} capacity={} data={:p} epoch={} values: {}",
        sequence.len(),
        sequence.capacity(),
        sequence.as_ptr(),
        sequence.epoch(),
        values.join(" ")
    );
}

fn describe<T: Display>(sequence: &Sequence<T>, name: &str, cursor: &Cursor<T>) {
    match sequence.get_at(cursor) {
        Ok(value) => println!("{} is valid and reads {}", name, value),
        Err(err) => println!("{} is INVALID: {}", name, err),
    }
}

fn reallocation_invalidation() {
    println!("\n[Demo A] Without reserve: reallocation invalidates every cursor");
    let mut sequence = Sequence::new();
    sequence.push(1);
    let first = sequence.begin();
    let mut base = sequence.as_ptr();
    print_sequence(&sequence, "initial state");

    let last_capacity = sequence.capacity();
    let mut reallocated = false;
    for i in 2..=64 {
        sequence.push(i);
        if sequence.capacity() != last_capacity {
            println!(
                "capacity grew: {} -> {}, data moved: {:p} -> {:p}",
                last_capacity,
                sequence.capacity(),
                base,
                sequence.as_ptr()
            );
            base = sequence.as_ptr();
            reallocated = true;
            break;
        }
    }
    print_sequence(&sequence, "after growth");

    if reallocated {
        println!("Cursor to the first element captured before growth:");
    } else {
        println!("No reallocation observed:");
    }
    describe(&sequence, "first", &first);
    println!("last base address: {:p}", base);
}

fn reserve_stability() {
    println!("\n[Demo B] With reserve: push within capacity keeps cursors valid (except end)");
    let mut sequence = Sequence::new();
    sequence.reserve(100);
    sequence.push(10);
    let first = sequence.begin();
    let end = sequence.end();
    let base = sequence.as_ptr();
    print_sequence(&sequence, "reserved and one element");

    for i in 11..20 {
        sequence.push(i);
    }
    print_sequence(&sequence, "after more pushes (no reallocation expected)");

    println!(
        "base stayed: {:p}, current data: {:p}",
        base,
        sequence.as_ptr()
    );
    describe(&sequence, "first", &first);
    describe(&sequence, "end", &end);
}

fn insert_erase_rules() -> Result<(), SequenceError> {
    println!("\n[Demo C] insert/erase without reallocation: which cursors are invalidated");
    let mut sequence = Sequence::new();
    sequence.reserve(100);
    for i in 0..6 {
        sequence.push(i);
    }
    print_sequence(&sequence, "start");

    let before = sequence.cursor(1)?;
    let at = sequence.cursor(2)?;
    let after = sequence.cursor(4)?;

    let capacity_before = sequence.capacity();
    let data_before = sequence.as_ptr();

    sequence.insert(2, 99)?;
    print_sequence(&sequence, "after insert at pos=2");
    println!(
        "capacity same? {}, data moved? {}",
        sequence.capacity() == capacity_before,
        sequence.as_ptr() != data_before
    );

    describe(&sequence, "before (was 1)", &before);
    describe(&sequence, "at (was 2)", &at);
    describe(&sequence, "after (was 4)", &after);

    println!(
        "Access by index after insert: sequence[3]={} (element originally at index 2 shifted right)",
        sequence[3]
    );

    let next = sequence.erase(3)?;
    print_sequence(&sequence, "after erase at pos=3");
    match sequence.get_at(&next) {
        Ok(value) => println!(
            "cursor returned by erase points to: {} (first element after erased one)",
            value
        ),
        Err(CursorError::PastTheEnd) => println!("erase removed the last element"),
        Err(err) => println!("cursor returned by erase is unexpectedly invalid: {}", err),
    }
    Ok(())
}

fn main() -> Result<(), SequenceError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).try_init().ok();

    reallocation_invalidation();
    reserve_stability();
    insert_erase_rules()
}
