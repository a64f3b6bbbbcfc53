#![no_main]

use libfuzzer_sys::fuzz_target;

use arbitrary::Arbitrary;
use mersenne_table::{ChainedTable, Error, OpenTable, Probing, Table};
use std::collections::HashSet;

#[derive(Debug, Arbitrary)]
enum Operation {
    Insert(u64),
    Delete(u64),
    Contains(u64),
    Len,
}

#[derive(Debug, Arbitrary)]
struct FuzzInput {
    // Small powers keep collisions, tombstones and full tables likely.
    power: u8,
    double_hashing: bool,
    operations: Vec<Operation>,
}

fn fuzz_table(table: &mut dyn Table, operations: &[Operation]) {
    let mut std_set = HashSet::new();

    for op in operations {
        match *op {
            Operation::Insert(k) => match table.insert(k) {
                Ok(inserted) => assert_eq!(std_set.insert(k), inserted),
                Err(Error::TableFull) => assert!(!std_set.contains(&k)),
                Err(e) => panic!("unexpected error: {e}"),
            },
            Operation::Delete(k) => {
                assert_eq!(std_set.remove(&k), table.delete(k));
            }
            Operation::Contains(k) => {
                assert_eq!(std_set.contains(&k), table.contains(k));
            }
            Operation::Len => {
                assert_eq!(std_set.len(), table.len());
            }
        }
    }

    // Final consistency checks
    for k in std_set.iter() {
        assert!(table.contains(*k));
    }
    assert_eq!(std_set.len(), table.len());
    if let Some(metrics) = table.metrics() {
        assert_eq!(std_set.len(), metrics.count);
    }
}

fuzz_target!(|data: FuzzInput| {
    let power = data.power % 8 + 1;
    let probing = if data.double_hashing {
        Probing::DoubleHashing
    } else {
        Probing::Linear
    };

    let mut chained = ChainedTable::builder()
        .bucket_power(power)
        .metrics(true)
        .build()
        .unwrap();
    fuzz_table(&mut chained, &data.operations);

    let mut open = OpenTable::builder()
        .bucket_power(power)
        .probing(probing)
        .metrics(true)
        .build()
        .unwrap();
    fuzz_table(&mut open, &data.operations);
});
