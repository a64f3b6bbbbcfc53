#![allow(dead_code)]

use mersenne_table::{ChainedTable, OpenTable, Probing, Table};

// Run the test on every table configuration with the given bucket power.
pub fn with_table(power: u8, mut test: impl FnMut(&dyn Fn() -> Box<dyn Table>)) {
    for metrics in [false, true] {
        test(&(|| Box::new(chained(power, metrics))));
        test(&(|| Box::new(open(power, Probing::Linear, metrics))));
        test(&(|| Box::new(open(power, Probing::DoubleHashing, metrics))));
    }
}

// Run the test on every open-addressing configuration with the given bucket power.
pub fn with_open_table(power: u8, mut test: impl FnMut(&dyn Fn() -> OpenTable)) {
    for probing in [Probing::Linear, Probing::DoubleHashing] {
        for metrics in [false, true] {
            test(&(|| open(power, probing, metrics)));
        }
    }
}

pub fn chained(power: u8, metrics: bool) -> ChainedTable {
    ChainedTable::builder()
        .bucket_power(power)
        .metrics(metrics)
        .build()
        .unwrap()
}

pub fn open(power: u8, probing: Probing, metrics: bool) -> OpenTable {
    OpenTable::builder()
        .bucket_power(power)
        .probing(probing)
        .metrics(metrics)
        .build()
        .unwrap()
}

// A deterministic stream of pseudo-random keys.
#[derive(Clone, Copy)]
pub struct RandomKeys {
    state: u64,
}

impl RandomKeys {
    pub fn new(seed: u64) -> Self {
        RandomKeys { state: seed.max(1) }
    }
}

impl Iterator for RandomKeys {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        // xorshift64
        self.state ^= self.state << 13;
        self.state ^= self.state >> 7;
        self.state ^= self.state << 17;
        Some(self.state)
    }
}
