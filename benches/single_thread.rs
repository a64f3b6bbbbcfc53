use std::collections::HashSet;

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use mersenne_table::{ChainedTable, OpenTable, Probing, Table};

const SIZE: usize = 100_000;
const POWER: u8 = 17;

#[derive(Clone, Copy)]
struct RandomKeys {
    state: u64,
}

impl RandomKeys {
    fn new() -> Self {
        RandomKeys { state: 88_172_645_463_325_252 }
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

fn chained() -> Box<dyn Table> {
    let table = ChainedTable::builder()
        .bucket_power(POWER)
        .metrics(true)
        .build()
        .unwrap();

    Box::new(table)
}

fn open_linear() -> Box<dyn Table> {
    let table = OpenTable::builder()
        .bucket_power(POWER)
        .metrics(true)
        .build()
        .unwrap();

    Box::new(table)
}

fn open_double_hashing() -> Box<dyn Table> {
    let table = OpenTable::builder()
        .bucket_power(POWER)
        .probing(Probing::DoubleHashing)
        .metrics(true)
        .build()
        .unwrap();

    Box::new(table)
}

fn tables() -> [(&'static str, fn() -> Box<dyn Table>); 3] {
    [
        ("chained", chained),
        ("open-linear", open_linear),
        ("open-double-hashing", open_double_hashing),
    ]
}

fn insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert");

    for (name, table) in tables() {
        group.bench_function(name, |b| {
            b.iter_batched(
                table,
                |mut table| {
                    for key in RandomKeys::new().take(SIZE) {
                        table.insert(key).unwrap();
                    }
                    table
                },
                BatchSize::LargeInput,
            );
        });
    }

    group.bench_function("std", |b| {
        b.iter_batched(
            HashSet::<u64>::new,
            |mut set| {
                for key in RandomKeys::new().take(SIZE) {
                    set.insert(key);
                }
                set
            },
            BatchSize::LargeInput,
        );
    });

    group.finish();
}

fn lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("lookup");

    for (name, table) in tables() {
        let mut table = table();
        for key in RandomKeys::new().take(SIZE) {
            table.insert(key).unwrap();
        }

        if let Some(metrics) = table.metrics() {
            println!("{name}: {metrics:?}");
        }

        group.bench_function(name, |b| {
            b.iter(|| {
                for key in RandomKeys::new().take(SIZE) {
                    black_box(assert!(table.contains(key)));
                }
            });
        });
    }

    group.bench_function("std", |b| {
        let set: HashSet<u64> = RandomKeys::new().take(SIZE).collect();

        b.iter(|| {
            for key in RandomKeys::new().take(SIZE) {
                black_box(assert!(set.contains(&key)));
            }
        });
    });

    group.finish();
}

criterion_group!(benches, insert, lookup);
criterion_main!(benches);
