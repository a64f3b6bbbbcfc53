#![doc = include_str!("../README.md")]

mod chained;
mod error;
mod index;
mod metrics;
mod open;

pub use chained::{ChainedTable, ChainedTableBuilder};
pub use error::{Error, Result};
pub use index::{bucket_index, modulus, MAX_BUCKET_POWER, MIN_BUCKET_POWER};
pub use metrics::Metrics;
pub use open::{OpenTable, OpenTableBuilder, Probing};

/// The bucket power used by the table builders unless one is set.
///
/// `2^17 - 1 = 131071` is a Mersenne prime.
pub const DEFAULT_BUCKET_POWER: u8 = 17;

/// The operations shared by every table variant.
///
/// This is the surface an external caller, such as a benchmark harness, needs
/// in order to drive a table without depending on its layout. A table is
/// released by dropping it.
pub trait Table {
    /// Inserts a key, returning `Ok(false)` if it was already present.
    fn insert(&mut self, key: u64) -> Result<bool>;

    /// Returns `true` if the table contains the key.
    fn contains(&self, key: u64) -> bool;

    /// Removes a key, returning `true` if it was present.
    fn delete(&mut self, key: u64) -> bool;

    /// Returns the number of keys in the table.
    fn len(&self) -> usize;

    /// Returns `true` if the table holds no keys.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the number of buckets or slots in the table.
    fn capacity(&self) -> usize;

    /// Returns a snapshot of the table's metrics, if they are enabled.
    fn metrics(&self) -> Option<Metrics>;
}

// Validates a bucket power and returns the number of buckets it yields.
fn table_size(power: u8) -> Result<usize> {
    if !(MIN_BUCKET_POWER..=MAX_BUCKET_POWER).contains(&power) {
        return Err(Error::InvalidBucketPower(power));
    }

    // Saturate on narrow targets, the allocation will then fail with a capacity overflow.
    Ok(usize::try_from(modulus(power)).unwrap_or(usize::MAX))
}
