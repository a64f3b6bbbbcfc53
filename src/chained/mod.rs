mod list;

use self::list::Chains;
use crate::index::bucket_index;
use crate::{Metrics, Result, Table};

use std::fmt;

/// A hash table of `u64` keys using separate chaining.
///
/// The table has `2^s - 1` buckets, where `s` is the bucket power chosen at
/// construction. Each bucket heads a singly linked chain of entries; new keys
/// are prepended to their bucket's chain. Entries live in an arena owned by
/// the table and record which link points at them, so removing a key is O(1)
/// once it has been found.
///
/// Every `u64` value, including `0`, is a valid key. The table never resizes
/// and never rejects a key for lack of buckets; chains simply grow longer.
///
/// # Examples
///
/// ```
/// use mersenne_table::ChainedTable;
///
/// let mut table = ChainedTable::new(3)?;
/// for key in [7, 14, 21] {
///     table.insert(key)?;
/// }
///
/// // All three keys are multiples of 7 and share bucket 0.
/// assert_eq!(table.bucket_len(0), 3);
/// assert!(table.contains(14));
/// # Ok::<(), mersenne_table::Error>(())
/// ```
pub struct ChainedTable {
    chains: Chains,
    power: u8,
    len: usize,
    metrics: Option<Metrics>,
}

/// A builder for a [`ChainedTable`].
///
/// # Examples
///
/// ```rust
/// use mersenne_table::ChainedTable;
///
/// let table = ChainedTable::builder()
///     // Allocate 2^7 - 1 buckets.
///     .bucket_power(7)
///     // Track the key count and collisions.
///     .metrics(true)
///     // Construct the table.
///     .build()?;
///
/// assert_eq!(table.capacity(), 127);
/// # Ok::<(), mersenne_table::Error>(())
/// ```
pub struct ChainedTableBuilder {
    power: u8,
    metrics: bool,
}

impl ChainedTableBuilder {
    /// Set the bucket power `s`. The table will have `2^s - 1` buckets.
    pub fn bucket_power(self, power: u8) -> Self {
        ChainedTableBuilder { power, ..self }
    }

    /// Enable or disable [`Metrics`] tracking.
    pub fn metrics(self, metrics: bool) -> Self {
        ChainedTableBuilder { metrics, ..self }
    }

    /// Construct a [`ChainedTable`] from the builder, using the configured options.
    ///
    /// Fails if the bucket power is out of range or the buckets cannot be allocated.
    pub fn build(self) -> Result<ChainedTable> {
        let buckets = crate::table_size(self.power)?;
        let chains = Chains::new(buckets)?;

        log::debug!(
            "Created chaining table with {buckets} buckets (s={}, metrics={})",
            self.power,
            self.metrics
        );

        Ok(ChainedTable {
            chains,
            power: self.power,
            len: 0,
            metrics: self.metrics.then(Metrics::default),
        })
    }
}

impl fmt::Debug for ChainedTableBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChainedTableBuilder")
            .field("bucket_power", &self.power)
            .field("metrics", &self.metrics)
            .finish()
    }
}

impl ChainedTable {
    /// Creates an empty table with `2^power - 1` buckets and no metrics.
    pub fn new(power: u8) -> Result<ChainedTable> {
        ChainedTable::builder().bucket_power(power).build()
    }

    /// Returns a builder for a `ChainedTable`.
    pub fn builder() -> ChainedTableBuilder {
        ChainedTableBuilder {
            power: crate::DEFAULT_BUCKET_POWER,
            metrics: false,
        }
    }

    /// Inserts a key into the table.
    ///
    /// Returns `Ok(true)` if the key was inserted and `Ok(false)` if it was
    /// already present. Fails only if a new entry cannot be allocated, in which
    /// case the table is left untouched.
    pub fn insert(&mut self, key: u64) -> Result<bool> {
        let bucket = self.bucket_of(key);

        let mut collisions = 0;
        let mut present = false;
        for (_, k) in self.chains.iter(bucket) {
            if k == key {
                present = true;
                break;
            }

            collisions += 1;
        }

        if present {
            self.record_insert(false, collisions);
            return Ok(false);
        }

        self.chains.add_head(bucket, key)?;
        self.len += 1;
        self.record_insert(true, collisions);

        Ok(true)
    }

    /// Returns `true` if the table contains the key.
    pub fn contains(&self, key: u64) -> bool {
        self.chains.find(self.bucket_of(key), key).is_some()
    }

    /// Removes a key from the table.
    ///
    /// Returns `true` if the key was present.
    ///
    /// # Examples
    ///
    /// ```
    /// use mersenne_table::ChainedTable;
    ///
    /// let mut table = ChainedTable::new(3)?;
    /// table.insert(5)?;
    /// assert!(table.delete(5));
    /// assert!(!table.contains(5));
    /// assert!(!table.delete(5));
    /// # Ok::<(), mersenne_table::Error>(())
    /// ```
    pub fn delete(&mut self, key: u64) -> bool {
        let bucket = self.bucket_of(key);
        let Some(id) = self.chains.find(bucket, key) else {
            return false;
        };

        self.chains.unlink(id);
        log::trace!("Unlinked key {key} from bucket {bucket}");
        self.len -= 1;

        if let Some(metrics) = &mut self.metrics {
            metrics.record_delete();
        }

        true
    }

    /// Returns the number of keys in the table.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the table holds no keys.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of buckets, `2^s - 1`.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.chains.buckets()
    }

    /// Returns the bucket power the table was created with.
    #[inline]
    pub fn bucket_power(&self) -> u8 {
        self.power
    }

    /// Returns the bucket a key belongs to.
    #[inline]
    pub fn bucket_of(&self, key: u64) -> usize {
        bucket_index(key, self.power) as usize
    }

    /// Returns the length of a bucket's chain.
    ///
    /// # Panics
    ///
    /// Panics if `bucket >= self.capacity()`.
    pub fn bucket_len(&self, bucket: usize) -> usize {
        self.chains.iter(bucket).count()
    }

    /// Returns a snapshot of the table's metrics, if they are enabled.
    #[inline]
    pub fn metrics(&self) -> Option<Metrics> {
        self.metrics
    }

    /// An iterator visiting all keys, bucket by bucket.
    pub fn keys(&self) -> impl Iterator<Item = u64> + '_ {
        self.chains.keys()
    }

    #[inline]
    fn record_insert(&mut self, inserted: bool, collisions: u64) {
        if let Some(metrics) = &mut self.metrics {
            metrics.record_insert(inserted, collisions);
        }
    }
}

impl Table for ChainedTable {
    fn insert(&mut self, key: u64) -> Result<bool> {
        ChainedTable::insert(self, key)
    }

    fn contains(&self, key: u64) -> bool {
        ChainedTable::contains(self, key)
    }

    fn delete(&mut self, key: u64) -> bool {
        ChainedTable::delete(self, key)
    }

    fn len(&self) -> usize {
        ChainedTable::len(self)
    }

    fn capacity(&self) -> usize {
        ChainedTable::capacity(self)
    }

    fn metrics(&self) -> Option<Metrics> {
        ChainedTable::metrics(self)
    }
}

impl fmt::Debug for ChainedTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChainedTable")
            .field("bucket_power", &self.power)
            .field("capacity", &self.capacity())
            .field("len", &self.len)
            .field("metrics", &self.metrics)
            .finish()
    }
}
