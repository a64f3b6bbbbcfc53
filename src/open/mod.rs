mod probe;

pub use probe::Probing;

use self::probe::Probe;
use crate::{Error, Metrics, Result, Table};

use std::fmt;

// A slot in the table.
//
// A tombstone keeps the key it held. It ends a key's residency but not a probe
// sequence: lookups and deletes step over it, inserts may reuse it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Slot {
    Free,
    Occupied(u64),
    Tombstone(u64),
}

/// A hash table of `u64` keys using open addressing.
///
/// The table is a flat array of `2^s - 1` slots, where `s` is the bucket power
/// chosen at construction. A key is placed in the first usable slot along its
/// probe sequence (see [`Probing`]). Deleted keys leave a tombstone behind so
/// that keys placed further along the same sequence remain reachable.
///
/// Slots carry an explicit occupancy tag, so every `u64` value, including `0`,
/// is a valid key. The table never resizes; inserting into a table whose probe
/// sequence has no room fails with [`Error::TableFull`].
///
/// # Examples
///
/// ```
/// use mersenne_table::{OpenTable, Probing};
///
/// let mut table = OpenTable::builder()
///     .bucket_power(3)
///     .probing(Probing::DoubleHashing)
///     .build()?;
///
/// assert_eq!(table.capacity(), 7);
/// assert!(table.insert(5)?);
/// assert!(table.contains(5));
/// assert!(table.delete(5));
/// assert!(!table.contains(5));
/// # Ok::<(), mersenne_table::Error>(())
/// ```
pub struct OpenTable {
    slots: Box<[Slot]>,
    power: u8,
    probing: Probing,
    len: usize,
    tombstones: usize,
    metrics: Option<Metrics>,
}

/// A builder for an [`OpenTable`].
///
/// # Examples
///
/// ```rust
/// use mersenne_table::{OpenTable, Probing};
///
/// let table = OpenTable::builder()
///     // Allocate 2^13 - 1 slots.
///     .bucket_power(13)
///     // Resolve collisions with double hashing.
///     .probing(Probing::DoubleHashing)
///     // Track the key count and collisions.
///     .metrics(true)
///     // Construct the table.
///     .build()?;
///
/// assert_eq!(table.capacity(), 8191);
/// # Ok::<(), mersenne_table::Error>(())
/// ```
pub struct OpenTableBuilder {
    power: u8,
    probing: Probing,
    metrics: bool,
}

impl OpenTableBuilder {
    /// Set the bucket power `s`. The table will have `2^s - 1` slots.
    pub fn bucket_power(self, power: u8) -> Self {
        OpenTableBuilder { power, ..self }
    }

    /// Set the probing strategy. See [`Probing`] for details.
    pub fn probing(self, probing: Probing) -> Self {
        OpenTableBuilder { probing, ..self }
    }

    /// Enable or disable [`Metrics`] tracking.
    pub fn metrics(self, metrics: bool) -> Self {
        OpenTableBuilder { metrics, ..self }
    }

    /// Construct an [`OpenTable`] from the builder, using the configured options.
    ///
    /// Fails if the bucket power is out of range or the slots cannot be allocated.
    pub fn build(self) -> Result<OpenTable> {
        let size = crate::table_size(self.power)?;

        let mut slots = Vec::new();
        slots.try_reserve_exact(size)?;
        slots.resize(size, Slot::Free);

        log::debug!(
            "Created open-addressing table with {size} slots (s={}, probing={:?}, metrics={})",
            self.power,
            self.probing,
            self.metrics
        );

        Ok(OpenTable {
            slots: slots.into_boxed_slice(),
            power: self.power,
            probing: self.probing,
            len: 0,
            tombstones: 0,
            metrics: self.metrics.then(Metrics::default),
        })
    }
}

impl fmt::Debug for OpenTableBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenTableBuilder")
            .field("bucket_power", &self.power)
            .field("probing", &self.probing)
            .field("metrics", &self.metrics)
            .finish()
    }
}

impl OpenTable {
    /// Creates an empty table with `2^power - 1` slots, linear probing, and no metrics.
    ///
    /// # Examples
    ///
    /// ```
    /// use mersenne_table::OpenTable;
    ///
    /// let table = OpenTable::new(5)?;
    /// assert_eq!(table.capacity(), 31);
    /// assert!(table.is_empty());
    /// # Ok::<(), mersenne_table::Error>(())
    /// ```
    pub fn new(power: u8) -> Result<OpenTable> {
        OpenTable::builder().bucket_power(power).build()
    }

    /// Returns a builder for an `OpenTable`.
    ///
    /// The builder can be used to select the [`Probing`] strategy or to
    /// enable [`Metrics`].
    pub fn builder() -> OpenTableBuilder {
        OpenTableBuilder {
            power: crate::DEFAULT_BUCKET_POWER,
            probing: Probing::default(),
            metrics: false,
        }
    }

    /// Inserts a key into the table.
    ///
    /// Returns `Ok(true)` if the key was inserted and `Ok(false)` if it was
    /// already present. The first tombstone on the key's probe sequence is
    /// reused, but only after the sequence has been searched up to a free slot
    /// to make sure the key does not already live further along.
    ///
    /// Fails with [`Error::TableFull`] if all `capacity()` probes landed on
    /// other live keys. The table is left untouched in that case.
    pub fn insert(&mut self, key: u64) -> Result<bool> {
        let size = self.slots.len();
        let mut probe = Probe::start(key, self.power, self.probing);

        let mut vacant = None;
        let mut collisions = 0;

        while probe.len < size {
            match self.slots[probe.i] {
                Slot::Free => {
                    vacant.get_or_insert(probe.i);
                    break;
                }
                Slot::Tombstone(_) => {
                    vacant.get_or_insert(probe.i);
                }
                Slot::Occupied(k) if k == key => {
                    self.record_insert(false, collisions);
                    return Ok(false);
                }
                Slot::Occupied(_) => collisions += 1,
            }

            probe.next();
        }

        let Some(i) = vacant else {
            log::warn!("No slot for key {key} after {size} probes");
            return Err(Error::TableFull);
        };

        if let Slot::Tombstone(old) = self.slots[i] {
            log::trace!("Key {key} reuses tombstone of {old} at slot {i}");
            self.tombstones -= 1;
        }

        self.slots[i] = Slot::Occupied(key);
        self.len += 1;
        self.record_insert(true, collisions);

        Ok(true)
    }

    /// Returns `true` if the table contains the key.
    ///
    /// # Examples
    ///
    /// ```
    /// use mersenne_table::OpenTable;
    ///
    /// let mut table = OpenTable::new(3)?;
    /// table.insert(5)?;
    /// assert!(table.contains(5));
    /// assert!(!table.contains(12));
    /// # Ok::<(), mersenne_table::Error>(())
    /// ```
    pub fn contains(&self, key: u64) -> bool {
        self.find(key).is_some()
    }

    /// Removes a key from the table, leaving a tombstone in its slot.
    ///
    /// Returns `true` if the key was present.
    pub fn delete(&mut self, key: u64) -> bool {
        let Some(i) = self.find(key) else {
            return false;
        };

        self.slots[i] = Slot::Tombstone(key);
        self.len -= 1;
        self.tombstones += 1;

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

    /// Returns the number of slots, `2^s - 1`.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Returns the bucket power the table was created with.
    #[inline]
    pub fn bucket_power(&self) -> u8 {
        self.power
    }

    /// Returns the probing strategy the table was created with.
    #[inline]
    pub fn probing(&self) -> Probing {
        self.probing
    }

    /// Returns the number of tombstoned slots.
    #[inline]
    pub fn tombstones(&self) -> usize {
        self.tombstones
    }

    /// Returns a snapshot of the table's metrics, if they are enabled.
    #[inline]
    pub fn metrics(&self) -> Option<Metrics> {
        self.metrics
    }

    /// An iterator visiting all keys in slot order.
    pub fn keys(&self) -> impl Iterator<Item = u64> + '_ {
        self.slots.iter().filter_map(|slot| match *slot {
            Slot::Occupied(key) => Some(key),
            _ => None,
        })
    }

    // Returns the slot holding `key`, if any.
    fn find(&self, key: u64) -> Option<usize> {
        let size = self.slots.len();
        let mut probe = Probe::start(key, self.power, self.probing);

        while probe.len < size {
            match self.slots[probe.i] {
                // Encountered a free slot, the key cannot be further along.
                Slot::Free => return None,
                Slot::Occupied(k) if k == key => return Some(probe.i),
                _ => {}
            }

            probe.next();
        }

        None
    }

    #[inline]
    fn record_insert(&mut self, inserted: bool, collisions: u64) {
        if let Some(metrics) = &mut self.metrics {
            metrics.record_insert(inserted, collisions);
        }
    }
}

impl Table for OpenTable {
    fn insert(&mut self, key: u64) -> Result<bool> {
        OpenTable::insert(self, key)
    }

    fn contains(&self, key: u64) -> bool {
        OpenTable::contains(self, key)
    }

    fn delete(&mut self, key: u64) -> bool {
        OpenTable::delete(self, key)
    }

    fn len(&self) -> usize {
        OpenTable::len(self)
    }

    fn capacity(&self) -> usize {
        OpenTable::capacity(self)
    }

    fn metrics(&self) -> Option<Metrics> {
        OpenTable::metrics(self)
    }
}

impl fmt::Debug for OpenTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenTable")
            .field("bucket_power", &self.power)
            .field("capacity", &self.capacity())
            .field("probing", &self.probing)
            .field("len", &self.len)
            .field("tombstones", &self.tombstones)
            .field("metrics", &self.metrics)
            .finish()
    }
}

// Checks that a table's bookkeeping agrees with its slots.
#[cfg(test)]
fn assert_consistent(table: &OpenTable) {
    let occupied = table.slots.iter().filter(|s| matches!(s, Slot::Occupied(_))).count();
    let tombstones = table.slots.iter().filter(|s| matches!(s, Slot::Tombstone(_))).count();
    assert_eq!(occupied, table.len);
    assert_eq!(tombstones, table.tombstones);

    for key in table.keys() {
        assert!(table.contains(key), "key {key} is unreachable");
    }
}
