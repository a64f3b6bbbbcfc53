/// Observational counters kept alongside a table.
///
/// Metrics are opt-in at construction (see the `metrics` option on the table
/// builders). They are only ever updated by a successful insert or delete on
/// the table that owns them and never influence how a key is placed or found.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Metrics {
    /// The number of live keys.
    pub count: usize,

    /// The number of times an insert stepped over an entry holding a
    /// different key.
    ///
    /// For the open-addressing table this is the number of probed slots that
    /// were occupied by another key. For the chaining table it is the number
    /// of other entries scanned in the key's bucket.
    pub collisions: u64,
}

impl Metrics {
    // Record a successful insert that scanned past `collisions` other keys.
    #[inline]
    pub(crate) fn record_insert(&mut self, inserted: bool, collisions: u64) {
        if inserted {
            self.count += 1;
        }

        self.collisions += collisions;
    }

    // Record the removal of a live key.
    #[inline]
    pub(crate) fn record_delete(&mut self) {
        debug_assert!(self.count > 0);
        self.count -= 1;
    }
}
