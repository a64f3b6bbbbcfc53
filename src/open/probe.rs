use crate::index::bucket_index;

/// The collision resolution strategy of an [`OpenTable`](crate::OpenTable).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Probing {
    /// Probe consecutive slots, `(key + i) mod M`.
    #[default]
    Linear,

    /// Probe with a key-dependent stride, `(h1 + i * h2) mod M`, where
    /// `h1 = key` and `h2 = (key << 1) | 1`.
    ///
    /// The sequence visits every slot when `M` is prime (bucket powers 2, 3, 5,
    /// 7, 13, 17, 19, 31 and 61). For other bucket powers it may cycle through
    /// a subset of the slots, in which case an insert can report
    /// [`TableFull`](crate::Error::TableFull) before the table is actually full.
    DoubleHashing,
}

// A probe sequence over a table of `2^power - 1` slots.
//
// The current position and the stride are both kept reduced modulo the table
// size, so advancing never overflows.
#[derive(Clone, Copy, Debug)]
pub struct Probe {
    // The current slot in the probe sequence.
    pub i: usize,
    // The number of slots probed before the current one.
    pub len: usize,
    // The stride between probes, reduced modulo the table size.
    stride: u64,
    // The bucket power of the table.
    power: u8,
}

impl Probe {
    // Initialize the probe sequence for `key`.
    #[inline]
    pub fn start(key: u64, power: u8, probing: Probing) -> Probe {
        let stride = match probing {
            Probing::Linear => 1,
            Probing::DoubleHashing => match bucket_index((key << 1) | 1, power) {
                // A zero stride would probe the same slot forever.
                0 => 1,
                stride => stride,
            },
        };

        Probe {
            i: bucket_index(key, power) as usize,
            len: 0,
            stride,
            power,
        }
    }

    // Advance to the next slot in the sequence.
    #[inline]
    pub fn next(&mut self) {
        self.len += 1;
        self.i = bucket_index(self.i as u64 + self.stride, self.power) as usize;
    }
}
