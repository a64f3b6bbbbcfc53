use std::collections::TryReserveError;

// The index of an entry in the arena.
pub type EntryId = usize;

// The slot that currently holds the link to an entry.
//
// This plays the part of a `pprev` pointer in an intrusive hlist: it names the
// link pointing *at* the entry, not the previous entry itself, which lets an
// entry unlink itself in O(1) without a doubly linked list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Link {
    // The `first` link of a bucket head.
    Head(usize),
    // The `next` link of another entry.
    Next(EntryId),
}

#[derive(Debug)]
struct Node {
    key: u64,
    next: Option<EntryId>,
    pprev: Link,
}

#[derive(Debug)]
enum Entry {
    Occupied(Node),
    // A released entry, threaded onto the free list.
    Vacant(Option<EntryId>),
}

// A set of singly linked lists sharing one arena of entries.
//
// Invariant: for every live entry `e`, `*self.link(e.pprev) == Some(e)`.
#[derive(Debug)]
pub struct Chains {
    // The first entry of every bucket.
    heads: Box<[Option<EntryId>]>,
    entries: Vec<Entry>,
    // The most recently released entry.
    free: Option<EntryId>,
}

impl Chains {
    // Allocate `buckets` empty chains.
    pub fn new(buckets: usize) -> Result<Chains, TryReserveError> {
        let mut heads = Vec::new();
        heads.try_reserve_exact(buckets)?;
        heads.resize(buckets, None);

        Ok(Chains {
            heads: heads.into_boxed_slice(),
            entries: Vec::new(),
            free: None,
        })
    }

    // Returns the number of chains.
    #[inline]
    pub fn buckets(&self) -> usize {
        self.heads.len()
    }

    // Prepend a new entry to the bucket's chain.
    //
    // This does not check for duplicates.
    pub fn add_head(&mut self, bucket: usize, key: u64) -> Result<EntryId, TryReserveError> {
        let first = self.heads[bucket];

        let node = Node {
            key,
            next: first,
            pprev: Link::Head(bucket),
        };

        let id = match self.free {
            Some(id) => {
                let Entry::Vacant(next_free) = self.entries[id] else {
                    unreachable!("entry {id} on the free list is occupied");
                };

                self.free = next_free;
                self.entries[id] = Entry::Occupied(node);
                id
            }
            None => {
                self.entries.try_reserve(1)?;
                self.entries.push(Entry::Occupied(node));
                self.entries.len() - 1
            }
        };

        if let Some(first) = first {
            self.node_mut(first).pprev = Link::Next(id);
        }

        self.heads[bucket] = Some(id);
        Ok(id)
    }

    // Remove an entry from whichever chain it is in, returning its key.
    pub fn unlink(&mut self, id: EntryId) -> u64 {
        let released = std::mem::replace(&mut self.entries[id], Entry::Vacant(self.free));
        let Node { key, next, pprev } = match released {
            Entry::Occupied(node) => node,
            Entry::Vacant(_) => unreachable!("unlinking vacant entry {id}"),
        };

        // The link that pointed at us now points past us.
        *self.link_mut(pprev) = next;
        if let Some(next) = next {
            self.node_mut(next).pprev = pprev;
        }

        self.free = Some(id);
        key
    }

    // Returns the first entry in the bucket holding `key`.
    pub fn find(&self, bucket: usize, key: u64) -> Option<EntryId> {
        self.iter(bucket).find(|&(_, k)| k == key).map(|(id, _)| id)
    }

    // Returns an iterator over the entries of a bucket, newest first.
    pub fn iter(&self, bucket: usize) -> Iter<'_> {
        Iter {
            chains: self,
            current: self.heads[bucket],
        }
    }

    // Returns an iterator over the keys of every chain.
    pub fn keys(&self) -> impl Iterator<Item = u64> + '_ {
        (0..self.heads.len()).flat_map(|bucket| self.iter(bucket).map(|(_, key)| key))
    }

    #[inline]
    fn node(&self, id: EntryId) -> &Node {
        match &self.entries[id] {
            Entry::Occupied(node) => node,
            Entry::Vacant(_) => unreachable!("vacant entry {id} is linked into a chain"),
        }
    }

    #[inline]
    fn node_mut(&mut self, id: EntryId) -> &mut Node {
        match &mut self.entries[id] {
            Entry::Occupied(node) => node,
            Entry::Vacant(_) => unreachable!("vacant entry {id} is linked into a chain"),
        }
    }

    #[cfg(test)]
    fn link(&self, link: Link) -> Option<EntryId> {
        match link {
            Link::Head(bucket) => self.heads[bucket],
            Link::Next(id) => self.node(id).next,
        }
    }

    #[inline]
    fn link_mut(&mut self, link: Link) -> &mut Option<EntryId> {
        match link {
            Link::Head(bucket) => &mut self.heads[bucket],
            Link::Next(id) => &mut self.node_mut(id).next,
        }
    }

    // Check that every live entry's back-reference points at the link holding it,
    // and that every occupied entry is reachable from exactly one bucket.
    #[cfg(test)]
    pub fn assert_links(&self) {
        let mut reachable = 0;

        for bucket in 0..self.heads.len() {
            for (id, _) in self.iter(bucket) {
                let pprev = self.node(id).pprev;
                assert_eq!(self.link(pprev), Some(id), "stale back-reference on entry {id}");
                reachable += 1;
            }
        }

        let occupied = self
            .entries
            .iter()
            .filter(|e| matches!(e, Entry::Occupied(_)))
            .count();
        assert_eq!(reachable, occupied);
    }
}

// An iterator over the `(id, key)` pairs of a chain.
pub struct Iter<'a> {
    chains: &'a Chains,
    current: Option<EntryId>,
}

impl Iterator for Iter<'_> {
    type Item = (EntryId, u64);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        let node = self.chains.node(id);
        self.current = node.next;
        Some((id, node.key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};
    use test_log::test;

    fn keys(chains: &Chains, bucket: usize) -> Vec<u64> {
        chains.iter(bucket).map(|(_, key)| key).collect()
    }

    #[test]
    fn empty() {
        let chains = Chains::new(4).unwrap();
        assert_eq!(chains.buckets(), 4);
        assert!(keys(&chains, 0).is_empty());
        assert_eq!(chains.find(0, 1), None);
        chains.assert_links();
    }

    #[test]
    fn add_head_prepends() {
        let mut chains = Chains::new(2).unwrap();
        let a = chains.add_head(0, 1).unwrap();
        let b = chains.add_head(0, 2).unwrap();
        chains.add_head(0, 3).unwrap();

        assert_eq!(keys(&chains, 0), [3, 2, 1]);
        assert!(keys(&chains, 1).is_empty());
        assert_eq!(chains.find(0, 2), Some(b));
        assert_eq!(chains.node(a).pprev, Link::Next(b));
        chains.assert_links();
    }

    #[test]
    fn duplicates_are_allowed() {
        let mut chains = Chains::new(1).unwrap();
        let first = chains.add_head(0, 9).unwrap();
        let second = chains.add_head(0, 9).unwrap();

        // Only the newest occurrence is found and removed.
        assert_eq!(chains.find(0, 9), Some(second));
        chains.unlink(second);
        assert_eq!(chains.find(0, 9), Some(first));
        chains.assert_links();
    }

    #[test]
    fn unlink_positions() {
        for victim in 0..3 {
            let mut chains = Chains::new(1).unwrap();
            let ids: Vec<_> = (0..3).map(|k| chains.add_head(0, k).unwrap()).collect();

            assert_eq!(chains.unlink(ids[victim]), victim as u64);
            let mut expected = vec![2, 1, 0];
            expected.retain(|&k| k != victim as u64);
            assert_eq!(keys(&chains, 0), expected);
            chains.assert_links();
        }
    }

    #[test]
    fn reuses_released_entries() {
        let mut chains = Chains::new(3).unwrap();
        let a = chains.add_head(0, 1).unwrap();
        chains.add_head(1, 2).unwrap();
        chains.unlink(a);

        assert_eq!(chains.add_head(2, 3).unwrap(), a);
        assert_eq!(chains.entries.len(), 2);
        assert_eq!(keys(&chains, 2), [3]);
        chains.assert_links();
    }

    #[test]
    fn random_links() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(42);
        let mut chains = Chains::new(5).unwrap();
        let mut live = Vec::new();

        for _ in 0..5_000 {
            if live.is_empty() || rng.gen_bool(0.55) {
                let bucket = rng.gen_range(0..5);
                let id = chains.add_head(bucket, rng.gen()).unwrap();
                live.push(id);
            } else {
                let id = live.swap_remove(rng.gen_range(0..live.len()));
                chains.unlink(id);
            }

            chains.assert_links();
        }

        assert_eq!(chains.keys().count(), live.len());
    }
}
