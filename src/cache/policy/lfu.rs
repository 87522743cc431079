//! Frequency ranking for LFU and the LFRU unprivileged segment.

use std::collections::{BTreeSet, HashMap};

use crate::cache::block::BlockIndex;

/// Access counters ranked by `(count, insertion order)`.
///
/// The minimum is the least-frequently-used key; among equal counts the one
/// inserted earliest wins, so victim selection is reproducible.
#[derive(Debug, Default, Clone)]
pub struct FrequencyTable {
    entries: HashMap<BlockIndex, (u64, u64)>,
    ranking: BTreeSet<(u64, u64, BlockIndex)>,
    next_seq: u64,
}

impl FrequencyTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking `key` with the given count, replacing any previous entry.
    pub fn insert(&mut self, key: BlockIndex, count: u64) {
        self.remove(key);
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.insert(key, (count, seq));
        self.ranking.insert((count, seq, key));
    }

    /// Increment the counter for `key`. Returns false if it is not tracked.
    pub fn bump(&mut self, key: BlockIndex) -> bool {
        let Some(entry) = self.entries.get_mut(&key) else {
            return false;
        };
        let (count, seq) = *entry;
        self.ranking.remove(&(count, seq, key));
        entry.0 = count + 1;
        self.ranking.insert((count + 1, seq, key));
        true
    }

    pub fn remove(&mut self, key: BlockIndex) -> bool {
        match self.entries.remove(&key) {
            Some((count, seq)) => {
                self.ranking.remove(&(count, seq, key));
                true
            }
            None => false,
        }
    }

    pub fn pop_min(&mut self) -> Option<BlockIndex> {
        let (_, _, key) = self.ranking.pop_first()?;
        self.entries.remove(&key);
        Some(key)
    }

    pub fn count(&self, key: BlockIndex) -> Option<u64> {
        self.entries.get(&key).map(|&(count, _)| count)
    }

    pub fn contains(&self, key: BlockIndex) -> bool {
        self.entries.contains_key(&key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys in eviction order.
    pub fn iter(&self) -> impl Iterator<Item = BlockIndex> + '_ {
        self.ranking.iter().map(|&(_, _, key)| key)
    }
}

/// Evicts the block with the fewest accesses since it was admitted.
#[derive(Debug, Default, Clone)]
pub struct LfuPolicy {
    table: FrequencyTable,
}

impl LfuPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hit(&mut self, key: BlockIndex) {
        self.table.bump(key);
    }

    pub fn miss(&mut self, key: BlockIndex) {
        self.table.insert(key, 1);
    }

    pub fn evict(&mut self) -> Option<BlockIndex> {
        self.table.pop_min()
    }

    pub fn table(&self) -> &FrequencyTable {
        &self.table
    }
}
