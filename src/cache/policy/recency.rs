//! Recency ordering shared by LRU, MRU and the LFRU privileged segment.

use std::collections::{BTreeMap, HashMap};

use crate::cache::block::BlockIndex;

/// Keys ordered by the logical time of their last touch.
///
/// Every touch stamps the key with a fresh tick from a monotonic clock, so
/// the smallest tick is the least-recently-used key and the largest tick the
/// most-recently-used one.
#[derive(Debug, Default, Clone)]
pub struct RecencyList {
    order: BTreeMap<u64, BlockIndex>,
    ticks: HashMap<BlockIndex, u64>,
    clock: u64,
}

impl RecencyList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `key` at the most-recent position, moving it if already present.
    pub fn touch(&mut self, key: BlockIndex) {
        if let Some(old) = self.ticks.remove(&key) {
            self.order.remove(&old);
        }
        let tick = self.clock;
        self.clock += 1;
        self.order.insert(tick, key);
        self.ticks.insert(key, tick);
    }

    /// Remove `key`, returning whether it was tracked.
    pub fn remove(&mut self, key: BlockIndex) -> bool {
        match self.ticks.remove(&key) {
            Some(tick) => {
                self.order.remove(&tick);
                true
            }
            None => false,
        }
    }

    pub fn oldest(&self) -> Option<BlockIndex> {
        self.order.values().next().copied()
    }

    pub fn newest(&self) -> Option<BlockIndex> {
        self.order.values().next_back().copied()
    }

    pub fn pop_oldest(&mut self) -> Option<BlockIndex> {
        let (_, key) = self.order.pop_first()?;
        self.ticks.remove(&key);
        Some(key)
    }

    pub fn pop_newest(&mut self) -> Option<BlockIndex> {
        let (_, key) = self.order.pop_last()?;
        self.ticks.remove(&key);
        Some(key)
    }

    pub fn contains(&self, key: BlockIndex) -> bool {
        self.ticks.contains_key(&key)
    }

    pub fn len(&self) -> usize {
        self.ticks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ticks.is_empty()
    }

    /// Keys from least- to most-recently used.
    pub fn iter(&self) -> impl Iterator<Item = BlockIndex> + '_ {
        self.order.values().copied()
    }
}

/// Evicts the least-recently-used block.
#[derive(Debug, Default, Clone)]
pub struct LruPolicy {
    recency: RecencyList,
}

impl LruPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hit(&mut self, key: BlockIndex) {
        if self.recency.contains(key) {
            self.recency.touch(key);
        }
    }

    pub fn miss(&mut self, key: BlockIndex) {
        self.recency.touch(key);
    }

    pub fn evict(&mut self) -> Option<BlockIndex> {
        self.recency.pop_oldest()
    }

    pub fn recency(&self) -> &RecencyList {
        &self.recency
    }
}

/// Mirror image of [`LruPolicy`]: same bookkeeping, evicts the newest key.
#[derive(Debug, Default, Clone)]
pub struct MruPolicy {
    recency: RecencyList,
}

impl MruPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hit(&mut self, key: BlockIndex) {
        if self.recency.contains(key) {
            self.recency.touch(key);
        }
    }

    pub fn miss(&mut self, key: BlockIndex) {
        self.recency.touch(key);
    }

    pub fn evict(&mut self) -> Option<BlockIndex> {
        self.recency.pop_newest()
    }

    pub fn recency(&self) -> &RecencyList {
        &self.recency
    }
}
