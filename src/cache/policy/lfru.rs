//! Least-frequently/recently-used: a recency-ranked privileged segment in
//! front of a frequency-ranked unprivileged segment.
//!
//! Only the unprivileged segment is ever evicted from. A hit on an
//! unprivileged block swaps it with the privileged LRU block, so both
//! segments keep their size once the cache has filled.

use crate::cache::block::BlockIndex;
use crate::cache::policy::lfu::FrequencyTable;
use crate::cache::policy::recency::RecencyList;

#[derive(Debug, Clone)]
pub struct LfruPolicy {
    privileged: RecencyList,
    unprivileged: FrequencyTable,
    privileged_size: usize,
    unprivileged_size: usize,
}

/// Which segment a block currently sits in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment {
    Privileged,
    Unprivileged,
}

impl LfruPolicy {
    /// Split `capacity` blocks into `floor(c/2)` privileged and `ceil(c/2)`
    /// unprivileged slots.
    pub fn new(capacity: usize) -> Self {
        let privileged_size = capacity / 2;
        Self {
            privileged: RecencyList::new(),
            unprivileged: FrequencyTable::new(),
            privileged_size,
            unprivileged_size: capacity - privileged_size,
        }
    }

    pub fn hit(&mut self, key: BlockIndex) {
        if self.privileged.contains(key) {
            self.privileged.touch(key);
        } else if self.unprivileged.contains(key) && !self.promote(key) {
            // No privileged slots to swap with.
            self.unprivileged.bump(key);
        }
    }

    pub fn miss(&mut self, key: BlockIndex) {
        if self.privileged.len() < self.privileged_size {
            self.privileged.touch(key);
        } else {
            self.unprivileged.insert(key, 0);
        }
    }

    pub fn evict(&mut self) -> Option<BlockIndex> {
        self.unprivileged
            .pop_min()
            .or_else(|| self.privileged.pop_oldest())
    }

    /// Swap an unprivileged block with the privileged LRU block.
    ///
    /// The demoted block restarts at frequency 0; the promoted one becomes
    /// the privileged most-recent entry.
    pub fn promote(&mut self, key: BlockIndex) -> bool {
        if !self.unprivileged.contains(key) {
            return false;
        }
        let Some(demoted) = self.privileged.pop_oldest() else {
            return false;
        };
        self.unprivileged.remove(key);
        self.privileged.touch(key);
        self.unprivileged.insert(demoted, 0);
        true
    }

    pub fn segment_of(&self, key: BlockIndex) -> Option<Segment> {
        if self.privileged.contains(key) {
            Some(Segment::Privileged)
        } else if self.unprivileged.contains(key) {
            Some(Segment::Unprivileged)
        } else {
            None
        }
    }

    pub fn privileged_size(&self) -> usize {
        self.privileged_size
    }

    pub fn unprivileged_size(&self) -> usize {
        self.unprivileged_size
    }

    pub fn privileged(&self) -> &RecencyList {
        &self.privileged
    }

    pub fn unprivileged(&self) -> &FrequencyTable {
        &self.unprivileged
    }

    pub fn contains(&self, key: BlockIndex) -> bool {
        self.segment_of(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.privileged.len() + self.unprivileged.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
