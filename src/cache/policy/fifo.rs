use std::collections::VecDeque;

use crate::cache::block::BlockIndex;

/// Evicts blocks in insertion order; hits never reorder.
#[derive(Debug, Default, Clone)]
pub struct FifoPolicy {
    queue: VecDeque<BlockIndex>,
}

impl FifoPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hit(&mut self, _key: BlockIndex) {}

    pub fn miss(&mut self, key: BlockIndex) {
        self.queue.push_back(key);
    }

    pub fn evict(&mut self) -> Option<BlockIndex> {
        self.queue.pop_front()
    }

    pub fn contains(&self, key: BlockIndex) -> bool {
        self.queue.contains(&key)
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
