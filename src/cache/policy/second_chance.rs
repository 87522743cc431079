use std::collections::{HashMap, VecDeque};

use crate::cache::block::BlockIndex;

/// FIFO queue where a set reference bit buys a block one more trip round.
#[derive(Debug, Default, Clone)]
pub struct SecondChancePolicy {
    queue: VecDeque<BlockIndex>,
    referenced: HashMap<BlockIndex, bool>,
}

impl SecondChancePolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hit(&mut self, key: BlockIndex) {
        if let Some(bit) = self.referenced.get_mut(&key) {
            *bit = true;
        }
    }

    pub fn miss(&mut self, key: BlockIndex) {
        if self.referenced.insert(key, true).is_none() {
            self.queue.push_back(key);
        }
    }

    /// Scan from the head, clearing and requeueing referenced blocks until an
    /// unreferenced one is found.
    ///
    /// After one full pass every bit is clear, so at most `len + 1` steps run.
    pub fn evict(&mut self) -> Option<BlockIndex> {
        for _ in 0..=self.queue.len() {
            let key = self.queue.pop_front()?;
            match self.referenced.get_mut(&key) {
                Some(bit) if *bit => {
                    *bit = false;
                    self.queue.push_back(key);
                }
                _ => {
                    self.referenced.remove(&key);
                    return Some(key);
                }
            }
        }
        None
    }

    pub fn is_referenced(&self, key: BlockIndex) -> Option<bool> {
        self.referenced.get(&key).copied()
    }

    pub fn contains(&self, key: BlockIndex) -> bool {
        self.referenced.contains_key(&key)
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
