use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::Rng;

use crate::cache::block::BlockIndex;

/// Evicts a uniformly random resident block.
///
/// The random source is injected so runs are reproducible from a seed.
#[derive(Debug, Clone)]
pub struct RandomPolicy {
    keys: Vec<BlockIndex>,
    positions: HashMap<BlockIndex, usize>,
    rng: StdRng,
}

impl RandomPolicy {
    pub fn new(rng: StdRng) -> Self {
        Self {
            keys: Vec::new(),
            positions: HashMap::new(),
            rng,
        }
    }

    pub fn hit(&mut self, _key: BlockIndex) {}

    pub fn miss(&mut self, key: BlockIndex) {
        if self.positions.contains_key(&key) {
            return;
        }
        self.positions.insert(key, self.keys.len());
        self.keys.push(key);
    }

    pub fn evict(&mut self) -> Option<BlockIndex> {
        if self.keys.is_empty() {
            return None;
        }
        let idx = self.rng.gen_range(0..self.keys.len());
        let victim = self.keys.swap_remove(idx);
        self.positions.remove(&victim);
        // swap_remove moved the former last key into `idx`.
        if let Some(&moved) = self.keys.get(idx) {
            self.positions.insert(moved, idx);
        }
        Some(victim)
    }

    pub fn contains(&self, key: BlockIndex) -> bool {
        self.positions.contains_key(&key)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
