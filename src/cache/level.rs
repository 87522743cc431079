//! Memory levels: bounded caches, main memory and terminal external storage.
//!
//! A level only answers for itself. [`MemoryLevel::probe`] reports a local
//! hit or miss (evicting first if a full cache missed), and
//! [`MemoryLevel::fill`] admits the data once the hierarchy has fetched it
//! from below. Lower levels are referenced by index into the hierarchy's
//! level sequence.

use std::collections::{BTreeMap, HashMap};

use crate::cache::block::{block_index, Address, BlockIndex, LevelKind, Payload};
use crate::cache::evictor::{EvictionPolicy, PolicyKind};

/// Outcome of checking a single level for an address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Probe {
    Hit(Payload),
    /// Not resident. `evicted` names the block dropped to make room.
    Miss { evicted: Option<BlockIndex> },
}

/// A bounded cache driven by an eviction policy.
#[derive(Debug, Clone)]
pub struct CacheMemory {
    name: String,
    capacity: u64,
    latency: u64,
    block_size: u64,
    store: BTreeMap<BlockIndex, Payload>,
    policy: EvictionPolicy,
    lower: usize,
    accesses: u64,
    evictions: u64,
}

impl CacheMemory {
    /// `capacity` and `block_size` are in address units and must already be
    /// validated (`block_size > 0`, `capacity >= block_size`).
    pub fn new(
        name: impl Into<String>,
        capacity: u64,
        latency: u64,
        block_size: u64,
        policy: EvictionPolicy,
        lower: usize,
    ) -> Self {
        Self {
            name: name.into(),
            capacity,
            latency,
            block_size,
            store: BTreeMap::new(),
            policy,
            lower,
            accesses: 0,
            evictions: 0,
        }
    }

    /// Maximum number of resident blocks.
    pub fn capacity_blocks(&self) -> usize {
        (self.capacity / self.block_size) as usize
    }

    pub fn block_of(&self, address: Address) -> BlockIndex {
        block_index(address, self.block_size)
    }

    pub fn is_full(&self) -> bool {
        self.store.len() >= self.capacity_blocks()
    }

    pub fn probe(&mut self, address: Address) -> Probe {
        self.accesses += 1;
        let block = self.block_of(address);
        if let Some(payload) = self.store.get(&block) {
            self.policy.hit(block);
            return Probe::Hit(payload.clone());
        }

        // Capacity is freed before the lower level is consulted.
        let evicted = if self.is_full() {
            let victim = self.policy.evict();
            if let Some(victim) = victim {
                self.store.remove(&victim);
                self.evictions += 1;
            }
            victim
        } else {
            None
        };
        Probe::Miss { evicted }
    }

    pub fn fill(&mut self, address: Address, payload: Payload) {
        let block = self.block_of(address);
        if self.store.insert(block, payload).is_none() {
            self.policy.miss(block);
        }
    }

    /// Resident block indices in ascending order.
    pub fn resident_blocks(&self) -> Vec<BlockIndex> {
        self.store.keys().copied().collect()
    }

    pub fn is_resident(&self, address: Address) -> bool {
        self.store.contains_key(&self.block_of(address))
    }

    pub fn policy(&self) -> &EvictionPolicy {
        &self.policy
    }

    pub fn policy_kind(&self) -> PolicyKind {
        self.policy.kind()
    }

    pub fn evictions(&self) -> u64 {
        self.evictions
    }
}

/// Main memory: memoizes everything it has seen, never evicts.
#[derive(Debug, Clone)]
pub struct MainMemory {
    name: String,
    capacity: u64,
    latency: u64,
    data: HashMap<Address, Payload>,
    lower: Option<usize>,
    accesses: u64,
}

impl MainMemory {
    pub fn new(name: impl Into<String>, capacity: u64, latency: u64, lower: Option<usize>) -> Self {
        Self {
            name: name.into(),
            capacity,
            latency,
            data: HashMap::new(),
            lower,
            accesses: 0,
        }
    }

    pub fn probe(&mut self, address: Address) -> Probe {
        self.accesses += 1;
        match self.data.get(&address) {
            Some(payload) => Probe::Hit(payload.clone()),
            None => Probe::Miss { evicted: None },
        }
    }

    pub fn fill(&mut self, address: Address, payload: Payload) {
        self.data.insert(address, payload);
    }
}

/// Terminal storage. A miss here is resolved by synthesizing the payload.
#[derive(Debug, Clone)]
pub struct ExternalMemory {
    name: String,
    capacity: u64,
    latency: u64,
    data: HashMap<Address, Payload>,
    accesses: u64,
}

impl ExternalMemory {
    pub fn new(name: impl Into<String>, capacity: u64, latency: u64) -> Self {
        Self {
            name: name.into(),
            capacity,
            latency,
            data: HashMap::new(),
            accesses: 0,
        }
    }

    pub fn probe(&mut self, address: Address) -> Probe {
        self.accesses += 1;
        match self.data.get(&address) {
            Some(payload) => Probe::Hit(payload.clone()),
            None => Probe::Miss { evicted: None },
        }
    }

    pub fn fill(&mut self, address: Address, payload: Payload) {
        self.data.insert(address, payload);
    }
}

/// One level of the hierarchy.
#[derive(Debug, Clone)]
pub enum MemoryLevel {
    Cache(CacheMemory),
    Main(MainMemory),
    External(ExternalMemory),
}

impl MemoryLevel {
    pub fn name(&self) -> &str {
        match self {
            MemoryLevel::Cache(c) => &c.name,
            MemoryLevel::Main(m) => &m.name,
            MemoryLevel::External(e) => &e.name,
        }
    }

    pub fn kind(&self) -> LevelKind {
        match self {
            MemoryLevel::Cache(_) => LevelKind::Cache,
            MemoryLevel::Main(_) => LevelKind::Main,
            MemoryLevel::External(_) => LevelKind::External,
        }
    }

    /// Fixed cost charged every time this level is consulted.
    pub fn latency(&self) -> u64 {
        match self {
            MemoryLevel::Cache(c) => c.latency,
            MemoryLevel::Main(m) => m.latency,
            MemoryLevel::External(e) => e.latency,
        }
    }

    /// Configured capacity in address units.
    pub fn capacity(&self) -> u64 {
        match self {
            MemoryLevel::Cache(c) => c.capacity,
            MemoryLevel::Main(m) => m.capacity,
            MemoryLevel::External(e) => e.capacity,
        }
    }

    /// Index of the next level down, or `None` for a terminal level.
    pub fn lower(&self) -> Option<usize> {
        match self {
            MemoryLevel::Cache(c) => Some(c.lower),
            MemoryLevel::Main(m) => m.lower,
            MemoryLevel::External(_) => None,
        }
    }

    pub fn access_count(&self) -> u64 {
        match self {
            MemoryLevel::Cache(c) => c.accesses,
            MemoryLevel::Main(m) => m.accesses,
            MemoryLevel::External(e) => e.accesses,
        }
    }

    /// Number of blocks or addresses currently held.
    pub fn resident_count(&self) -> usize {
        match self {
            MemoryLevel::Cache(c) => c.store.len(),
            MemoryLevel::Main(m) => m.data.len(),
            MemoryLevel::External(e) => e.data.len(),
        }
    }

    pub fn probe(&mut self, address: Address) -> Probe {
        match self {
            MemoryLevel::Cache(c) => c.probe(address),
            MemoryLevel::Main(m) => m.probe(address),
            MemoryLevel::External(e) => e.probe(address),
        }
    }

    pub fn fill(&mut self, address: Address, payload: Payload) {
        match self {
            MemoryLevel::Cache(c) => c.fill(address, payload),
            MemoryLevel::Main(m) => m.fill(address, payload),
            MemoryLevel::External(e) => e.fill(address, payload),
        }
    }

    pub fn as_cache(&self) -> Option<&CacheMemory> {
        match self {
            MemoryLevel::Cache(c) => Some(c),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    fn cache(capacity: u64, block_size: u64, kind: PolicyKind) -> CacheMemory {
        let blocks = (capacity / block_size) as usize;
        let policy = EvictionPolicy::new(kind, blocks, StdRng::seed_from_u64(1));
        CacheMemory::new("L1", capacity, 1, block_size, policy, 1)
    }

    #[test]
    fn test_cache_probe_then_fill() {
        let mut c = cache(4, 2, PolicyKind::Lru);
        assert_eq!(c.capacity_blocks(), 2);
        assert_eq!(c.probe(5), Probe::Miss { evicted: None });

        c.fill(5, Payload::synthesize(5));
        assert!(c.is_resident(4));
        assert_eq!(c.probe(4), Probe::Hit(Payload::synthesize(5)));
        assert_eq!(c.resident_blocks(), vec![2]);
    }

    #[test]
    fn test_full_cache_evicts_before_returning_miss() {
        let mut c = cache(2, 1, PolicyKind::Fifo);
        for addr in [0, 1] {
            c.probe(addr);
            c.fill(addr, Payload::synthesize(addr));
        }
        assert!(c.is_full());
        assert_eq!(c.probe(2), Probe::Miss { evicted: Some(0) });
        assert_eq!(c.resident_blocks(), vec![1]);
        assert_eq!(c.evictions(), 1);
        assert_eq!(c.policy().len(), 1);
    }

    #[test]
    fn test_main_memory_memoizes() {
        let mut main = MainMemory::new("Main Memory", 32, 100, Some(2));
        assert_eq!(main.probe(9), Probe::Miss { evicted: None });
        main.fill(9, Payload::synthesize(9));
        assert_eq!(main.probe(9), Probe::Hit(Payload::synthesize(9)));

        let level = MemoryLevel::Main(main);
        assert_eq!(level.access_count(), 2);
        assert_eq!(level.lower(), Some(2));
        assert_eq!(level.kind(), LevelKind::Main);
    }

    #[test]
    fn test_external_is_terminal() {
        let level = MemoryLevel::External(ExternalMemory::new("External Memory", 64, 1000));
        assert_eq!(level.lower(), None);
        assert_eq!(level.latency(), 1000);
        assert!(level.as_cache().is_none());
    }
}
