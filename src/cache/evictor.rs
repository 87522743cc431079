//! Eviction policy: decides which resident block a full cache drops.
//!
//! The seven policies form a closed set, so they are dispatched through one
//! enum rather than a trait object. Every cache access issues exactly one
//! `hit` or `miss`, plus one `evict` when a miss finds the cache full.

use std::str::FromStr;

use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::cache::block::BlockIndex;
use crate::cache::policy::{
    FifoPolicy, LfruPolicy, LfuPolicy, LruPolicy, MruPolicy, RandomPolicy, SecondChancePolicy,
};
use crate::error::ConfigError;

/// Names a policy; parsed from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PolicyKind {
    #[serde(rename = "LRU")]
    Lru,
    #[serde(rename = "FIFO")]
    Fifo,
    Random,
    #[serde(rename = "MRU")]
    Mru,
    SecondChance,
    #[serde(rename = "LFU")]
    Lfu,
    #[serde(rename = "LFRU")]
    Lfru,
}

impl PolicyKind {
    pub const ALL: [PolicyKind; 7] = [
        PolicyKind::Lru,
        PolicyKind::Fifo,
        PolicyKind::Random,
        PolicyKind::Mru,
        PolicyKind::SecondChance,
        PolicyKind::Lfu,
        PolicyKind::Lfru,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            PolicyKind::Lru => "LRU",
            PolicyKind::Fifo => "FIFO",
            PolicyKind::Random => "Random",
            PolicyKind::Mru => "MRU",
            PolicyKind::SecondChance => "SecondChance",
            PolicyKind::Lfu => "LFU",
            PolicyKind::Lfru => "LFRU",
        }
    }
}

impl FromStr for PolicyKind {
    type Err = ConfigError;

    /// Exact names only; anything else is a configuration error.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        PolicyKind::ALL
            .into_iter()
            .find(|kind| kind.name() == name)
            .ok_or_else(|| ConfigError::UnknownPolicy(name.to_string()))
    }
}

impl std::fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Bookkeeping for one cache, one variant per policy.
#[derive(Debug, Clone)]
pub enum EvictionPolicy {
    Lru(LruPolicy),
    Fifo(FifoPolicy),
    Random(RandomPolicy),
    Mru(MruPolicy),
    SecondChance(SecondChancePolicy),
    Lfu(LfuPolicy),
    Lfru(LfruPolicy),
}

impl EvictionPolicy {
    /// Create the policy for a cache holding `capacity_blocks` blocks.
    ///
    /// `rng` is only consumed by [`PolicyKind::Random`].
    pub fn new(kind: PolicyKind, capacity_blocks: usize, rng: StdRng) -> Self {
        match kind {
            PolicyKind::Lru => EvictionPolicy::Lru(LruPolicy::new()),
            PolicyKind::Fifo => EvictionPolicy::Fifo(FifoPolicy::new()),
            PolicyKind::Random => EvictionPolicy::Random(RandomPolicy::new(rng)),
            PolicyKind::Mru => EvictionPolicy::Mru(MruPolicy::new()),
            PolicyKind::SecondChance => EvictionPolicy::SecondChance(SecondChancePolicy::new()),
            PolicyKind::Lfu => EvictionPolicy::Lfu(LfuPolicy::new()),
            PolicyKind::Lfru => EvictionPolicy::Lfru(LfruPolicy::new(capacity_blocks)),
        }
    }

    pub fn kind(&self) -> PolicyKind {
        match self {
            EvictionPolicy::Lru(_) => PolicyKind::Lru,
            EvictionPolicy::Fifo(_) => PolicyKind::Fifo,
            EvictionPolicy::Random(_) => PolicyKind::Random,
            EvictionPolicy::Mru(_) => PolicyKind::Mru,
            EvictionPolicy::SecondChance(_) => PolicyKind::SecondChance,
            EvictionPolicy::Lfu(_) => PolicyKind::Lfu,
            EvictionPolicy::Lfru(_) => PolicyKind::Lfru,
        }
    }

    /// A resident block was accessed.
    pub fn hit(&mut self, key: BlockIndex) {
        match self {
            EvictionPolicy::Lru(p) => p.hit(key),
            EvictionPolicy::Fifo(p) => p.hit(key),
            EvictionPolicy::Random(p) => p.hit(key),
            EvictionPolicy::Mru(p) => p.hit(key),
            EvictionPolicy::SecondChance(p) => p.hit(key),
            EvictionPolicy::Lfu(p) => p.hit(key),
            EvictionPolicy::Lfru(p) => p.hit(key),
        }
    }

    /// A block was just admitted into the cache.
    pub fn miss(&mut self, key: BlockIndex) {
        match self {
            EvictionPolicy::Lru(p) => p.miss(key),
            EvictionPolicy::Fifo(p) => p.miss(key),
            EvictionPolicy::Random(p) => p.miss(key),
            EvictionPolicy::Mru(p) => p.miss(key),
            EvictionPolicy::SecondChance(p) => p.miss(key),
            EvictionPolicy::Lfu(p) => p.miss(key),
            EvictionPolicy::Lfru(p) => p.miss(key),
        }
    }

    /// Choose a victim and forget it. The caller removes it from its store.
    ///
    /// Returns `None` only when nothing is tracked.
    pub fn evict(&mut self) -> Option<BlockIndex> {
        match self {
            EvictionPolicy::Lru(p) => p.evict(),
            EvictionPolicy::Fifo(p) => p.evict(),
            EvictionPolicy::Random(p) => p.evict(),
            EvictionPolicy::Mru(p) => p.evict(),
            EvictionPolicy::SecondChance(p) => p.evict(),
            EvictionPolicy::Lfu(p) => p.evict(),
            EvictionPolicy::Lfru(p) => p.evict(),
        }
    }

    pub fn contains(&self, key: BlockIndex) -> bool {
        match self {
            EvictionPolicy::Lru(p) => p.recency().contains(key),
            EvictionPolicy::Fifo(p) => p.contains(key),
            EvictionPolicy::Random(p) => p.contains(key),
            EvictionPolicy::Mru(p) => p.recency().contains(key),
            EvictionPolicy::SecondChance(p) => p.contains(key),
            EvictionPolicy::Lfu(p) => p.table().contains(key),
            EvictionPolicy::Lfru(p) => p.contains(key),
        }
    }

    /// Number of blocks the policy is tracking.
    pub fn len(&self) -> usize {
        match self {
            EvictionPolicy::Lru(p) => p.recency().len(),
            EvictionPolicy::Fifo(p) => p.len(),
            EvictionPolicy::Random(p) => p.len(),
            EvictionPolicy::Mru(p) => p.recency().len(),
            EvictionPolicy::SecondChance(p) => p.len(),
            EvictionPolicy::Lfu(p) => p.table().len(),
            EvictionPolicy::Lfru(p) => p.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The LFRU state, if this is an LFRU policy.
    pub fn as_lfru(&self) -> Option<&LfruPolicy> {
        match self {
            EvictionPolicy::Lfru(p) => Some(p),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use super::*;

    fn policy(kind: PolicyKind, capacity: usize) -> EvictionPolicy {
        EvictionPolicy::new(kind, capacity, StdRng::seed_from_u64(0))
    }

    #[test]
    fn test_parse_policy_names() {
        for kind in PolicyKind::ALL {
            assert_eq!(kind.name().parse::<PolicyKind>().unwrap(), kind);
        }
        assert_eq!(" LFRU ".parse::<PolicyKind>().unwrap(), PolicyKind::Lfru);
    }

    #[test]
    fn test_unknown_policy_is_rejected() {
        let err = "lru".parse::<PolicyKind>().unwrap_err();
        assert_eq!(err, ConfigError::UnknownPolicy("lru".to_string()));
        assert!("ARC".parse::<PolicyKind>().is_err());
    }

    #[test]
    fn test_kind_round_trip() {
        for kind in PolicyKind::ALL {
            assert_eq!(policy(kind, 4).kind(), kind);
        }
    }

    #[test]
    fn test_every_policy_forgets_its_victim() {
        for kind in PolicyKind::ALL {
            let mut p = policy(kind, 3);
            p.miss(0);
            p.miss(1);
            p.miss(2);
            p.hit(1);

            let victim = p.evict().unwrap();
            assert!(!p.contains(victim), "{kind} still tracks {victim}");
            assert_eq!(p.len(), 2, "{kind}");
        }
    }

    #[test]
    fn test_policy_kind_serde_names() {
        let json = serde_json::to_string(&PolicyKind::SecondChance).unwrap();
        assert_eq!(json, "\"SecondChance\"");
        let kind: PolicyKind = serde_json::from_str("\"LFU\"").unwrap();
        assert_eq!(kind, PolicyKind::Lfu);
    }
}
