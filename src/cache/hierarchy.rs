//! The hierarchy: an owned, ordered sequence of levels resolved top-down.
//!
//! The hierarchy is the sole owner of every level. Each level names the next
//! one down by index, so an access walks `caches → main → external`,
//! stopping at the first level that holds the data and charging every level
//! it passed through.

use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

use crate::cache::block::{Address, BlockIndex, LevelKind, Payload};
use crate::cache::evictor::{EvictionPolicy, PolicyKind};
use crate::cache::level::{CacheMemory, ExternalMemory, MainMemory, MemoryLevel, Probe};
use crate::config::{CacheLevelConfig, HierarchyConfig, LevelConfig};
use crate::error::{AccessError, ConfigError};

/// Result of a single top-level access.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessRecord {
    pub address: Address,
    /// Whether the topmost level already held the block.
    pub hit: bool,
    /// Sum of the latencies of every level consulted.
    pub latency: u64,
    /// Name of the level that ultimately supplied the data.
    pub level: String,
    pub payload: Payload,
}

/// Resident blocks of one cache level, for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheContents {
    pub name: String,
    pub blocks: Vec<BlockIndex>,
}

/// Point-in-time counters for one level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelStats {
    pub name: String,
    pub kind: LevelKind,
    pub accesses: u64,
    pub resident: usize,
    /// Block capacity; `None` for unbounded levels.
    pub capacity_blocks: Option<usize>,
    pub policy: Option<PolicyKind>,
    pub evictions: u64,
}

/// Internal resolution result; `source` is a level index.
struct Resolution {
    payload: Payload,
    hit: bool,
    latency: u64,
    source: usize,
}

#[derive(Debug, Clone)]
pub struct Hierarchy {
    levels: Vec<MemoryLevel>,
}

impl Hierarchy {
    /// Assemble and validate a hierarchy.
    ///
    /// `seed` feeds the Random policy of each cache; cache `i` is seeded with
    /// `seed + i`. Without a seed every Random policy draws from entropy.
    pub fn build(config: &HierarchyConfig, seed: Option<u64>) -> Result<Self, ConfigError> {
        if config.caches.is_empty() {
            return Err(ConfigError::NoCacheLevels);
        }

        let mut names = HashSet::new();
        let all_names = config
            .caches
            .iter()
            .map(|c| c.name.as_str())
            .chain([config.main.name.as_str(), config.external.name.as_str()]);
        for name in all_names {
            if !names.insert(name) {
                return Err(ConfigError::DuplicateLevelName(name.to_string()));
            }
        }

        let main_index = config.caches.len();
        let external_index = main_index + 1;

        let mut levels = Vec::with_capacity(config.caches.len() + 2);
        for (index, spec) in config.caches.iter().enumerate() {
            levels.push(MemoryLevel::Cache(build_cache(spec, index, seed)?));
        }

        let main_capacity = positive_capacity(&config.main)?;
        levels.push(MemoryLevel::Main(MainMemory::new(
            config.main.name.clone(),
            main_capacity,
            config.main.latency,
            Some(external_index),
        )));

        let external_capacity = positive_capacity(&config.external)?;
        levels.push(MemoryLevel::External(ExternalMemory::new(
            config.external.name.clone(),
            external_capacity,
            config.external.latency,
        )));

        let hierarchy = Self { levels };
        info!(
            levels = hierarchy.levels.len(),
            layout = %hierarchy.describe(),
            "Hierarchy assembled"
        );
        Ok(hierarchy)
    }

    /// Resolve `address` starting at the topmost level.
    ///
    /// Negative addresses are rejected before any level is touched.
    pub fn access(&mut self, address: i64) -> Result<AccessRecord, AccessError> {
        let address =
            Address::try_from(address).map_err(|_| AccessError::InvalidAddress(address))?;
        let resolution = self.resolve(0, address);
        let level = self.levels[resolution.source].name().to_string();

        trace!(
            address,
            hit = resolution.hit,
            latency = resolution.latency,
            source = %level,
            "Access resolved"
        );

        Ok(AccessRecord {
            address,
            hit: resolution.hit,
            latency: resolution.latency,
            level,
            payload: resolution.payload,
        })
    }

    fn resolve(&mut self, index: usize, address: Address) -> Resolution {
        let level = &mut self.levels[index];
        let own_latency = level.latency();

        match level.probe(address) {
            Probe::Hit(payload) => {
                return Resolution {
                    payload,
                    hit: true,
                    latency: own_latency,
                    source: index,
                };
            }
            Probe::Miss {
                evicted: Some(victim),
            } => {
                if let Some(cache) = level.as_cache() {
                    debug!(
                        cache = %level.name(),
                        victim,
                        block = cache.block_of(address),
                        "Evicted block"
                    );
                }
            }
            Probe::Miss { evicted: None } => {}
        }

        let (payload, lower_latency, source) = match self.levels[index].lower() {
            Some(lower) => {
                let below = self.resolve(lower, address);
                (below.payload, below.latency, below.source)
            }
            None => (Payload::synthesize(address), 0, index),
        };

        self.levels[index].fill(address, payload.clone());

        Resolution {
            payload,
            hit: false,
            // Config latencies are unbounded; the sum saturates at u64::MAX.
            latency: own_latency.saturating_add(lower_latency),
            source,
        }
    }

    /// Resident blocks of every cache level, top to bottom. Read-only.
    pub fn cache_contents(&self) -> Vec<CacheContents> {
        self.caches()
            .map(|cache| CacheContents {
                name: cache.0.to_string(),
                blocks: cache.1.resident_blocks(),
            })
            .collect()
    }

    /// Resident blocks of the named cache level.
    pub fn contents_of(&self, name: &str) -> Option<Vec<BlockIndex>> {
        self.caches()
            .find(|(level_name, _)| *level_name == name)
            .map(|(_, cache)| cache.resident_blocks())
    }

    pub fn level_stats(&self) -> Vec<LevelStats> {
        self.levels
            .iter()
            .map(|level| {
                let cache = level.as_cache();
                LevelStats {
                    name: level.name().to_string(),
                    kind: level.kind(),
                    accesses: level.access_count(),
                    resident: level.resident_count(),
                    capacity_blocks: cache.map(CacheMemory::capacity_blocks),
                    policy: cache.map(CacheMemory::policy_kind),
                    evictions: cache.map(CacheMemory::evictions).unwrap_or(0),
                }
            })
            .collect()
    }

    pub fn levels(&self) -> &[MemoryLevel] {
        &self.levels
    }

    pub fn level(&self, name: &str) -> Option<&MemoryLevel> {
        self.levels.iter().find(|level| level.name() == name)
    }

    /// Capacity of the topmost level, in address units.
    pub fn root_capacity(&self) -> u64 {
        self.levels.first().map(MemoryLevel::capacity).unwrap_or(0)
    }

    fn caches(&self) -> impl Iterator<Item = (&str, &CacheMemory)> + '_ {
        self.levels
            .iter()
            .filter_map(|level| level.as_cache().map(|cache| (level.name(), cache)))
    }

    fn describe(&self) -> String {
        self.levels
            .iter()
            .map(|level| match level.as_cache() {
                Some(cache) => format!("{}[{}]", level.name(), cache.policy_kind()),
                None => level.name().to_string(),
            })
            .collect::<Vec<_>>()
            .join(" -> ")
    }
}

fn build_cache(
    spec: &CacheLevelConfig,
    index: usize,
    seed: Option<u64>,
) -> Result<CacheMemory, ConfigError> {
    if spec.capacity <= 0 {
        return Err(ConfigError::NonPositiveCapacity {
            level: spec.name.clone(),
            capacity: spec.capacity,
        });
    }
    if spec.block_size <= 0 {
        return Err(ConfigError::NonPositiveBlockSize {
            level: spec.name.clone(),
            block_size: spec.block_size,
        });
    }
    if spec.capacity < spec.block_size {
        return Err(ConfigError::CapacityBelowBlockSize {
            level: spec.name.clone(),
            capacity: spec.capacity,
            block_size: spec.block_size,
        });
    }
    let kind: PolicyKind = spec.policy.parse()?;

    let capacity = spec.capacity as u64;
    let block_size = spec.block_size as u64;
    let capacity_blocks = (capacity / block_size) as usize;
    let policy = EvictionPolicy::new(kind, capacity_blocks, level_rng(seed, index));

    Ok(CacheMemory::new(
        spec.name.clone(),
        capacity,
        spec.latency,
        block_size,
        policy,
        index + 1,
    ))
}

fn positive_capacity(spec: &LevelConfig) -> Result<u64, ConfigError> {
    if spec.capacity <= 0 {
        return Err(ConfigError::NonPositiveCapacity {
            level: spec.name.clone(),
            capacity: spec.capacity,
        });
    }
    Ok(spec.capacity as u64)
}

fn level_rng(seed: Option<u64>, index: usize) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(index as u64)),
        None => StdRng::from_entropy(),
    }
}
