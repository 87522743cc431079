//! Simulation driver: generates an access trace, replays it against a
//! hierarchy and accumulates hit/miss/latency statistics.

use std::collections::BTreeMap;
use std::str::FromStr;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::cache::hierarchy::{AccessRecord, CacheContents, Hierarchy, LevelStats};
use crate::config::Config;
use crate::error::{AccessError, ConfigError};

/// Shape of the generated address trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessPattern {
    /// `0, 1, .., count - 1`.
    Sequential,
    /// Uniform samples over `[0, root capacity)`.
    Random,
}

impl FromStr for AccessPattern {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sequential" => Ok(AccessPattern::Sequential),
            "random" => Ok(AccessPattern::Random),
            other => Err(ConfigError::UnknownPattern(other.to_string())),
        }
    }
}

impl std::fmt::Display for AccessPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AccessPattern::Sequential => write!(f, "sequential"),
            AccessPattern::Random => write!(f, "random"),
        }
    }
}

impl AccessPattern {
    /// Produce `count` addresses. `bound` is the exclusive upper limit for
    /// random samples; a zero bound yields all-zero addresses.
    pub fn generate(&self, count: usize, bound: u64, rng: &mut StdRng) -> Vec<i64> {
        match self {
            AccessPattern::Sequential => (0..count as i64).collect(),
            AccessPattern::Random => (0..count)
                .map(|_| {
                    if bound == 0 {
                        0
                    } else {
                        rng.gen_range(0..bound) as i64
                    }
                })
                .collect(),
        }
    }
}

/// Accumulated counters over a run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationStats {
    pub accesses: u64,
    pub hits: u64,
    pub misses: u64,
    pub total_latency: u64,
    pub last_latency: u64,
    /// How many accesses each level ended up resolving.
    pub resolved_by: BTreeMap<String, u64>,
}

impl SimulationStats {
    pub fn record(&mut self, record: &AccessRecord) {
        self.accesses += 1;
        if record.hit {
            self.hits += 1;
        } else {
            self.misses += 1;
        }
        self.last_latency = record.latency;
        self.total_latency = self.total_latency.saturating_add(record.latency);
        *self.resolved_by.entry(record.level.clone()).or_insert(0) += 1;
    }

    /// `hits / accesses`, or `0.0` before any access.
    pub fn hit_rate(&self) -> f64 {
        if self.accesses == 0 {
            return 0.0;
        }
        self.hits as f64 / self.accesses as f64
    }

    pub fn average_latency(&self) -> f64 {
        if self.accesses == 0 {
            return 0.0;
        }
        self.total_latency as f64 / self.accesses as f64
    }
}

/// Everything a front end needs to render a finished run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationReport {
    pub pattern: AccessPattern,
    pub stats: SimulationStats,
    pub hit_rate: f64,
    pub average_latency: f64,
    pub levels: Vec<LevelStats>,
    pub contents: Vec<CacheContents>,
}

impl std::fmt::Display for SimulationReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Access pattern:   {}", self.pattern)?;
        writeln!(f, "Accesses:         {}", self.stats.accesses)?;
        writeln!(f, "Hits:             {}", self.stats.hits)?;
        writeln!(f, "Misses:           {}", self.stats.misses)?;
        writeln!(f, "Hit rate:         {:.2}%", self.hit_rate * 100.0)?;
        writeln!(f, "Total latency:    {}", self.stats.total_latency)?;
        writeln!(f, "Average latency:  {:.2}", self.average_latency)?;
        writeln!(f)?;
        writeln!(
            f,
            "{:<18} {:<9} {:<13} {:>9} {:>9} {:>10} {:>9}",
            "Level", "Kind", "Policy", "Accesses", "Resolved", "Resident", "Evicted"
        )?;
        for level in &self.levels {
            let policy = level
                .policy
                .map(|p| p.to_string())
                .unwrap_or_else(|| "-".to_string());
            let resident = match level.capacity_blocks {
                Some(cap) => format!("{}/{}", level.resident, cap),
                None => level.resident.to_string(),
            };
            writeln!(
                f,
                "{:<18} {:<9} {:<13} {:>9} {:>9} {:>10} {:>9}",
                level.name,
                level.kind.to_string(),
                policy,
                level.accesses,
                self.stats.resolved_by.get(&level.name).copied().unwrap_or(0),
                resident,
                level.evictions
            )?;
        }
        writeln!(f)?;
        for cache in &self.contents {
            writeln!(f, "{}: {:?}", cache.name, cache.blocks)?;
        }
        Ok(())
    }
}

/// Replays access traces against one hierarchy.
pub struct Simulation {
    hierarchy: Hierarchy,
    stats: SimulationStats,
    rng: StdRng,
}

impl Simulation {
    /// `rng` drives trace generation only; policies carry their own.
    pub fn new(hierarchy: Hierarchy, rng: StdRng) -> Self {
        Self {
            hierarchy,
            stats: SimulationStats::default(),
            rng,
        }
    }

    /// Build the hierarchy described by `config`, seeding every random source.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let seed = config.simulation.seed;
        let hierarchy = Hierarchy::build(&config.hierarchy, seed)?;
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Self::new(hierarchy, rng))
    }

    pub fn generate_accesses(&mut self, pattern: AccessPattern, count: usize) -> Vec<i64> {
        let bound = self.hierarchy.root_capacity();
        pattern.generate(count, bound, &mut self.rng)
    }

    /// Issue one access and fold it into the running totals.
    pub fn access(&mut self, address: i64) -> Result<AccessRecord, AccessError> {
        let record = self.hierarchy.access(address)?;
        self.stats.record(&record);
        Ok(record)
    }

    /// Replay `addresses`, returning the per-access records.
    ///
    /// Stops at the first invalid address; earlier accesses stay counted.
    pub fn run(&mut self, addresses: &[i64]) -> Result<Vec<AccessRecord>, AccessError> {
        addresses.iter().map(|&addr| self.access(addr)).collect()
    }

    /// Generate a trace and replay it.
    pub fn run_pattern(
        &mut self,
        pattern: AccessPattern,
        count: usize,
    ) -> Result<SimulationReport, AccessError> {
        let addresses = self.generate_accesses(pattern, count);
        self.run(&addresses)?;
        let report = self.report(pattern);
        info!(
            pattern = %pattern,
            accesses = report.stats.accesses,
            hits = report.stats.hits,
            misses = report.stats.misses,
            total_latency = report.stats.total_latency,
            "Simulation complete"
        );
        Ok(report)
    }

    pub fn report(&self, pattern: AccessPattern) -> SimulationReport {
        SimulationReport {
            pattern,
            stats: self.stats.clone(),
            hit_rate: self.stats.hit_rate(),
            average_latency: self.stats.average_latency(),
            levels: self.hierarchy.level_stats(),
            contents: self.hierarchy.cache_contents(),
        }
    }

    pub fn stats(&self) -> &SimulationStats {
        &self.stats
    }

    pub fn hierarchy(&self) -> &Hierarchy {
        &self.hierarchy
    }
}
