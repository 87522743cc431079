//! Runtime configuration for mem-hierarchy-sim.
//!
//! Configuration can be loaded from a JSON file or constructed programmatically.
//! Level layout (capacities, latencies, block sizes, policies) and the access
//! workload live here.

use std::path::PathBuf;

use clap::Parser;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Command-line arguments.
#[derive(Parser, Debug, Clone)]
#[command(name = "mem-hierarchy-sim", about = "Multi-level memory hierarchy simulator")]
pub struct Cli {
    /// Path to configuration file (JSON).
    #[arg(short, long, default_value = "config.json")]
    pub config: PathBuf,

    /// Access pattern: sequential or random.
    #[arg(short, long)]
    pub pattern: Option<String>,

    /// Number of accesses to simulate.
    #[arg(short = 'n', long)]
    pub count: Option<usize>,

    /// Seed for the Random policy and random access pattern.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Comma-separated cache capacities, one per cache level (e.g. "4,8,16").
    #[arg(long)]
    pub cache_sizes: Option<String>,

    /// Comma-separated eviction policies, one per cache level (e.g. "LRU,FIFO,Random").
    #[arg(long)]
    pub policies: Option<String>,

    /// Print the report as JSON.
    #[arg(long)]
    pub json: bool,

    /// Enable verbose logging.
    #[arg(short, long)]
    pub verbose: bool,
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Level layout.
    pub hierarchy: HierarchyConfig,

    /// Workload settings.
    pub simulation: SimulationConfig,
}

/// Cache levels from fastest to slowest, followed by main and external memory.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HierarchyConfig {
    pub caches: Vec<CacheLevelConfig>,
    pub main: LevelConfig,
    pub external: LevelConfig,
}

impl Default for HierarchyConfig {
    fn default() -> Self {
        Self {
            caches: vec![
                CacheLevelConfig::new("L1 Cache", 4, 1, 1, "LRU"),
                CacheLevelConfig::new("L2 Cache", 8, 5, 1, "FIFO"),
                CacheLevelConfig::new("L3 Cache", 16, 10, 1, "Random"),
            ],
            main: LevelConfig::new("Main Memory", 32, 100),
            external: LevelConfig::new("External Memory", 64, 1000),
        }
    }
}

/// A bounded cache level.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheLevelConfig {
    pub name: String,

    /// Capacity in address units; holds `capacity / block_size` blocks.
    pub capacity: i64,

    /// Cost of consulting this level.
    pub latency: u64,

    /// Addresses per block.
    #[serde(default = "default_block_size")]
    pub block_size: i64,

    /// One of LRU, FIFO, Random, MRU, SecondChance, LFU, LFRU.
    pub policy: String,
}

fn default_block_size() -> i64 {
    1
}

impl CacheLevelConfig {
    pub fn new(
        name: impl Into<String>,
        capacity: i64,
        latency: u64,
        block_size: i64,
        policy: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            capacity,
            latency,
            block_size,
            policy: policy.into(),
        }
    }
}

/// Main or external memory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelConfig {
    pub name: String,
    pub capacity: i64,
    pub latency: u64,
}

impl LevelConfig {
    pub fn new(name: impl Into<String>, capacity: i64, latency: u64) -> Self {
        Self {
            name: name.into(),
            capacity,
            latency,
        }
    }
}

/// Access workload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// "sequential" or "random".
    pub pattern: String,

    /// Number of accesses to issue.
    pub count: usize,

    /// Seed for every random source; `None` draws from entropy.
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            pattern: "sequential".to_string(),
            count: 100,
            seed: None,
        }
    }
}

impl Config {
    /// Load configuration from a JSON file, falling back to defaults for missing fields.
    pub fn load(path: &std::path::Path) -> anyhow::Result<Self> {
        if path.exists() {
            let data = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&data)?;
            Ok(config)
        } else {
            tracing::warn!("Config file not found at {:?}, using defaults", path);
            Ok(Config::default())
        }
    }

    /// Apply command-line overrides on top of the loaded file.
    pub fn apply_cli(&mut self, cli: &Cli) -> Result<(), ConfigError> {
        if let Some(pattern) = &cli.pattern {
            self.simulation.pattern = pattern.clone();
        }
        if let Some(count) = cli.count {
            self.simulation.count = count;
        }
        if cli.seed.is_some() {
            self.simulation.seed = cli.seed;
        }
        if let Some(sizes) = &cli.cache_sizes {
            self.hierarchy.override_capacities(sizes)?;
        }
        if let Some(policies) = &cli.policies {
            self.hierarchy.override_policies(policies)?;
        }
        Ok(())
    }
}

impl HierarchyConfig {
    /// Replace cache capacities from a comma-separated list.
    pub fn override_capacities(&mut self, list: &str) -> Result<(), ConfigError> {
        let values = split_list(list);
        self.check_override_len("cache size", values.len())?;
        let sizes = values
            .into_iter()
            .map(|v| {
                v.parse::<i64>()
                    .map_err(|_| ConfigError::InvalidOverride(v.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        for (level, size) in self.caches.iter_mut().zip(sizes) {
            level.capacity = size;
        }
        Ok(())
    }

    /// Replace cache policies from a comma-separated list.
    ///
    /// Names are checked when the hierarchy is built.
    pub fn override_policies(&mut self, list: &str) -> Result<(), ConfigError> {
        let values = split_list(list);
        self.check_override_len("policy", values.len())?;
        for (level, policy) in self.caches.iter_mut().zip(values) {
            level.policy = policy.to_string();
        }
        Ok(())
    }

    fn check_override_len(&self, what: &'static str, got: usize) -> Result<(), ConfigError> {
        if got != self.caches.len() {
            return Err(ConfigError::OverrideLengthMismatch {
                what,
                expected: self.caches.len(),
                got,
            });
        }
        Ok(())
    }
}

fn split_list(list: &str) -> Vec<&str> {
    list.split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_default_config() {
        let cfg = Config::default();
        assert_eq!(cfg.hierarchy.caches.len(), 3);
        assert_eq!(cfg.hierarchy.caches[0].policy, "LRU");
        assert_eq!(cfg.hierarchy.main.latency, 100);
        assert_eq!(cfg.simulation.pattern, "sequential");
    }

    #[test]
    fn test_load_partial_file_uses_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"simulation": {{"pattern": "random", "count": 7, "seed": 3}}}}"#
        )
        .unwrap();

        let cfg = Config::load(file.path()).unwrap();
        assert_eq!(cfg.simulation.pattern, "random");
        assert_eq!(cfg.simulation.count, 7);
        assert_eq!(cfg.simulation.seed, Some(3));
        assert_eq!(cfg.hierarchy.caches.len(), 3);
    }

    #[test]
    fn test_load_missing_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config::load(&dir.path().join("absent.json")).unwrap();
        assert_eq!(cfg.simulation.count, 100);
    }

    #[test]
    fn test_block_size_defaults_to_one() {
        let level: CacheLevelConfig =
            serde_json::from_str(r#"{"name": "L1", "capacity": 4, "latency": 1, "policy": "LFU"}"#)
                .unwrap();
        assert_eq!(level.block_size, 1);
    }

    #[test]
    fn test_overrides() {
        let mut hierarchy = HierarchyConfig::default();
        hierarchy.override_capacities("2, 4, 8").unwrap();
        hierarchy.override_policies("MRU,LFU,LFRU").unwrap();
        assert_eq!(hierarchy.caches[1].capacity, 4);
        assert_eq!(hierarchy.caches[2].policy, "LFRU");

        let err = hierarchy.override_policies("LRU").unwrap_err();
        assert_eq!(
            err,
            ConfigError::OverrideLengthMismatch {
                what: "policy",
                expected: 3,
                got: 1
            }
        );
        assert!(hierarchy.override_capacities("1,x,3").is_err());
    }
}
