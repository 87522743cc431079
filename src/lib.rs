//! mem-hierarchy-sim: multi-level memory hierarchy simulator.
//!
//! Models one or more bounded caches in front of main memory and a terminal
//! external store:
//!   L1 (fast, small) → L2 → ... → Main memory → External storage
//!
//! Each cache delegates misses downward through a pluggable eviction policy,
//! so capacity, block size and policy can be compared by hit rate and
//! cumulative latency.

pub mod cache;
pub mod config;
pub mod error;
pub mod simulation;

pub use cache::evictor::PolicyKind;
pub use cache::hierarchy::{AccessRecord, Hierarchy};
pub use config::Config;
pub use error::{AccessError, ConfigError};
pub use simulation::{AccessPattern, Simulation, SimulationReport};
