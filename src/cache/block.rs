//! Address and block types shared by every memory level.
//!
//! Caches move data in fixed-size blocks; main and external memory are
//! keyed directly by address. Payloads are opaque placeholders that only
//! exist so a resolution can be traced back to the address that produced it.

use serde::{Deserialize, Serialize};

/// A validated, non-negative address.
pub type Address = u64;

/// Index of a block within a cache: `address / block_size`.
pub type BlockIndex = u64;

/// Map an address to the block that contains it.
///
/// `block_size` is validated to be positive at construction time.
pub fn block_index(address: Address, block_size: u64) -> BlockIndex {
    address / block_size
}

/// Opaque data held by a level for a given address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Payload(String);

impl Payload {
    /// The deterministic placeholder a terminal level synthesizes for an address.
    pub fn synthesize(address: Address) -> Self {
        Self(format!("Data at {address}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Payload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Which family a level belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LevelKind {
    /// Bounded, policy-driven cache.
    Cache,
    /// Memoizing main memory; unbounded for simulation purposes.
    Main,
    /// Terminal storage; always resolves.
    External,
}

impl std::fmt::Display for LevelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LevelKind::Cache => write!(f, "cache"),
            LevelKind::Main => write!(f, "main"),
            LevelKind::External => write!(f, "external"),
        }
    }
}
