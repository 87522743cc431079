//! Error types for hierarchy construction and access.
//!
//! Construction problems are reported once, before any access is issued.
//! After that, the only failure an access can have is a malformed address:
//! a miss is a normal outcome, never an error.

use thiserror::Error;

/// Raised while assembling a hierarchy or resolving configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Unknown eviction policy `{0}` (expected one of LRU, FIFO, Random, MRU, SecondChance, LFU, LFRU)")]
    UnknownPolicy(String),

    #[error("Level `{level}` has non-positive capacity {capacity}")]
    NonPositiveCapacity { level: String, capacity: i64 },

    #[error("Level `{level}` has non-positive block size {block_size}")]
    NonPositiveBlockSize { level: String, block_size: i64 },

    #[error("Level `{level}` cannot hold a single block (capacity {capacity} < block size {block_size})")]
    CapacityBelowBlockSize {
        level: String,
        capacity: i64,
        block_size: i64,
    },

    #[error("Hierarchy has no cache levels in front of main memory")]
    NoCacheLevels,

    #[error("Level name `{0}` is used more than once")]
    DuplicateLevelName(String),

    #[error("Unknown access pattern `{0}` (expected sequential or random)")]
    UnknownPattern(String),

    #[error("The {what} override lists {got} values but the hierarchy has {expected} cache levels")]
    OverrideLengthMismatch {
        what: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("Invalid override value `{0}`")]
    InvalidOverride(String),
}

/// Raised by [`Hierarchy::access`](crate::cache::hierarchy::Hierarchy::access).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AccessError {
    #[error("Invalid address {0}: addresses must be non-negative")]
    InvalidAddress(i64),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            ConfigError::NonPositiveCapacity {
                level: "L1".to_string(),
                capacity: 0,
            }
            .to_string(),
            "Level `L1` has non-positive capacity 0"
        );
        assert_eq!(
            ConfigError::OverrideLengthMismatch {
                what: "policy",
                expected: 3,
                got: 2,
            }
            .to_string(),
            "The policy override lists 2 values but the hierarchy has 3 cache levels"
        );
        assert_eq!(
            AccessError::InvalidAddress(-1).to_string(),
            "Invalid address -1: addresses must be non-negative"
        );
    }
}
