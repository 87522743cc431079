//! Multi-level memory hierarchy.
//!
//! This module contains the core data structures and algorithms:
//! - [`block`]: addresses, block indices, payloads, level kinds
//! - [`policy`]: per-policy bookkeeping state
//! - [`evictor`]: policy names and the dispatching `EvictionPolicy`
//! - [`level`]: cache, main memory and external memory levels
//! - [`hierarchy`]: level ownership and top-down access resolution

pub mod block;
pub mod evictor;
pub mod hierarchy;
pub mod level;
pub mod policy;
