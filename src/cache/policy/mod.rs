//! Per-policy bookkeeping state.
//!
//! Each type here tracks only ranking/membership metadata for the block
//! indices resident in one cache. None of them ever sees a payload; the
//! owning cache performs all store mutations and asks the policy which key
//! to drop.

pub mod fifo;
pub mod lfru;
pub mod lfu;
pub mod random;
pub mod recency;
pub mod second_chance;

pub use fifo::FifoPolicy;
pub use lfru::LfruPolicy;
pub use lfu::LfuPolicy;
pub use random::RandomPolicy;
pub use recency::{LruPolicy, MruPolicy, RecencyList};
pub use second_chance::SecondChancePolicy;
