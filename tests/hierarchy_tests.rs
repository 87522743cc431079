//! Integration tests for multi-level resolution.

use mem_hierarchy_sim::cache::block::LevelKind;
use mem_hierarchy_sim::cache::hierarchy::Hierarchy;
use mem_hierarchy_sim::config::{CacheLevelConfig, HierarchyConfig, LevelConfig};

fn two_level(l1_policy: &str) -> HierarchyConfig {
    HierarchyConfig {
        caches: vec![CacheLevelConfig::new("L1", 2, 1, 1, l1_policy)],
        main: LevelConfig::new("Main", 1024, 100),
        external: LevelConfig::new("External", 4096, 1000),
    }
}

#[test]
fn test_end_to_end_lru_trace() {
    let mut h = Hierarchy::build(&two_level("LRU"), Some(0)).unwrap();

    let hits: Vec<bool> = [0, 1, 2, 0, 3]
        .into_iter()
        .map(|addr| h.access(addr).unwrap().hit)
        .collect();

    assert_eq!(hits, vec![false; 5]);
    assert_eq!(h.contents_of("L1"), Some(vec![0, 3]));
}

#[test]
fn test_repeat_after_eviction_is_served_by_main_memory() {
    let mut h = Hierarchy::build(&two_level("LRU"), Some(0)).unwrap();
    for addr in [0, 1, 2] {
        let record = h.access(addr).unwrap();
        assert_eq!(record.level, "External");
        assert_eq!(record.latency, 1101);
    }

    let record = h.access(0).unwrap();
    assert!(!record.hit);
    assert_eq!(record.level, "Main");
    assert_eq!(record.latency, 101);
}

#[test]
fn test_three_cache_levels() {
    let config = HierarchyConfig::default();
    let mut h = Hierarchy::build(&config, Some(5)).unwrap();

    // Fill L1 (4 blocks) and push 0 down into L2.
    for addr in 0..5 {
        h.access(addr).unwrap();
    }
    let record = h.access(0).unwrap();
    assert_eq!(record.level, "L2 Cache");
    assert_eq!(record.latency, 1 + 5);

    let contents = h.cache_contents();
    let names: Vec<&str> = contents.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["L1 Cache", "L2 Cache", "L3 Cache"]);
}

#[test]
fn test_every_level_counts_its_accesses() {
    let mut h = Hierarchy::build(&two_level("FIFO"), Some(0)).unwrap();
    h.access(7).unwrap();
    h.access(7).unwrap();
    h.access(8).unwrap();

    let stats = h.level_stats();
    let counts: Vec<(LevelKind, u64)> = stats.iter().map(|s| (s.kind, s.accesses)).collect();
    assert_eq!(
        counts,
        vec![
            (LevelKind::Cache, 3),
            (LevelKind::Main, 2),
            (LevelKind::External, 2),
        ]
    );
}

#[test]
fn test_block_size_shares_residency() {
    let config = HierarchyConfig {
        caches: vec![CacheLevelConfig::new("L1", 8, 2, 4, "LRU")],
        main: LevelConfig::new("Main", 1024, 50),
        external: LevelConfig::new("External", 4096, 500),
    };
    let mut h = Hierarchy::build(&config, None).unwrap();

    assert!(!h.access(0).unwrap().hit);
    // Same block, different address: L1 hit, but the payload is the one
    // fetched for the first address of the block.
    let record = h.access(2).unwrap();
    assert!(record.hit);
    assert_eq!(record.payload.as_str(), "Data at 0");
}
