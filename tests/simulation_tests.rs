//! Integration tests for the simulation driver.

use mem_hierarchy_sim::config::Config;
use mem_hierarchy_sim::error::AccessError;
use mem_hierarchy_sim::simulation::{AccessPattern, Simulation};

fn seeded_config(seed: u64) -> Config {
    let mut config = Config::default();
    config.simulation.seed = Some(seed);
    config
}

#[test]
fn test_sequential_run_never_hits() {
    let mut sim = Simulation::from_config(&seeded_config(1)).unwrap();
    let report = sim.run_pattern(AccessPattern::Sequential, 50).unwrap();

    assert_eq!(report.stats.accesses, 50);
    assert_eq!(report.stats.hits, 0);
    assert_eq!(report.stats.misses, 50);
    // Every address is new, so every access goes all the way down.
    assert_eq!(report.stats.total_latency, 50 * (1 + 5 + 10 + 100 + 1000));
    assert_eq!(report.stats.resolved_by["External Memory"], 50);
    assert_eq!(report.hit_rate, 0.0);
}

#[test]
fn test_random_run_is_reproducible() {
    let run = |seed| {
        let mut sim = Simulation::from_config(&seeded_config(seed)).unwrap();
        sim.run_pattern(AccessPattern::Random, 200).unwrap()
    };
    let a = run(17);
    let b = run(17);

    assert_eq!(a.stats, b.stats);
    assert_eq!(a.contents, b.contents);
    // Addresses stay inside L1's capacity, so L1 eventually holds them all.
    assert!(a.stats.hits > 0);
    assert_eq!(a.stats.hits + a.stats.misses, 200);
}

#[test]
fn test_run_rejects_negative_address() {
    let mut sim = Simulation::from_config(&seeded_config(0)).unwrap();
    let err = sim.run(&[0, 1, -1, 2]).unwrap_err();
    assert_eq!(err, AccessError::InvalidAddress(-1));
    assert_eq!(sim.stats().accesses, 2);
}

#[test]
fn test_every_policy_runs() {
    for policy in ["LRU", "FIFO", "Random", "MRU", "SecondChance", "LFU", "LFRU"] {
        let mut config = seeded_config(3);
        let list = format!("{policy},{policy},{policy}");
        config.hierarchy.override_policies(&list).unwrap();
        config.hierarchy.override_capacities("4,8,16").unwrap();

        let mut sim = Simulation::from_config(&config).unwrap();
        let report = sim.run_pattern(AccessPattern::Random, 300).unwrap();
        assert_eq!(report.stats.accesses, 300, "{policy}");

        for level in report.levels.iter() {
            if let Some(cap) = level.capacity_blocks {
                assert!(level.resident <= cap, "{policy}: {}", level.name);
            }
        }
    }
}

#[test]
fn test_report_serializes() {
    let mut sim = Simulation::from_config(&seeded_config(2)).unwrap();
    let report = sim.run_pattern(AccessPattern::Sequential, 10).unwrap();

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["pattern"], "sequential");
    assert_eq!(json["stats"]["accesses"], 10);
    assert_eq!(json["levels"].as_array().unwrap().len(), 5);

    let text = report.to_string();
    assert!(text.contains("Hit rate"));
    assert!(text.contains("L1 Cache"));
}
