//! Benchmarks for hierarchy access resolution.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;

use mem_hierarchy_sim::cache::evictor::PolicyKind;
use mem_hierarchy_sim::cache::hierarchy::Hierarchy;
use mem_hierarchy_sim::config::{CacheLevelConfig, HierarchyConfig, LevelConfig};
use mem_hierarchy_sim::simulation::AccessPattern;

fn config_for(policy: PolicyKind) -> HierarchyConfig {
    HierarchyConfig {
        caches: vec![
            CacheLevelConfig::new("L1", 64, 1, 1, policy.name()),
            CacheLevelConfig::new("L2", 256, 5, 1, policy.name()),
            CacheLevelConfig::new("L3", 1024, 10, 1, policy.name()),
        ],
        main: LevelConfig::new("Main", 1 << 20, 100),
        external: LevelConfig::new("External", 1 << 24, 1000),
    }
}

fn bench_access_per_policy(c: &mut Criterion) {
    // Twice the L3 capacity, so misses reach main memory.
    let trace = AccessPattern::Random.generate(10_000, 2048, &mut StdRng::seed_from_u64(1));

    let mut group = c.benchmark_group("hierarchy_access_10k");
    for policy in PolicyKind::ALL {
        group.bench_with_input(BenchmarkId::from_parameter(policy), &policy, |b, &policy| {
            b.iter(|| {
                let mut h = Hierarchy::build(&config_for(policy), Some(0)).unwrap();
                for &addr in &trace {
                    black_box(h.access(addr).unwrap());
                }
            })
        });
    }
    group.finish();
}

fn bench_sequential_scan(c: &mut Criterion) {
    let trace = AccessPattern::Sequential.generate(10_000, 0, &mut StdRng::seed_from_u64(0));

    c.bench_function("lru_sequential_scan_10k", |b| {
        b.iter(|| {
            let mut h = Hierarchy::build(&config_for(PolicyKind::Lru), Some(0)).unwrap();
            for &addr in &trace {
                black_box(h.access(addr).unwrap());
            }
        })
    });
}

criterion_group!(benches, bench_access_per_policy, bench_sequential_scan);
criterion_main!(benches);
