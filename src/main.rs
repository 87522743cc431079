use clap::Parser;
use tracing::info;

use mem_hierarchy_sim::config::{Cli, Config};
use mem_hierarchy_sim::simulation::{AccessPattern, Simulation};

fn main() -> anyhow::Result<()> {
    // Parse CLI arguments.
    let cli = Cli::parse();

    // Initialize tracing/logging.
    let filter = if cli.verbose {
        "mem_hierarchy_sim=debug"
    } else {
        "mem_hierarchy_sim=info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    info!("mem-hierarchy-sim v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration and apply overrides.
    let mut config = Config::load(&cli.config)?;
    config.apply_cli(&cli)?;

    let pattern: AccessPattern = config.simulation.pattern.parse()?;
    info!(
        caches = config.hierarchy.caches.len(),
        pattern = %pattern,
        count = config.simulation.count,
        seed = ?config.simulation.seed,
        "Configuration loaded"
    );

    let mut simulation = Simulation::from_config(&config)?;
    let report = simulation.run_pattern(pattern, config.simulation.count)?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{report}");
    }

    Ok(())
}
