//! io-backend-bench - Mixed-workload concurrency backend benchmark
//!
//! Runs one fixed workload (blocking delays, a large sequential file read
//! and N TCP socket drains) under interchangeable concurrency backends and
//! reports per-scenario wall-clock latency.

use anyhow::Result;
use tracing::{error, Level};
use tracing_subscriber::FmtSubscriber;

use io_backend_bench::benchmark::Orchestrator;
use io_backend_bench::config::{CliArgs, HarnessConfig};

fn setup_logging(verbose: bool, quiet: bool) {
    let level = if quiet {
        Level::ERROR
    } else if verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

fn print_banner(config: &HarnessConfig) {
    if config.quiet {
        return;
    }

    println!("io-backend-bench v{}", env!("CARGO_PKG_VERSION"));
    println!("====================================");
    println!("Cycles: {}, Clients: {}", config.cycles, config.clients);
    println!("Port: {}", config.port);
    println!("File: {:?}, Client file: {:?}", config.file, config.client_file);
    println!("Delay: {}ms", config.delay.as_millis());
    match &config.scenarios {
        Some(ids) => println!("Scenarios: {:?}", ids),
        None => println!("Scenarios: all"),
    }
    println!("====================================\n");
}

fn run() -> Result<()> {
    let args = CliArgs::parse_args();

    setup_logging(args.verbose, args.quiet);

    let config = HarnessConfig::from_cli(&args)
        .map_err(|e| anyhow::anyhow!("Configuration error: {}", e))?;

    print_banner(&config);

    let mut orchestrator = Orchestrator::new(config);
    orchestrator.run_all()?;

    Ok(())
}

fn main() {
    if let Err(e) = run() {
        error!("Benchmark failed: {:#}", e);
        std::process::exit(1);
    }
}
