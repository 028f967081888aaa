//! Command-line argument parsing

use clap::Parser;
use std::path::PathBuf;

use crate::benchmark::scenario::NUM_SCENARIOS;

/// Mixed-workload benchmark comparing concurrency backends
#[derive(Parser, Debug, Clone)]
#[command(name = "io-backend-bench")]
#[command(version, about, long_about = None)]
pub struct CliArgs {
    /// Number of benchmark cycles (each cycle runs every selected scenario)
    #[arg(long = "cycles", default_value_t = 1)]
    pub cycles: u32,

    /// Number of TCP clients per scenario
    #[arg(short = 'c', long = "clients", default_value_t = 1)]
    pub clients: usize,

    /// Listening port for the session server
    #[arg(short = 'p', long = "port", default_value_t = 7696)]
    pub port: u16,

    /// File read by the workload's file-read tasks
    #[arg(long = "file", default_value = "data/10G.dummy")]
    pub file: PathBuf,

    /// File streamed to the server by each spawned client
    #[arg(long = "client-file", default_value = "data/1G.dummy")]
    pub client_file: PathBuf,

    /// Path to the stream-client executable (default: next to this binary)
    #[arg(long = "client-exe")]
    pub client_exe: Option<PathBuf>,

    /// Blocking delay for delay tasks, in milliseconds
    #[arg(long = "delay-ms", default_value_t = 5000)]
    pub delay_ms: u64,

    /// Comma-separated scenario ids to run (default: all)
    #[arg(short = 't', long = "scenarios", value_delimiter = ',')]
    pub scenarios: Option<Vec<usize>>,

    /// Only log errors
    #[arg(short = 'q', long = "quiet")]
    pub quiet: bool,

    /// Verbose logging
    #[arg(long = "verbose")]
    pub verbose: bool,
}

impl CliArgs {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.cycles == 0 {
            return Err("--cycles must be at least 1".to_string());
        }
        if self.clients == 0 {
            return Err("--clients must be at least 1".to_string());
        }
        if self.quiet && self.verbose {
            return Err("--quiet and --verbose are mutually exclusive".to_string());
        }
        if let Some(ref ids) = self.scenarios {
            if ids.is_empty() {
                return Err("--scenarios requires at least one id".to_string());
            }
            for &id in ids {
                if id >= NUM_SCENARIOS {
                    return Err(format!(
                        "unknown scenario id {} (valid: 0..{})",
                        id,
                        NUM_SCENARIOS - 1
                    ));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_args() -> CliArgs {
        CliArgs::parse_from(["io-backend-bench"])
    }

    #[test]
    fn test_defaults() {
        let args = base_args();
        assert_eq!(args.cycles, 1);
        assert_eq!(args.clients, 1);
        assert_eq!(args.port, 7696);
        assert_eq!(args.delay_ms, 5000);
        assert!(args.scenarios.is_none());
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_scenario_list_parsing() {
        let args = CliArgs::parse_from(["io-backend-bench", "-t", "4,6,8"]);
        assert_eq!(args.scenarios, Some(vec![4, 6, 8]));
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_invalid_scenario_id() {
        let args = CliArgs::parse_from(["io-backend-bench", "-t", "42"]);
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_zero_clients_rejected() {
        let args = CliArgs::parse_from(["io-backend-bench", "-c", "0"]);
        assert!(args.validate().is_err());
    }
}
