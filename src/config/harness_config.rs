//! Harness configuration derived from CLI arguments

use std::path::PathBuf;
use std::time::Duration;

use super::cli::CliArgs;
use crate::client::ProcessLauncher;

/// Complete, validated harness configuration.
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    pub cycles: u32,
    pub clients: usize,
    pub port: u16,
    pub file: PathBuf,
    pub client_file: PathBuf,
    pub client_exe: Option<PathBuf>,
    pub delay: Duration,
    /// Scenario ids to run; `None` means all.
    pub scenarios: Option<Vec<usize>>,
    pub quiet: bool,
    pub verbose: bool,
}

impl HarnessConfig {
    pub fn from_cli(args: &CliArgs) -> Result<Self, String> {
        args.validate()?;

        Ok(Self {
            cycles: args.cycles,
            clients: args.clients,
            port: args.port,
            file: args.file.clone(),
            client_file: args.client_file.clone(),
            client_exe: args.client_exe.clone(),
            delay: Duration::from_millis(args.delay_ms),
            scenarios: args.scenarios.clone(),
            quiet: args.quiet,
            verbose: args.verbose,
        })
    }

    pub fn scenario_enabled(&self, id: usize) -> bool {
        match &self.scenarios {
            Some(ids) => ids.contains(&id),
            None => true,
        }
    }

    /// Resolved path of the client executable.
    pub fn client_exe(&self) -> PathBuf {
        self.client_exe
            .clone()
            .unwrap_or_else(ProcessLauncher::default_exe)
    }
}
