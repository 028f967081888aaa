//! Benchmark orchestrator
//!
//! Runs the scenario table for the configured number of cycles. Setup
//! failures (bind, client spawn) abort a scenario before its timer starts,
//! so timing data is never polluted by failed setup; the process still
//! attempts every remaining repetition and exits successfully.

use std::time::Duration;

use tracing::{error, info, warn};

use super::scenario::{BackendKind, Scenario, WorkloadShape, NUM_SCENARIOS, SCENARIOS};
use crate::client::ProcessLauncher;
use crate::config::HarnessConfig;
use crate::metrics::TimingCollector;
use crate::server::SessionServer;
use crate::utils::Result;
use crate::workload::{ops, Workload};

pub struct Orchestrator {
    config: HarnessConfig,
    collector: TimingCollector,
}

impl Orchestrator {
    pub fn new(config: HarnessConfig) -> Self {
        Self {
            config,
            collector: TimingCollector::new(),
        }
    }

    pub fn collector(&self) -> &TimingCollector {
        &self.collector
    }

    /// Run every enabled scenario for every cycle, then print the report.
    pub fn run_all(&mut self) -> Result<()> {
        self.collector.configure(NUM_SCENARIOS);

        println!("Starting scenarios...\n");
        for cycle in 0..self.config.cycles {
            info!("cycle {}/{}", cycle + 1, self.config.cycles);
            for scenario in &SCENARIOS {
                if !self.config.scenario_enabled(scenario.id) {
                    continue;
                }
                self.run_scenario(scenario);
            }
        }

        println!();
        self.collector.report();
        Ok(())
    }

    fn run_scenario(&self, scenario: &Scenario) {
        println!("Starting {} scenario...", scenario.name);

        match self.execute(scenario) {
            Ok(Some(elapsed)) => {
                let elapsed_ms = elapsed.as_millis() as u64;
                self.collector.record_run(scenario.id, elapsed_ms);
                println!("{}ms\n", elapsed_ms);
            }
            Ok(None) => {
                warn!("scenario {} abandoned before timing", scenario.name);
            }
            Err(e) => {
                error!("scenario {} aborted: {}", scenario.name, e);
            }
        }
    }

    /// Set up and run one scenario. Returns `None` when the scenario was
    /// abandoned before its timer started.
    fn execute(&self, scenario: &Scenario) -> Result<Option<Duration>> {
        let backend = scenario.backend.instantiate()?;

        let workload = match scenario.shape {
            WorkloadShape::DelaysOnly => Workload::delays_only(self.config.delay),
            WorkloadShape::FileAndDelays => {
                // The sync variant abandons the run when its first read
                // cannot even start; the threaded variant runs regardless
                // and absorbs read failures per task.
                if scenario.backend == BackendKind::Synchronous
                    && !ops::file_readable(&self.config.file)
                {
                    warn!("cannot open {}", self.config.file.display());
                    return Ok(None);
                }
                Workload::file_and_delays(&self.config.file, self.config.delay)
            }
            WorkloadShape::Full => match self.accept_sessions()? {
                Some(sessions) => {
                    Workload::full(&self.config.file, self.config.delay, sessions)
                }
                None => return Ok(None),
            },
        };

        Ok(Some(backend.run(workload)?))
    }

    /// Listen, launch the client process, and accept the configured number
    /// of sessions. Returns `None` when the accept round came back empty.
    fn accept_sessions(&self) -> Result<Option<Vec<crate::server::Session>>> {
        let mut server = SessionServer::new(self.config.port);
        server.listen()?;

        println!("Waiting for new clients...");
        let launcher =
            ProcessLauncher::new(self.config.client_exe(), self.config.client_file.clone());
        let set = server.accept_n(self.config.clients, &launcher)?;
        server.close();

        if set.is_empty() {
            return Ok(None);
        }
        Ok(Some(set.into_sessions()))
    }
}
