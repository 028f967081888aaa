//! Scenario definitions and the benchmark driver
//!
//! A scenario is one named combination of backend and workload shape,
//! repeated and timed across cycles. The orchestrator sets up each run
//! (listen, launch clients, accept), hands the workload to the backend,
//! and records the elapsed time.

pub mod orchestrator;
pub mod scenario;

pub use orchestrator::Orchestrator;
pub use scenario::{BackendKind, Scenario, WorkloadShape, NUM_SCENARIOS, SCENARIOS};
