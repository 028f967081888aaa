//! io-backend-bench library
//!
//! Benchmarking harness that runs one fixed mixed workload (blocking delays,
//! large sequential file reads, N TCP socket drains) under interchangeable
//! concurrency backends and reports the wall-clock latency of each run.

pub mod backend;
pub mod benchmark;
pub mod client;
pub mod config;
pub mod metrics;
pub mod server;
pub mod utils;
pub mod workload;
