//! Fully synchronous backend: one thread, one call stack

use std::time::{Duration, Instant};

use super::Backend;
use crate::utils::Result;
use crate::workload::Workload;

/// Runs every task on the calling thread, strictly in list order. The
/// baseline every other backend is compared against.
pub struct Synchronous;

impl Backend for Synchronous {
    fn name(&self) -> &'static str {
        "synchronous"
    }

    fn run(&self, workload: Workload) -> Result<Duration> {
        let start = Instant::now();
        for task in workload.into_tasks() {
            task.execute();
        }
        Ok(start.elapsed())
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::{delay_workload, SHORT_DELAY};
    use super::*;

    #[test]
    fn test_runs_tasks_serially() {
        let elapsed = Synchronous.run(delay_workload(3, SHORT_DELAY)).expect("run");
        // Total order = list order: elapsed covers the sum of all delays.
        assert!(elapsed >= SHORT_DELAY * 3);
    }

    #[test]
    fn test_empty_workload() {
        let elapsed = Synchronous.run(delay_workload(0, SHORT_DELAY)).expect("run");
        assert!(elapsed < SHORT_DELAY);
    }
}
