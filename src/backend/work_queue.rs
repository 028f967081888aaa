//! External work-queue backend

use std::time::{Duration, Instant};

use super::Backend;
use crate::utils::{HarnessError, Result};
use crate::workload::Workload;

/// Submits every task as an opaque work item to a rayon thread pool and
/// lets the queue decide scheduling. The scope exit is the completion
/// barrier.
///
/// Pool construction failure is a fatal configuration error surfaced here,
/// at construction, before any timing starts.
pub struct WorkQueue {
    pool: rayon::ThreadPool,
}

impl WorkQueue {
    pub fn new() -> Result<Self> {
        let pool = rayon::ThreadPoolBuilder::new()
            .thread_name(|i| format!("queue-{}", i))
            .build()
            .map_err(|e| HarnessError::WorkQueue(e.to_string()))?;
        Ok(Self { pool })
    }
}

impl Backend for WorkQueue {
    fn name(&self) -> &'static str {
        "work-queue"
    }

    fn run(&self, workload: Workload) -> Result<Duration> {
        let tasks = workload.into_tasks();

        let start = Instant::now();
        self.pool.scope(move |scope| {
            for task in tasks {
                scope.spawn(move |_| task.execute());
            }
        });
        Ok(start.elapsed())
    }
}
