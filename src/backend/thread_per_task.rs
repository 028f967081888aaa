//! One OS thread per task

use std::thread;
use std::time::{Duration, Instant};

use tracing::warn;

use super::Backend;
use crate::utils::{HarnessError, Result};
use crate::workload::Workload;

/// Launches every task on its own named OS thread immediately, then joins
/// them all. No ordering between tasks; the join is the only barrier.
pub struct ThreadPerTask;

impl Backend for ThreadPerTask {
    fn name(&self) -> &'static str {
        "thread-per-task"
    }

    fn run(&self, workload: Workload) -> Result<Duration> {
        let tasks = workload.into_tasks();

        let start = Instant::now();
        let mut handles = Vec::with_capacity(tasks.len());
        let mut spawn_error = None;
        for (i, task) in tasks.into_iter().enumerate() {
            match thread::Builder::new()
                .name(format!("task-{}", i))
                .spawn(move || task.execute())
            {
                Ok(handle) => handles.push(handle),
                Err(e) => {
                    spawn_error = Some(e);
                    break;
                }
            }
        }

        // Join whatever did start before surfacing a spawn failure, so no
        // task thread outlives the run.
        for handle in handles {
            if handle.join().is_err() {
                warn!("task thread panicked");
            }
        }

        match spawn_error {
            Some(e) => Err(HarnessError::Backend(format!(
                "failed to spawn task thread: {}",
                e
            ))),
            None => Ok(start.elapsed()),
        }
    }
}
