//! Multi-threaded event-loop backend

use std::thread;
use std::time::{Duration, Instant};

use super::reactor::Reactor;
use super::Backend;
use crate::utils::{HarnessError, Result};
use crate::workload::Workload;

/// Default worker count for the reactor pool.
pub const DEFAULT_WORKERS: usize = 8;

/// Posts every task once to a shared queue, then has a fixed-size pool of
/// worker threads drain that queue concurrently. No ordering between tasks;
/// the first available worker picks up the next one.
pub struct ReactorPool {
    workers: usize,
}

impl ReactorPool {
    pub fn new(workers: usize) -> Self {
        Self {
            workers: workers.max(1),
        }
    }
}

impl Default for ReactorPool {
    fn default() -> Self {
        Self::new(DEFAULT_WORKERS)
    }
}

impl Backend for ReactorPool {
    fn name(&self) -> &'static str {
        "reactor-pool"
    }

    fn run(&self, workload: Workload) -> Result<Duration> {
        let reactor = Reactor::new();

        let start = Instant::now();
        for task in workload.into_tasks() {
            reactor.post(task);
        }

        // Workers already running keep draining the shared queue on a
        // spawn failure; the scope exit still joins them.
        let mut spawn_error = None;
        thread::scope(|s| {
            for i in 0..self.workers {
                let reactor = &reactor;
                if let Err(e) = thread::Builder::new()
                    .name(format!("reactor-{}", i))
                    .spawn_scoped(s, move || reactor.run())
                {
                    spawn_error = Some(e);
                    break;
                }
            }
        });

        match spawn_error {
            Some(e) => Err(HarnessError::Backend(format!(
                "failed to spawn reactor worker: {}",
                e
            ))),
            None => Ok(start.elapsed()),
        }
    }
}
