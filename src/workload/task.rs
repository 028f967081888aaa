//! A single benchmark task
//!
//! Failure semantics: a task that hits a read or delay error is logged and
//! treated as completed; its result is discarded. One failed task never
//! hangs or aborts the remaining tasks of a workload.

use std::path::PathBuf;
use std::time::Duration;

use tracing::{debug, warn};

use super::ops;
use crate::server::Session;

/// One unit of work in a workload. Executing a task consumes it.
pub enum Task {
    /// Blocking delay with a value fed through `delayed_sum`.
    Delay { value: u64, duration: Duration },
    /// Sequential read of an entire file.
    ReadFile(PathBuf),
    /// Drain one accepted session to EOF.
    DrainSession(Session),
}

impl Task {
    pub fn kind(&self) -> &'static str {
        match self {
            Task::Delay { .. } => "delay",
            Task::ReadFile(_) => "read-file",
            Task::DrainSession(_) => "drain-session",
        }
    }

    /// Run the task to completion, absorbing any failure locally.
    pub fn execute(self) {
        match self {
            Task::Delay { value, duration } => {
                let sum = ops::delayed_sum(value, duration);
                debug!("delay task finished (sum={})", sum);
            }
            Task::ReadFile(path) => match ops::read_entire_file(&path) {
                Ok(_) => {}
                Err(e) => warn!("failed to read file {}: {}", path.display(), e),
            },
            Task::DrainSession(mut session) => match session.drain() {
                Ok(bytes) => debug!("drained {} bytes from session", bytes),
                Err(e) => warn!("{}", e),
            },
        }
    }
}
