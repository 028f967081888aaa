//! Concurrency backends
//!
//! A backend executes a workload to completion under one scheduling
//! discipline and reports the elapsed wall-clock time. Every backend runs
//! every task exactly once and returns only after the slowest task finishes;
//! no backend may silently drop a task. A run holds no state across runs.

pub mod reactor;
pub mod reactor_pool;
pub mod single_reactor;
pub mod synchronous;
pub mod thread_per_task;
pub mod work_queue;

pub use reactor_pool::ReactorPool;
pub use single_reactor::SingleReactor;
pub use synchronous::Synchronous;
pub use thread_per_task::ThreadPerTask;
pub use work_queue::WorkQueue;

use std::time::Duration;

use crate::utils::Result;
use crate::workload::Workload;

/// One concurrency discipline. `run` blocks until every task in the
/// workload has been attempted, successfully or not. An error means the
/// backend could not acquire its execution resources (threads, a pool);
/// that is fatal to the run and the elapsed time is meaningless.
pub trait Backend {
    fn name(&self) -> &'static str;
    fn run(&self, workload: Workload) -> Result<Duration>;
}
