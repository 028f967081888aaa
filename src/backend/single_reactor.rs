//! Single-threaded event-loop backend

use std::time::{Duration, Instant};

use super::reactor::Reactor;
use super::Backend;
use crate::utils::Result;
use crate::workload::Workload;

/// Posts every task as a loop callback and drains them with one `run` call
/// on the calling thread, FIFO relative to post order.
///
/// A blocking task (file read or delay) stalls the whole loop. That
/// head-of-line stall is exactly the backend limitation this benchmark
/// exists to measure, so it is preserved rather than worked around.
pub struct SingleReactor;

impl Backend for SingleReactor {
    fn name(&self) -> &'static str {
        "single-reactor"
    }

    fn run(&self, workload: Workload) -> Result<Duration> {
        let reactor = Reactor::new();

        let start = Instant::now();
        for task in workload.into_tasks() {
            reactor.post(task);
        }
        reactor.run();
        Ok(start.elapsed())
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::{delay_workload, SHORT_DELAY};
    use super::*;

    #[test]
    fn test_blocking_tasks_serialize() {
        let elapsed = SingleReactor
            .run(delay_workload(3, SHORT_DELAY))
            .expect("run");
        // The head-of-line stall makes the loop behave like the synchronous
        // backend for blocking tasks.
        assert!(elapsed >= SHORT_DELAY * 3);
    }
}
