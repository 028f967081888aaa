//! Shared FIFO task queue for the reactor backends
//!
//! Tasks are posted once; any number of workers drain the queue by calling
//! `run`, which returns when the queue is empty. With all tasks posted
//! before the first `run`, joining the workers is a complete barrier: a
//! worker that exits on an empty queue may leave siblings mid-task, but the
//! join still waits for them.

use std::collections::VecDeque;

use parking_lot::Mutex;

use crate::workload::Task;

pub(crate) struct Reactor {
    queue: Mutex<VecDeque<Task>>,
}

impl Reactor {
    pub(crate) fn new() -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
        }
    }

    pub(crate) fn post(&self, task: Task) {
        self.queue.lock().push_back(task);
    }

    fn next(&self) -> Option<Task> {
        self.queue.lock().pop_front()
    }

    /// Drain the queue in FIFO order relative to post order, executing each
    /// task on the calling thread.
    pub(crate) fn run(&self) {
        while let Some(task) = self.next() {
            task.execute();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_run_drains_queue() {
        let reactor = Reactor::new();
        for i in 0..3 {
            reactor.post(Task::Delay {
                value: i,
                duration: Duration::from_millis(1),
            });
        }
        reactor.run();
        assert!(reactor.next().is_none());
    }

    #[test]
    fn test_run_on_empty_queue_returns() {
        Reactor::new().run();
    }
}
