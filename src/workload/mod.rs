//! Workload definition: the fixed ordered list of benchmark tasks
//!
//! A workload is backend-agnostic. The two delay tasks and two file-read
//! tasks bound the per-session drain tasks in program order, but no data
//! dependency exists between tasks; a backend may execute them in any
//! concurrency-safe interleaving.

pub mod ops;
pub mod task;

pub use ops::IO_CHUNK_SIZE;
pub use task::Task;

use std::path::Path;
use std::time::Duration;

use crate::server::Session;

/// Input to the first delay task.
pub const FIRST_DELAY_VALUE: u64 = 1;
/// Input to the second delay task.
pub const SECOND_DELAY_VALUE: u64 = 90001;

/// Ordered list of independent benchmark tasks, run once per scenario.
pub struct Workload {
    tasks: Vec<Task>,
}

impl Workload {
    pub fn from_tasks(tasks: Vec<Task>) -> Self {
        Self { tasks }
    }

    /// Two blocking delays, nothing else.
    pub fn delays_only(delay: Duration) -> Self {
        Self {
            tasks: vec![
                Task::Delay {
                    value: FIRST_DELAY_VALUE,
                    duration: delay,
                },
                Task::Delay {
                    value: SECOND_DELAY_VALUE,
                    duration: delay,
                },
            ],
        }
    }

    /// Two file reads interleaved with the two delays.
    pub fn file_and_delays(path: &Path, delay: Duration) -> Self {
        Self {
            tasks: vec![
                Task::ReadFile(path.to_path_buf()),
                Task::Delay {
                    value: FIRST_DELAY_VALUE,
                    duration: delay,
                },
                Task::ReadFile(path.to_path_buf()),
                Task::Delay {
                    value: SECOND_DELAY_VALUE,
                    duration: delay,
                },
            ],
        }
    }

    /// The full mixed graph: file read, delay, one drain per session,
    /// file read, delay.
    pub fn full(path: &Path, delay: Duration, sessions: Vec<Session>) -> Self {
        let mut tasks = Vec::with_capacity(sessions.len() + 4);
        tasks.push(Task::ReadFile(path.to_path_buf()));
        tasks.push(Task::Delay {
            value: FIRST_DELAY_VALUE,
            duration: delay,
        });
        for session in sessions {
            tasks.push(Task::DrainSession(session));
        }
        tasks.push(Task::ReadFile(path.to_path_buf()));
        tasks.push(Task::Delay {
            value: SECOND_DELAY_VALUE,
            duration: delay,
        });
        Self { tasks }
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn into_tasks(self) -> Vec<Task> {
        self.tasks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delays_only_shape() {
        let wl = Workload::delays_only(Duration::from_millis(1));
        assert_eq!(wl.len(), 2);
        let tasks = wl.into_tasks();
        assert!(matches!(
            tasks[0],
            Task::Delay {
                value: FIRST_DELAY_VALUE,
                ..
            }
        ));
        assert!(matches!(
            tasks[1],
            Task::Delay {
                value: SECOND_DELAY_VALUE,
                ..
            }
        ));
    }

    #[test]
    fn test_full_shape_bounds_drains() {
        // No sessions: the bounding tasks are still in program order.
        let wl = Workload::full(Path::new("missing.dummy"), Duration::from_millis(1), vec![]);
        assert_eq!(wl.len(), 4);
        let tasks = wl.into_tasks();
        assert!(matches!(tasks[0], Task::ReadFile(_)));
        assert!(matches!(tasks[1], Task::Delay { .. }));
        assert!(matches!(tasks[2], Task::ReadFile(_)));
        assert!(matches!(tasks[3], Task::Delay { .. }));
    }
}
