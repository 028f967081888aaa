//! The fixed scenario table

use crate::backend::{
    Backend, ReactorPool, SingleReactor, Synchronous, ThreadPerTask, WorkQueue,
};
use crate::utils::Result;

/// Number of scenarios in the fixed table.
pub const NUM_SCENARIOS: usize = 9;

/// Which tasks a scenario's workload contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkloadShape {
    /// Two blocking delays.
    DelaysOnly,
    /// Two file reads interleaved with the delays.
    FileAndDelays,
    /// File reads, delays, and one drain per accepted session.
    Full,
}

impl WorkloadShape {
    /// Whether this shape needs the session server and client process.
    pub fn needs_sessions(&self) -> bool {
        matches!(self, WorkloadShape::Full)
    }
}

/// Backend selector; instantiation is deferred so that a fatal backend
/// configuration error surfaces per run, before timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    Synchronous,
    ThreadPerTask,
    SingleReactor,
    ReactorPool,
    WorkQueue,
}

impl BackendKind {
    pub fn instantiate(&self) -> Result<Box<dyn Backend>> {
        Ok(match self {
            BackendKind::Synchronous => Box::new(Synchronous),
            BackendKind::ThreadPerTask => Box::new(ThreadPerTask),
            BackendKind::SingleReactor => Box::new(SingleReactor),
            BackendKind::ReactorPool => Box::new(ReactorPool::default()),
            BackendKind::WorkQueue => Box::new(WorkQueue::new()?),
        })
    }
}

/// One named backend + workload combination.
pub struct Scenario {
    pub id: usize,
    pub name: &'static str,
    pub backend: BackendKind,
    pub shape: WorkloadShape,
}

/// The full benchmark matrix, in run order.
pub const SCENARIOS: [Scenario; NUM_SCENARIOS] = [
    Scenario {
        id: 0,
        name: "sync delayed sum",
        backend: BackendKind::Synchronous,
        shape: WorkloadShape::DelaysOnly,
    },
    Scenario {
        id: 1,
        name: "threaded delayed sum",
        backend: BackendKind::ThreadPerTask,
        shape: WorkloadShape::DelaysOnly,
    },
    Scenario {
        id: 2,
        name: "sync file read + delayed sum",
        backend: BackendKind::Synchronous,
        shape: WorkloadShape::FileAndDelays,
    },
    Scenario {
        id: 3,
        name: "threaded file read + delayed sum",
        backend: BackendKind::ThreadPerTask,
        shape: WorkloadShape::FileAndDelays,
    },
    Scenario {
        id: 4,
        name: "sync TCP packet read + file read + delayed sum",
        backend: BackendKind::Synchronous,
        shape: WorkloadShape::Full,
    },
    Scenario {
        id: 5,
        name: "threaded TCP packet read + file read + delayed sum",
        backend: BackendKind::ThreadPerTask,
        shape: WorkloadShape::Full,
    },
    Scenario {
        id: 6,
        name: "single reactor TCP packet read + file read + delayed sum",
        backend: BackendKind::SingleReactor,
        shape: WorkloadShape::Full,
    },
    Scenario {
        id: 7,
        name: "reactor pool TCP packet read + file read + delayed sum",
        backend: BackendKind::ReactorPool,
        shape: WorkloadShape::Full,
    },
    Scenario {
        id: 8,
        name: "work queue TCP packet read + file read + delayed sum",
        backend: BackendKind::WorkQueue,
        shape: WorkloadShape::Full,
    },
];
