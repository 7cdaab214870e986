//! Status events sent from a queue to its controller.

use serde::{Deserialize, Serialize};

use super::{TaskId, TaskStatus};

/// One lifecycle step of one task, reported by the queue that owns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusEvent {
    pub task_id: TaskId,
    pub status: TaskStatus,

    /// Index of the reporting queue within its controller.
    pub worker: usize,
}

impl StatusEvent {
    pub fn new(task_id: TaskId, status: TaskStatus, worker: usize) -> Self {
        Self {
            task_id,
            status,
            worker,
        }
    }
}
