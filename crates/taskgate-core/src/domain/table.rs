//! Controller-side status table.
//!
//! 投入順に並んだレコード列と、task id からの位置インデックスを持つ。
//! イベントの畳み込みはインデックス経由なので、タスク数に依らず O(1)。

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{StatusEvent, TaskId, TaskStatus};

/// Status of one submitted task, as displayed to collaborators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStatusRecord {
    pub task_id: TaskId,
    pub status: TaskStatus,
}

/// Ordered history of every task a controller accepted.
///
/// Insertion order is submission order. Records are updated in place and
/// never removed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusTable {
    records: Vec<TaskStatusRecord>,
    index: HashMap<TaskId, usize>,
}

impl StatusTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a freshly submitted task as `Idle`.
    ///
    /// Returns the new record's position. A repeated id gets its own record,
    /// but events keep resolving to the first one.
    pub fn push_idle(&mut self, task_id: TaskId) -> usize {
        let position = self.records.len();
        self.index.entry(task_id.clone()).or_insert(position);
        self.records.push(TaskStatusRecord {
            task_id,
            status: TaskStatus::Idle,
        });
        position
    }

    /// Fold a status event into the table.
    ///
    /// Overwrites the matching record's status and returns its position.
    /// Events for unknown ids are dropped (`None`). Backward moves are logged
    /// but still applied: ordering is guaranteed by the queue, not checked here.
    pub fn apply(&mut self, event: &StatusEvent) -> Option<usize> {
        let Some(&position) = self.index.get(&event.task_id) else {
            warn!(task_id = %event.task_id, status = ?event.status, "status for unknown task dropped");
            return None;
        };
        let record = &mut self.records[position];

        if !record.status.can_advance_to(event.status) {
            warn!(
                task_id = %event.task_id,
                from = ?record.status,
                to = ?event.status,
                "unexpected status transition"
            );
        }
        debug!(task_id = %event.task_id, worker = event.worker, status = ?event.status, "status updated");
        record.status = event.status;
        Some(position)
    }

    pub fn get(&self, task_id: &TaskId) -> Option<TaskStatus> {
        self.index.get(task_id).map(|&i| self.records[i].status)
    }

    pub fn records(&self) -> &[TaskStatusRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
