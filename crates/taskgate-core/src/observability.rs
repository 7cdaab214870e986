//! Observability - ステータステーブルの集計ビュー。
//!
//! 表示用の件数だけを持つ。テーブル本体は `ControllerSnapshot` を参照する。

use serde::{Deserialize, Serialize};

use crate::domain::{TaskStatus, TaskStatusRecord};

/// Per-status totals of a controller's status table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    pub idle: usize,
    pub pending: usize,
    pub success: usize,
    pub failure: usize,
}

impl StatusCounts {
    pub fn from_records(records: &[TaskStatusRecord]) -> Self {
        let mut counts = Self::default();
        for record in records {
            match record.status {
                TaskStatus::Idle => counts.idle += 1,
                TaskStatus::Pending => counts.pending += 1,
                TaskStatus::Success => counts.success += 1,
                TaskStatus::Failure => counts.failure += 1,
            }
        }
        counts
    }

    pub fn total(&self) -> usize {
        self.idle + self.pending + self.success + self.failure
    }

    /// Number of tasks that reached `Success` or `Failure`.
    pub fn settled(&self) -> usize {
        self.success + self.failure
    }
}
