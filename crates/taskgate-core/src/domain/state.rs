//! Task status and gate state.
//!
//! # 状態の持ち主
//! - `TaskStatus`: コントローラのステータステーブルが保持する（キューは報告するだけ）
//! - `Gate`: コントローラが保持し、`Closed` の間は投入を黙って捨てる

use serde::{Deserialize, Serialize};

/// Lifecycle status of a task as seen by its controller.
///
/// State transitions:
/// - Idle -> Pending -> Success
/// - Idle -> Pending -> Failure
///
/// `Idle` is assigned by the controller on submission; the other three are
/// reported by the queue that owns the task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Accepted by the controller, not yet picked up by its queue.
    Idle,

    /// Handler is running for this task.
    Pending,

    /// Handler settled successfully.
    Success,

    /// Handler failed.
    Failure,
}

impl TaskStatus {
    /// Is this a terminal status (no further transitions)?
    pub fn is_terminal(self) -> bool {
        matches!(self, TaskStatus::Success | TaskStatus::Failure)
    }

    /// Is `next` a legal forward step from `self`?
    pub fn can_advance_to(self, next: TaskStatus) -> bool {
        matches!(
            (self, next),
            (TaskStatus::Idle, TaskStatus::Pending)
                | (TaskStatus::Pending, TaskStatus::Success)
                | (TaskStatus::Pending, TaskStatus::Failure)
        )
    }
}

/// Controller gate. Submissions are accepted only while `Open`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Gate {
    Open,
    #[default]
    Closed,
}

impl Gate {
    pub fn is_open(self) -> bool {
        self == Gate::Open
    }

    pub fn toggled(self) -> Self {
        match self {
            Gate::Open => Gate::Closed,
            Gate::Closed => Gate::Open,
        }
    }
}
