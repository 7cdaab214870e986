//! Queue state machine and its published snapshot.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::domain::Task;

/// Queue state.
///
/// State transitions:
/// - Idle -> Processing, whenever the FIFO is non-empty
/// - Processing -> Idle, once the handler settles (success or failure)
///
/// There is no terminal state: a queue runs as long as its controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum QueueState {
    /// Waiting for a task.
    #[default]
    Idle,

    /// Handler is running for the task at the head of the FIFO.
    Processing,
}

/// Read-only view of one queue, published after every change.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueSnapshot {
    /// Display name, `"Task queue <n>"` with a 1-based `n`.
    pub name: String,
    pub state: QueueState,

    /// FIFO contents; while processing, the head is the in-flight task.
    pub pending_tasks: VecDeque<Task>,

    /// Number of tasks whose handler has settled.
    pub processed: u64,
}

impl QueueSnapshot {
    pub(crate) fn new(name: String) -> Self {
        Self {
            name,
            state: QueueState::Idle,
            pending_tasks: VecDeque::new(),
            processed: 0,
        }
    }

    /// Idle with nothing left to do.
    pub fn is_drained(&self) -> bool {
        self.state == QueueState::Idle && self.pending_tasks.is_empty()
    }
}
