use serde::{Deserialize, Serialize};

use super::TaskId;

/// A unit of work: caller-supplied id plus an opaque payload.
///
/// Immutable once created. It moves by value from the submitter into the
/// controller and from there into exactly one queue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    payload: serde_json::Value,
}

impl Task {
    pub fn new(id: impl Into<TaskId>, payload: serde_json::Value) -> Self {
        Self {
            id: id.into(),
            payload,
        }
    }

    pub fn id(&self) -> &TaskId {
        &self.id
    }

    pub fn payload(&self) -> &serde_json::Value {
        &self.payload
    }
}
