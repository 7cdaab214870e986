//! エラー型。
//!
//! タスク処理の失敗 (`ProcessingError`) はキューの外に出ない。
//! 呼び出し側が受け取るのは `ControllerError` と `ConfigError` だけ。

use thiserror::Error;

/// Failure of a single task-processing attempt.
///
/// This is the only failure kind a queue recognizes. It never leaves the
/// queue as an error: the queue folds it into a `Failure` status event.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("task processing failed: {0}")]
pub struct ProcessingError(String);

impl ProcessingError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }

    pub fn message(&self) -> &str {
        &self.0
    }
}

/// Errors returned by [`ControllerHandle`](crate::controller::ControllerHandle) operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ControllerError {
    /// The controller task is gone (all handles were dropped or it panicked).
    #[error("controller stopped")]
    Stopped,

    /// `create_worker` was called on a topology with a fixed number of queues.
    #[error("topology has a fixed number of workers")]
    FixedTopology,
}
