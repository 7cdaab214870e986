//! TaskHandler port - the work a queue performs for each task.

use async_trait::async_trait;

use crate::error::ProcessingError;

/// Processes one task payload.
///
/// # 契約
/// - 非同期で、成功か失敗のどちらかで一度だけ決着する
/// - payload の中身には関知しない（`serde_json::Value` のまま渡される）
/// - 失敗は `ProcessingError` で返す。キュー側で `Failure` イベントに変換される
///
/// A queue calls this once per task and waits for it to settle before
/// touching the next task. Implementations must settle exactly once per
/// call; a panic is treated as a failure.
#[async_trait]
pub trait TaskHandler: Send + Sync {
    async fn process(&self, payload: &serde_json::Value) -> Result<(), ProcessingError>;
}
