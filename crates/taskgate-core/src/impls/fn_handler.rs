//! FnHandler - adapts an async closure into a `TaskHandler`.

use std::future::Future;

use async_trait::async_trait;

use crate::error::ProcessingError;
use crate::ports::TaskHandler;

/// Wraps `Fn(payload) -> impl Future<Output = Result<(), ProcessingError>>`.
///
/// # Example
/// ```ignore
/// let handler = FnHandler::new(|_payload| async { Ok(()) });
/// ```
pub struct FnHandler<F> {
    f: F,
}

impl<F, Fut> FnHandler<F>
where
    F: Fn(serde_json::Value) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), ProcessingError>> + Send + 'static,
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

#[async_trait]
impl<F, Fut> TaskHandler for FnHandler<F>
where
    F: Fn(serde_json::Value) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), ProcessingError>> + Send + 'static,
{
    async fn process(&self, payload: &serde_json::Value) -> Result<(), ProcessingError> {
        (self.f)(payload.clone()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn forwards_payload_and_result() {
        let handler = FnHandler::new(|payload: serde_json::Value| async move {
            match payload["ok"].as_bool() {
                Some(true) => Ok(()),
                _ => Err(ProcessingError::new("not ok")),
            }
        });

        assert!(handler.process(&serde_json::json!({ "ok": true })).await.is_ok());
        let err = handler
            .process(&serde_json::json!({ "ok": false }))
            .await
            .unwrap_err();
        assert_eq!(err.message(), "not ok");
    }
}
