//! Task queue actor: a private FIFO processed one task at a time.

mod actor;
mod state;

pub(crate) use actor::{QueueSender, TaskQueue};
pub use state::{QueueSnapshot, QueueState};

use tokio::sync::watch;

use crate::domain::Task;

/// Observer handle to one queue.
///
/// Handed out to renderers by the owning controller. It can only read the
/// queue's published snapshot; tasks reach a queue through its controller.
#[derive(Debug, Clone)]
pub struct QueueHandle {
    index: usize,
    name: String,
    snapshot: watch::Receiver<QueueSnapshot>,
}

impl QueueHandle {
    /// Stable position of this queue within its controller (creation order).
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn snapshot(&self) -> QueueSnapshot {
        self.snapshot.borrow().clone()
    }

    pub fn state(&self) -> QueueState {
        self.snapshot.borrow().state
    }

    pub fn pending_tasks(&self) -> Vec<Task> {
        self.snapshot.borrow().pending_tasks.iter().cloned().collect()
    }

    pub fn subscribe(&self) -> watch::Receiver<QueueSnapshot> {
        self.snapshot.clone()
    }

    /// Wait until the published snapshot satisfies `f`.
    ///
    /// Returns `None` once the queue has stopped without satisfying it.
    pub async fn wait_for(&self, f: impl FnMut(&QueueSnapshot) -> bool) -> Option<QueueSnapshot> {
        let mut rx = self.snapshot.clone();
        rx.wait_for(f).await.ok().map(|s| (*s).clone())
    }
}
