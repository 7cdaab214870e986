//! TaskQueue - single-flight FIFO actor.
//!
//! Each queue runs on its own tokio task and owns its FIFO exclusively.
//! Tasks arrive on an unbounded inbox; lifecycle status events leave on the
//! controller's status channel; observers read a `watch` snapshot.
//!
//! # フロー
//! 1. inbox から Task を受け取り FIFO の末尾に積む
//! 2. FIFO が空でなければ先頭を取り出さずに Processing へ遷移し、Pending を報告
//! 3. handler を別タスクで実行（実行中も inbox の受信は続ける）
//! 4. 決着したら Success / Failure を報告し、先頭を pop して 2 に戻る
//!
//! スナップショットは `send_modify` で差分だけ更新する。

use std::collections::VecDeque;
use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tracing::{debug, warn};

use super::{QueueHandle, QueueSnapshot, QueueState};
use crate::domain::{StatusEvent, Task, TaskId, TaskStatus};
use crate::error::ProcessingError;
use crate::ports::TaskHandler;

/// Controller-side end of a queue: the inbox sender plus the observer handle.
///
/// Dropping it closes the inbox. The queue then drains what it already holds
/// and stops.
pub(crate) struct QueueSender {
    tx: mpsc::UnboundedSender<Task>,
    handle: QueueHandle,
}

impl QueueSender {
    /// Append a task to the queue's FIFO. Returns `false` if the queue is gone.
    pub(crate) fn enqueue(&self, task: Task) -> bool {
        self.tx.send(task).is_ok()
    }

    pub(crate) fn handle(&self) -> &QueueHandle {
        &self.handle
    }
}

pub(crate) struct TaskQueue {
    index: usize,
    handler: Arc<dyn TaskHandler>,
    tasks: VecDeque<Task>,
    processed: u64,
    inbox: mpsc::UnboundedReceiver<Task>,
    inbox_open: bool,
    status_tx: mpsc::UnboundedSender<StatusEvent>,
    snapshot_tx: watch::Sender<QueueSnapshot>,
}

impl TaskQueue {
    /// Start a queue reporting to `status_tx`. Must be called within a tokio runtime.
    pub(crate) fn spawn(
        index: usize,
        handler: Arc<dyn TaskHandler>,
        status_tx: mpsc::UnboundedSender<StatusEvent>,
    ) -> QueueSender {
        let name = format!("Task queue {}", index + 1);
        let (tx, inbox) = mpsc::unbounded_channel();
        let (snapshot_tx, snapshot_rx) = watch::channel(QueueSnapshot::new(name.clone()));

        let queue = Self {
            index,
            handler,
            tasks: VecDeque::new(),
            processed: 0,
            inbox,
            inbox_open: true,
            status_tx,
            snapshot_tx,
        };
        tokio::spawn(queue.run());

        QueueSender {
            tx,
            handle: QueueHandle {
                index,
                name,
                snapshot: snapshot_rx,
            },
        }
    }

    async fn run(mut self) {
        debug!(worker = self.index, "task queue started");
        loop {
            // Idle guard: a non-empty FIFO always means processing the head next.
            if !self.tasks.is_empty() {
                self.process_head().await;
                continue;
            }

            self.set_state(QueueState::Idle);
            if !self.inbox_open {
                break;
            }
            match self.inbox.recv().await {
                Some(task) => self.push(task),
                None => self.inbox_open = false,
            }
        }
        debug!(worker = self.index, processed = self.processed, "task queue stopped");
    }

    /// Run the handler for the head task, accepting new tasks meanwhile.
    async fn process_head(&mut self) {
        let Some(head) = self.tasks.front() else {
            return;
        };
        let task_id = head.id().clone();
        let payload = head.payload().clone();

        self.set_state(QueueState::Processing);
        self.report(&task_id, TaskStatus::Pending);

        let handler = Arc::clone(&self.handler);
        let mut work = tokio::spawn(async move { handler.process(&payload).await });

        let joined = loop {
            tokio::select! {
                joined = &mut work => break joined,
                msg = self.inbox.recv(), if self.inbox_open => match msg {
                    Some(task) => self.push(task),
                    None => self.inbox_open = false,
                },
            }
        };
        let result = joined
            .unwrap_or_else(|e| Err(ProcessingError::new(format!("handler panicked: {e}"))));

        let status = match result {
            Ok(()) => TaskStatus::Success,
            Err(err) => {
                warn!(worker = self.index, task_id = %task_id, error = %err, "task failed");
                TaskStatus::Failure
            }
        };
        self.report(&task_id, status);
        self.tasks.pop_front();
        self.processed += 1;
        // state stays Processing until the run loop finds the FIFO empty
        self.snapshot_tx.send_modify(|s| {
            s.pending_tasks.pop_front();
            s.processed += 1;
        });
    }

    fn push(&mut self, task: Task) {
        debug!(worker = self.index, task_id = %task.id(), queued = self.tasks.len() + 1, "task enqueued");
        self.tasks.push_back(task.clone());
        self.snapshot_tx.send_modify(|s| s.pending_tasks.push_back(task));
    }

    fn report(&self, task_id: &TaskId, status: TaskStatus) {
        let event = StatusEvent::new(task_id.clone(), status, self.index);
        if self.status_tx.send(event).is_err() {
            debug!(worker = self.index, task_id = %task_id, ?status, "controller gone, status dropped");
        }
    }

    fn set_state(&self, state: QueueState) {
        self.snapshot_tx.send_if_modified(|s| {
            let changed = s.state != state;
            s.state = state;
            changed
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::impls::FnHandler;
    use rstest::rstest;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tokio::sync::Semaphore;

    fn task(id: &str) -> Task {
        Task::new(id, serde_json::json!({ "fileContent": "" }))
    }

    fn instant_ok() -> Arc<dyn TaskHandler> {
        Arc::new(FnHandler::new(|_| async { Ok(()) }))
    }

    fn instant_err() -> Arc<dyn TaskHandler> {
        Arc::new(FnHandler::new(|_| async {
            Err(ProcessingError::new("Failed to process the task"))
        }))
    }

    /// Handler that blocks until a permit is added to the returned semaphore.
    fn gated() -> (Arc<dyn TaskHandler>, Arc<Semaphore>) {
        let gate = Arc::new(Semaphore::new(0));
        let g = Arc::clone(&gate);
        let handler = FnHandler::new(move |_| {
            let g = Arc::clone(&g);
            async move {
                match g.acquire().await {
                    Ok(permit) => {
                        permit.forget();
                        Ok(())
                    }
                    Err(e) => Err(ProcessingError::new(e.to_string())),
                }
            }
        });
        (Arc::new(handler), gate)
    }

    async fn next_event(rx: &mut mpsc::UnboundedReceiver<StatusEvent>) -> StatusEvent {
        tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("status event in time")
            .expect("status channel open")
    }

    fn status_of(event: &StatusEvent) -> (&str, TaskStatus) {
        (event.task_id.as_str(), event.status)
    }

    #[tokio::test]
    async fn waits_for_tasks() {
        let (status_tx, _status_rx) = mpsc::unbounded_channel();
        let queue = TaskQueue::spawn(0, instant_ok(), status_tx);

        let snapshot = queue.handle().snapshot();
        assert_eq!(snapshot.state, QueueState::Idle);
        assert!(snapshot.pending_tasks.is_empty());
        assert_eq!(snapshot.name, "Task queue 1");
    }

    #[tokio::test]
    async fn processes_a_task_then_goes_back_to_idle() {
        let calls = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&calls);
        let handler = Arc::new(FnHandler::new(move |_| {
            c.fetch_add(1, Ordering::SeqCst);
            async { Ok(()) }
        }));
        let (status_tx, _status_rx) = mpsc::unbounded_channel();
        let queue = TaskQueue::spawn(0, handler, status_tx);

        assert!(queue.enqueue(task("1")));
        let snapshot = queue
            .handle()
            .wait_for(|s| s.processed == 1 && s.is_drained())
            .await
            .expect("queue alive");

        assert_eq!(snapshot.state, QueueState::Idle);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn processes_all_pending_tasks_in_fifo_order() {
        let (status_tx, mut status_rx) = mpsc::unbounded_channel();
        let queue = TaskQueue::spawn(0, instant_ok(), status_tx);

        for id in ["1", "2", "3"] {
            queue.enqueue(task(id));
        }

        let mut seen = Vec::new();
        for _ in 0..6 {
            let event = next_event(&mut status_rx).await;
            seen.push((event.task_id.as_str().to_string(), event.status));
        }
        let expected: Vec<(String, TaskStatus)> = ["1", "2", "3"]
            .into_iter()
            .flat_map(|id| {
                [
                    (id.to_string(), TaskStatus::Pending),
                    (id.to_string(), TaskStatus::Success),
                ]
            })
            .collect();
        assert_eq!(seen, expected);

        let snapshot = queue
            .handle()
            .wait_for(|s| s.processed == 3 && s.is_drained())
            .await
            .expect("queue alive");
        assert!(snapshot.pending_tasks.is_empty());
    }

    #[tokio::test]
    async fn does_not_stop_when_a_task_fails() {
        let (status_tx, mut status_rx) = mpsc::unbounded_channel();
        let queue = TaskQueue::spawn(0, instant_err(), status_tx);

        queue.enqueue(task("1"));
        queue.enqueue(task("2"));

        let events: Vec<StatusEvent> = [
            next_event(&mut status_rx).await,
            next_event(&mut status_rx).await,
            next_event(&mut status_rx).await,
            next_event(&mut status_rx).await,
        ]
        .into();
        let statuses: Vec<(&str, TaskStatus)> = events.iter().map(status_of).collect();
        assert_eq!(
            statuses,
            vec![
                ("1", TaskStatus::Pending),
                ("1", TaskStatus::Failure),
                ("2", TaskStatus::Pending),
                ("2", TaskStatus::Failure),
            ]
        );
        assert!(queue.handle().wait_for(|s| s.is_drained() && s.processed == 2).await.is_some());
    }

    #[rstest]
    #[case::success(instant_ok(), TaskStatus::Success)]
    #[case::failure(instant_err(), TaskStatus::Failure)]
    #[tokio::test]
    async fn forwards_pending_then_outcome_to_parent(
        #[case] handler: Arc<dyn TaskHandler>,
        #[case] outcome: TaskStatus,
    ) {
        let (status_tx, mut status_rx) = mpsc::unbounded_channel();
        let queue = TaskQueue::spawn(3, handler, status_tx);

        queue.enqueue(task("1"));

        let first = next_event(&mut status_rx).await;
        assert_eq!(first, StatusEvent::new(TaskId::new("1"), TaskStatus::Pending, 3));
        let second = next_event(&mut status_rx).await;
        assert_eq!(second, StatusEvent::new(TaskId::new("1"), outcome, 3));

        // nothing further for this task
        assert!(
            tokio::time::timeout(Duration::from_millis(50), status_rx.recv())
                .await
                .is_err()
        );
    }

    #[tokio::test]
    async fn panicking_handler_counts_as_failure() {
        let handler: Arc<dyn TaskHandler> =
            Arc::new(FnHandler::new(|payload: serde_json::Value| async move {
                if payload.is_object() {
                    panic!("boom");
                }
                Ok(())
            }));
        let (status_tx, mut status_rx) = mpsc::unbounded_channel();
        let queue = TaskQueue::spawn(0, handler, status_tx);

        queue.enqueue(task("1"));
        assert_eq!(next_event(&mut status_rx).await.status, TaskStatus::Pending);
        assert_eq!(next_event(&mut status_rx).await.status, TaskStatus::Failure);
        assert!(queue.handle().wait_for(|s| s.is_drained()).await.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn never_runs_two_handlers_at_once() {
        let running = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));
        let (r, p) = (Arc::clone(&running), Arc::clone(&peak));
        let handler = Arc::new(FnHandler::new(move |_| {
            let (r, p) = (Arc::clone(&r), Arc::clone(&p));
            async move {
                let now = r.fetch_add(1, Ordering::SeqCst) + 1;
                p.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(100)).await;
                r.fetch_sub(1, Ordering::SeqCst);
                Ok(())
            }
        }));
        let (status_tx, _status_rx) = mpsc::unbounded_channel();
        let queue = TaskQueue::spawn(0, handler, status_tx);

        for i in 0..5 {
            queue.enqueue(task(&i.to_string()));
        }
        queue
            .handle()
            .wait_for(|s| s.processed == 5 && s.is_drained())
            .await
            .expect("queue alive");

        assert_eq!(peak.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn accepts_tasks_while_processing() {
        let (handler, gate) = gated();
        let (status_tx, mut status_rx) = mpsc::unbounded_channel();
        let queue = TaskQueue::spawn(0, handler, status_tx);

        queue.enqueue(task("1"));
        assert_eq!(status_of(&next_event(&mut status_rx).await), ("1", TaskStatus::Pending));

        queue.enqueue(task("2"));
        queue.enqueue(task("3"));
        let snapshot = queue
            .handle()
            .wait_for(|s| s.pending_tasks.len() == 3)
            .await
            .expect("queue alive");
        assert_eq!(snapshot.state, QueueState::Processing);
        let ids: Vec<&str> = snapshot.pending_tasks.iter().map(|t| t.id().as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3"]);

        // "2" must not start while "1" is in flight
        assert!(
            tokio::time::timeout(Duration::from_millis(50), status_rx.recv())
                .await
                .is_err()
        );

        gate.add_permits(3);
        let mut rest = Vec::new();
        for _ in 0..5 {
            let event = next_event(&mut status_rx).await;
            rest.push((event.task_id.as_str().to_string(), event.status));
        }
        assert_eq!(rest[0], ("1".to_string(), TaskStatus::Success));
        assert_eq!(rest[1], ("2".to_string(), TaskStatus::Pending));
        assert_eq!(rest[4], ("3".to_string(), TaskStatus::Success));
    }

    #[tokio::test]
    async fn large_backlog_drains_within_budget() {
        let (status_tx, mut status_rx) = mpsc::unbounded_channel();
        let queue = TaskQueue::spawn(0, instant_ok(), status_tx);
        let n = 5_000;
        for i in 0..n {
            queue.enqueue(task(&i.to_string()));
        }

        let snapshot = tokio::time::timeout(
            Duration::from_secs(10),
            queue.handle().wait_for(|s| s.processed == n && s.is_drained()),
        )
        .await
        .expect("backlog drains in time")
        .expect("queue alive");
        assert!(snapshot.pending_tasks.is_empty());

        let mut events = 0;
        while status_rx.try_recv().is_ok() {
            events += 1;
        }
        assert_eq!(events, 2 * n);
    }

    #[tokio::test]
    async fn drains_and_stops_when_the_controller_side_is_dropped() {
        let (handler, gate) = gated();
        let (status_tx, mut status_rx) = mpsc::unbounded_channel();
        let queue = TaskQueue::spawn(0, handler, status_tx);
        let observer = queue.handle().clone();

        queue.enqueue(task("1"));
        queue.enqueue(task("2"));
        drop(queue);
        gate.add_permits(2);

        let statuses: Vec<TaskStatus> = [
            next_event(&mut status_rx).await,
            next_event(&mut status_rx).await,
            next_event(&mut status_rx).await,
            next_event(&mut status_rx).await,
        ]
        .iter()
        .map(|e| e.status)
        .collect();
        assert_eq!(statuses.iter().filter(|s| **s == TaskStatus::Success).count(), 2);

        // queue task ends, so the snapshot channel closes
        assert!(observer.wait_for(|_| false).await.is_none());
    }
}
