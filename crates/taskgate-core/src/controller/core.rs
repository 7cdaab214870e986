use std::sync::Arc;

use serde::Serialize;
use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, info, warn};

use super::Topology;
use crate::domain::{Gate, StatusEvent, StatusTable, Task, TaskStatus, TaskStatusRecord};
use crate::error::ControllerError;
use crate::observability::StatusCounts;
use crate::ports::{TaskHandler, WorkerSelector};
use crate::queue::{QueueHandle, QueueSender, TaskQueue};

#[derive(Debug)]
enum Command {
    Toggle,
    Submit(Task),
    CreateWorker,
    Workers(oneshot::Sender<Vec<QueueHandle>>),
}

/// Read-only view of a controller, published after every change.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ControllerSnapshot {
    pub topology: Topology,
    pub gate: Gate,

    /// Every accepted task in submission order.
    pub status_table: Vec<TaskStatusRecord>,
    pub worker_count: usize,
}

impl ControllerSnapshot {
    pub fn status_of(&self, task_id: &str) -> Option<TaskStatus> {
        self.status_table
            .iter()
            .find(|r| r.task_id.as_str() == task_id)
            .map(|r| r.status)
    }

    pub fn counts(&self) -> StatusCounts {
        StatusCounts::from_records(&self.status_table)
    }
}

/// Handle for driving and observing a controller.
///
/// Operations are non-blocking sends to the controller task and are applied
/// in call order. The controller stops once every clone of its handle is
/// dropped.
#[derive(Debug, Clone)]
pub struct ControllerHandle {
    topology: Topology,
    tx: mpsc::UnboundedSender<Command>,
    snapshot: watch::Receiver<ControllerSnapshot>,
}

impl ControllerHandle {
    /// Flip the gate between `Open` and `Closed`.
    pub fn toggle(&self) -> Result<(), ControllerError> {
        self.send(Command::Toggle)
    }

    /// Submit a task. Silently ignored while the gate is `Closed`.
    pub fn submit(&self, task: Task) -> Result<(), ControllerError> {
        self.send(Command::Submit(task))
    }

    /// Add a queue to a `DynamicPool` controller.
    pub fn create_worker(&self) -> Result<(), ControllerError> {
        if !self.topology.is_growable() {
            return Err(ControllerError::FixedTopology);
        }
        self.send(Command::CreateWorker)
    }

    /// Observer handles of all live queues, in creation order.
    pub async fn workers(&self) -> Result<Vec<QueueHandle>, ControllerError> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Workers(reply))?;
        rx.await.map_err(|_| ControllerError::Stopped)
    }

    pub fn topology(&self) -> Topology {
        self.topology
    }

    pub fn snapshot(&self) -> ControllerSnapshot {
        self.snapshot.borrow().clone()
    }

    pub fn gate(&self) -> Gate {
        self.snapshot.borrow().gate
    }

    pub fn status_table(&self) -> Vec<TaskStatusRecord> {
        self.snapshot.borrow().status_table.clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ControllerSnapshot> {
        self.snapshot.clone()
    }

    /// Wait until the published snapshot satisfies `f`.
    pub async fn wait_for(
        &self,
        f: impl FnMut(&ControllerSnapshot) -> bool,
    ) -> Result<ControllerSnapshot, ControllerError> {
        let mut rx = self.snapshot.clone();
        rx.wait_for(f)
            .await
            .map(|s| (*s).clone())
            .map_err(|_| ControllerError::Stopped)
    }

    fn send(&self, command: Command) -> Result<(), ControllerError> {
        self.tx.send(command).map_err(|_| ControllerError::Stopped)
    }
}

/// Controller actor state. Lives on its own tokio task.
pub(super) struct Controller {
    topology: Topology,
    gate: Gate,
    table: StatusTable,
    workers: Vec<QueueSender>,
    handler: Arc<dyn TaskHandler>,
    selector: Box<dyn WorkerSelector>,
    commands: mpsc::UnboundedReceiver<Command>,
    status_tx: mpsc::UnboundedSender<StatusEvent>,
    status_rx: mpsc::UnboundedReceiver<StatusEvent>,
    snapshot_tx: watch::Sender<ControllerSnapshot>,
}

impl Controller {
    pub(super) fn spawn(
        topology: Topology,
        gate: Gate,
        handler: Arc<dyn TaskHandler>,
        selector: Box<dyn WorkerSelector>,
    ) -> ControllerHandle {
        let (tx, commands) = mpsc::unbounded_channel();
        let (status_tx, status_rx) = mpsc::unbounded_channel();
        let (snapshot_tx, snapshot_rx) = watch::channel(ControllerSnapshot {
            topology,
            gate,
            status_table: Vec::new(),
            worker_count: 0,
        });

        let mut controller = Self {
            topology,
            gate,
            table: StatusTable::new(),
            workers: Vec::new(),
            handler,
            selector,
            commands,
            status_tx,
            status_rx,
            snapshot_tx,
        };
        for _ in 0..topology.initial_workers() {
            controller.spawn_worker();
        }
        controller.publish_worker_count();
        tokio::spawn(controller.run());

        ControllerHandle {
            topology,
            tx,
            snapshot: snapshot_rx,
        }
    }

    async fn run(mut self) {
        info!(topology = ?self.topology, gate = ?self.gate, workers = self.workers.len(), "controller started");
        loop {
            tokio::select! {
                command = self.commands.recv() => match command {
                    Some(command) => self.handle_command(command),
                    None => break,
                },
                Some(event) = self.status_rx.recv() => self.on_child_status(event),
            }
        }
        info!(topology = ?self.topology, tasks = self.table.len(), "controller stopped");
    }

    fn handle_command(&mut self, command: Command) {
        match command {
            Command::Toggle => {
                self.gate = self.gate.toggled();
                info!(gate = ?self.gate, "gate toggled");
                let gate = self.gate;
                self.snapshot_tx.send_modify(|s| s.gate = gate);
            }
            Command::Submit(task) => self.submit(task),
            // only sent by handles of growable topologies
            Command::CreateWorker => {
                let index = self.spawn_worker();
                info!(worker = index, workers = self.workers.len(), "worker created");
                self.publish_worker_count();
            }
            Command::Workers(reply) => {
                let handles = self.workers.iter().map(|w| w.handle().clone()).collect();
                // the caller may have given up waiting
                let _ = reply.send(handles);
            }
        }
    }

    fn submit(&mut self, task: Task) {
        if !self.gate.is_open() {
            debug!(task_id = %task.id(), "gate closed, submission ignored");
            return;
        }

        let target = self.pick_worker();
        let task_id = task.id().clone();
        self.table.push_idle(task_id.clone());
        debug!(task_id = %task_id, worker = target, "task forwarded");
        if !self.workers[target].enqueue(task) {
            warn!(worker = target, "queue stopped, task lost");
        }
        self.snapshot_tx.send_modify(|s| {
            s.status_table.push(TaskStatusRecord {
                task_id,
                status: TaskStatus::Idle,
            })
        });
    }

    fn pick_worker(&mut self) -> usize {
        let len = self.workers.len();
        match self.topology {
            Topology::Single => 0,
            Topology::Dual | Topology::DynamicPool => self.selector.select(len).min(len - 1),
        }
    }

    fn on_child_status(&mut self, event: StatusEvent) {
        let Some(position) = self.table.apply(&event) else {
            return;
        };
        // the published table mirrors `self.table` record for record
        self.snapshot_tx.send_modify(|s| {
            if let Some(record) = s.status_table.get_mut(position) {
                record.status = event.status;
            }
        });
    }

    fn spawn_worker(&mut self) -> usize {
        let index = self.workers.len();
        let sender = TaskQueue::spawn(index, Arc::clone(&self.handler), self.status_tx.clone());
        self.workers.push(sender);
        index
    }

    fn publish_worker_count(&self) {
        let count = self.workers.len();
        self.snapshot_tx.send_modify(|s| s.worker_count = count);
    }
}
