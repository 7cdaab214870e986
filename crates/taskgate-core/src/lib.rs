//! taskgate-core
//!
//! Gated task dispatch over single-flight FIFO queues.
//!
//! # Modules
//! - **domain**: task ids, tasks, status and gate enums, status events, status table
//! - **ports**: the `TaskHandler` and `WorkerSelector` seams
//! - **impls**: simulated and closure-backed handlers, random and round-robin selectors
//! - **queue**: the task queue actor and its observable snapshot
//! - **controller**: topologies, the controller actor, its handle and builder
//! - **config**: JSON-loadable defaults for gate and simulation
//! - **observability**: aggregate views over the status table

pub mod config;
pub mod controller;
pub mod domain;
pub mod error;
pub mod impls;
pub mod observability;
pub mod ports;
pub mod queue;

pub use config::{ConfigError, DispatchConfig, SimulationConfig};
pub use controller::{ControllerBuilder, ControllerHandle, ControllerSnapshot, Topology};
pub use domain::{Gate, Task, TaskId, TaskStatus, TaskStatusRecord};
pub use error::{ControllerError, ProcessingError};
pub use observability::StatusCounts;
pub use queue::{QueueHandle, QueueSnapshot, QueueState};
