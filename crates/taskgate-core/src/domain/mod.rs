//! Domain model (ids, tasks, statuses, status table).

pub mod events;
pub mod ids;
pub mod state;
pub mod table;
pub mod task;

pub use events::StatusEvent;
pub use ids::TaskId;
pub use state::{Gate, TaskStatus};
pub use table::{StatusTable, TaskStatusRecord};
pub use task::Task;
