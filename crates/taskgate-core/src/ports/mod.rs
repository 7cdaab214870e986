//! Ports - seams injected into the dispatch core.
//!
//! Both are swappable so tests can run deterministically:
//! - `TaskHandler`: what processing a task means
//! - `WorkerSelector`: how a multi-queue controller balances load

pub mod handler;
pub mod selector;

pub use self::handler::TaskHandler;
pub use self::selector::WorkerSelector;
