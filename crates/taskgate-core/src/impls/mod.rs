//! Impls - concrete handlers and selectors.
//!
//! # Included
//! - **SimulatedHandler**: random delay, random failure (demo default)
//! - **FnHandler**: async closure as handler (tests, embedding)
//! - **RandomSelector**: uniform load balancing, optionally seeded
//! - **RoundRobinSelector**: deterministic load balancing

pub mod fn_handler;
pub mod selector;
pub mod simulated;

pub use self::fn_handler::FnHandler;
pub use self::selector::{RandomSelector, RoundRobinSelector};
pub use self::simulated::SimulatedHandler;
