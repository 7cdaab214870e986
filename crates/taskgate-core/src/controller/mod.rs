//! Controllers: a gate in front of one or more task queues.
//!
//! A controller is the parent actor. Submissions flow down to a queue chosen
//! by the topology; status events flow back up and are folded into the
//! controller's status table.
//!
//! # 構成
//! - **core**: コントローラ actor 本体と `ControllerHandle`
//! - **builder**: handler / selector / 初期ゲートを組み立てて起動
//! - **topology**: キュー数と増設可否

mod builder;
mod core;
mod topology;

pub use builder::ControllerBuilder;
pub use core::{ControllerHandle, ControllerSnapshot};
pub use topology::Topology;
