//! Topology - コントローラ配下のキュー構成。
//!
//! | Topology      | 初期キュー数 | create_worker |
//! |---------------|--------------|---------------|
//! | `Single`      | 1            | 不可          |
//! | `Dual`        | 2            | 不可          |
//! | `DynamicPool` | 1            | 可            |

use serde::{Deserialize, Serialize};

/// Fan-out shape of a controller.
///
/// The variants differ only in how many queues exist and whether more can be
/// added; gate, status table and status folding are shared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Topology {
    /// Exactly one queue; every task goes to it.
    Single,

    /// Two queues; each task goes to one of them at random.
    Dual,

    /// Starts with one queue and grows on `create_worker`; each task goes to
    /// a random live queue.
    DynamicPool,
}

impl Topology {
    /// Queues spawned when the controller starts.
    pub fn initial_workers(self) -> usize {
        match self {
            Topology::Single => 1,
            Topology::Dual => 2,
            Topology::DynamicPool => 1,
        }
    }

    /// Can queues be added after start?
    pub fn is_growable(self) -> bool {
        matches!(self, Topology::DynamicPool)
    }
}
