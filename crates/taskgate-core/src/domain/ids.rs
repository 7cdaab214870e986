//! Task identifiers.
//!
//! # TaskId
//! 投入側が付与する文字列 ID。ライブラリ側では生成もしないし、重複チェックもしない。
//! serde では `"42"` のようなプレーンな文字列としてシリアライズされる。
//!
//! Ids are supplied by the caller and assumed unique within a queue's
//! lifetime; nothing here generates or checks them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a task, as given by the submitter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for TaskId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for TaskId {
    fn from(id: String) -> Self {
        Self(id)
    }
}
