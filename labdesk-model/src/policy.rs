use serde::{Deserialize, Serialize};

/// How an owning collection treats an incoming identity it already holds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Refuse the whole commit with a conflict; nothing changes.
    #[default]
    Reject,
    /// Replace the existing entry in place, keeping its position.
    Replace,
}
