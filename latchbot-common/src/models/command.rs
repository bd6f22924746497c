use serde::{Serialize, Deserialize};
use crate::models::permission::RequiredPermission;

/// Represents a custom chat command (e.g. `!lurk`) stored for one channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Command {
    /// Lower-cased trigger, without the leading `!`.
    pub trigger: String,
    pub payload: String,
    pub permission: RequiredPermission,

    /// Persisted but not enforced by the dispatcher.
    pub cooldown_seconds: i64,
    /// Persisted but never incremented.
    pub uses: i64,
}

impl Command {
    pub fn new(trigger: &str, payload: &str, permission: RequiredPermission) -> Self {
        Self {
            trigger: trigger.to_lowercase(),
            payload: payload.to_string(),
            permission,
            cooldown_seconds: 0,
            uses: 0,
        }
    }
}

/// What a store lookup yields for a known trigger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResolution {
    pub payload: String,
    pub permission: RequiredPermission,
}
