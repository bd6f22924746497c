use chrono::{DateTime, Utc};
use serde::{Serialize, Deserialize};

/// Row of the bot-level `broadcasters` registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BroadcasterRecord {
    pub channel_name: String,
    /// Whether the channel's command store has been provisioned.
    pub db_created: bool,
    /// Whether the owner has approved joining this channel.
    pub authorized: bool,
    pub requested_at: DateTime<Utc>,
}

/// Lower-cased, `#`-stripped channel name.
pub fn canonical_channel_name(raw: &str) -> String {
    raw.trim().trim_start_matches('#').to_lowercase()
}

/// Channel names double as store file names, so only the characters chat logins use are
/// accepted: ASCII letters, digits and `_`.
pub fn is_valid_channel_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}
