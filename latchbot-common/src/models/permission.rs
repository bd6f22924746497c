use std::collections::HashSet;
use std::fmt;
use serde::{Serialize, Deserialize};

/// Role of a chatter as derived from their badges. Ordered: viewer < moderator < broadcaster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum UserRole {
    Viewer,
    Moderator,
    Broadcaster,
}

impl UserRole {
    /// Broadcaster badge wins over moderator badge; no relevant badge means viewer.
    pub fn from_badges(badges: &HashSet<String>) -> Self {
        let has = |name: &str| badges.iter().any(|b| b.eq_ignore_ascii_case(name));
        if has("broadcaster") {
            UserRole::Broadcaster
        } else if has("moderator") {
            UserRole::Moderator
        } else {
            UserRole::Viewer
        }
    }
}

/// What a stored command demands of its invoker.
///
/// Persisted as a single text column: `""` for public, `"m"` / `"b"` for the role levels,
/// and `"u:<login>"` for the one user allowed to run it. The prefix keeps any login
/// from being read back as a role token.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RequiredPermission {
    #[default]
    None,
    Moderator,
    Broadcaster,
    User(String),
}

const USER_GRANT_PREFIX: &str = "u:";

impl RequiredPermission {
    /// Rows written before grants were prefixed hold the bare login; those still read as a
    /// user grant unless they are exactly a role token.
    pub fn from_stored(raw: &str) -> Self {
        let raw = raw.trim().to_lowercase();
        if let Some(name) = raw.strip_prefix(USER_GRANT_PREFIX) {
            return RequiredPermission::User(name.to_string());
        }
        match raw.as_str() {
            "" => RequiredPermission::None,
            "m" => RequiredPermission::Moderator,
            "b" => RequiredPermission::Broadcaster,
            name => RequiredPermission::User(name.to_string()),
        }
    }

    pub fn to_stored(&self) -> String {
        match self {
            RequiredPermission::None => String::new(),
            RequiredPermission::Moderator => "m".to_string(),
            RequiredPermission::Broadcaster => "b".to_string(),
            RequiredPermission::User(name) => {
                format!("{}{}", USER_GRANT_PREFIX, name.to_lowercase())
            }
        }
    }
}

impl fmt::Display for RequiredPermission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequiredPermission::None => write!(f, "everyone"),
            RequiredPermission::Moderator => write!(f, "moderator"),
            RequiredPermission::Broadcaster => write!(f, "broadcaster"),
            RequiredPermission::User(name) => write!(f, "user '{}'", name),
        }
    }
}

/// The optional `+e` / `+m` / `+b` token following a trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PermissionOverride {
    /// Grant to one explicitly named user.
    Explicit,
    Moderator,
    Broadcaster,
}

impl PermissionOverride {
    pub fn from_token(token: &str) -> Option<Self> {
        match token.to_lowercase().as_str() {
            "+e" => Some(PermissionOverride::Explicit),
            "+m" => Some(PermissionOverride::Moderator),
            "+b" => Some(PermissionOverride::Broadcaster),
            _ => None,
        }
    }
}
