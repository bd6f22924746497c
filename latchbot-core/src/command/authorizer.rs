// File: latchbot-core/src/command/authorizer.rs

use tracing::debug;
use latchbot_common::models::{RequiredPermission, UserRole};

/// Decides whether `user_name` holding `role` may run a command requiring `required`.
///
/// First match wins:
///  1. an explicit grant naming this user,
///  2. the broadcaster,
///  3. a moderator on a moderator-level command,
///  4. anyone on a public command.
pub fn authorize(role: UserRole, user_name: &str, required: &RequiredPermission) -> bool {
    debug!("Authorizing '{}' ({:?}) against {}", user_name, role, required);

    if let RequiredPermission::User(allowed) = required {
        if allowed.eq_ignore_ascii_case(user_name.trim()) {
            return true;
        }
    }
    if role == UserRole::Broadcaster {
        return true;
    }
    if *required == RequiredPermission::Moderator && role == UserRole::Moderator {
        return true;
    }
    *required == RequiredPermission::None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_command_allows_everyone() {
        for role in [UserRole::Viewer, UserRole::Moderator, UserRole::Broadcaster] {
            assert!(authorize(role, "alice", &RequiredPermission::None));
        }
    }

    #[test]
    fn test_broadcaster_level_is_broadcaster_only() {
        let req = RequiredPermission::Broadcaster;
        assert!(!authorize(UserRole::Viewer, "alice", &req));
        assert!(!authorize(UserRole::Moderator, "alice", &req));
        assert!(authorize(UserRole::Broadcaster, "alice", &req));
    }
}
