use std::collections::HashSet;
use serde::{Serialize, Deserialize};
use crate::models::permission::UserRole;

/// One inbound chat line as handed over by the transport. Never persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Invocation {
    /// Empty for whispers.
    pub channel: String,
    pub text: String,
    pub user_name: String,
    pub display_name: Option<String>,
    pub badges: HashSet<String>,
}

impl Invocation {
    pub fn new(channel: &str, user_name: &str, text: &str) -> Self {
        Self {
            channel: channel.to_string(),
            text: text.to_string(),
            user_name: user_name.to_string(),
            display_name: None,
            badges: HashSet::new(),
        }
    }

    pub fn with_display_name(mut self, display_name: &str) -> Self {
        self.display_name = Some(display_name.to_string());
        self
    }

    pub fn with_badge(mut self, badge: &str) -> Self {
        self.badges.insert(badge.to_lowercase());
        self
    }

    pub fn role(&self) -> UserRole {
        UserRole::from_badges(&self.badges)
    }

    /// Display name if the transport gave a non-empty one, else the login name.
    pub fn addressed_name(&self) -> &str {
        match self.display_name.as_deref() {
            Some(d) if !d.trim().is_empty() => d,
            _ => &self.user_name,
        }
    }
}

/// Inbound traffic from the transport.
#[derive(Debug, Clone, PartialEq)]
pub enum InboundMessage {
    Channel(Invocation),
    Whisper(Invocation),
}
