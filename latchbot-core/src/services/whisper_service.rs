// File: latchbot-core/src/services/whisper_service.rs

use std::sync::Arc;
use tracing::{debug, error, info, warn};
use latchbot_common::models::{canonical_channel_name, Invocation};
use crate::Error;
use crate::command::{format_response, parse_command, ParsedCommand};
use crate::services::channel_manager::ChannelManager;

/// Answers whispers: join requests from broadcasters and authorizations from the owner.
pub struct WhisperService {
    channels: Arc<ChannelManager>,
    owner: String,
}

impl WhisperService {
    pub fn new(channels: Arc<ChannelManager>, owner: &str) -> Self {
        Self {
            channels,
            owner: canonical_channel_name(owner),
        }
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Returns the whisper to send back to the sender, or an empty string for no reply.
    pub async fn process_whisper_command(&self, invocation: &Invocation) -> String {
        let parsed = match parse_command(&invocation.text) {
            Some(p) => p,
            None => return String::new(),
        };

        let reply = match parsed.trigger.as_str() {
            "joinchannel" => self.handle_join_request(invocation).await,
            "authorizejoin" => self.handle_authorize(invocation, &parsed).await,
            other => {
                debug!("Unknown whisper command !{} from '{}'", other, invocation.user_name);
                format!(
                    "That is not a command I understand, please contact {} with what you're trying to do.",
                    self.owner
                )
            }
        };

        format_response(&reply, invocation)
    }

    async fn handle_join_request(&self, invocation: &Invocation) -> String {
        match self.channels.request_join(&invocation.user_name).await {
            Ok(record) if record.authorized => {
                "{user}, I'm already authorized for your channel.".to_string()
            }
            Ok(_) => {
                info!("Join request from '{}' awaits authorization", invocation.user_name);
                format!(
                    "Thank you {{user}} for the join request, I've sent it to {} for authorization",
                    self.owner
                )
            }
            Err(e) => {
                error!("Recording the join request of '{}' failed: {}", invocation.user_name, e);
                "I couldn't record your join request due to a storage error.".to_string()
            }
        }
    }

    async fn handle_authorize(&self, invocation: &Invocation, parsed: &ParsedCommand) -> String {
        if !invocation.user_name.eq_ignore_ascii_case(&self.owner) {
            warn!("'{}' tried to authorize a channel", invocation.user_name);
            return format!("I'm sorry, only {} can authorize new channels.", self.owner);
        }

        let target = match parsed.target() {
            Some(t) => canonical_channel_name(t),
            None => return "Usage: !authorizejoin <channel>".to_string(),
        };

        match self.channels.authorize_channel(&target).await {
            Ok(_) => format!("Authorizing {} as a broadcaster.", target),
            Err(Error::Parse(reason)) => {
                warn!("Refusing to authorize '{}': {}", target, reason);
                format!("I couldn't authorize {}: {}.", target, reason)
            }
            Err(e) => {
                error!("Authorizing '{}' failed: {}", target, e);
                format!("I couldn't authorize {} due to a storage error.", target)
            }
        }
    }
}
