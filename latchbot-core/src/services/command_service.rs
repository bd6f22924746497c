// File: latchbot-core/src/services/command_service.rs

use std::sync::Arc;
use tracing::{debug, error, warn};
use latchbot_common::models::Invocation;
use crate::channels::ChannelRegistry;
use crate::command::{authorize, format_response, parse_command};
use crate::repositories::StoreGuard;
use crate::services::builtin_commands::{handle_builtin_command, BuiltinCommand, BuiltinContext};

pub const NOT_AUTHORIZED_REPLY: &str = "Sorry, you're not authorized to use this command {user}.";
pub const LOOKUP_FAILED_REPLY: &str = "I couldn't run that command due to a storage error.";

/// What the dispatcher decided for one message. Only the text-carrying variants
/// produce something to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    /// The line is ordinary chat.
    NotACommand,
    /// A command-shaped line the channel does not know (or a channel the bot is not in).
    Unrecognized,
    /// `None` for moderator built-ins, which stay silent towards unauthorized users.
    Denied(Option<String>),
    /// The cache still listed the trigger but the store no longer has it.
    RecentlyDeleted(String),
    StoreFailure(String),
    Reply(String),
}

impl CommandOutcome {
    /// Unformatted reply text, if any.
    pub fn text(&self) -> Option<String> {
        match self {
            CommandOutcome::NotACommand | CommandOutcome::Unrecognized => None,
            CommandOutcome::Denied(reply) => reply.clone(),
            CommandOutcome::RecentlyDeleted(trigger) => {
                Some(format!("Command {} was recently deleted.", trigger))
            }
            CommandOutcome::StoreFailure(text) | CommandOutcome::Reply(text) => Some(text.clone()),
        }
    }

    /// The formatted line to send; empty means "send nothing".
    pub fn render(&self, invocation: &Invocation) -> String {
        match self.text() {
            Some(text) => format_response(&text, invocation),
            None => String::new(),
        }
    }
}

/// Resolves channel messages to replies: built-ins first, then the channel's own commands.
pub struct CommandService {
    registry: Arc<ChannelRegistry>,
    guard: StoreGuard,
}

impl CommandService {
    pub fn new(registry: Arc<ChannelRegistry>, guard: StoreGuard) -> Self {
        Self { registry, guard }
    }

    /// Returns the text to post in the invocation's channel, or an empty string for no reply.
    pub async fn process_channel_command(&self, invocation: &Invocation) -> String {
        let outcome = self.dispatch(invocation).await;
        outcome.render(invocation)
    }

    pub async fn dispatch(&self, invocation: &Invocation) -> CommandOutcome {
        let parsed = match parse_command(&invocation.text) {
            Some(p) => p,
            None => return CommandOutcome::NotACommand,
        };

        let channel = match self.registry.get(&invocation.channel) {
            Some(c) if c.is_connected() => c,
            _ => {
                debug!(
                    "Ignoring !{} for '{}': channel is not joined",
                    parsed.trigger, invocation.channel
                );
                return CommandOutcome::Unrecognized;
            }
        };

        let role = invocation.role();

        if let Some(builtin) = BuiltinCommand::from_trigger(&parsed.trigger) {
            if !authorize(role, &invocation.user_name, &builtin.required_permission()) {
                debug!(
                    "'{}' ({:?}) may not use !{} in '{}'",
                    invocation.user_name, role, builtin.name(), channel.name()
                );
                return CommandOutcome::Denied(None);
            }
            let ctx = BuiltinContext {
                channel: &channel,
                guard: &self.guard,
                invocation,
                parsed: &parsed,
            };
            return handle_builtin_command(builtin, &ctx).await;
        }

        if !channel.cache().contains(&parsed.trigger) {
            debug!("!{} is not a command in '{}'", parsed.trigger, channel.name());
            return CommandOutcome::Unrecognized;
        }

        let store = channel.store();
        let trigger = parsed.trigger.as_str();
        let resolution = match self
            .guard
            .run("lookup_command", move || store.lookup_command(trigger))
            .await
        {
            Ok(Some(r)) => r,
            Ok(None) => {
                warn!(
                    "!{} is cached for '{}' but missing from its store",
                    parsed.trigger, channel.name()
                );
                return CommandOutcome::RecentlyDeleted(parsed.trigger.clone());
            }
            Err(e) => {
                error!(
                    "Looking up !{} in '{}' failed: {}",
                    parsed.trigger, channel.name(), e
                );
                return CommandOutcome::StoreFailure(LOOKUP_FAILED_REPLY.to_string());
            }
        };

        if !authorize(role, &invocation.user_name, &resolution.permission) {
            debug!(
                "'{}' ({:?}) denied !{} (requires {})",
                invocation.user_name, role, parsed.trigger, resolution.permission
            );
            return CommandOutcome::Denied(Some(NOT_AUTHORIZED_REPLY.to_string()));
        }

        CommandOutcome::Reply(resolution.payload)
    }
}
