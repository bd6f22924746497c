// File: latchbot-core/src/services/builtin_commands/static_commands.rs

use crate::services::command_service::CommandOutcome;
use super::{BuiltinContext, ADD_USAGE, REMOVE_USAGE};

pub const CONNECTION_TEST_REPLY: &str = "The bot has successfully latched on to this channel.";

pub fn handle_connection_test(_ctx: &BuiltinContext<'_>) -> CommandOutcome {
    CommandOutcome::Reply(CONNECTION_TEST_REPLY.to_string())
}

/// Goes through the formatter like any other reply, so it must not contain placeholders.
pub fn handle_help(_ctx: &BuiltinContext<'_>) -> CommandOutcome {
    CommandOutcome::Reply(format!(
        "Moderators can use {}, {} and !connectiontest. \
         Responses may mention the caller and the first word typed after the command.",
        ADD_USAGE, REMOVE_USAGE
    ))
}
