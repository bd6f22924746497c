// File: latchbot-core/src/services/builtin_commands/add_command.rs

use tracing::{error, info};
use latchbot_common::models::Command;
use crate::command::parser::parse_add_options;
use crate::services::command_service::CommandOutcome;
use super::{is_builtin, BuiltinContext, ADD_USAGE};

/// `!addcommand [+m|+b|+e] <trigger> [user] <response>`
///
/// The new trigger goes into the channel cache right after the insert, so it answers
/// before the next refresh.
pub async fn handle_add_command(ctx: &BuiltinContext<'_>) -> CommandOutcome {
    let request = match parse_add_options(&ctx.parsed.options, ctx.parsed.permission) {
        Ok(s) => s,
        Err(e) => {
            return CommandOutcome::Reply(format!(
                "I couldn't add that command, {{user}}: {}. Usage: {}",
                e, ADD_USAGE
            ));
        }
    };

    if is_builtin(&request.trigger) {
        return CommandOutcome::Reply(format!(
            "I couldn't add that command, {{user}}: !{} is a built-in command.",
            request.trigger
        ));
    }

    let cmd = Command::new(&request.trigger, &request.payload, request.permission);
    let store = ctx.channel.store();
    let cmd_ref = &cmd;
    let _writer = ctx.channel.lock_cache_writer().await;
    let result = ctx
        .guard
        .run("insert_command", move || store.insert_command(cmd_ref))
        .await;

    match result {
        Ok(()) => {
            ctx.channel.cache().insert(&cmd.trigger);
            info!(
                "'{}' added !{} in '{}' (permission: {})",
                ctx.invocation.user_name,
                cmd.trigger,
                ctx.channel.name(),
                cmd.permission
            );
            CommandOutcome::Reply(format!("Command {} added successfully.", cmd.trigger))
        }
        Err(e) => {
            error!(
                "Storing !{} for '{}' failed: {}",
                cmd.trigger,
                ctx.channel.name(),
                e
            );
            CommandOutcome::StoreFailure(
                "I couldn't add that command due to a storage error.".to_string(),
            )
        }
    }
}
