// File: latchbot-core/src/services/builtin_commands/remove_command.rs

use tracing::{error, info};
use crate::command::parser::parse_remove_options;
use crate::services::command_service::CommandOutcome;
use super::{BuiltinContext, REMOVE_USAGE};

/// `!removecommand <trigger>`. The cache is left alone; a removed trigger keeps being
/// recognized until the next refresh and then answers "recently deleted".
pub async fn handle_remove_command(ctx: &BuiltinContext<'_>) -> CommandOutcome {
    let trigger = match parse_remove_options(&ctx.parsed.options) {
        Ok(t) => t,
        Err(e) => {
            return CommandOutcome::Reply(format!(
                "I couldn't remove that command, {{user}}: {}. Usage: {}",
                e, REMOVE_USAGE
            ));
        }
    };

    let store = ctx.channel.store();
    let trigger_ref = trigger.as_str();
    let result = ctx
        .guard
        .run("remove_command", move || store.remove_command(trigger_ref))
        .await;

    match result {
        Ok(()) => {
            info!(
                "'{}' removed !{} in '{}'",
                ctx.invocation.user_name,
                trigger,
                ctx.channel.name()
            );
            CommandOutcome::Reply(format!("Command {} removed successfully.", trigger))
        }
        Err(e) => {
            error!("Removing !{} for '{}' failed: {}", trigger, ctx.channel.name(), e);
            CommandOutcome::StoreFailure(
                "I couldn't remove that command due to a storage error.".to_string(),
            )
        }
    }
}
