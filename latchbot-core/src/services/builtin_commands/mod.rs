// File: latchbot-core/src/services/builtin_commands/mod.rs
//! Commands every channel has without storing them: `addcommand`, `removecommand`,
//! `connectiontest` and `help`. Each lives in its own file; `handle_builtin_command`
//! is the single entry point the CommandService calls.

pub mod add_command;
pub mod remove_command;
pub mod static_commands;

use latchbot_common::models::{Invocation, RequiredPermission};
use crate::channels::ChannelState;
use crate::command::ParsedCommand;
use crate::repositories::StoreGuard;
use crate::services::command_service::CommandOutcome;
use self::add_command::handle_add_command;
use self::remove_command::handle_remove_command;
use self::static_commands::{handle_connection_test, handle_help};

pub const ADD_USAGE: &str = "!addcommand [+m|+b|+e] <trigger> [user] <response>";
pub const REMOVE_USAGE: &str = "!removecommand <trigger>";

/// Everything a built-in needs about the message that invoked it.
pub struct BuiltinContext<'a> {
    pub channel: &'a ChannelState,
    pub guard: &'a StoreGuard,
    pub invocation: &'a Invocation,
    pub parsed: &'a ParsedCommand,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinCommand {
    AddCommand,
    RemoveCommand,
    ConnectionTest,
    Help,
}

impl BuiltinCommand {
    pub const ALL: [BuiltinCommand; 4] = [
        BuiltinCommand::AddCommand,
        BuiltinCommand::RemoveCommand,
        BuiltinCommand::ConnectionTest,
        BuiltinCommand::Help,
    ];

    pub fn from_trigger(trigger: &str) -> Option<Self> {
        match trigger.to_lowercase().as_str() {
            "addcommand" => Some(BuiltinCommand::AddCommand),
            "removecommand" => Some(BuiltinCommand::RemoveCommand),
            "connectiontest" => Some(BuiltinCommand::ConnectionTest),
            "help" => Some(BuiltinCommand::Help),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            BuiltinCommand::AddCommand => "addcommand",
            BuiltinCommand::RemoveCommand => "removecommand",
            BuiltinCommand::ConnectionTest => "connectiontest",
            BuiltinCommand::Help => "help",
        }
    }

    pub fn required_permission(&self) -> RequiredPermission {
        match self {
            BuiltinCommand::Help => RequiredPermission::None,
            _ => RequiredPermission::Moderator,
        }
    }
}

pub fn is_builtin(trigger: &str) -> bool {
    BuiltinCommand::from_trigger(trigger).is_some()
}

/// Runs an already-authorized built-in.
pub async fn handle_builtin_command(cmd: BuiltinCommand, ctx: &BuiltinContext<'_>) -> CommandOutcome {
    match cmd {
        BuiltinCommand::AddCommand => handle_add_command(ctx).await,
        BuiltinCommand::RemoveCommand => handle_remove_command(ctx).await,
        BuiltinCommand::ConnectionTest => handle_connection_test(ctx),
        BuiltinCommand::Help => handle_help(ctx),
    }
}
