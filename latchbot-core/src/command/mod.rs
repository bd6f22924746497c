// File: latchbot-core/src/command/mod.rs
//! The pure pieces of command handling: grammar, permission check, placeholder expansion.

pub mod parser;
pub mod authorizer;
pub mod formatter;

pub use parser::{parse_command, ParsedCommand};
pub use authorizer::authorize;
pub use formatter::format_response;
