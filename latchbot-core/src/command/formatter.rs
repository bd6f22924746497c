// File: latchbot-core/src/command/formatter.rs

use latchbot_common::models::Invocation;
use crate::command::parser::parse_command;

pub const USER_PLACEHOLDER: &str = "{user}";
pub const TARGET_PLACEHOLDER: &str = "{target}";

/// Expands `{user}` and `{target}` in a response.
///
/// `{target}` is the first word of the options of the invocation's own command line. It is left
/// in place when that line carried no options. Any other `{...}` token is kept verbatim.
pub fn format_response(payload: &str, invocation: &Invocation) -> String {
    let mut formatted = payload.replace(USER_PLACEHOLDER, invocation.addressed_name());

    if formatted.contains(TARGET_PLACEHOLDER) {
        let parsed = parse_command(&invocation.text);
        if let Some(target) = parsed.as_ref().and_then(|p| p.target()) {
            formatted = formatted.replace(TARGET_PLACEHOLDER, target);
        }
    }

    formatted
}
