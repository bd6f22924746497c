// File: latchbot-core/src/command/parser.rs
//! Recognizes `!trigger [+e|+m|+b] [options...]` lines, and the small option grammars of the
//! command-management built-ins.

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;
use latchbot_common::models::{PermissionOverride, RequiredPermission};

/// First group is the trigger, second the optional permission override, third the options.
/// The `!` must be the very first character; options may span lines.
static COMMAND_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)^!(?P<trigger>\S+)(?:\s+(?P<permission>(?i:\+[emb]))(?:\s|$))?\s*(?P<options>.*)$")
        .expect("command grammar must compile")
});

/// A chat line that matched the command grammar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommand {
    /// Lower-cased, without the `!`.
    pub trigger: String,
    pub permission: Option<PermissionOverride>,
    /// Remainder of the line with its original case, trimmed.
    pub options: String,
}

impl ParsedCommand {
    /// First whitespace-delimited word of the options, if any.
    pub fn target(&self) -> Option<&str> {
        self.options.split_whitespace().next()
    }
}

/// Returns `None` when the text is not a command invocation.
pub fn parse_command(text: &str) -> Option<ParsedCommand> {
    let caps = COMMAND_RE.captures(text)?;
    let trigger = caps.name("trigger")?.as_str().to_lowercase();
    let permission = caps
        .name("permission")
        .and_then(|m| PermissionOverride::from_token(m.as_str()));
    let options = caps
        .name("options")
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default();

    Some(ParsedCommand { trigger, permission, options })
}

/// Splits on the first run of whitespace. The head is never empty; the rest may be.
pub fn split_first_word(input: &str) -> Option<(&str, &str)> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }
    match input.find(char::is_whitespace) {
        Some(idx) => Some((&input[..idx], input[idx..].trim_start())),
        None => Some((input, "")),
    }
}

/// Lower-cases a trigger typed as a sub-command argument; a leading `!` is tolerated.
pub fn normalize_trigger(raw: &str) -> Option<String> {
    let t = raw.trim().trim_start_matches('!').to_lowercase();
    if t.is_empty() || t.contains(char::is_whitespace) {
        None
    } else {
        Some(t)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OptionsError {
    #[error("no trigger given")]
    MissingTrigger,
    #[error("no response text given")]
    MissingPayload,
    #[error("no user name given for an explicit grant")]
    MissingUser,
}

/// The command an `!addcommand` line asks to create.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCommandRequest {
    pub trigger: String,
    pub payload: String,
    pub permission: RequiredPermission,
}

/// `<newTrigger> <payload...>`, or `<newTrigger> <userName> <payload...>` under `+e`.
pub fn parse_add_options(
    options: &str,
    permission: Option<PermissionOverride>,
) -> Result<NewCommandRequest, OptionsError> {
    let (raw_trigger, rest) = split_first_word(options).ok_or(OptionsError::MissingTrigger)?;
    let trigger = normalize_trigger(raw_trigger).ok_or(OptionsError::MissingTrigger)?;

    let (permission, payload) = match permission {
        None => (RequiredPermission::None, rest),
        Some(PermissionOverride::Moderator) => (RequiredPermission::Moderator, rest),
        Some(PermissionOverride::Broadcaster) => (RequiredPermission::Broadcaster, rest),
        Some(PermissionOverride::Explicit) => {
            let (user, payload) = split_first_word(rest).ok_or(OptionsError::MissingUser)?;
            let user = user.trim_start_matches('@').to_lowercase();
            if user.is_empty() {
                return Err(OptionsError::MissingUser);
            }
            (RequiredPermission::User(user), payload)
        }
    };

    if payload.trim().is_empty() {
        return Err(OptionsError::MissingPayload);
    }

    Ok(NewCommandRequest {
        trigger,
        payload: payload.trim().to_string(),
        permission,
    })
}

/// `<deleteTrigger>`; anything after the first word is ignored.
pub fn parse_remove_options(options: &str) -> Result<String, OptionsError> {
    let (raw_trigger, _) = split_first_word(options).ok_or(OptionsError::MissingTrigger)?;
    normalize_trigger(raw_trigger).ok_or(OptionsError::MissingTrigger)
}
