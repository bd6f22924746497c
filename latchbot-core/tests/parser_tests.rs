// File: latchbot-core/tests/parser_tests.rs

use latchbot_common::models::{PermissionOverride, RequiredPermission};
use latchbot_core::command::parse_command;
use latchbot_core::command::parser::{parse_add_options, parse_remove_options, OptionsError};

#[test]
fn test_plain_chat_is_not_a_command() {
    assert!(parse_command("hello everyone").is_none());
    assert!(parse_command("!").is_none());
    assert!(parse_command("! lurk").is_none());
    assert!(parse_command("").is_none());
}

#[test]
fn test_bang_must_lead_the_line() {
    assert!(parse_command("  !lurk").is_none());
    assert!(parse_command("\t!lurk").is_none());
    assert!(parse_command("say !lurk").is_none());
}

#[test]
fn test_options_may_span_lines() {
    let parsed = parse_command("!lurk hello\nworld").unwrap();
    assert_eq!(parsed.trigger, "lurk");
    assert_eq!(parsed.options, "hello\nworld");

    let parsed = parse_command("!lurk\r\n").unwrap();
    assert_eq!(parsed.trigger, "lurk");
    assert_eq!(parsed.options, "");
}

#[test]
fn test_trigger_is_lowercased_and_options_keep_case() {
    let parsed = parse_command("!ShoutOut SomeStreamer Go Follow").unwrap();
    assert_eq!(parsed.trigger, "shoutout");
    assert_eq!(parsed.permission, None);
    assert_eq!(parsed.options, "SomeStreamer Go Follow");
    assert_eq!(parsed.target(), Some("SomeStreamer"));
}

#[test]
fn test_permission_override_tokens() {
    let parsed = parse_command("!addcommand +m hype HYPE!").unwrap();
    assert_eq!(parsed.permission, Some(PermissionOverride::Moderator));
    assert_eq!(parsed.options, "hype HYPE!");

    let parsed = parse_command("!addcommand +b secret shh").unwrap();
    assert_eq!(parsed.permission, Some(PermissionOverride::Broadcaster));

    let parsed = parse_command("!addcommand +e hug bob gives a hug").unwrap();
    assert_eq!(parsed.permission, Some(PermissionOverride::Explicit));
    assert_eq!(parsed.options, "hug bob gives a hug");
}

#[test]
fn test_glued_override_is_plain_options() {
    let parsed = parse_command("!lurk +mfoo").unwrap();
    assert_eq!(parsed.permission, None);
    assert_eq!(parsed.options, "+mfoo");
}

#[test]
fn test_command_without_options() {
    let parsed = parse_command("!lurk").unwrap();
    assert_eq!(parsed.trigger, "lurk");
    assert_eq!(parsed.options, "");
    assert_eq!(parsed.target(), None);
}

#[test]
fn test_add_options_default_permission() {
    let request = parse_add_options("newcmd hi there", None).unwrap();
    assert_eq!(request.trigger, "newcmd");
    assert_eq!(request.payload, "hi there");
    assert_eq!(request.permission, RequiredPermission::None);
}

#[test]
fn test_add_options_tolerates_bang_and_keeps_placeholders() {
    let request = parse_add_options("!Lurk {user} is now lurking", None).unwrap();
    assert_eq!(request.trigger, "lurk");
    assert_eq!(request.payload, "{user} is now lurking");
}

#[test]
fn test_add_options_explicit_user() {
    let request = parse_add_options("hug @Bob gives everyone a hug", Some(PermissionOverride::Explicit)).unwrap();
    assert_eq!(request.trigger, "hug");
    assert_eq!(request.permission, RequiredPermission::User("bob".into()));
    assert_eq!(request.payload, "gives everyone a hug");
}

#[test]
fn test_add_options_errors() {
    assert_eq!(parse_add_options("", None), Err(OptionsError::MissingTrigger));
    assert_eq!(parse_add_options("newcmd", None), Err(OptionsError::MissingPayload));
    assert_eq!(
        parse_add_options("hug", Some(PermissionOverride::Explicit)),
        Err(OptionsError::MissingUser)
    );
    assert_eq!(
        parse_add_options("hug bob", Some(PermissionOverride::Explicit)),
        Err(OptionsError::MissingPayload)
    );
}

#[test]
fn test_remove_options() {
    assert_eq!(parse_remove_options("!OldCmd"), Ok("oldcmd".to_string()));
    assert_eq!(parse_remove_options("oldcmd trailing words"), Ok("oldcmd".to_string()));
    assert_eq!(parse_remove_options("  "), Err(OptionsError::MissingTrigger));
}
