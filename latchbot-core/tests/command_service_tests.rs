// File: latchbot-core/tests/command_service_tests.rs

use latchbot_common::models::{Command, RequiredPermission};
use latchbot_core::Error;
use latchbot_core::services::CommandOutcome;
use latchbot_core::test_utils::helpers::{broadcaster, moderator, viewer, TestHarness};

fn default_commands() -> Vec<Command> {
    vec![
        Command::new("lurk", "{user} is now lurking", RequiredPermission::None),
        Command::new("ban", "{target} has been banned", RequiredPermission::Moderator),
        Command::new("hug", "{user} hugs {target}", RequiredPermission::User("bob".into())),
    ]
}

async fn harness() -> Result<TestHarness, Error> {
    let h = TestHarness::new("hikthur");
    h.join_with("hikthur", default_commands()).await?;
    Ok(h)
}

#[tokio::test]
async fn test_viewer_runs_public_command() -> Result<(), Error> {
    let h = harness().await?;
    let reply = h.commands.process_channel_command(&viewer("hikthur", "alice", "!lurk")).await;
    assert_eq!(reply, "alice is now lurking");
    Ok(())
}

#[tokio::test]
async fn test_display_name_is_preferred() -> Result<(), Error> {
    let h = harness().await?;
    let inv = viewer("hikthur", "alice", "!LURK").with_display_name("Alice_");
    assert_eq!(h.commands.process_channel_command(&inv).await, "Alice_ is now lurking");
    Ok(())
}

#[tokio::test]
async fn test_viewer_denied_moderator_command() -> Result<(), Error> {
    let h = harness().await?;
    let reply = h
        .commands
        .process_channel_command(&viewer("hikthur", "alice", "!ban {target}"))
        .await;
    assert_eq!(reply, "Sorry, you're not authorized to use this command alice.");

    let reply = h
        .commands
        .process_channel_command(&moderator("hikthur", "mod", "!ban spammer"))
        .await;
    assert_eq!(reply, "spammer has been banned");
    Ok(())
}

#[tokio::test]
async fn test_explicit_user_grant() -> Result<(), Error> {
    let h = harness().await?;
    let bob = h.commands.process_channel_command(&viewer("hikthur", "Bob", "!hug alice")).await;
    assert_eq!(bob, "Bob hugs alice");

    let mod_reply = h.commands.process_channel_command(&moderator("hikthur", "mod", "!hug alice")).await;
    assert!(mod_reply.starts_with("Sorry, you're not authorized"));

    let owner = h.commands.process_channel_command(&broadcaster("hikthur", "hikthur", "!hug alice")).await;
    assert_eq!(owner, "hikthur hugs alice");
    Ok(())
}

#[tokio::test]
async fn test_non_command_touches_nothing() -> Result<(), Error> {
    let h = harness().await?;
    let store = h.provisioner.store("hikthur");
    let before = store.call_count();

    let outcome = h.commands.dispatch(&viewer("hikthur", "alice", "just chatting")).await;
    assert_eq!(outcome, CommandOutcome::NotACommand);

    let outcome = h.commands.dispatch(&viewer("hikthur", "alice", "!unknown thing")).await;
    assert_eq!(outcome, CommandOutcome::Unrecognized);

    assert_eq!(store.call_count(), before);
    Ok(())
}

#[tokio::test]
async fn test_unjoined_channel_is_ignored() -> Result<(), Error> {
    let h = harness().await?;
    let reply = h.commands.process_channel_command(&viewer("elsewhere", "alice", "!lurk")).await;
    assert_eq!(reply, "");
    Ok(())
}

#[tokio::test]
async fn test_addcommand_requires_moderator() -> Result<(), Error> {
    let h = harness().await?;
    let store = h.provisioner.store("hikthur");
    let before = store.call_count();

    let reply = h
        .commands
        .process_channel_command(&viewer("hikthur", "alice", "!addcommand newcmd hi there"))
        .await;
    assert_eq!(reply, "");
    assert_eq!(store.call_count(), before);
    assert!(!store.contains("newcmd"));
    Ok(())
}

#[tokio::test]
async fn test_addcommand_is_usable_immediately() -> Result<(), Error> {
    let h = harness().await?;

    let reply = h
        .commands
        .process_channel_command(&moderator("hikthur", "mod", "!addcommand newcmd hi there"))
        .await;
    assert_eq!(reply, "Command newcmd added successfully.");

    let reply = h.commands.process_channel_command(&viewer("hikthur", "alice", "!newcmd")).await;
    assert_eq!(reply, "hi there");
    Ok(())
}

#[tokio::test]
async fn test_addcommand_with_overrides() -> Result<(), Error> {
    let h = harness().await?;

    h.commands
        .process_channel_command(&broadcaster("hikthur", "hikthur", "!addcommand +m !modonly mods only"))
        .await;
    h.commands
        .process_channel_command(&moderator("hikthur", "mod", "!addcommand +e vip @Carol just for {user}"))
        .await;

    let store = h.provisioner.store("hikthur");
    let modonly = store.permission_of("modonly");
    assert_eq!(modonly, Some(RequiredPermission::Moderator));
    let vip = store.permission_of("vip");
    assert_eq!(vip, Some(RequiredPermission::User("carol".into())));

    let carol = h.commands.process_channel_command(&viewer("hikthur", "carol", "!vip")).await;
    assert_eq!(carol, "just for carol");
    let dave = h.commands.process_channel_command(&viewer("hikthur", "dave", "!vip")).await;
    assert_eq!(dave, "Sorry, you're not authorized to use this command dave.");
    Ok(())
}

#[tokio::test]
async fn test_addcommand_parse_failures_are_explained() -> Result<(), Error> {
    let h = harness().await?;

    let reply = h
        .commands
        .process_channel_command(&moderator("hikthur", "mod", "!addcommand lonely"))
        .await;
    assert!(reply.starts_with("I couldn't add that command, mod: no response text given."));

    let reply = h
        .commands
        .process_channel_command(&moderator("hikthur", "mod", "!addcommand help not yours"))
        .await;
    assert_eq!(reply, "I couldn't add that command, mod: !help is a built-in command.");
    Ok(())
}

#[tokio::test]
async fn test_removed_command_reports_recently_deleted_until_refresh() -> Result<(), Error> {
    let h = harness().await?;

    let reply = h
        .commands
        .process_channel_command(&moderator("hikthur", "mod", "!removecommand lurk"))
        .await;
    assert_eq!(reply, "Command lurk removed successfully.");

    let outcome = h.commands.dispatch(&viewer("hikthur", "alice", "!lurk")).await;
    assert_eq!(outcome, CommandOutcome::RecentlyDeleted("lurk".into()));
    assert_eq!(
        outcome.render(&viewer("hikthur", "alice", "!lurk")),
        "Command lurk was recently deleted."
    );

    let channel = h.registry.get("hikthur").expect("joined");
    latchbot_core::tasks::refresh_channel_cache(&channel, &latchbot_core::test_utils::helpers::test_guard()).await?;

    let reply = h.commands.process_channel_command(&viewer("hikthur", "alice", "!lurk")).await;
    assert_eq!(reply, "");
    Ok(())
}

#[tokio::test]
async fn test_removing_missing_command_still_succeeds() -> Result<(), Error> {
    let h = harness().await?;
    let reply = h
        .commands
        .process_channel_command(&moderator("hikthur", "mod", "!removecommand ghost"))
        .await;
    assert_eq!(reply, "Command ghost removed successfully.");
    Ok(())
}

#[tokio::test]
async fn test_moderator_builtins_are_silent_for_viewers() -> Result<(), Error> {
    let h = harness().await?;
    for text in ["!removecommand lurk", "!connectiontest", "!addcommand +b x y"] {
        let outcome = h.commands.dispatch(&viewer("hikthur", "alice", text)).await;
        assert_eq!(outcome, CommandOutcome::Denied(None), "{}", text);
    }
    assert!(h.provisioner.store("hikthur").contains("lurk"));
    Ok(())
}

#[tokio::test]
async fn test_connectiontest_and_help() -> Result<(), Error> {
    let h = harness().await?;
    let reply = h
        .commands
        .process_channel_command(&moderator("hikthur", "mod", "!connectiontest"))
        .await;
    assert_eq!(reply, "The bot has successfully latched on to this channel.");

    let help = h.commands.process_channel_command(&viewer("hikthur", "alice", "!help")).await;
    assert!(help.contains("!addcommand"));
    assert!(!help.contains('{'));
    Ok(())
}

#[tokio::test]
async fn test_store_failure_becomes_apology() -> Result<(), Error> {
    let h = harness().await?;
    let store = h.provisioner.store("hikthur");
    store.set_failing(true);

    let outcome = h.commands.dispatch(&viewer("hikthur", "alice", "!lurk")).await;
    assert!(matches!(outcome, CommandOutcome::StoreFailure(_)));
    assert_eq!(
        outcome.render(&viewer("hikthur", "alice", "!lurk")),
        "I couldn't run that command due to a storage error."
    );

    let reply = h
        .commands
        .process_channel_command(&moderator("hikthur", "mod", "!addcommand newcmd hi"))
        .await;
    assert_eq!(reply, "I couldn't add that command due to a storage error.");

    let reply = h
        .commands
        .process_channel_command(&moderator("hikthur", "mod", "!removecommand lurk"))
        .await;
    assert_eq!(reply, "I couldn't remove that command due to a storage error.");
    Ok(())
}

#[tokio::test]
async fn test_transient_store_errors_are_retried() -> Result<(), Error> {
    let h = harness().await?;
    let store = h.provisioner.store("hikthur");
    store.fail_transiently(2);

    let reply = h.commands.process_channel_command(&viewer("hikthur", "alice", "!lurk")).await;
    assert_eq!(reply, "alice is now lurking");
    Ok(())
}

#[tokio::test]
async fn test_cooldown_is_not_enforced() -> Result<(), Error> {
    let h = TestHarness::new("hikthur");
    let mut slow = Command::new("slow", "again!", RequiredPermission::None);
    slow.cooldown_seconds = 600;
    h.join_with("hikthur", vec![slow]).await?;

    // Cooldowns are stored but not applied; both calls answer.
    for _ in 0..2 {
        let reply = h.commands.process_channel_command(&viewer("hikthur", "alice", "!slow")).await;
        assert_eq!(reply, "again!");
    }
    Ok(())
}

#[tokio::test]
async fn test_channels_are_isolated() -> Result<(), Error> {
    let h = harness().await?;
    h.join_with(
        "other",
        vec![Command::new("lurk", "other lurk for {user}", RequiredPermission::None)],
    )
        .await?;

    let msg_a = viewer("hikthur", "alice", "!lurk");
    let msg_b = viewer("other", "alice", "!lurk");
    let (a, b) = tokio::join!(
        h.commands.process_channel_command(&msg_a),
        h.commands.process_channel_command(&msg_b),
    );
    assert_eq!(a, "alice is now lurking");
    assert_eq!(b, "other lurk for alice");

    let reply = h.commands.process_channel_command(&viewer("other", "alice", "!ban x")).await;
    assert_eq!(reply, "");
    Ok(())
}
