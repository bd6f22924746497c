// File: latchbot-core/tests/whisper_tests.rs

use latchbot_common::traits::repository_traits::BroadcasterRepository;
use latchbot_core::Error;
use latchbot_core::test_utils::helpers::{viewer, whisper, TestHarness, TransportCall};

#[tokio::test]
async fn test_join_request_is_recorded_as_pending() -> Result<(), Error> {
    let h = TestHarness::new("hikthur");

    let reply = h
        .whispers
        .process_whisper_command(&whisper("streamer", "!joinchannel").with_display_name("Streamer"))
        .await;
    assert_eq!(
        reply,
        "Thank you Streamer for the join request, I've sent it to hikthur for authorization"
    );

    let record = h.broadcasters.get_broadcaster("streamer").await?.expect("recorded");
    assert!(!record.authorized);
    assert!(h.registry.get("streamer").is_none());
    Ok(())
}

#[tokio::test]
async fn test_only_owner_may_authorize() -> Result<(), Error> {
    let h = TestHarness::new("hikthur");
    h.whispers.process_whisper_command(&whisper("streamer", "!joinchannel")).await;

    let reply = h
        .whispers
        .process_whisper_command(&whisper("streamer", "!authorizejoin streamer"))
        .await;
    assert_eq!(reply, "I'm sorry, only hikthur can authorize new channels.");
    assert!(!h.broadcasters.get_broadcaster("streamer").await?.expect("recorded").authorized);
    Ok(())
}

#[tokio::test]
async fn test_owner_authorization_provisions_and_joins() -> Result<(), Error> {
    let h = TestHarness::new("hikthur");
    h.whispers.process_whisper_command(&whisper("streamer", "!joinchannel")).await;

    let reply = h
        .whispers
        .process_whisper_command(&whisper("Hikthur", "!authorizejoin #Streamer"))
        .await;
    assert_eq!(reply, "Authorizing streamer as a broadcaster.");

    let record = h.broadcasters.get_broadcaster("streamer").await?.expect("recorded");
    assert!(record.authorized);
    assert!(record.db_created);
    assert!(h.registry.get("streamer").is_some());
    assert!(h.transport.calls().contains(&TransportCall::Join("streamer".into())));

    // The freshly joined channel answers built-ins right away.
    let reply = h
        .commands
        .process_channel_command(&viewer("streamer", "streamer", "!connectiontest").with_badge("broadcaster"))
        .await;
    assert_eq!(reply, "The bot has successfully latched on to this channel.");
    Ok(())
}

#[tokio::test]
async fn test_repeat_request_from_authorized_channel() -> Result<(), Error> {
    let h = TestHarness::new("hikthur");
    h.join_with("streamer", Vec::new()).await?;

    let reply = h
        .whispers
        .process_whisper_command(&whisper("streamer", "!joinchannel"))
        .await;
    assert_eq!(reply, "streamer, I'm already authorized for your channel.");
    Ok(())
}

#[tokio::test]
async fn test_authorize_without_channel_shows_usage() {
    let h = TestHarness::new("hikthur");
    let reply = h
        .whispers
        .process_whisper_command(&whisper("hikthur", "!authorizejoin"))
        .await;
    assert_eq!(reply, "Usage: !authorizejoin <channel>");
}

#[tokio::test]
async fn test_unknown_and_plain_whispers() {
    let h = TestHarness::new("hikthur");
    let reply = h.whispers.process_whisper_command(&whisper("someone", "!dance")).await;
    assert_eq!(
        reply,
        "That is not a command I understand, please contact hikthur with what you're trying to do."
    );

    let reply = h.whispers.process_whisper_command(&whisper("someone", "hi bot")).await;
    assert_eq!(reply, "");
}

#[tokio::test]
async fn test_invalid_channel_name_is_not_authorized() -> Result<(), Error> {
    let h = TestHarness::new("hikthur");

    let reply = h
        .whispers
        .process_whisper_command(&whisper("hikthur", "!authorizejoin foo-bar"))
        .await;
    assert_eq!(reply, "I couldn't authorize foo-bar: 'foo-bar' is not a valid channel name.");

    assert!(h.broadcasters.get_broadcaster("foo-bar").await?.is_none());
    assert!(h.registry.get("foo-bar").is_none());
    assert_eq!(h.provisioner.open_count(), 0);
    assert!(h.manager.join_authorized_channels().await?.is_empty());
    Ok(())
}
