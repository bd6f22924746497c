// File: latchbot-core/tests/message_service_tests.rs

use std::time::Duration;
use tokio::sync::{mpsc, watch};
use latchbot_common::models::{Command, InboundMessage, RequiredPermission};
use latchbot_core::Error;
use latchbot_core::test_utils::helpers::{moderator, viewer, whisper, TestHarness, TransportCall};

#[tokio::test]
async fn test_replies_are_sent_only_when_non_empty() -> Result<(), Error> {
    let h = TestHarness::new("hikthur");
    h.join_with("hikthur", vec![Command::new("lurk", "{user} is now lurking", RequiredPermission::None)])
        .await?;

    let sent = h.messages.handle(InboundMessage::Channel(viewer("hikthur", "alice", "!lurk"))).await?;
    assert_eq!(sent.as_deref(), Some("alice is now lurking"));

    let sent = h.messages.handle(InboundMessage::Channel(viewer("hikthur", "alice", "hello"))).await?;
    assert_eq!(sent, None);

    let sent = h
        .messages
        .handle(InboundMessage::Channel(viewer("hikthur", "alice", "!connectiontest")))
        .await?;
    assert_eq!(sent, None);

    assert_eq!(
        h.transport.sent(),
        vec![("hikthur".to_string(), "alice is now lurking".to_string())]
    );
    Ok(())
}

#[tokio::test]
async fn test_whisper_replies_go_back_to_sender() -> Result<(), Error> {
    let h = TestHarness::new("hikthur");
    h.messages
        .handle(InboundMessage::Whisper(whisper("streamer", "!joinchannel")))
        .await?;

    let calls = h.transport.calls();
    assert!(matches!(
        calls.last(),
        Some(TransportCall::Whisper { user, .. }) if user == "streamer"
    ));
    Ok(())
}

#[tokio::test]
async fn test_message_loop_processes_in_order_and_stops() -> Result<(), Error> {
    let h = TestHarness::new("hikthur");
    h.join_with("hikthur", Vec::new()).await?;

    let (tx, rx) = mpsc::channel(16);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let handle = h.messages.clone().spawn(rx, shutdown_rx);

    tx.send(InboundMessage::Channel(moderator("hikthur", "mod", "!addcommand first one"))).await.unwrap();
    tx.send(InboundMessage::Channel(viewer("hikthur", "alice", "!first"))).await.unwrap();

    let mut delivered = Vec::new();
    for _ in 0..100 {
        delivered = h.transport.sent();
        if delivered.len() == 2 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    assert_eq!(
        delivered.into_iter().map(|(_, text)| text).collect::<Vec<_>>(),
        vec!["Command first added successfully.".to_string(), "one".to_string()]
    );

    shutdown_tx.send(true).unwrap();
    tokio::time::timeout(Duration::from_secs(1), handle).await.unwrap().unwrap();
    Ok(())
}

#[tokio::test]
async fn test_message_loop_ends_when_stream_closes() {
    let h = TestHarness::new("hikthur");
    let (tx, rx) = mpsc::channel::<InboundMessage>(1);
    let (_shutdown_tx, shutdown_rx) = watch::channel(false);
    let handle = h.messages.clone().spawn(rx, shutdown_rx);

    drop(tx);
    tokio::time::timeout(Duration::from_secs(1), handle).await.unwrap().unwrap();
}
