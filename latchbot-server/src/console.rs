// latchbot-server/src/console.rs
//! A stand-in chat connection on stdin/stdout, so the bot can be driven by hand.
//!
//! Input lines:
//!   `#channel login[/badge,badge] text...`  a chat message
//!   `/w login text...`                      a whisper to the bot

use std::collections::HashSet;
use async_trait::async_trait;
use chrono::Local;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use latchbot_common::models::{canonical_channel_name, InboundMessage, Invocation};
use latchbot_common::traits::transport_traits::ChatTransport;
use latchbot_core::Error;

pub struct ConsoleTransport {
    bot_username: String,
    joined: Mutex<HashSet<String>>,
}

impl ConsoleTransport {
    pub fn new(bot_username: &str) -> Self {
        Self {
            bot_username: bot_username.to_string(),
            joined: Mutex::new(HashSet::new()),
        }
    }

    fn stamp() -> String {
        Local::now().format("%H:%M:%S").to_string()
    }
}

#[async_trait]
impl ChatTransport for ConsoleTransport {
    async fn join(&self, channel: &str) -> Result<(), Error> {
        self.joined.lock().await.insert(channel.to_string());
        println!("[{}] * {} joined #{}", Self::stamp(), self.bot_username, channel);
        Ok(())
    }

    async fn part(&self, channel: &str) -> Result<(), Error> {
        self.joined.lock().await.remove(channel);
        println!("[{}] * {} left #{}", Self::stamp(), self.bot_username, channel);
        Ok(())
    }

    async fn send(&self, channel: &str, text: &str) -> Result<(), Error> {
        if !self.joined.lock().await.contains(channel) {
            return Err(Error::Platform(format!("not joined to #{}", channel)));
        }
        println!("[{}] #{} <{}> {}", Self::stamp(), channel, self.bot_username, text);
        Ok(())
    }

    async fn whisper(&self, user: &str, text: &str) -> Result<(), Error> {
        println!("[{}] {} -> {}: {}", Self::stamp(), self.bot_username, user, text);
        Ok(())
    }
}

/// Parses one console line into an inbound message. `None` for blank or malformed lines.
pub fn parse_console_line(line: &str) -> Option<InboundMessage> {
    let line = line.trim();

    if let Some(rest) = line.strip_prefix("/w ") {
        let (login, text) = rest.trim_start().split_once(char::is_whitespace)?;
        let inv = Invocation::new("", &login.to_lowercase(), text.trim())
            .with_display_name(login);
        return Some(InboundMessage::Whisper(inv));
    }

    if line.starts_with('#') {
        let (channel, rest) = line.split_once(char::is_whitespace)?;
        let (sender, text) = rest.trim_start().split_once(char::is_whitespace)?;
        let (login, badges) = match sender.split_once('/') {
            Some((login, badges)) => (login, badges),
            None => (sender, ""),
        };
        if login.is_empty() {
            return None;
        }

        let mut inv = Invocation::new(&canonical_channel_name(channel), &login.to_lowercase(), text.trim())
            .with_display_name(login);
        for badge in badges.split(',').map(str::trim).filter(|b| !b.is_empty()) {
            inv = inv.with_badge(badge);
        }
        return Some(InboundMessage::Channel(inv));
    }

    None
}

/// Forwards stdin lines to `tx` until stdin closes or the receiver goes away.
pub fn spawn_console_reader(tx: mpsc::Sender<InboundMessage>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        info!("Console ready: '#channel login[/badges] text' or '/w login text'");
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    if line.trim().is_empty() {
                        continue;
                    }
                    match parse_console_line(&line) {
                        Some(msg) => {
                            if tx.send(msg).await.is_err() {
                                break;
                            }
                        }
                        None => warn!("Could not understand console line: {}", line),
                    }
                }
                Ok(None) => {
                    debug!("stdin closed");
                    break;
                }
                Err(e) => {
                    warn!("Error reading stdin: {}", e);
                    break;
                }
            }
        }
    })
}
