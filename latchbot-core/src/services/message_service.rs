// File: latchbot-core/src/services/message_service.rs

use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, error, info};
use latchbot_common::models::InboundMessage;
use latchbot_common::traits::transport_traits::ChatTransport;
use crate::Error;
use crate::services::command_service::CommandService;
use crate::services::whisper_service::WhisperService;

/// Routes inbound traffic to the two command entry points and sends back non-empty replies.
pub struct MessageService {
    commands: Arc<CommandService>,
    whispers: Arc<WhisperService>,
    transport: Arc<dyn ChatTransport>,
}

impl MessageService {
    pub fn new(
        commands: Arc<CommandService>,
        whispers: Arc<WhisperService>,
        transport: Arc<dyn ChatTransport>,
    ) -> Self {
        Self {
            commands,
            whispers,
            transport,
        }
    }

    /// Handles one message. Returns the reply that was sent, if any.
    pub async fn handle(&self, message: InboundMessage) -> Result<Option<String>, Error> {
        match message {
            InboundMessage::Channel(inv) => {
                let reply = self.commands.process_channel_command(&inv).await;
                if reply.is_empty() {
                    return Ok(None);
                }
                self.transport.send(&inv.channel, &reply).await?;
                Ok(Some(reply))
            }
            InboundMessage::Whisper(inv) => {
                let reply = self.whispers.process_whisper_command(&inv).await;
                if reply.is_empty() {
                    return Ok(None);
                }
                self.transport.whisper(&inv.user_name, &reply).await?;
                Ok(Some(reply))
            }
        }
    }

    /// Consumes `rx` one message at a time until it closes or shutdown is signalled.
    pub fn spawn(
        self: Arc<Self>,
        mut rx: mpsc::Receiver<InboundMessage>,
        mut shutdown_rx: watch::Receiver<bool>,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            info!("Message loop started");
            loop {
                if *shutdown_rx.borrow() {
                    break;
                }
                tokio::select! {
                    biased;
                    changed = shutdown_rx.changed() => {
                        if changed.is_err() || *shutdown_rx.borrow() {
                            break;
                        }
                    }
                    maybe_msg = rx.recv() => {
                        match maybe_msg {
                            Some(msg) => {
                                match self.handle(msg).await {
                                    Ok(Some(reply)) => debug!("Replied: {}", reply),
                                    Ok(None) => {}
                                    Err(e) => error!("Failed to deliver a reply: {}", e),
                                }
                            }
                            None => {
                                debug!("Inbound stream closed");
                                break;
                            }
                        }
                    }
                }
            }
            info!("Message loop stopped");
        })
    }
}
