//! latchbot-server/src/context.rs
//!
//! Wires the registry database, the channel stores and the services into one ServerContext.

use std::sync::Arc;
use tokio::sync::watch;
use tracing::info;
use latchbot_common::traits::transport_traits::ChatTransport;
use latchbot_core::{BotConfig, Database, Error};
use latchbot_core::channels::ChannelRegistry;
use latchbot_core::repositories::{SqliteBroadcasterRepository, SqliteStoreProvisioner};
use latchbot_core::services::{ChannelManager, CommandService, MessageService, WhisperService};

pub struct ServerContext {
    pub config: BotConfig,
    pub db: Database,
    pub registry: Arc<ChannelRegistry>,
    pub channel_manager: Arc<ChannelManager>,
    pub message_service: Arc<MessageService>,
    pub shutdown_tx: watch::Sender<bool>,
}

impl ServerContext {
    pub async fn new(config: BotConfig, transport: Arc<dyn ChatTransport>) -> Result<Self, Error> {
        let db = match config.registry_path() {
            Some(path) => {
                if let Some(dir) = path.parent() {
                    tokio::fs::create_dir_all(dir).await?;
                }
                Database::open_file(&path).await?
            }
            None => {
                info!("No data directory given; all state stays in memory.");
                Database::in_memory().await?
            }
        };

        let broadcasters = Arc::new(SqliteBroadcasterRepository::new(db.pool().clone()));
        broadcasters.prepare_schema().await?;
        let provisioner = Arc::new(SqliteStoreProvisioner::new(config.data_dir.clone()));

        let registry = Arc::new(ChannelRegistry::new());
        let guard = config.commands.store_guard();

        let channel_manager = Arc::new(ChannelManager::new(
            registry.clone(),
            broadcasters,
            provisioner,
            transport.clone(),
            guard.clone(),
            config.commands.cache_refresh_interval,
        ));
        let command_service = Arc::new(CommandService::new(registry.clone(), guard));
        let whisper_service = Arc::new(WhisperService::new(channel_manager.clone(), &config.owner));
        let message_service = Arc::new(MessageService::new(
            command_service,
            whisper_service,
            transport,
        ));

        let (shutdown_tx, _rx) = watch::channel(false);

        Ok(Self {
            config,
            db,
            registry,
            channel_manager,
            message_service,
            shutdown_tx,
        })
    }

    /// Seeds the configured channels and joins everything that is authorized.
    pub async fn join_startup_channels(&self) -> Result<Vec<String>, Error> {
        self.channel_manager
            .seed_authorized(&self.config.seed_channels)
            .await?;
        let joined = self.channel_manager.join_authorized_channels().await?;
        info!("Joined {} channel(s) at startup: {:?}", joined.len(), joined);
        Ok(joined)
    }

    pub fn shutdown_rx(&self) -> watch::Receiver<bool> {
        self.shutdown_tx.subscribe()
    }

    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(true);
    }

    /// Parts every channel and closes the registry database.
    pub async fn close(&self) {
        info!("Parting {:?}", self.registry.names());
        self.channel_manager.part_all().await;
        self.db.close().await;
    }
}
