// File: latchbot-core/src/services/channel_manager.rs

use std::sync::Arc;
use std::time::Duration;
use futures_util::future::join_all;
use tracing::{error, info, warn};
use latchbot_common::models::{canonical_channel_name, is_valid_channel_name, BroadcasterRecord};
use latchbot_common::traits::repository_traits::{BroadcasterRepository, ChannelStoreProvisioner};
use latchbot_common::traits::transport_traits::ChatTransport;
use crate::Error;
use crate::channels::{ChannelRegistry, ChannelState};
use crate::repositories::StoreGuard;
use crate::tasks::{refresh_channel_cache, spawn_cache_refresh_task};

/// Owns the lifecycle of channels: join requests, authorization, joining and parting.
pub struct ChannelManager {
    registry: Arc<ChannelRegistry>,
    broadcasters: Arc<dyn BroadcasterRepository>,
    provisioner: Arc<dyn ChannelStoreProvisioner>,
    transport: Arc<dyn ChatTransport>,
    guard: StoreGuard,
    refresh_interval: Duration,
}

impl ChannelManager {
    pub fn new(
        registry: Arc<ChannelRegistry>,
        broadcasters: Arc<dyn BroadcasterRepository>,
        provisioner: Arc<dyn ChannelStoreProvisioner>,
        transport: Arc<dyn ChatTransport>,
        guard: StoreGuard,
        refresh_interval: Duration,
    ) -> Self {
        Self {
            registry,
            broadcasters,
            provisioner,
            transport,
            guard,
            refresh_interval,
        }
    }

    pub fn registry(&self) -> &Arc<ChannelRegistry> {
        &self.registry
    }

    pub async fn broadcaster(&self, channel: &str) -> Result<Option<BroadcasterRecord>, Error> {
        self.broadcasters
            .get_broadcaster(&canonical_channel_name(channel))
            .await
    }

    /// Records a pending join request. An existing record (authorized or not) is kept as is.
    pub async fn request_join(&self, channel: &str) -> Result<BroadcasterRecord, Error> {
        let name = checked_channel_name(channel)?;
        self.broadcasters.add_broadcaster(&name).await?;
        info!("Join requested for '{}'", name);
        self.broadcasters
            .get_broadcaster(&name)
            .await?
            .ok_or_else(|| Error::NotFound(format!("broadcaster '{}'", name)))
    }

    /// Registers channels as already authorized without joining them.
    pub async fn seed_authorized(&self, channels: &[String]) -> Result<(), Error> {
        for raw in channels {
            let name = match checked_channel_name(raw) {
                Ok(name) => name,
                Err(e) => {
                    warn!("Skipping seed channel '{}': {}", raw, e);
                    continue;
                }
            };
            self.broadcasters.add_broadcaster(&name).await?;
            self.broadcasters.set_authorized(&name, true).await?;
        }
        Ok(())
    }

    /// Marks the channel authorized, provisions its store and joins it.
    /// A name that could never be provisioned is rejected before anything is persisted.
    pub async fn authorize_channel(&self, channel: &str) -> Result<Arc<ChannelState>, Error> {
        let name = checked_channel_name(channel)?;
        self.broadcasters.add_broadcaster(&name).await?;
        self.broadcasters.set_authorized(&name, true).await?;
        info!("Channel '{}' authorized", name);
        self.join_channel(&name).await
    }

    /// Joins an authorized channel. Joining a channel that is already joined returns it unchanged.
    pub async fn join_channel(&self, channel: &str) -> Result<Arc<ChannelState>, Error> {
        let name = canonical_channel_name(channel);
        if let Some(existing) = self.registry.get(&name) {
            if existing.is_connected() {
                return Ok(existing);
            }
        }

        let record = self
            .broadcasters
            .get_broadcaster(&name)
            .await?
            .ok_or_else(|| Error::NotFound(format!("broadcaster '{}'", name)))?;
        if !record.authorized {
            return Err(Error::Store(format!("channel '{}' is not authorized", name)));
        }

        let provisioner = &self.provisioner;
        let channel_name = name.as_str();
        let store = self
            .guard
            .run("open_store", move || provisioner.open_store(channel_name))
            .await?;
        if !record.db_created {
            self.broadcasters.mark_db_created(&name).await?;
            info!("Provisioned the command store for '{}'", name);
        }

        let state = ChannelState::new(&name, store);
        if let Err(e) = refresh_channel_cache(&state, &self.guard).await {
            warn!("Initial command cache load for '{}' failed: {}", name, e);
        }
        let handle = spawn_cache_refresh_task(state.clone(), self.guard.clone(), self.refresh_interval);
        state.attach_refresh_task(handle);

        if let Some(previous) = self.registry.insert(state.clone()) {
            previous.disconnect();
        }

        if let Err(e) = self.transport.join(&name).await {
            error!("Transport failed to join '{}': {}", name, e);
        }
        info!("Joined '{}' with {} known commands", name, state.cache().len());
        Ok(state)
    }

    /// Joins every authorized channel; unauthorized requests are skipped.
    /// A channel that fails to join is logged and does not stop the others.
    pub async fn join_authorized_channels(&self) -> Result<Vec<String>, Error> {
        let records = self.broadcasters.list_broadcasters().await?;
        let mut joined = Vec::new();
        for record in records.into_iter().filter(|r| r.authorized) {
            match self.join_channel(&record.channel_name).await {
                Ok(state) => joined.push(state.name().to_string()),
                Err(e) => error!("Could not join '{}': {}", record.channel_name, e),
            }
        }
        Ok(joined)
    }

    /// Stops the refresh task, releases the store and leaves the channel.
    /// Returns `false` if the channel was not joined.
    pub async fn part_channel(&self, channel: &str) -> Result<bool, Error> {
        let name = canonical_channel_name(channel);
        let state = match self.registry.remove(&name) {
            Some(s) => s,
            None => return Ok(false),
        };

        if let Some(handle) = state.disconnect() {
            if let Err(e) = handle.await {
                if !e.is_cancelled() {
                    warn!("Refresh task for '{}' ended abnormally: {}", name, e);
                }
            }
        }
        drop(state);
        if let Err(e) = self.provisioner.release_store(&name).await {
            warn!("Releasing the command store of '{}' failed: {}", name, e);
        }

        self.transport.part(&name).await?;
        info!("Parted '{}'", name);
        Ok(true)
    }

    pub async fn part_all(&self) {
        let names = self.registry.names();
        let results = join_all(names.iter().map(|name| self.part_channel(name))).await;
        for (name, result) in names.iter().zip(results) {
            if let Err(e) = result {
                error!("Error parting '{}': {}", name, e);
            }
        }
    }
}

fn checked_channel_name(raw: &str) -> Result<String, Error> {
    let name = canonical_channel_name(raw);
    if name.is_empty() {
        return Err(Error::Parse("empty channel name".into()));
    }
    if !is_valid_channel_name(&name) {
        return Err(Error::Parse(format!("'{}' is not a valid channel name", name)));
    }
    Ok(name)
}
