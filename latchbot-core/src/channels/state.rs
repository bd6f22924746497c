// File: latchbot-core/src/channels/state.rs

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use parking_lot::Mutex;
use tokio::sync::{watch, Mutex as AsyncMutex, MutexGuard as AsyncMutexGuard};
use tokio::task::JoinHandle;
use tracing::debug;
use latchbot_common::traits::repository_traits::CommandStore;
use crate::cache::CommandCache;

/// A joined channel: its command store, its trigger cache, and the lifetime of its refresh task.
pub struct ChannelState {
    name: String,
    store: Arc<dyn CommandStore>,
    cache: CommandCache,
    /// Held across "read the store, then touch the cache" sequences.
    cache_writer: AsyncMutex<()>,
    connected: AtomicBool,
    shutdown_tx: watch::Sender<bool>,
    refresh_task: Mutex<Option<JoinHandle<()>>>,
}

impl ChannelState {
    pub fn new(name: &str, store: Arc<dyn CommandStore>) -> Arc<Self> {
        let (shutdown_tx, _rx) = watch::channel(false);
        Arc::new(Self {
            name: name.to_string(),
            store,
            cache: CommandCache::new(),
            cache_writer: AsyncMutex::new(()),
            connected: AtomicBool::new(true),
            shutdown_tx,
            refresh_task: Mutex::new(None),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn store(&self) -> &Arc<dyn CommandStore> {
        &self.store
    }

    pub fn cache(&self) -> &CommandCache {
        &self.cache
    }

    /// Serializes cache refreshes with store mutations that update the cache themselves, so a
    /// listing taken before an insert cannot overwrite the trigger that insert added.
    pub async fn lock_cache_writer(&self) -> AsyncMutexGuard<'_, ()> {
        self.cache_writer.lock().await
    }

    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    /// Receiver that flips to `true` once the channel is parted.
    pub fn shutdown_rx(&self) -> watch::Receiver<bool> {
        self.shutdown_tx.subscribe()
    }

    pub fn attach_refresh_task(&self, handle: JoinHandle<()>) {
        let previous = self.refresh_task.lock().replace(handle);
        if let Some(old) = previous {
            old.abort();
        }
    }

    pub fn has_refresh_task(&self) -> bool {
        self.refresh_task
            .lock()
            .as_ref()
            .map(|h| !h.is_finished())
            .unwrap_or(false)
    }

    /// Marks the channel disconnected and signals its refresh task to stop.
    /// In-flight invocations keep their `Arc` and finish normally.
    pub fn disconnect(&self) -> Option<JoinHandle<()>> {
        self.connected.store(false, Ordering::SeqCst);
        let _ = self.shutdown_tx.send(true);
        debug!("Channel '{}' marked disconnected", self.name);
        self.refresh_task.lock().take()
    }
}

impl std::fmt::Debug for ChannelState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChannelState")
            .field("name", &self.name)
            .field("connected", &self.is_connected())
            .field("cached_triggers", &self.cache.len())
            .finish()
    }
}
