// File: latchbot-core/src/repositories/sqlite/provisioner.rs

use std::path::PathBuf;
use std::sync::Arc;
use async_trait::async_trait;
use dashmap::DashMap;
use sqlx::{Pool, Sqlite};
use tracing::{debug, info};
use latchbot_common::error::Error;
use latchbot_common::models::{canonical_channel_name, is_valid_channel_name};
use latchbot_common::traits::repository_traits::{ChannelStoreProvisioner, CommandStore};
use crate::db::Database;
use super::commands::SqliteCommandStore;

/// Opens one sqlite database per channel: `<data_dir>/<channel>.db`, or a private in-memory
/// database when no data directory is configured.
///
/// Pools are kept per channel while it is joined. Releasing a file-backed channel closes its
/// pool; an in-memory one stays open, since closing it would drop the channel's commands.
pub struct SqliteStoreProvisioner {
    data_dir: Option<PathBuf>,
    pools: DashMap<String, Pool<Sqlite>>,
}

impl SqliteStoreProvisioner {
    pub fn new(data_dir: Option<PathBuf>) -> Self {
        Self {
            data_dir,
            pools: DashMap::new(),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(None)
    }

    /// Path of the channel's database file, if stores live on disk.
    pub fn store_path(&self, channel_name: &str) -> Option<PathBuf> {
        self.data_dir
            .as_ref()
            .map(|dir| dir.join(format!("{}.db", channel_name)))
    }

    /// Whether a pool for the channel is currently held open.
    pub fn is_open(&self, channel_name: &str) -> bool {
        self.pools.contains_key(&canonical_channel_name(channel_name))
    }

    async fn pool_for(&self, channel_name: &str) -> Result<Pool<Sqlite>, Error> {
        if let Some(existing) = self.pools.get(channel_name) {
            return Ok(existing.value().clone());
        }

        let db = match self.store_path(channel_name) {
            Some(path) => {
                if let Some(dir) = &self.data_dir {
                    tokio::fs::create_dir_all(dir).await?;
                }
                Database::open_file(&path).await?
            }
            None => Database::in_memory().await?,
        };

        // A concurrent open for the same channel may have won; keep whichever landed first.
        let pool = self
            .pools
            .entry(channel_name.to_string())
            .or_insert_with(|| db.pool().clone())
            .value()
            .clone();
        Ok(pool)
    }
}

fn validate_channel_name(channel_name: &str) -> Result<(), Error> {
    if channel_name.is_empty() {
        return Err(Error::Store("empty channel name".into()));
    }
    if !is_valid_channel_name(channel_name) {
        return Err(Error::Store(format!(
            "channel name '{}' contains characters not allowed in a store name",
            channel_name
        )));
    }
    Ok(())
}

#[async_trait]
impl ChannelStoreProvisioner for SqliteStoreProvisioner {
    async fn open_store(&self, channel_name: &str) -> Result<Arc<dyn CommandStore>, Error> {
        let channel = canonical_channel_name(channel_name);
        validate_channel_name(&channel)?;

        let pool = self.pool_for(&channel).await?;
        let store = SqliteCommandStore::new(&channel, pool);
        store.prepare_schema().await?;

        info!("Command store for '{}' is ready", channel);
        Ok(Arc::new(store))
    }

    async fn release_store(&self, channel_name: &str) -> Result<(), Error> {
        if self.data_dir.is_none() {
            debug!("Keeping the in-memory store of '{}' for a later re-join", channel_name);
            return Ok(());
        }

        let channel = canonical_channel_name(channel_name);
        if let Some((_, pool)) = self.pools.remove(&channel) {
            pool.close().await;
            info!("Closed the command store for '{}'", channel);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_name_validation() {
        assert!(validate_channel_name("hikthur").is_ok());
        assert!(validate_channel_name("some_user42").is_ok());
        assert!(validate_channel_name("").is_err());
        assert!(validate_channel_name("../etc").is_err());
        assert!(validate_channel_name("two words").is_err());
    }

    #[test]
    fn test_store_path_follows_data_dir() {
        let on_disk = SqliteStoreProvisioner::new(Some(PathBuf::from("/var/lib/latchbot")));
        assert_eq!(
            on_disk.store_path("hikthur"),
            Some(PathBuf::from("/var/lib/latchbot/hikthur.db"))
        );
        assert_eq!(SqliteStoreProvisioner::in_memory().store_path("hikthur"), None);
    }
}
