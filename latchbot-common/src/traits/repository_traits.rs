use std::sync::Arc;
use async_trait::async_trait;
use crate::error::Error;
use crate::models::{BroadcasterRecord, Command, CommandResolution};

/// Persistent command table of a single channel.
///
/// Triggers are compared lower-cased. `insert_command` overwrites an existing row with the same
/// trigger; `remove_command` on a missing trigger is a no-op that still succeeds.
#[async_trait]
pub trait CommandStore: Send + Sync {
    /// Canonical name of the channel this store belongs to.
    fn channel(&self) -> &str;

    async fn insert_command(&self, cmd: &Command) -> Result<(), Error>;
    async fn remove_command(&self, trigger: &str) -> Result<(), Error>;

    /// `Ok(None)` means the trigger is unknown; an empty payload comes back as `Some`.
    async fn lookup_command(&self, trigger: &str) -> Result<Option<CommandResolution>, Error>;

    async fn get_command(&self, trigger: &str) -> Result<Option<Command>, Error>;
    async fn list_triggers(&self) -> Result<Vec<String>, Error>;
}

/// The bot-level registry of channels that asked for (or were granted) the bot.
#[async_trait]
pub trait BroadcasterRepository: Send + Sync {
    /// Registers a pending request. An existing row is left untouched.
    async fn add_broadcaster(&self, channel_name: &str) -> Result<(), Error>;
    async fn get_broadcaster(&self, channel_name: &str) -> Result<Option<BroadcasterRecord>, Error>;
    async fn list_broadcasters(&self) -> Result<Vec<BroadcasterRecord>, Error>;
    async fn set_authorized(&self, channel_name: &str, authorized: bool) -> Result<(), Error>;
    async fn mark_db_created(&self, channel_name: &str) -> Result<(), Error>;
    async fn remove_broadcaster(&self, channel_name: &str) -> Result<(), Error>;
}

/// Materializes (schema included) and opens the command store of a channel.
#[async_trait]
pub trait ChannelStoreProvisioner: Send + Sync {
    async fn open_store(&self, channel_name: &str) -> Result<Arc<dyn CommandStore>, Error>;

    /// Called once a channel is parted. Handles opened earlier for it must not be used again.
    /// Releasing a channel that has nothing open is a no-op.
    async fn release_store(&self, channel_name: &str) -> Result<(), Error>;
}
