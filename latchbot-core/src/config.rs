// File: latchbot-core/src/config.rs

use std::path::PathBuf;
use std::time::Duration;
use serde::{Serialize, Deserialize};
use latchbot_common::models::canonical_channel_name;
use crate::Error;
use crate::repositories::StoreGuard;

/// Validated runtime configuration of the bot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotConfig {
    /// Where `latchbot.db` and the per-channel databases live. `None` keeps everything in memory.
    pub data_dir: Option<PathBuf>,
    /// The only account allowed to authorize join requests.
    pub owner: String,
    pub bot_username: String,
    /// Channels registered as already authorized at startup.
    pub seed_channels: Vec<String>,
    pub commands: CommandConfig,
}

/// Knobs of the command dispatcher and the store boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandConfig {
    pub cache_refresh_interval: Duration,
    pub store_timeout: Duration,
    pub store_retries: u32,
}

impl Default for CommandConfig {
    fn default() -> Self {
        Self {
            cache_refresh_interval: Duration::from_secs(300),
            store_timeout: Duration::from_millis(5000),
            store_retries: 2,
        }
    }
}

impl CommandConfig {
    pub fn store_guard(&self) -> StoreGuard {
        StoreGuard::new(self.store_timeout, self.store_retries)
    }
}

impl BotConfig {
    pub fn new(owner: &str, bot_username: &str) -> Self {
        Self {
            data_dir: None,
            owner: canonical_channel_name(owner),
            bot_username: canonical_channel_name(bot_username),
            seed_channels: Vec::new(),
            commands: CommandConfig::default(),
        }
    }

    /// Canonicalizes names and rejects values the bot cannot run with.
    pub fn validate(mut self) -> Result<Self, Error> {
        self.owner = canonical_channel_name(&self.owner);
        self.bot_username = canonical_channel_name(&self.bot_username);
        if self.owner.is_empty() {
            return Err(Error::Config("an owner account is required".into()));
        }
        if self.bot_username.is_empty() {
            return Err(Error::Config("the bot username is empty".into()));
        }
        if self.commands.cache_refresh_interval.is_zero() {
            return Err(Error::Config("cache refresh interval must be positive".into()));
        }
        if self.commands.store_timeout.is_zero() {
            return Err(Error::Config("store timeout must be positive".into()));
        }

        let mut seeds: Vec<String> = self
            .seed_channels
            .iter()
            .map(|c| canonical_channel_name(c))
            .filter(|c| !c.is_empty())
            .collect();
        seeds.sort();
        seeds.dedup();
        self.seed_channels = seeds;

        Ok(self)
    }

    /// Path of the bot-level registry database, if stored on disk.
    pub fn registry_path(&self) -> Option<PathBuf> {
        self.data_dir.as_ref().map(|d| d.join("latchbot.db"))
    }
}
