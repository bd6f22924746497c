// File: latchbot-core/src/channels/registry.rs

use std::sync::Arc;
use dashmap::DashMap;
use latchbot_common::models::canonical_channel_name;
use super::state::ChannelState;

/// Joined channels keyed by canonical name. Entries are locked individually,
/// so work on one channel never waits on another.
#[derive(Debug, Default)]
pub struct ChannelRegistry {
    channels: DashMap<String, Arc<ChannelState>>,
}

impl ChannelRegistry {
    pub fn new() -> Self {
        Self {
            channels: DashMap::new(),
        }
    }

    pub fn get(&self, channel: &str) -> Option<Arc<ChannelState>> {
        self.channels
            .get(&canonical_channel_name(channel))
            .map(|entry| entry.value().clone())
    }

    /// Registers a channel, returning whatever was registered under the same name before.
    pub fn insert(&self, state: Arc<ChannelState>) -> Option<Arc<ChannelState>> {
        self.channels.insert(state.name().to_string(), state)
    }

    pub fn remove(&self, channel: &str) -> Option<Arc<ChannelState>> {
        self.channels
            .remove(&canonical_channel_name(channel))
            .map(|(_, state)| state)
    }

    pub fn contains(&self, channel: &str) -> bool {
        self.channels.contains_key(&canonical_channel_name(channel))
    }

    /// Sorted list of joined channel names.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.channels.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }
}
