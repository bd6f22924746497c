// File: latchbot-core/src/cache/command_cache.rs

use std::collections::HashSet;
use std::sync::Arc;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;

/// Snapshot of the triggers a channel's store knew about at some point.
#[derive(Debug, Clone)]
pub struct TriggerSnapshot {
    pub triggers: Arc<HashSet<String>>,
    pub refreshed_at: Option<DateTime<Utc>>,
}

/// The set of triggers a channel recognizes, used to skip store round trips for ordinary chat.
///
/// Readers always see a whole snapshot: refreshes swap the set in one step and additions
/// copy-then-swap, so a reader never observes a half-built set.
/// May lag behind the store by up to one refresh period in either direction.
#[derive(Debug)]
pub struct CommandCache {
    inner: RwLock<TriggerSnapshot>,
}

impl CommandCache {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(TriggerSnapshot {
                triggers: Arc::new(HashSet::new()),
                refreshed_at: None,
            }),
        }
    }

    pub fn contains(&self, trigger: &str) -> bool {
        self.inner.read().triggers.contains(&trigger.to_lowercase())
    }

    /// Replaces the whole set with a fresh listing from the store.
    pub fn replace<I>(&self, triggers: I)
    where
        I: IntoIterator<Item = String>,
    {
        let fresh: HashSet<String> = triggers.into_iter().map(|t| t.to_lowercase()).collect();
        let mut guard = self.inner.write();
        guard.triggers = Arc::new(fresh);
        guard.refreshed_at = Some(Utc::now());
    }

    /// Makes a freshly added trigger usable before the next refresh.
    pub fn insert(&self, trigger: &str) {
        let mut guard = self.inner.write();
        let mut next = (*guard.triggers).clone();
        next.insert(trigger.to_lowercase());
        guard.triggers = Arc::new(next);
    }

    pub fn len(&self) -> usize {
        self.inner.read().triggers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn snapshot(&self) -> TriggerSnapshot {
        self.inner.read().clone()
    }
}

impl Default for CommandCache {
    fn default() -> Self {
        Self::new()
    }
}
