// File: latchbot-core/src/test_utils/helpers.rs

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicUsize, Ordering};
use std::time::Duration;
use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use parking_lot::Mutex;
use latchbot_common::models::{
    BroadcasterRecord, Command, CommandResolution, Invocation, RequiredPermission,
};
use latchbot_common::traits::repository_traits::{
    BroadcasterRepository, ChannelStoreProvisioner, CommandStore,
};
use latchbot_common::traits::transport_traits::ChatTransport;
use crate::Error;
use crate::channels::ChannelRegistry;
use crate::repositories::StoreGuard;
use crate::services::{ChannelManager, CommandService, MessageService, WhisperService};

/// A guard with short timeouts so failing tests fail fast.
pub fn test_guard() -> StoreGuard {
    StoreGuard::new(Duration::from_millis(500), 2).with_backoff(Duration::from_millis(1))
}

pub fn viewer(channel: &str, user: &str, text: &str) -> Invocation {
    Invocation::new(channel, user, text)
}

pub fn moderator(channel: &str, user: &str, text: &str) -> Invocation {
    Invocation::new(channel, user, text).with_badge("moderator")
}

pub fn broadcaster(channel: &str, user: &str, text: &str) -> Invocation {
    Invocation::new(channel, user, text).with_badge("broadcaster")
}

pub fn whisper(user: &str, text: &str) -> Invocation {
    Invocation::new("", user, text)
}

/// Command store kept in a HashMap. Counts every call and can be told to fail.
pub struct InMemoryCommandStore {
    channel: String,
    commands: Mutex<HashMap<String, Command>>,
    fail_all: AtomicBool,
    transient_failures: AtomicU32,
    calls: AtomicUsize,
}

impl InMemoryCommandStore {
    pub fn new(channel: &str) -> Self {
        Self {
            channel: channel.to_string(),
            commands: Mutex::new(HashMap::new()),
            fail_all: AtomicBool::new(false),
            transient_failures: AtomicU32::new(0),
            calls: AtomicUsize::new(0),
        }
    }

    /// Every subsequent call fails with a permanent store error until reset.
    pub fn set_failing(&self, failing: bool) {
        self.fail_all.store(failing, Ordering::SeqCst);
    }

    /// The next `n` calls fail with a pool timeout, which the guard retries.
    pub fn fail_transiently(&self, n: u32) {
        self.transient_failures.store(n, Ordering::SeqCst);
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Writes straight into the map, bypassing counters and faults.
    pub fn seed(&self, cmd: Command) {
        self.commands.lock().insert(cmd.trigger.to_lowercase(), cmd);
    }

    pub fn contains(&self, trigger: &str) -> bool {
        self.commands.lock().contains_key(&trigger.to_lowercase())
    }

    pub fn permission_of(&self, trigger: &str) -> Option<RequiredPermission> {
        self.commands
            .lock()
            .get(&trigger.to_lowercase())
            .map(|c| c.permission.clone())
    }

    fn enter(&self) -> Result<(), Error> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_all.load(Ordering::SeqCst) {
            return Err(Error::Store(format!("store for '{}' is unavailable", self.channel)));
        }
        let remaining = self.transient_failures.load(Ordering::SeqCst);
        if remaining > 0 {
            self.transient_failures.store(remaining - 1, Ordering::SeqCst);
            return Err(Error::Database(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }
}

#[async_trait]
impl CommandStore for InMemoryCommandStore {
    fn channel(&self) -> &str {
        &self.channel
    }

    async fn insert_command(&self, cmd: &Command) -> Result<(), Error> {
        self.enter()?;
        let mut map = self.commands.lock();
        let key = cmd.trigger.to_lowercase();
        let uses = map.get(&key).map(|c| c.uses).unwrap_or(cmd.uses);
        map.insert(key, Command { uses, ..cmd.clone() });
        Ok(())
    }

    async fn remove_command(&self, trigger: &str) -> Result<(), Error> {
        self.enter()?;
        self.commands.lock().remove(&trigger.to_lowercase());
        Ok(())
    }

    async fn lookup_command(&self, trigger: &str) -> Result<Option<CommandResolution>, Error> {
        self.enter()?;
        Ok(self
            .commands
            .lock()
            .get(&trigger.to_lowercase())
            .map(|c| CommandResolution {
                payload: c.payload.clone(),
                permission: c.permission.clone(),
            }))
    }

    async fn get_command(&self, trigger: &str) -> Result<Option<Command>, Error> {
        self.enter()?;
        Ok(self.commands.lock().get(&trigger.to_lowercase()).cloned())
    }

    async fn list_triggers(&self) -> Result<Vec<String>, Error> {
        self.enter()?;
        let mut triggers: Vec<String> = self.commands.lock().keys().cloned().collect();
        triggers.sort();
        Ok(triggers)
    }
}

/// Hands out one `InMemoryCommandStore` per channel and keeps it across re-joins.
#[derive(Default)]
pub struct InMemoryProvisioner {
    stores: DashMap<String, Arc<InMemoryCommandStore>>,
    opens: AtomicUsize,
    released: Mutex<Vec<String>>,
}

impl InMemoryProvisioner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store(&self, channel: &str) -> Arc<InMemoryCommandStore> {
        self.stores
            .entry(channel.to_lowercase())
            .or_insert_with(|| Arc::new(InMemoryCommandStore::new(&channel.to_lowercase())))
            .value()
            .clone()
    }

    pub fn open_count(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }

    /// Channels whose store was released, in order.
    pub fn released(&self) -> Vec<String> {
        self.released.lock().clone()
    }
}

#[async_trait]
impl ChannelStoreProvisioner for InMemoryProvisioner {
    async fn open_store(&self, channel_name: &str) -> Result<Arc<dyn CommandStore>, Error> {
        self.opens.fetch_add(1, Ordering::SeqCst);
        let store: Arc<dyn CommandStore> = self.store(channel_name);
        Ok(store)
    }

    async fn release_store(&self, channel_name: &str) -> Result<(), Error> {
        self.released.lock().push(channel_name.to_lowercase());
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryBroadcasterRepository {
    records: Mutex<HashMap<String, BroadcasterRecord>>,
}

impl InMemoryBroadcasterRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BroadcasterRepository for InMemoryBroadcasterRepository {
    async fn add_broadcaster(&self, channel_name: &str) -> Result<(), Error> {
        let name = channel_name.to_lowercase();
        self.records
            .lock()
            .entry(name.clone())
            .or_insert_with(|| BroadcasterRecord {
                channel_name: name,
                db_created: false,
                authorized: false,
                requested_at: Utc::now(),
            });
        Ok(())
    }

    async fn get_broadcaster(&self, channel_name: &str) -> Result<Option<BroadcasterRecord>, Error> {
        Ok(self.records.lock().get(&channel_name.to_lowercase()).cloned())
    }

    async fn list_broadcasters(&self) -> Result<Vec<BroadcasterRecord>, Error> {
        let mut all: Vec<BroadcasterRecord> = self.records.lock().values().cloned().collect();
        all.sort_by(|a, b| a.channel_name.cmp(&b.channel_name));
        Ok(all)
    }

    async fn set_authorized(&self, channel_name: &str, authorized: bool) -> Result<(), Error> {
        match self.records.lock().get_mut(&channel_name.to_lowercase()) {
            Some(r) => {
                r.authorized = authorized;
                Ok(())
            }
            None => Err(Error::NotFound(format!("broadcaster '{}'", channel_name))),
        }
    }

    async fn mark_db_created(&self, channel_name: &str) -> Result<(), Error> {
        match self.records.lock().get_mut(&channel_name.to_lowercase()) {
            Some(r) => {
                r.db_created = true;
                Ok(())
            }
            None => Err(Error::NotFound(format!("broadcaster '{}'", channel_name))),
        }
    }

    async fn remove_broadcaster(&self, channel_name: &str) -> Result<(), Error> {
        self.records.lock().remove(&channel_name.to_lowercase());
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportCall {
    Join(String),
    Part(String),
    Send { channel: String, text: String },
    Whisper { user: String, text: String },
}

/// Transport that only remembers what it was asked to do.
#[derive(Default)]
pub struct RecordingTransport {
    calls: Mutex<Vec<TransportCall>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<TransportCall> {
        self.calls.lock().clone()
    }

    pub fn sent(&self) -> Vec<(String, String)> {
        self.calls
            .lock()
            .iter()
            .filter_map(|c| match c {
                TransportCall::Send { channel, text } => Some((channel.clone(), text.clone())),
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl ChatTransport for RecordingTransport {
    async fn join(&self, channel: &str) -> Result<(), Error> {
        self.calls.lock().push(TransportCall::Join(channel.to_string()));
        Ok(())
    }

    async fn part(&self, channel: &str) -> Result<(), Error> {
        self.calls.lock().push(TransportCall::Part(channel.to_string()));
        Ok(())
    }

    async fn send(&self, channel: &str, text: &str) -> Result<(), Error> {
        self.calls.lock().push(TransportCall::Send {
            channel: channel.to_string(),
            text: text.to_string(),
        });
        Ok(())
    }

    async fn whisper(&self, user: &str, text: &str) -> Result<(), Error> {
        self.calls.lock().push(TransportCall::Whisper {
            user: user.to_string(),
            text: text.to_string(),
        });
        Ok(())
    }
}

/// Every service wired to in-memory collaborators.
pub struct TestHarness {
    pub registry: Arc<ChannelRegistry>,
    pub broadcasters: Arc<InMemoryBroadcasterRepository>,
    pub provisioner: Arc<InMemoryProvisioner>,
    pub transport: Arc<RecordingTransport>,
    pub manager: Arc<ChannelManager>,
    pub commands: Arc<CommandService>,
    pub whispers: Arc<WhisperService>,
    pub messages: Arc<MessageService>,
}

impl TestHarness {
    pub fn new(owner: &str) -> Self {
        Self::with_refresh_interval(owner, Duration::from_secs(300))
    }

    pub fn with_refresh_interval(owner: &str, refresh_interval: Duration) -> Self {
        let registry = Arc::new(ChannelRegistry::new());
        let broadcasters = Arc::new(InMemoryBroadcasterRepository::new());
        let provisioner = Arc::new(InMemoryProvisioner::new());
        let transport = Arc::new(RecordingTransport::new());

        let manager = Arc::new(ChannelManager::new(
            registry.clone(),
            broadcasters.clone(),
            provisioner.clone(),
            transport.clone(),
            test_guard(),
            refresh_interval,
        ));
        let commands = Arc::new(CommandService::new(registry.clone(), test_guard()));
        let whispers = Arc::new(WhisperService::new(manager.clone(), owner));
        let messages = Arc::new(MessageService::new(
            commands.clone(),
            whispers.clone(),
            transport.clone(),
        ));

        Self {
            registry,
            broadcasters,
            provisioner,
            transport,
            manager,
            commands,
            whispers,
            messages,
        }
    }

    /// Authorizes and joins `channel`, seeding its store with `commands` first.
    pub async fn join_with(&self, channel: &str, commands: Vec<Command>) -> Result<(), Error> {
        let store = self.provisioner.store(channel);
        for cmd in commands {
            store.seed(cmd);
        }
        self.manager.authorize_channel(channel).await?;
        Ok(())
    }
}
