// src/repositories/mod.rs

pub mod sqlite;
pub mod store_guard;

pub use latchbot_common::traits::repository_traits::{
    BroadcasterRepository,
    ChannelStoreProvisioner,
    CommandStore,
};

pub use sqlite::{
    SqliteBroadcasterRepository,
    SqliteCommandStore,
    SqliteStoreProvisioner,
};
pub use store_guard::StoreGuard;
