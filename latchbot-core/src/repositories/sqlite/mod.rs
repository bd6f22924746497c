// src/repositories/sqlite/mod.rs

pub mod broadcasters;
pub mod commands;
pub mod provisioner;

pub use broadcasters::SqliteBroadcasterRepository;
pub use commands::SqliteCommandStore;
pub use provisioner::SqliteStoreProvisioner;
