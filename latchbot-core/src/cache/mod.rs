// src/cache/mod.rs

pub mod command_cache;

pub use command_cache::{CommandCache, TriggerSnapshot};
