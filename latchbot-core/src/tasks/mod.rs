// src/tasks/mod.rs

pub mod cache_refresh;

pub use cache_refresh::{refresh_channel_cache, spawn_cache_refresh_task};
