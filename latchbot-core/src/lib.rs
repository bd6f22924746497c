// src/lib.rs

pub mod cache;
pub mod channels;
pub mod command;
pub mod config;
pub mod db;
pub mod repositories;
pub mod services;
pub mod tasks;
pub mod test_utils;

pub use config::{BotConfig, CommandConfig};
pub use db::Database;
pub use latchbot_common::error::Error;
