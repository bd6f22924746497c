// File: src/services/mod.rs

pub mod builtin_commands;
pub mod channel_manager;
pub mod command_service;
pub mod message_service;
pub mod whisper_service;

pub use channel_manager::ChannelManager;
pub use command_service::{CommandOutcome, CommandService};
pub use message_service::MessageService;
pub use whisper_service::WhisperService;
