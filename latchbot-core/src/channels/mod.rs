// src/channels/mod.rs

pub mod registry;
pub mod state;

pub use registry::ChannelRegistry;
pub use state::ChannelState;
