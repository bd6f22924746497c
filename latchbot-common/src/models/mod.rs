// File: latchbot-common/src/models/mod.rs
pub mod command;
pub mod permission;
pub mod invocation;
pub mod channel;

pub use command::{Command, CommandResolution};
pub use permission::{PermissionOverride, RequiredPermission, UserRole};
pub use invocation::{InboundMessage, Invocation};
pub use channel::{BroadcasterRecord, canonical_channel_name, is_valid_channel_name};
