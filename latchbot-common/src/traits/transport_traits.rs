use async_trait::async_trait;
use crate::error::Error;

/// Outbound half of the chat connection. The bot core never opens the connection itself.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn join(&self, channel: &str) -> Result<(), Error>;
    async fn part(&self, channel: &str) -> Result<(), Error>;
    async fn send(&self, channel: &str, text: &str) -> Result<(), Error>;
    async fn whisper(&self, user: &str, text: &str) -> Result<(), Error>;
}

/// Opaque secret lookup used while bootstrapping.
#[async_trait]
pub trait SecretsProvider: Send + Sync {
    async fn get_secret(&self, name: &str) -> Result<String, Error>;
}
