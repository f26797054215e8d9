use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::broadcast;

use crate::types::ChatMessage;

pub mod console;

/// Trait defining the interface all platform connections must implement
#[async_trait]
pub trait PlatformConnection: Send + Sync {
    /// Connect to the platform and start receiving messages
    async fn connect(&mut self) -> Result<()>;

    /// Send a message to the specified channel
    async fn send_message(&self, channel: &str, message: &str) -> Result<()>;

    /// Give `role` to `member` in `guild`
    async fn add_role(&self, guild: &str, member: &str, role: &str) -> Result<()>;

    /// Take `role` from `member` in `guild`
    async fn remove_role(&self, guild: &str, member: &str, role: &str) -> Result<()>;

    /// Get the platform identifier (e.g., "console")
    fn platform_name(&self) -> &str;

    /// Check if the connection is healthy
    async fn is_connected(&self) -> bool;

    /// Get a receiver for incoming messages
    fn get_message_receiver(&self) -> Option<broadcast::Receiver<ChatMessage>>;

    /// Gracefully disconnect
    async fn disconnect(&mut self) -> Result<()>;
}
