//! # Wikimedia Chat Bot
//!
//! A chat bot for Wikimedia community servers. It turns short interwiki
//! targets such as `fr:wikt:Foo` into links, builds comparison links for
//! editor analysis tools, manages member roles for moderators and reports
//! wiki blocks of members who authenticate their accounts.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use wmbot::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config_manager = ConfigurationManager::new(std::path::Path::new("config"));
//!     config_manager.initialize().await?;
//!     let config = config_manager.get_bot_config().await;
//!
//!     let console = ConsoleConfig::from_env(config.server.guild_id.as_deref());
//!     let mut bot = ChatBot::new(config)?;
//!     bot.add_connection(Box::new(ConsoleConnection::new(console))).await;
//!
//!     bot.start().await?;
//!     tokio::signal::ctrl_c().await?;
//!     bot.shutdown().await
//! }
//! ```

pub mod bot;
pub mod config;
pub mod platforms;
pub mod types;
pub mod wiki;

// Re-export commonly used items
pub mod prelude {
    pub use crate::bot::ChatBot;
    pub use crate::config::{BotConfiguration, ConfigurationManager};
    pub use crate::platforms::{
        console::{ConsoleConfig, ConsoleConnection},
        PlatformConnection,
    };
    pub use crate::types::{BotAction, BotCommand, ChatMessage};
    pub use crate::wiki::{PrefixResolver, ResolvedTarget, WikiError, WikiSites};
    pub use anyhow::Result;
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
