// src/types/mod.rs - Message and action types shared by the bot and platforms

use serde::{Deserialize, Serialize};

/// Core message type that flows through the bot system
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub platform: String,
    pub channel: String,
    /// Server the message was posted in; `None` for direct messages
    pub guild: Option<String>,
    pub author_id: String,
    pub username: String,
    pub display_name: Option<String>,
    pub content: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    /// Role ids held by the author in `guild`
    pub roles: Vec<String>,
    pub is_webhook: bool,
}

impl ChatMessage {
    pub fn is_direct(&self) -> bool {
        self.guild.is_none()
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}

/// Something the bot asks a platform connection to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BotAction {
    Say {
        platform: String,
        channel: String,
        text: String,
    },
    /// `confirmation` is said in `channel` once the role was given
    AddRole {
        platform: String,
        guild: String,
        member: String,
        role: String,
        channel: String,
        confirmation: String,
    },
    /// `confirmation` is said in `channel` once the role was taken
    RemoveRole {
        platform: String,
        guild: String,
        member: String,
        role: String,
        channel: String,
        confirmation: String,
    },
}

impl BotAction {
    /// Reply in the channel `message` came from
    pub fn reply(message: &ChatMessage, text: impl Into<String>) -> Self {
        BotAction::Say {
            platform: message.platform.clone(),
            channel: message.channel.clone(),
            text: text.into(),
        }
    }

    pub fn platform(&self) -> &str {
        match self {
            BotAction::Say { platform, .. }
            | BotAction::AddRole { platform, .. }
            | BotAction::RemoveRole { platform, .. } => platform,
        }
    }
}

/// Help metadata for a registered command
#[derive(Debug, Clone)]
pub struct BotCommand {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub usage: &'static str,
    pub description: &'static str,
    pub mod_only: bool,
    pub hidden: bool,
}

impl BotCommand {
    pub fn matches(&self, name: &str) -> bool {
        self.name == name || self.aliases.contains(&name)
    }
}

#[cfg(test)]
pub(crate) fn test_message(content: &str) -> ChatMessage {
    ChatMessage {
        platform: "console".to_string(),
        channel: "general".to_string(),
        guild: Some("guild".to_string()),
        author_id: "42".to_string(),
        username: "alice".to_string(),
        display_name: None,
        content: content.to_string(),
        timestamp: chrono::Utc::now(),
        roles: Vec::new(),
        is_webhook: false,
    }
}
