use anyhow::{Context, Result};
use async_trait::async_trait;
use log::{debug, info, warn};
use std::env;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::{broadcast, RwLock};

use crate::platforms::PlatformConnection;
use crate::types::ChatMessage;

/// Lines starting with this are delivered as direct messages
const DIRECT_MESSAGE_MARKER: &str = "/dm ";

/// Configuration for the local console connection
#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    pub username: String,
    pub user_id: String,
    pub channel: String,
    pub guild: String,
    pub roles: Vec<String>,
}

impl ConsoleConfig {
    /// Load console configuration from environment variables, with defaults
    pub fn from_env(guild: Option<&str>) -> Self {
        let username = env::var("CONSOLE_USER").unwrap_or_else(|_| "console".to_string());
        let roles = env::var("CONSOLE_ROLES")
            .map(|roles| {
                roles
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let config = Self {
            user_id: username.clone(),
            username,
            channel: env::var("CONSOLE_CHANNEL").unwrap_or_else(|_| "general".to_string()),
            guild: guild.unwrap_or("console").to_string(),
            roles,
        };

        info!(
            "Console user '{}' in #{} with {} roles",
            config.username,
            config.channel,
            config.roles.len()
        );
        config
    }

    /// Turn one input line into a chat message
    pub fn parse_line(&self, line: &str) -> Option<ChatMessage> {
        let line = line.trim_end_matches(['\r', '\n']);
        if line.trim().is_empty() {
            return None;
        }

        let (guild, content) = match line.strip_prefix(DIRECT_MESSAGE_MARKER) {
            Some(rest) => (None, rest),
            None => (Some(self.guild.clone()), line),
        };

        Some(ChatMessage {
            platform: "console".to_string(),
            channel: self.channel.clone(),
            guild,
            author_id: self.user_id.clone(),
            username: self.username.clone(),
            display_name: None,
            content: content.to_string(),
            timestamp: chrono::Utc::now(),
            roles: self.roles.clone(),
            is_webhook: false,
        })
    }
}

/// Chat over stdin/stdout, for running the bot without a chat service
pub struct ConsoleConnection {
    config: ConsoleConfig,
    message_sender: Option<broadcast::Sender<ChatMessage>>,
    is_connected: Arc<RwLock<bool>>,
}

impl ConsoleConnection {
    pub fn new(config: ConsoleConfig) -> Self {
        Self {
            config,
            message_sender: None,
            is_connected: Arc::new(RwLock::new(false)),
        }
    }

    async fn write_line(&self, line: &str) -> Result<()> {
        let mut stdout = tokio::io::stdout();
        stdout
            .write_all(format!("{}\n", line).as_bytes())
            .await
            .context("Failed to write to stdout")?;
        stdout.flush().await.context("Failed to flush stdout")
    }
}

#[async_trait]
impl PlatformConnection for ConsoleConnection {
    async fn connect(&mut self) -> Result<()> {
        info!("Connecting console...");

        let (tx, _) = broadcast::channel(100);
        self.message_sender = Some(tx.clone());
        *self.is_connected.write().await = true;

        let config = self.config.clone();
        let is_connected = Arc::clone(&self.is_connected);

        tokio::spawn(async move {
            let mut lines = BufReader::new(tokio::io::stdin()).lines();
            info!("Console reader started");

            loop {
                match lines.next_line().await {
                    Ok(Some(line)) => {
                        if let Some(message) = config.parse_line(&line) {
                            debug!("Console input: {}", message.content);
                            if let Err(e) = tx.send(message) {
                                warn!("Failed to broadcast message: {}", e);
                            }
                        }
                    }
                    Ok(None) => {
                        info!("Console input closed");
                        break;
                    }
                    Err(e) => {
                        warn!("Console read error: {}", e);
                        break;
                    }
                }
            }

            *is_connected.write().await = false;
        });

        info!("Console connected as '{}'", self.config.username);
        Ok(())
    }

    async fn send_message(&self, channel: &str, message: &str) -> Result<()> {
        self.write_line(&format!("[#{}] {}", channel, message)).await
    }

    async fn add_role(&self, guild: &str, member: &str, role: &str) -> Result<()> {
        info!("Console: role '{}' given to '{}' in {}", role, member, guild);
        self.write_line(&format!("[{}] +{} {}", guild, role, member)).await
    }

    async fn remove_role(&self, guild: &str, member: &str, role: &str) -> Result<()> {
        info!("Console: role '{}' taken from '{}' in {}", role, member, guild);
        self.write_line(&format!("[{}] -{} {}", guild, role, member)).await
    }

    fn platform_name(&self) -> &str {
        "console"
    }

    async fn is_connected(&self) -> bool {
        *self.is_connected.read().await
    }

    fn get_message_receiver(&self) -> Option<broadcast::Receiver<ChatMessage>> {
        self.message_sender.as_ref().map(|sender| sender.subscribe())
    }

    async fn disconnect(&mut self) -> Result<()> {
        *self.is_connected.write().await = false;
        self.message_sender = None;
        info!("Console disconnected");
        Ok(())
    }
}
