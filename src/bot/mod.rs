use anyhow::{Context, Result};
use log::{error, info, warn};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc, RwLock};

use crate::config::BotConfiguration;
use crate::platforms::PlatformConnection;
use crate::types::{BotAction, ChatMessage};
use crate::wiki::mwapi::MediaWikiApi;
use crate::wiki::{PrefixResolver, WikiSites};

pub mod blocks;
pub mod commands;
pub mod role_commands;
pub mod wiki_commands;

use blocks::BlockReporter;
use commands::{CommandSystem, UNKNOWN_ERROR};

type Connections = Arc<RwLock<HashMap<String, Box<dyn PlatformConnection>>>>;

/// Core bot engine that manages connections and routes messages to commands
pub struct ChatBot {
    config: BotConfiguration,
    connections: Connections,
    command_system: Arc<CommandSystem>,
    block_reporter: Arc<BlockReporter>,
}

impl ChatBot {
    pub fn new(config: BotConfiguration) -> Result<Self> {
        let sites = WikiSites::standard().context("Invalid wiki site tables")?;
        let resolver = PrefixResolver::new(
            sites,
            &config.wiki.default_family,
            &config.wiki.default_language,
        );
        let command_system =
            CommandSystem::new(&config, resolver).context("Invalid command tables")?;

        let api = MediaWikiApi::new(
            &config.wiki.api_host,
            Duration::from_secs(config.wiki.request_timeout_seconds),
        )?;
        let block_reporter = BlockReporter::new(
            api,
            config.server.admin_channel.clone(),
            config.core.dev_mode,
        )?;

        Ok(Self {
            config,
            connections: Arc::new(RwLock::new(HashMap::new())),
            command_system: Arc::new(command_system),
            block_reporter: Arc::new(block_reporter),
        })
    }

    /// Add a platform connection to the bot
    pub async fn add_connection(&mut self, connection: Box<dyn PlatformConnection>) {
        let platform_name = connection.platform_name().to_string();
        info!("Added {} connection", platform_name);
        self.connections.write().await.insert(platform_name, connection);
    }

    /// Start the bot and all connections
    pub async fn start(&mut self) -> Result<()> {
        info!("Starting chat bot...");

        let mut receivers = Vec::new();
        {
            let mut connections_guard = self.connections.write().await;
            for (platform_name, connection) in connections_guard.iter_mut() {
                if let Err(e) = connection.connect().await {
                    error!("Failed to connect to {}: {}", platform_name, e);
                    continue;
                }

                if let Some(receiver) = connection.get_message_receiver() {
                    receivers.push(receiver);
                    info!("Set up message receiver for {}", platform_name);
                }
            }
        }

        if receivers.is_empty() {
            return Err(anyhow::anyhow!("No platform connection could be started"));
        }

        self.start_message_processor(receivers);
        self.log_ready();

        Ok(())
    }

    fn log_ready(&self) {
        let separator = "-".repeat(18);
        info!("{}", chrono::Utc::now().format("%Y-%m-%d %H:%M:%S"));
        if self.config.core.dev_mode {
            info!("In development mode...");
        }
        info!(
            "Logged in as {} v{} ({}), playing '{}'",
            self.config.core.bot_name,
            crate::VERSION,
            self.config.core.version_name,
            self.config.core.activity
        );
        info!("{}", separator);
    }

    fn start_message_processor(&self, receivers: Vec<broadcast::Receiver<ChatMessage>>) {
        let (action_tx, action_rx) = mpsc::channel::<BotAction>(100);

        tokio::spawn(run_actions(Arc::clone(&self.connections), action_rx));

        for mut receiver in receivers {
            let action_tx = action_tx.clone();
            let command_system = Arc::clone(&self.command_system);
            let block_reporter = Arc::clone(&self.block_reporter);

            tokio::spawn(async move {
                loop {
                    match receiver.recv().await {
                        Ok(message) => {
                            handle_message(&command_system, &block_reporter, message, &action_tx).await;
                        }
                        Err(broadcast::error::RecvError::Lagged(skipped)) => {
                            warn!("Message processor lagged, skipped {} messages", skipped);
                        }
                        Err(broadcast::error::RecvError::Closed) => {
                            info!("Message receiver closed");
                            break;
                        }
                    }
                }
            });
        }
    }

    /// Whether any platform is still connected
    pub async fn is_running(&self) -> bool {
        let connections_guard = self.connections.read().await;
        for connection in connections_guard.values() {
            if connection.is_connected().await {
                return true;
            }
        }
        false
    }

    /// Disconnect every platform
    pub async fn shutdown(&self) -> Result<()> {
        info!("Shutting down chat bot...");
        let mut connections_guard = self.connections.write().await;
        for (platform_name, connection) in connections_guard.iter_mut() {
            if let Err(e) = connection.disconnect().await {
                error!("Failed to disconnect from {}: {}", platform_name, e);
            }
        }
        Ok(())
    }
}

/// Run the command in `message`; authentication notices get a block lookup on the side
async fn handle_message(
    command_system: &CommandSystem,
    block_reporter: &Arc<BlockReporter>,
    message: ChatMessage,
    action_tx: &mpsc::Sender<BotAction>,
) {
    if command_system.should_ignore(&message) {
        return;
    }

    if !message.is_direct() && block_reporter.match_authentication(&message.content).is_some() {
        let block_reporter = Arc::clone(block_reporter);
        let action_tx = action_tx.clone();
        let notice = message.clone();
        tokio::spawn(async move {
            block_reporter.check_message(&notice, &action_tx).await;
        });
    }

    command_system.process_message(&message, action_tx).await;
}

/// Carry out bot actions on the platform they belong to
async fn run_actions(connections: Connections, mut action_rx: mpsc::Receiver<BotAction>) {
    while let Some(action) = action_rx.recv().await {
        let connections_guard = connections.read().await;
        let connection = match connections_guard.get(action.platform()) {
            Some(connection) => connection.as_ref(),
            None => {
                warn!("No connection found for platform: {}", action.platform());
                continue;
            }
        };

        match &action {
            BotAction::Say { channel, text, .. } => {
                if let Err(e) = connection.send_message(channel, text).await {
                    error!("Failed to send message to #{}: {}", channel, e);
                }
            }
            BotAction::AddRole { guild, member, role, channel, confirmation, .. } => {
                let result = connection.add_role(guild, member, role).await;
                confirm_role_change(connection, channel, confirmation, result).await;
            }
            BotAction::RemoveRole { guild, member, role, channel, confirmation, .. } => {
                let result = connection.remove_role(guild, member, role).await;
                confirm_role_change(connection, channel, confirmation, result).await;
            }
        }
    }
}

async fn confirm_role_change(
    connection: &dyn PlatformConnection,
    channel: &str,
    confirmation: &str,
    result: Result<()>,
) {
    let reply = match result {
        Ok(()) => confirmation,
        Err(e) => {
            error!("Role change failed: {:#}", e);
            UNKNOWN_ERROR
        }
    };

    if let Err(e) = connection.send_message(channel, reply).await {
        error!("Failed to send message to #{}: {}", channel, e);
    }
}
