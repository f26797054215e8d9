use anyhow::Result;
use log::{error, info};
use std::path::Path;

use wmbot::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let config_manager = ConfigurationManager::new(Path::new("config"));
    config_manager.initialize().await?;
    let config = config_manager.get_bot_config().await;

    // RUST_LOG wins over the configured level
    let level = config
        .core
        .log_level
        .parse::<log::LevelFilter>()
        .unwrap_or(log::LevelFilter::Info);
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    info!("Starting {} v{}", config.core.bot_name, wmbot::VERSION);

    let console_config = ConsoleConfig::from_env(config.server.guild_id.as_deref());
    let mut bot = ChatBot::new(config)?;
    bot.add_connection(Box::new(ConsoleConnection::new(console_config))).await;

    bot.start().await?;

    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            if let Err(e) = result {
                error!("Failed to listen for shutdown signal: {}", e);
            }
            info!("Received shutdown signal");
        }
        _ = wait_for_disconnect(&bot) => {
            info!("All connections closed");
        }
    }

    bot.shutdown().await?;
    info!("Bot shutdown complete");
    Ok(())
}

async fn wait_for_disconnect(bot: &ChatBot) {
    let mut interval = tokio::time::interval(std::time::Duration::from_secs(1));
    loop {
        interval.tick().await;
        if !bot.is_running().await {
            break;
        }
    }
}
