// src/config/mod.rs - Bot configuration file and environment overrides

use anyhow::{Context, Result};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::sync::RwLock;

const BOT_CONFIG_FILE: &str = "bot.yaml";

/// Loads `bot.yaml` from a config directory and keeps the current copy
#[derive(Clone)]
pub struct ConfigurationManager {
    config_dir: PathBuf,
    bot_config: Arc<RwLock<BotConfiguration>>,
}

/// Bot configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotConfiguration {
    pub core: CoreBotSettings,
    pub wiki: WikiSettings,
    #[serde(default)]
    pub server: ServerSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoreBotSettings {
    pub bot_name: String,
    pub version_name: String,
    pub command_prefix: String,
    pub activity: String,
    pub log_level: String,
    /// Keep block reports and other admin notices out of the chat server
    pub dev_mode: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WikiSettings {
    pub default_family: String,
    pub default_language: String,
    /// Host whose API answers CentralAuth queries
    pub api_host: String,
    pub request_timeout_seconds: u64,
}

/// Ids on the chat server; normally supplied through the environment
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerSettings {
    pub bot_user_id: Option<String>,
    pub guild_id: Option<String>,
    pub mod_role: Option<String>,
    pub admin_channel: Option<String>,
}

impl Default for BotConfiguration {
    fn default() -> Self {
        Self {
            core: CoreBotSettings {
                bot_name: "TheresNoBot".to_string(),
                version_name: "ArbCom".to_string(),
                command_prefix: "~".to_string(),
                activity: "with wikis".to_string(),
                log_level: "info".to_string(),
                dev_mode: false,
            },
            wiki: WikiSettings {
                default_family: "wikipedia".to_string(),
                default_language: "en".to_string(),
                api_host: "meta.wikimedia.org".to_string(),
                request_timeout_seconds: 10,
            },
            server: ServerSettings::default(),
        }
    }
}

impl BotConfiguration {
    /// Apply `BOT_ID`, `GUILD`, `MOD_ROLE`, `ADMIN_CHANNEL` and `BOT_ACTIVITY` from the environment
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| env::var(key).ok());
    }

    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let lookup = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(id) = lookup("BOT_ID") {
            self.server.bot_user_id = Some(id);
        }
        if let Some(id) = lookup("GUILD") {
            self.server.guild_id = Some(id);
        }
        if let Some(id) = lookup("MOD_ROLE") {
            self.server.mod_role = Some(id);
        }
        if let Some(id) = lookup("ADMIN_CHANNEL") {
            self.server.admin_channel = Some(id);
        }
        if let Some(activity) = lookup("BOT_ACTIVITY") {
            self.core.activity = activity;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.core.command_prefix.is_empty() {
            return Err(anyhow::anyhow!("core.command_prefix must not be empty"));
        }
        if self.core.command_prefix.chars().any(char::is_whitespace) {
            return Err(anyhow::anyhow!("core.command_prefix must not contain whitespace"));
        }
        if self.wiki.default_family.is_empty() || self.wiki.default_language.is_empty() {
            return Err(anyhow::anyhow!("wiki.default_family and wiki.default_language are required"));
        }
        if self.wiki.request_timeout_seconds == 0 {
            return Err(anyhow::anyhow!("wiki.request_timeout_seconds must be positive"));
        }
        if self.server.mod_role.is_none() {
            warn!("No moderator role configured; moderator commands are unavailable");
        }
        Ok(())
    }
}

impl ConfigurationManager {
    pub fn new(config_dir: &Path) -> Self {
        Self {
            config_dir: config_dir.to_path_buf(),
            bot_config: Arc::new(RwLock::new(BotConfiguration::default())),
        }
    }

    /// Create the config directory and default file if needed, then load it
    pub async fn initialize(&self) -> Result<()> {
        info!("Initializing configuration in {}", self.config_dir.display());

        fs::create_dir_all(&self.config_dir)
            .await
            .with_context(|| format!("Failed to create config directory: {}", self.config_dir.display()))?;

        let config_path = self.bot_config_path();
        if !config_path.exists() {
            self.create_default_bot_config().await?;
        }

        self.load_bot_config().await
    }

    pub async fn get_bot_config(&self) -> BotConfiguration {
        self.bot_config.read().await.clone()
    }

    fn bot_config_path(&self) -> PathBuf {
        self.config_dir.join(BOT_CONFIG_FILE)
    }

    async fn load_bot_config(&self) -> Result<()> {
        let config_path = self.bot_config_path();
        let content = fs::read_to_string(&config_path)
            .await
            .with_context(|| format!("Failed to read {}", config_path.display()))?;

        let mut config: BotConfiguration = serde_yaml::from_str(&content)
            .with_context(|| format!("Invalid bot configuration in {}", config_path.display()))?;
        config.apply_env_overrides();
        config.validate()?;

        *self.bot_config.write().await = config;

        debug!("Loaded bot configuration from {}", config_path.display());
        Ok(())
    }

    async fn create_default_bot_config(&self) -> Result<()> {
        let config_path = self.bot_config_path();
        let content = serde_yaml::to_string(&BotConfiguration::default())?;

        fs::write(&config_path, content)
            .await
            .with_context(|| format!("Failed to write {}", config_path.display()))?;

        info!("Created default bot configuration: {}", config_path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_initialize_creates_default_file() {
        let temp_dir = tempdir().unwrap();
        let config_manager = ConfigurationManager::new(temp_dir.path());

        config_manager.initialize().await.unwrap();

        assert!(temp_dir.path().join("bot.yaml").exists());
        let config = config_manager.get_bot_config().await;
        assert_eq!(config.core.command_prefix, "~");
        assert_eq!(config.wiki.default_family, "wikipedia");
        assert_eq!(config.wiki.default_language, "en");
    }

    #[tokio::test]
    async fn test_existing_file_is_loaded() {
        let temp_dir = tempdir().unwrap();
        let yaml = r#"
core:
  bot_name: TestBot
  version_name: Steward
  command_prefix: "?"
  activity: testing
  log_level: debug
  dev_mode: true
wiki:
  default_family: wiktionary
  default_language: fr
  api_host: meta.wikimedia.org
  request_timeout_seconds: 3
"#;
        std::fs::write(temp_dir.path().join("bot.yaml"), yaml).unwrap();

        let config_manager = ConfigurationManager::new(temp_dir.path());
        config_manager.initialize().await.unwrap();

        let config = config_manager.get_bot_config().await;
        assert_eq!(config.core.bot_name, "TestBot");
        assert_eq!(config.core.command_prefix, "?");
        assert_eq!(config.wiki.default_family, "wiktionary");
        assert!(config.core.dev_mode);
    }

    #[tokio::test]
    async fn test_invalid_file_is_an_error() {
        let temp_dir = tempdir().unwrap();
        std::fs::write(temp_dir.path().join("bot.yaml"), "core: [").unwrap();

        let config_manager = ConfigurationManager::new(temp_dir.path());
        assert!(config_manager.initialize().await.is_err());
    }

    #[test]
    fn test_overrides_replace_server_ids() {
        let env: HashMap<&str, &str> = [
            ("BOT_ID", "100"),
            ("GUILD", "200"),
            ("MOD_ROLE", " 300 "),
            ("ADMIN_CHANNEL", ""),
            ("BOT_ACTIVITY", "reading diffs"),
        ]
        .into_iter()
        .collect();

        let mut config = BotConfiguration::default();
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.server.bot_user_id.as_deref(), Some("100"));
        assert_eq!(config.server.guild_id.as_deref(), Some("200"));
        assert_eq!(config.server.mod_role.as_deref(), Some("300"));
        assert_eq!(config.server.admin_channel, None);
        assert_eq!(config.core.activity, "reading diffs");
    }

    #[test]
    fn test_validate_rejects_bad_prefix() {
        let mut config = BotConfiguration::default();
        config.core.command_prefix = String::new();
        assert!(config.validate().is_err());

        config.core.command_prefix = "~ ".to_string();
        assert!(config.validate().is_err());
    }
}
