// src/bot/blocks.rs - Report wiki blocks of users who authenticate on the server

use anyhow::{Context, Result};
use log::{debug, info, warn};
use regex::Regex;
use tokio::sync::mpsc;

use crate::types::{BotAction, ChatMessage};
use crate::wiki::mwapi::{MediaWikiApi, WikiBlock};

/// Matches the notice posted when a member links their wiki account
const AUTH_PATTERN: &str = r"(@.*?) authenticated as User:(.*)";

pub struct BlockReporter {
    api: MediaWikiApi,
    auth_pattern: Regex,
    admin_channel: Option<String>,
    dev_mode: bool,
}

impl BlockReporter {
    pub fn new(api: MediaWikiApi, admin_channel: Option<String>, dev_mode: bool) -> Result<Self> {
        let auth_pattern = Regex::new(AUTH_PATTERN).context("Invalid authentication pattern")?;
        if admin_channel.is_none() {
            warn!("No admin channel configured; block reports will only be logged");
        }

        Ok(Self {
            api,
            auth_pattern,
            admin_channel,
            dev_mode,
        })
    }

    /// The (chat user, wiki user) pair of an authentication notice
    pub fn match_authentication(&self, content: &str) -> Option<(String, String)> {
        let captures = self.auth_pattern.captures(content)?;
        let chat_user = captures.get(1)?.as_str().to_string();
        let wiki_user = captures.get(2)?.as_str().trim().to_string();
        if wiki_user.is_empty() {
            return None;
        }
        Some((chat_user, wiki_user))
    }

    /// Look up an authenticated user's blocks and report them to the admin channel
    pub async fn check_message(&self, message: &ChatMessage, action_tx: &mpsc::Sender<BotAction>) {
        let (chat_user, wiki_user) = match self.match_authentication(&message.content) {
            Some(pair) => pair,
            None => return,
        };
        debug!("{} authenticated as User:{}", chat_user, wiki_user);

        let blocks = match self.api.user_blocks(&wiki_user).await {
            Ok(blocks) => blocks,
            Err(e) => {
                warn!("Could not check blocks for User:{}: {:#}", wiki_user, e);
                return;
            }
        };

        let report = match format_report(&chat_user, &wiki_user, &blocks) {
            Some(report) => report,
            None => return,
        };

        match (&self.admin_channel, self.dev_mode) {
            (Some(channel), false) => {
                let action = BotAction::Say {
                    platform: message.platform.clone(),
                    channel: channel.clone(),
                    text: report,
                };
                if let Err(e) = action_tx.send(action).await {
                    warn!("Failed to queue block report: {}", e);
                }
            }
            _ => info!("Block report: {}", report),
        }
    }
}

/// `None` when there is nothing to report
pub fn format_report(chat_user: &str, wiki_user: &str, blocks: &[WikiBlock]) -> Option<String> {
    if blocks.is_empty() {
        return None;
    }

    let wikis: Vec<String> = blocks
        .iter()
        .map(|block| format!("{} ({} until {})", block.wiki, block.reason, block.expiry))
        .collect();
    Some(format!(
        "{} (User:{}) is blocked on: {}",
        chat_user,
        wiki_user,
        wikis.join(", ")
    ))
}
