// src/wiki/mwapi.rs - MediaWiki action API client

use anyhow::{Context, Result};
use log::{debug, info};
use serde::Deserialize;
use std::time::Duration;

/// A block on one wiki of a global account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WikiBlock {
    pub wiki: String,
    pub reason: String,
    pub expiry: String,
}

#[derive(Debug, Deserialize)]
struct CentralAuthResponse {
    query: CentralAuthQuery,
}

#[derive(Debug, Deserialize)]
struct CentralAuthQuery {
    globaluserinfo: GlobalUserInfo,
}

#[derive(Debug, Deserialize)]
struct GlobalUserInfo {
    #[serde(default)]
    merged: Vec<MergedAccount>,
}

#[derive(Debug, Deserialize)]
struct MergedAccount {
    wiki: String,
    blocked: Option<BlockDetails>,
}

#[derive(Debug, Deserialize)]
struct BlockDetails {
    #[serde(default)]
    reason: String,
    #[serde(default)]
    expiry: String,
}

/// Client for one wiki's `api.php`
#[derive(Debug, Clone)]
pub struct MediaWikiApi {
    client: reqwest::Client,
    host: String,
}

impl MediaWikiApi {
    pub fn new(host: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("wmbot/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            host: host.to_string(),
        })
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    /// `query` must already be URL-encoded
    pub fn build_url(&self, action: &str, query: &str) -> String {
        format!(
            "https://{}/w/api.php?action={}&format=json&{}",
            self.host, action, query
        )
    }

    /// Raw CentralAuth global user info for `username`
    pub async fn central_auth_info(&self, username: &str) -> Result<String> {
        let url = self.build_url(
            "query",
            &format!(
                "meta=globaluserinfo&guiuser={}&guiprop=groups%7Cunattached%7Cmerged",
                urlencoding::encode(username)
            ),
        );
        debug!("Fetching CentralAuth info: {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("Failed to query CentralAuth for '{}'", username))?
            .error_for_status()
            .context("CentralAuth request was rejected")?;

        response
            .text()
            .await
            .context("Failed to read CentralAuth response")
    }

    /// Every wiki where `username`'s attached account is blocked
    pub async fn user_blocks(&self, username: &str) -> Result<Vec<WikiBlock>> {
        let body = self.central_auth_info(username).await?;
        let blocks = parse_blocks(&body)?;
        info!("User '{}' has {} local blocks", username, blocks.len());
        Ok(blocks)
    }
}

/// Extract the blocked wikis from a CentralAuth `globaluserinfo` response
pub fn parse_blocks(body: &str) -> Result<Vec<WikiBlock>> {
    let response: CentralAuthResponse =
        serde_json::from_str(body).context("Unexpected CentralAuth response")?;

    Ok(response
        .query
        .globaluserinfo
        .merged
        .into_iter()
        .filter_map(|account| {
            account.blocked.map(|block| WikiBlock {
                wiki: account.wiki,
                reason: block.reason,
                expiry: block.expiry,
            })
        })
        .collect())
}
