//! Read-only client for the hosted realtime store
//!
//! Owner documents live at `{database_url}/owners/{owner_id}.json`. A `null`
//! body means the owner does not exist.

use anyhow::{Context, Result};
use reqwest::Url;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info};

use crate::config::RemoteConfig;
use crate::constants;
use crate::model::Owner;
use crate::session::Session;

/// Realtime store REST client
pub struct RemoteStore {
    client: reqwest::Client,
    database_url: String,
    auth_token: Option<String>,
}

impl RemoteStore {
    pub fn new(config: &RemoteConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(constants::REMOTE_TIMEOUT_SECS))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            database_url: config.database_url.trim_end_matches('/').to_string(),
            auth_token: config.auth_token.clone().filter(|t| !t.trim().is_empty()),
        })
    }

    /// REST URL of the owner's document
    pub fn owner_url(&self, session: &Session) -> Result<Url> {
        let raw = format!(
            "{}/{}/{}.json",
            self.database_url,
            constants::REMOTE_OWNERS_PATH,
            session.owner_id()
        );
        let mut url = Url::parse(&raw)
            .with_context(|| format!("Invalid database URL: {}", self.database_url))?;
        if let Some(token) = &self.auth_token {
            url.query_pairs_mut().append_pair("auth", token);
        }
        Ok(url)
    }

    /// Fetch the owner's whole document
    pub async fn fetch_owner(&self, session: &Session) -> Result<Owner> {
        let url = self.owner_url(session)?;
        debug!(
            "GET {}/{}/{}.json (auth: {})",
            self.database_url,
            constants::REMOTE_OWNERS_PATH,
            session.owner_id(),
            self.auth_token.as_deref().map(mask_token).unwrap_or_else(|| "none".to_string())
        );

        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("Failed to reach realtime store")?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            anyhow::bail!("Realtime store error {}: {}", status, text);
        }

        let body: Value = response
            .json()
            .await
            .context("Failed to parse realtime store response")?;

        let owner = parse_owner_document(body)?
            .ok_or_else(|| anyhow::anyhow!("Owner '{}' not found in realtime store", session))?;

        info!(
            "Fetched owner '{}': {} members, {} expenses",
            session,
            owner.members.len(),
            owner.expenses.len()
        );
        Ok(owner)
    }
}

/// Decode an owner document; `None` for a `null` body
pub fn parse_owner_document(body: Value) -> Result<Option<Owner>> {
    if body.is_null() {
        return Ok(None);
    }
    let owner = serde_json::from_value(body).context("Owner document has an unexpected shape")?;
    Ok(Some(owner))
}

/// Mask a token for display (show first 4 and last 4 chars)
pub fn mask_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}
