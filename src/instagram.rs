//! Instagram Graph API client backing the feed proxy routes.
//!
//! Fetches the brand account's recent media and profile stats, reshaping
//! the Graph API JSON into the compact forms the frontend consumes.
//! Responses are cached by the handlers under the `instagram` tag; the
//! webhook invalidates that tag on notification.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::Config;

/// Cache tag shared by all Instagram-derived entries.
pub const INSTAGRAM_CACHE_TAG: &str = "instagram";

/// Media fields requested from the Graph API.
const MEDIA_FIELDS: &str = "id,caption,media_type,media_url,permalink,thumbnail_url,timestamp";

/// Profile fields requested from the Graph API.
const PROFILE_FIELDS: &str = "followers_count,media_count";

#[derive(Debug, Deserialize)]
struct MediaResponse {
    data: Option<Vec<InstagramPost>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstagramPost {
    pub id: String,
    pub caption: Option<String>,
    pub media_type: String,
    pub media_url: Option<String>,
    pub permalink: Option<String>,
    pub thumbnail_url: Option<String>,
    pub timestamp: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstagramStats {
    pub followers_count: u64,
    pub media_count: u64,
}

pub struct InstagramClient {
    client: reqwest::Client,
    api_base: String,
    access_token: String,
}

impl InstagramClient {
    pub fn new(config: &Config) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_base: config.instagram_api_base.trim_end_matches('/').to_string(),
            access_token: config.instagram_access_token.clone(),
        }
    }

    /// Fetch the account's recent media posts.
    pub async fn fetch_posts(&self) -> Result<Vec<InstagramPost>> {
        let url = format!("{}/me/media", self.api_base);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("fields", MEDIA_FIELDS),
                ("access_token", self.access_token.as_str()),
            ])
            .send()
            .await
            .context("Failed to send request to Instagram API")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Instagram API error ({}): {}", status, body);
        }

        let media: MediaResponse = response
            .json()
            .await
            .context("Failed to parse Instagram media response")?;

        let posts = media.data.unwrap_or_default();
        info!("Fetched {} Instagram posts", posts.len());
        Ok(posts)
    }

    /// Fetch follower and media counts for the account.
    pub async fn fetch_stats(&self) -> Result<InstagramStats> {
        let url = format!("{}/me", self.api_base);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("fields", PROFILE_FIELDS),
                ("access_token", self.access_token.as_str()),
            ])
            .send()
            .await
            .context("Failed to send request to Instagram API")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Instagram API error ({}): {}", status, body);
        }

        response
            .json()
            .await
            .context("Failed to parse Instagram profile response")
    }
}
