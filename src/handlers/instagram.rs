//! Instagram proxy routes: cached feed reads plus the webhook pair.
//!
//! Reads go through the tag cache; the webhook's GET half is the
//! platform's verification handshake and the POST half invalidates the
//! cached feed.

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use crate::error::{AppError, AppResult};
use crate::instagram::INSTAGRAM_CACHE_TAG;
use crate::security::constant_time_compare;
use crate::state::AppState;

const POSTS_CACHE_KEY: &str = "instagram:posts";
const STATS_CACHE_KEY: &str = "instagram:stats";

/// GET /api/instagram/posts
pub async fn posts(State(state): State<AppState>) -> AppResult<Json<Value>> {
    if let Some(cached) = state.cache.get(POSTS_CACHE_KEY).await {
        return Ok(Json(cached));
    }

    let posts = state
        .instagram
        .fetch_posts()
        .await
        .map_err(AppError::Upstream)?;
    let value = json!({ "data": posts });

    state
        .cache
        .insert(POSTS_CACHE_KEY, value.clone(), &[INSTAGRAM_CACHE_TAG])
        .await;

    Ok(Json(value))
}

/// GET /api/instagram/stats
pub async fn stats(State(state): State<AppState>) -> AppResult<Json<Value>> {
    if let Some(cached) = state.cache.get(STATS_CACHE_KEY).await {
        return Ok(Json(cached));
    }

    let stats = state
        .instagram
        .fetch_stats()
        .await
        .map_err(AppError::Upstream)?;
    let value = json!({ "data": stats });

    state
        .cache
        .insert(STATS_CACHE_KEY, value.clone(), &[INSTAGRAM_CACHE_TAG])
        .await;

    Ok(Json(value))
}

/// Query half of the platform's webhook verification handshake.
#[derive(Debug, Deserialize)]
pub struct WebhookVerifyParams {
    #[serde(rename = "hub.mode")]
    pub mode: Option<String>,
    #[serde(rename = "hub.verify_token")]
    pub verify_token: Option<String>,
    #[serde(rename = "hub.challenge")]
    pub challenge: Option<String>,
}

/// GET /api/instagram/webhook
///
/// Echo `hub.challenge` when the mode is `subscribe` and the verify token
/// matches; anything else is a 403.
pub async fn webhook_verify(
    State(state): State<AppState>,
    Query(params): Query<WebhookVerifyParams>,
) -> AppResult<String> {
    let mode = params.mode.as_deref().unwrap_or_default();
    let token = params.verify_token.as_deref().unwrap_or_default();

    if mode == "subscribe" && constant_time_compare(token, &state.config.instagram_verify_token) {
        Ok(params.challenge.unwrap_or_default())
    } else {
        Err(AppError::Forbidden(
            "webhook verification failed".to_string(),
        ))
    }
}

/// POST /api/instagram/webhook
///
/// Any notification payload invalidates the cached feed; the next read
/// refetches from the API.
pub async fn webhook_notify(
    State(state): State<AppState>,
    Json(_payload): Json<Value>,
) -> AppResult<Json<Value>> {
    let removed = state.cache.invalidate_tag(INSTAGRAM_CACHE_TAG).await;
    info!(removed = removed, "Instagram cache invalidated by webhook");

    Ok(Json(json!({ "ok": true })))
}
