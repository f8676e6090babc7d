//! CMS-backed content routes, search, and the sitemap.
//!
//! Each route resolves a locale for the request and proxies the matching
//! CMS query, returning `{"data": ...}` envelopes.

use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::cms::PerfumeFilter;
use crate::error::{AppError, AppResult};
use crate::handlers::request_locale;
use crate::sitemap::{build_sitemap, SitemapSlugs};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LocaleParams {
    pub locale: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct FindPerfumesParams {
    pub locale: Option<String>,
    pub collection: Option<String>,
    pub note: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub locale: Option<String>,
    pub q: Option<String>,
}

/// GET /api/content/perfumes
pub async fn perfumes(
    State(state): State<AppState>,
    Query(params): Query<LocaleParams>,
    headers: HeaderMap,
) -> AppResult<Json<Value>> {
    let locale = request_locale(params.locale.as_deref(), &headers);
    let perfumes = state
        .cms
        .fetch_perfumes(locale)
        .await
        .map_err(AppError::Upstream)?;

    Ok(Json(json!({ "data": perfumes })))
}

/// GET /api/content/perfumes/:slug
pub async fn perfume_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(params): Query<LocaleParams>,
    headers: HeaderMap,
) -> AppResult<Json<Value>> {
    let locale = request_locale(params.locale.as_deref(), &headers);
    let perfume = state
        .cms
        .fetch_perfume_by_slug(locale, &slug)
        .await
        .map_err(AppError::Upstream)?
        .ok_or_else(|| AppError::NotFound(format!("no perfume with slug '{}'", slug)))?;

    Ok(Json(json!({ "data": perfume })))
}

/// GET /api/content/collections
pub async fn collections(
    State(state): State<AppState>,
    Query(params): Query<LocaleParams>,
    headers: HeaderMap,
) -> AppResult<Json<Value>> {
    let locale = request_locale(params.locale.as_deref(), &headers);
    let collections = state
        .cms
        .fetch_collections(locale)
        .await
        .map_err(AppError::Upstream)?;

    Ok(Json(json!({ "data": collections })))
}

/// GET /api/content/news
pub async fn news(
    State(state): State<AppState>,
    Query(params): Query<LocaleParams>,
    headers: HeaderMap,
) -> AppResult<Json<Value>> {
    let locale = request_locale(params.locale.as_deref(), &headers);
    let articles = state
        .cms
        .fetch_news(locale)
        .await
        .map_err(AppError::Upstream)?;

    Ok(Json(json!({ "data": articles })))
}

/// GET /api/content/legal/:slug
pub async fn legal_page(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(params): Query<LocaleParams>,
    headers: HeaderMap,
) -> AppResult<Json<Value>> {
    let locale = request_locale(params.locale.as_deref(), &headers);
    let page = state
        .cms
        .fetch_legal_page(locale, &slug)
        .await
        .map_err(AppError::Upstream)?
        .ok_or_else(|| AppError::NotFound(format!("no legal page with slug '{}'", slug)))?;

    Ok(Json(json!({ "data": page })))
}

/// GET /api/content/navbar
pub async fn navbar(
    State(state): State<AppState>,
    Query(params): Query<LocaleParams>,
    headers: HeaderMap,
) -> AppResult<Json<Value>> {
    let locale = request_locale(params.locale.as_deref(), &headers);
    let navbar = state
        .cms
        .fetch_navbar(locale)
        .await
        .map_err(AppError::Upstream)?;

    Ok(Json(json!({ "data": navbar })))
}

/// GET /api/notes
pub async fn notes(
    State(state): State<AppState>,
    Query(params): Query<LocaleParams>,
    headers: HeaderMap,
) -> AppResult<Json<Value>> {
    let locale = request_locale(params.locale.as_deref(), &headers);
    let notes = state
        .cms
        .fetch_notes(locale)
        .await
        .map_err(AppError::Upstream)?;

    Ok(Json(json!({ "data": notes })))
}

/// GET /api/find-perfumes
pub async fn find_perfumes(
    State(state): State<AppState>,
    Query(params): Query<FindPerfumesParams>,
    headers: HeaderMap,
) -> AppResult<Json<Value>> {
    let locale = request_locale(params.locale.as_deref(), &headers);
    let filter = PerfumeFilter {
        collection: params.collection,
        note: params.note,
    };

    let perfumes = state
        .cms
        .find_perfumes(locale, &filter)
        .await
        .map_err(AppError::Upstream)?;

    Ok(Json(json!({ "data": perfumes })))
}

/// GET /api/search
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
    headers: HeaderMap,
) -> AppResult<Json<Value>> {
    let locale = request_locale(params.locale.as_deref(), &headers);
    let query = params.q.unwrap_or_default();

    let results = crate::search::search(&state.cms, locale, &query)
        .await
        .map_err(AppError::Upstream)?;

    Ok(Json(json!({ "data": results })))
}

/// GET /sitemap.xml
pub async fn sitemap_xml(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let (perfumes, collections, news) = futures::try_join!(
        state.cms.fetch_slugs("perfume"),
        state.cms.fetch_slugs("collection"),
        state.cms.fetch_slugs("news"),
    )
    .map_err(AppError::Upstream)?;

    let slugs = SitemapSlugs {
        perfumes,
        collections,
        news,
    };
    let xml = build_sitemap(&state.config.site_base_url, &slugs);

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/xml")],
        xml,
    ))
}

/// GET /healthz
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
