//! Application router.
//!
//! Shared by the production binary and the integration tests so both run
//! the exact same route table and middleware.

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::handlers::{content, forms, instagram, pages};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(content::health))
        // Form relays
        .route("/api/contact", post(forms::contact))
        .route("/api/solution", post(forms::solution))
        .route("/api/multi-step-form", post(forms::multi_step_form))
        // Instagram proxy + webhook
        .route("/api/instagram/posts", get(instagram::posts))
        .route("/api/instagram/stats", get(instagram::stats))
        .route(
            "/api/instagram/webhook",
            get(instagram::webhook_verify).post(instagram::webhook_notify),
        )
        // Content and search
        .route("/api/find-perfumes", get(content::find_perfumes))
        .route("/api/notes", get(content::notes))
        .route("/api/search", get(content::search))
        .route("/api/content/perfumes", get(content::perfumes))
        .route("/api/content/perfumes/:slug", get(content::perfume_by_slug))
        .route("/api/content/collections", get(content::collections))
        .route("/api/content/news", get(content::news))
        .route("/api/content/navbar", get(content::navbar))
        .route("/api/content/legal/:slug", get(content::legal_page))
        // Sitemap
        .route("/sitemap.xml", get(content::sitemap_xml))
        // Locale-prefixed pages and redirects
        .fallback(pages::locale_fallback)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
