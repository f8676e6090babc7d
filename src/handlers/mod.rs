//! HTTP handlers, grouped by concern.
//!
//! - `forms`: form-submission mail relays
//! - `instagram`: cached feed proxy and webhook
//! - `content`: CMS-backed content, search, and sitemap routes
//! - `pages`: locale-prefix redirect fallback

pub mod content;
pub mod forms;
pub mod instagram;
pub mod pages;

use axum::http::{header, HeaderMap};

use crate::locale::{resolve_locale, Locale};

/// Resolve the locale for an API request: explicit `?locale=` parameter,
/// then cookie, then `Accept-Language`, then the default.
pub(crate) fn request_locale(param: Option<&str>, headers: &HeaderMap) -> Locale {
    if let Some(locale) = param.and_then(|code| Locale::from_code(code).ok()) {
        return locale;
    }

    let cookie = headers
        .get(header::COOKIE)
        .and_then(|value| value.to_str().ok());
    let accept_language = headers
        .get(header::ACCEPT_LANGUAGE)
        .and_then(|value| value.to_str().ok());

    resolve_locale(cookie, accept_language)
}
