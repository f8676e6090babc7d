//! Locale-prefixed page routing.
//!
//! The router's fallback: page paths without a locale prefix are
//! redirected to the visitor's resolved locale (cookie, then
//! `Accept-Language`, then default). Prefixed paths get a minimal shell
//! response; the rendered pages themselves are the frontend's concern.

use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::response::{Html, IntoResponse, Redirect, Response};

use crate::locale::{resolve_locale, split_locale_prefix, Locale};

/// Router fallback for everything outside the API surface.
pub async fn locale_fallback(method: Method, uri: Uri, headers: HeaderMap) -> Response {
    let path = uri.path();

    // Unknown API routes and non-GET page requests are plain 404s
    if path.starts_with("/api/") || method != Method::GET {
        return StatusCode::NOT_FOUND.into_response();
    }

    if let Some((locale, _rest)) = split_locale_prefix(path) {
        return page_shell(locale).into_response();
    }

    let cookie = headers
        .get(header::COOKIE)
        .and_then(|value| value.to_str().ok());
    let accept_language = headers
        .get(header::ACCEPT_LANGUAGE)
        .and_then(|value| value.to_str().ok());
    let locale = resolve_locale(cookie, accept_language);

    let mut target = if path == "/" {
        format!("/{}/", locale.code())
    } else {
        format!("/{}{}", locale.code(), path)
    };
    if let Some(query) = uri.query() {
        target.push('?');
        target.push_str(query);
    }

    Redirect::temporary(&target).into_response()
}

/// Minimal localized document shell for prefixed page paths.
fn page_shell(locale: Locale) -> Html<String> {
    Html(format!(
        "<!doctype html>\n<html lang=\"{}\">\n<head><meta charset=\"utf-8\"><title>Essenza</title></head>\n<body></body>\n</html>\n",
        locale.code()
    ))
}
