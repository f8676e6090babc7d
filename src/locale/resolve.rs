//! Per-request locale resolution.
//!
//! Resolution order matches the site's routing convention: the
//! `NEXT_LOCALE` cookie wins, then the best `Accept-Language` match, then
//! the default locale. Resolution never fails; garbage input falls back to
//! the default.

use crate::locale::{Locale, LocaleRegistry};

/// Name of the cookie that persists the visitor's locale preference.
pub const LOCALE_COOKIE: &str = "NEXT_LOCALE";

/// Resolve the locale for a request from its `Cookie` and `Accept-Language`
/// header values.
pub fn resolve_locale(cookie_header: Option<&str>, accept_language: Option<&str>) -> Locale {
    if let Some(code) = cookie_header.and_then(locale_from_cookie) {
        return code;
    }

    if let Some(locale) = accept_language.and_then(best_accept_language_match) {
        return locale;
    }

    Locale::default_locale()
}

/// Extract an enabled locale from a raw `Cookie` header value.
///
/// The first `NEXT_LOCALE=` pair wins. Values naming unknown or disabled
/// locales are ignored so the caller falls through to the header chain.
fn locale_from_cookie(cookie_header: &str) -> Option<Locale> {
    cookie_header
        .split(';')
        .filter_map(|pair| {
            let (name, value) = pair.trim().split_once('=')?;
            if name.trim() == LOCALE_COOKIE {
                Locale::from_code(value.trim()).ok()
            } else {
                None
            }
        })
        .next()
}

/// Pick the best enabled locale from an `Accept-Language` header value.
///
/// Language ranges are ordered by descending quality weight; the primary
/// subtag is matched case-insensitively against the registry ("de-AT"
/// matches "de"). Wildcards, malformed weights, and `q=0` entries are
/// skipped.
fn best_accept_language_match(header: &str) -> Option<Locale> {
    let mut ranges: Vec<(&str, f32)> = header
        .split(',')
        .filter_map(|entry| {
            let mut parts = entry.trim().split(';');
            let tag = parts.next()?.trim();
            if tag.is_empty() || tag == "*" {
                return None;
            }

            let quality = parts
                .find_map(|param| {
                    let (key, value) = param.trim().split_once('=')?;
                    if key.trim() == "q" {
                        value.trim().parse::<f32>().ok()
                    } else {
                        None
                    }
                })
                .unwrap_or(1.0);

            if quality <= 0.0 {
                return None;
            }

            Some((tag, quality))
        })
        .collect();

    // Stable sort keeps header order for equal weights
    ranges.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    let registry = LocaleRegistry::get();
    ranges.iter().find_map(|(tag, _)| {
        let primary = tag.split('-').next().unwrap_or(tag).to_ascii_lowercase();
        if registry.is_enabled(&primary) {
            Locale::from_code(&primary).ok()
        } else {
            None
        }
    })
}

/// Split an enabled locale prefix off a request path.
///
/// Returns the locale and the remainder (always starting with `/`) for
/// paths like `/de` or `/de/news`. Paths without a recognized prefix
/// return `None`.
pub fn split_locale_prefix(path: &str) -> Option<(Locale, &str)> {
    let trimmed = path.strip_prefix('/')?;
    let head = trimmed.split('/').next().unwrap_or("");
    let locale = Locale::from_code(head).ok()?;

    // Remainder keeps its leading slash so it can be re-joined directly
    let rest = &path[1 + head.len()..];
    Some((locale, if rest.is_empty() { "/" } else { rest }))
}
