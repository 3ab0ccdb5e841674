//! Internationalization utilities for the backend
//!
//! This module provides locale extraction from HTTP requests and
//! request-scoped storage for the current locale.

use std::future::Future;

// Request-scoped storage for current locale
tokio::task_local! {
    static CURRENT_LOCALE: String;
}

/// Supported locales
pub const SUPPORTED_LOCALES: &[&str] = &["en", "am"];
pub const DEFAULT_LOCALE: &str = "en";

/// Run `fut` with `locale` as the current locale
pub async fn with_locale<F>(locale: &str, fut: F) -> F::Output
where
    F: Future,
{
    CURRENT_LOCALE.scope(normalize_locale(locale), fut).await
}

/// Get the current locale, falling back to the default outside a request scope
pub fn get_locale() -> String {
    CURRENT_LOCALE
        .try_with(|l| l.clone())
        .unwrap_or_else(|_| DEFAULT_LOCALE.to_string())
}

/// Normalize a single language tag to a supported locale
/// Accepts: "en", "en-US", "en_US", "am", "am-ET", etc.
fn supported_locale(tag: &str) -> Option<&'static str> {
    let tag = tag.trim().to_lowercase();
    let primary = tag.split(['-', '_', ';']).next()?;

    SUPPORTED_LOCALES.iter().copied().find(|l| *l == primary)
}

fn normalize_locale(locale: &str) -> String {
    supported_locale(locale).unwrap_or(DEFAULT_LOCALE).to_string()
}

/// Extract locale from Accept-Language header value
///
/// Takes the first listed language we support, e.g. "fr, am;q=0.8" → "am".
pub fn extract_locale_from_header(header_value: Option<&str>) -> String {
    header_value
        .and_then(|value| value.split(',').find_map(supported_locale))
        .unwrap_or(DEFAULT_LOCALE)
        .to_string()
}
