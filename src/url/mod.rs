//! URL handling module for WebQuery
//!
//! This module provides seed validation, href resolution against a page URL, and the
//! normalization that turns a URL into its visited-set key.

mod normalize;

pub use normalize::normalize_url;

use crate::UrlError;
use url::Url;

/// Parses and validates a seed URL
///
/// The seed must be an absolute `http`/`https` URL with a host. The returned URL is
/// normalized, so it can be used directly as a visited-set key.
///
/// # Examples
///
/// ```
/// use webquery::url::parse_seed;
///
/// assert!(parse_seed("https://example.com/docs#intro").is_ok());
/// assert!(parse_seed("/relative/path").is_err());
/// assert!(parse_seed("ftp://example.com/").is_err());
/// ```
pub fn parse_seed(input: &str) -> Result<Url, UrlError> {
    normalize_url(input.trim())
}

/// Resolves a possibly relative href against the URL of the page it was found on
///
/// Returns None when the href should not become a sitemap entry:
/// - it cannot be joined onto the base
/// - the result is not HTTP(S) (`javascript:`, `tel:`, `data:` ...)
///
/// The result is normalized (fragment and tracking parameters removed).
///
/// # Examples
///
/// ```
/// use url::Url;
/// use webquery::url::resolve_href;
///
/// let base = Url::parse("https://example.com/docs/index.html").unwrap();
/// let url = resolve_href(&base, "guide.html#setup").unwrap();
/// assert_eq!(url.as_str(), "https://example.com/docs/guide.html");
/// assert!(resolve_href(&base, "javascript:void(0)").is_none());
/// ```
pub fn resolve_href(base: &Url, href: &str) -> Option<Url> {
    let joined = base.join(href.trim()).ok()?;
    normalize::normalize_parsed(joined).ok()
}

/// Returns the visited-set key of an already normalized URL
pub fn visit_key(url: &Url) -> String {
    url.as_str().to_string()
}
