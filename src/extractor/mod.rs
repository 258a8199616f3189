//! Content extractor: turn one URL into plain readable text
//!
//! A page yields an [`ExtractedDocument`] or a [`PageFailure`] explaining why it
//! contributed nothing. Failures are values, never panics or errors, so the
//! orchestrator can record them and move on.

pub mod model;
pub mod reader;

pub use model::{normalize_whitespace, ExtractedDocument};

use crate::crawler::{FetchedPage, PageFetcher};
use crate::state::PageFailure;
use url::Url;

/// How a response body should be read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DocumentKind {
    Html,
    PlainText,
}

/// Classifies a Content-Type header value
///
/// A missing header is treated as HTML.
fn document_kind(content_type: Option<&str>) -> Option<DocumentKind> {
    let Some(content_type) = content_type else {
        return Some(DocumentKind::Html);
    };

    let mime = content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();

    match mime.as_str() {
        "text/html" | "application/xhtml+xml" | "" => Some(DocumentKind::Html),
        "text/plain" => Some(DocumentKind::PlainText),
        _ => None,
    }
}

/// Fetches `url` and extracts its main text
///
/// # Returns
///
/// * `Ok(ExtractedDocument)` - Non-empty text was extracted
/// * `Err(PageFailure)` - Non-200 status, network error, non-text content, or no text
pub async fn extract_content(
    fetcher: &dyn PageFetcher,
    url: &Url,
) -> Result<ExtractedDocument, PageFailure> {
    let page = fetcher.fetch(url).await.into_ok_page()?;
    extract_from_page(url, &page)
}

/// Extracts the main text of an already fetched 200 response
pub fn extract_from_page(url: &Url, page: &FetchedPage) -> Result<ExtractedDocument, PageFailure> {
    let kind = document_kind(page.content_type.as_deref()).ok_or_else(|| {
        PageFailure::NotHtml(page.content_type.clone().unwrap_or_default())
    })?;

    let (title, text) = match kind {
        DocumentKind::PlainText => (None, normalize_whitespace(&page.body)),
        DocumentKind::Html => match reader::extract(&page.body, &page.final_url) {
            Some(readable) => (readable.title, readable.text),
            None => (None, String::new()),
        },
    };

    if text.is_empty() {
        return Err(PageFailure::ExtractionEmpty);
    }

    Ok(ExtractedDocument {
        url: url.clone(),
        final_url: page.final_url.clone(),
        title,
        text,
        fetched_at: page.fetched_at,
    })
}
