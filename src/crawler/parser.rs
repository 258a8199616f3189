//! HTML parser for extracting anchors and the page title
//!
//! Hrefs are returned exactly as written in the document. Resolving them against the
//! page URL is the sitemap builder's job.

use scraper::{Html, Selector};

/// Extracted information from an HTML page
#[derive(Debug, Clone, Default)]
pub struct ParsedPage {
    /// The page title (from <title> tag)
    pub title: Option<String>,

    /// `href` values of every anchor, in document order, unresolved
    pub hrefs: Vec<String>,
}

/// Parses HTML content and extracts anchors and the title
///
/// # Link Extraction Rules
///
/// **Include:** every `<a href="...">`, verbatim (no trimming, no dedup)
///
/// **Exclude:** hrefs beginning with `mailto:`
///
/// # Example
///
/// ```
/// use webquery::crawler::parse_html;
///
/// let html = r#"<html><head><title>Test</title></head>
///     <body><a href="/page">Link</a><a href="mailto:a@b.c">Mail</a></body></html>"#;
/// let parsed = parse_html(html);
/// assert_eq!(parsed.title, Some("Test".to_string()));
/// assert_eq!(parsed.hrefs, vec!["/page".to_string()]);
/// ```
pub fn parse_html(html: &str) -> ParsedPage {
    let document = Html::parse_document(html);

    ParsedPage {
        title: extract_title(&document),
        hrefs: extract_hrefs(&document),
    }
}

/// Extracts the anchor hrefs of an HTML body
pub fn extract_hrefs_simple(html: &str) -> Vec<String> {
    extract_hrefs(&Html::parse_document(html))
}

/// Extracts the page title from the HTML document
pub(crate) fn extract_title(document: &Html) -> Option<String> {
    let title_selector = Selector::parse("title").ok()?;

    document
        .select(&title_selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
}

fn extract_hrefs(document: &Html) -> Vec<String> {
    let Ok(a_selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    document
        .select(&a_selector)
        .filter_map(|element| element.value().attr("href"))
        .filter(|href| !href.starts_with("mailto:"))
        .map(str::to_string)
        .collect()
}
