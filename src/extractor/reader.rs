use readability::extractor;
use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::crawler::parse_html;
use crate::extractor::model::{normalize_whitespace, ReadableText};

/// Elements whose text never belongs to the main content
const BOILERPLATE_TAGS: &[&str] = &[
    "script", "style", "noscript", "nav", "header", "footer", "aside", "form", "template",
];

/// Containers tried in order by the fallback extractor
const CONTENT_SELECTORS: &[&str] = &[
    "article",
    "main",
    "[role='main']",
    "#content",
    "#main",
    ".content",
    ".post",
    ".article",
    ".entry-content",
];

/// A container needs at least this many characters to be taken as the main content
const MIN_CONTAINER_CHARS: usize = 100;

/// Extracts the readable text of an HTML page
///
/// Readability scoring runs first; when it yields no text the heuristic fallback
/// looks for a content container and finally the whole body.
pub fn extract(html: &str, url: &Url) -> Option<ReadableText> {
    if let Ok(product) = extractor::extract(&mut html.as_bytes(), url) {
        let text = normalize_whitespace(&product.text);
        if !text.is_empty() {
            let title = Some(product.title.trim().to_string()).filter(|t| !t.is_empty());
            return Some(ReadableText {
                title: title.or_else(|| parse_html(html).title),
                text,
            });
        }
    }

    fallback_extract(html)
}

fn fallback_extract(html: &str) -> Option<ReadableText> {
    let document = Html::parse_document(html);
    let text = normalize_whitespace(&extract_main_content(&document));

    if text.is_empty() {
        return None;
    }

    Some(ReadableText {
        title: parse_html(html).title,
        text,
    })
}

fn extract_main_content(document: &Html) -> String {
    for selector_str in CONTENT_SELECTORS {
        let Ok(selector) = Selector::parse(selector_str) else {
            continue;
        };
        for element in document.select(&selector) {
            let text = visible_text(element);
            if text.trim().chars().count() > MIN_CONTAINER_CHARS {
                return text;
            }
        }
    }

    // Last resort: the body minus boilerplate elements
    Selector::parse("body")
        .ok()
        .and_then(|body| document.select(&body).next())
        .map(visible_text)
        .unwrap_or_default()
}

/// Collects text under `element`, skipping boilerplate subtrees
///
/// Block-level boundaries are approximated by putting every text node on its own line.
fn visible_text(element: ElementRef<'_>) -> String {
    let mut out = String::new();

    for node in element.descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };
        let in_boilerplate = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|e| BOILERPLATE_TAGS.contains(&e.name()))
        });
        if !in_boilerplate {
            out.push_str(text);
            out.push('\n');
        }
    }

    out
}
