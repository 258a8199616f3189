use chrono::{DateTime, Utc};
use url::Url;

/// Plain-text content pulled from one page
#[derive(Debug, Clone)]
pub struct ExtractedDocument {
    /// The sitemap URL that was requested
    pub url: Url,
    /// Where the request ended up after redirects
    pub final_url: Url,
    pub title: Option<String>,
    pub text: String,
    pub fetched_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct ReadableText {
    pub title: Option<String>,
    pub text: String,
}

/// Normalizes extracted text
///
/// Every line is trimmed and its inner whitespace collapsed to single spaces; runs of
/// blank lines become one blank line, and leading/trailing blank lines are dropped.
pub fn normalize_whitespace(text: &str) -> String {
    let mut lines: Vec<String> = Vec::new();
    let mut pending_blank = false;

    for line in text.lines() {
        let collapsed = line.split_whitespace().collect::<Vec<_>>().join(" ");
        if collapsed.is_empty() {
            pending_blank = !lines.is_empty();
            continue;
        }
        if pending_blank {
            lines.push(String::new());
            pending_blank = false;
        }
        lines.push(collapsed);
    }

    lines.join("\n")
}
