use crate::corpus::{read_text_file, CorpusResult};
use std::path::Path;

/// Accumulates corpus sections
///
/// Sections are emitted in a fixed order regardless of push order: free text,
/// then files, then URL corpora. Every non-empty free text and every file or URL
/// section is followed by a newline.
#[derive(Debug, Default)]
pub struct CorpusBuilder {
    text: String,
    files: Vec<String>,
    urls: Vec<String>,
}

impl CorpusBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends free text
    pub fn push_text(&mut self, text: &str) -> &mut Self {
        self.text.push_str(text);
        self
    }

    /// Reads a plain-text file and appends it as one section
    pub fn push_file(&mut self, path: &Path) -> CorpusResult<&mut Self> {
        let contents = read_text_file(path)?;
        tracing::debug!("Added {} ({} bytes) to corpus", path.display(), contents.len());
        self.files.push(contents);
        Ok(self)
    }

    /// Appends the aggregated text of one ingested URL
    pub fn push_url_corpus(&mut self, corpus: &str) -> &mut Self {
        self.urls.push(corpus.to_string());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty() && self.files.is_empty() && self.urls.is_empty()
    }

    pub fn build(&self) -> String {
        let mut corpus = String::new();

        if !self.text.is_empty() {
            corpus.push_str(&self.text);
            corpus.push('\n');
        }

        for section in self.files.iter().chain(&self.urls) {
            corpus.push_str(section);
            corpus.push('\n');
        }

        corpus
    }
}
