use crate::corpus::{CorpusError, CorpusResult};
use std::fs;
use std::path::Path;

/// Reads a plain-text source file
///
/// Only `.txt` files (any case) are accepted.
///
/// # Returns
///
/// * `Ok(String)` - The file contents
/// * `Err(CorpusError::UnsupportedFormat)` - The extension is not `.txt`
/// * `Err(CorpusError::Io)` - The file could not be read or is not UTF-8
pub fn read_text_file(path: &Path) -> CorpusResult<String> {
    let is_text = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("txt"));

    if !is_text {
        return Err(CorpusError::UnsupportedFormat(path.display().to_string()));
    }

    Ok(fs::read_to_string(path)?)
}
