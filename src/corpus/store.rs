//! Corpus storage backends
//!
//! Corpora are written once under an identifier and read back whenever a consumer
//! needs the context text again.

use crate::config::OutputConfig;
use crate::corpus::{validate_id, CorpusResult};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Trait for corpus storage backends
///
/// Implementations must reject ids that fail [`validate_id`].
pub trait CorpusStore: Send + Sync {
    /// Stores `text` under `id`, replacing any previous corpus
    fn put(&self, id: &str, text: &str) -> CorpusResult<()>;

    /// Loads the corpus stored under `id`
    ///
    /// # Returns
    ///
    /// * `Ok(Some(text))` - The stored corpus
    /// * `Ok(None)` - Nothing is stored under `id`
    fn get(&self, id: &str) -> CorpusResult<Option<String>>;

    /// Deletes the corpus stored under `id`, returning whether one existed
    fn delete(&self, id: &str) -> CorpusResult<bool>;
}

/// Stores every corpus as `<dir>/<id>.txt`
#[derive(Debug, Clone)]
pub struct FsCorpusStore {
    dir: PathBuf,
}

impl FsCorpusStore {
    /// The directory is created on the first write
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn from_config(config: &OutputConfig) -> Self {
        Self::new(&config.corpus_dir)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file backing `id`
    pub fn path_for(&self, id: &str) -> CorpusResult<PathBuf> {
        validate_id(id)?;
        Ok(self.dir.join(format!("{}.txt", id)))
    }
}

impl CorpusStore for FsCorpusStore {
    fn put(&self, id: &str, text: &str) -> CorpusResult<()> {
        let path = self.path_for(id)?;
        fs::create_dir_all(&self.dir)?;
        fs::write(&path, text)?;
        tracing::info!("Stored corpus '{}' ({} bytes) at {}", id, text.len(), path.display());
        Ok(())
    }

    fn get(&self, id: &str) -> CorpusResult<Option<String>> {
        let path = self.path_for(id)?;
        match fs::read_to_string(&path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn delete(&self, id: &str) -> CorpusResult<bool> {
        let path = self.path_for(id)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}
