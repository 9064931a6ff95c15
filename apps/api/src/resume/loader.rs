//! Resume Loader — reads resume files from disk with a path-keyed text cache.
//!
//! PDF extraction is CPU-bound; async callers must go through
//! `tokio::task::spawn_blocking`. The cache never expires on its own:
//! callers MUST call `clear_cache` (or `invalidate`) after a re-upload.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum ResumeLoadError {
    #[error("failed to read resume at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to extract text from PDF {path}: {message}")]
    Pdf { path: PathBuf, message: String },

    #[error("unsupported resume format: {0}")]
    Unsupported(String),

    #[error("resume at {0} contains no text")]
    Empty(PathBuf),

    #[error("resume cache lock poisoned")]
    CachePoisoned,
}

#[derive(Debug, Default)]
pub struct ResumeLoader {
    cache: RwLock<HashMap<PathBuf, String>>,
}

impl ResumeLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads resume text, serving repeat reads of the same file from cache.
    pub fn load(&self, path: &Path) -> Result<String, ResumeLoadError> {
        let resolved = std::fs::canonicalize(path).map_err(|source| ResumeLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        if let Some(text) = self
            .cache
            .read()
            .map_err(|_| ResumeLoadError::CachePoisoned)?
            .get(&resolved)
        {
            debug!("Resume cache hit: {}", resolved.display());
            return Ok(text.clone());
        }

        let text = read_resume_file(&resolved)?;
        info!(
            "Loaded resume {} ({} chars)",
            resolved.display(),
            text.chars().count()
        );

        self.cache
            .write()
            .map_err(|_| ResumeLoadError::CachePoisoned)?
            .insert(resolved, text.clone());
        Ok(text)
    }

    /// Drops every cached resume.
    pub fn clear_cache(&self) -> Result<(), ResumeLoadError> {
        let mut cache = self
            .cache
            .write()
            .map_err(|_| ResumeLoadError::CachePoisoned)?;
        info!("Clearing resume cache ({} entries)", cache.len());
        cache.clear();
        Ok(())
    }

    /// Drops the cached text for one file. Unknown paths are a no-op.
    pub fn invalidate(&self, path: &Path) -> Result<(), ResumeLoadError> {
        let resolved = std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
        self.cache
            .write()
            .map_err(|_| ResumeLoadError::CachePoisoned)?
            .remove(&resolved);
        Ok(())
    }

    pub fn cached_count(&self) -> usize {
        self.cache.read().map(|c| c.len()).unwrap_or(0)
    }
}

fn read_resume_file(path: &Path) -> Result<String, ResumeLoadError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    let text = match extension.as_str() {
        "pdf" => pdf_extract::extract_text(path).map_err(|e| ResumeLoadError::Pdf {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?,
        "txt" | "md" | "text" => {
            std::fs::read_to_string(path).map_err(|source| ResumeLoadError::Io {
                path: path.to_path_buf(),
                source,
            })?
        }
        other => return Err(ResumeLoadError::Unsupported(other.to_string())),
    };

    let text = text.trim().to_string();
    if text.is_empty() {
        return Err(ResumeLoadError::Empty(path.to_path_buf()));
    }
    Ok(text)
}
