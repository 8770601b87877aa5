//! The document under test: read once, never mutated.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::core::DocGuardError;

/// Immutable document text, cheap to clone and share across tasks.
#[derive(Debug, Clone)]
pub struct Document {
    path: Option<PathBuf>,
    text: Arc<str>,
}

impl Document {
    /// Read a document from disk. Missing, unreadable or non-UTF-8 files are
    /// load failures.
    pub fn load(path: &Path) -> Result<Self, DocGuardError> {
        let text = std::fs::read_to_string(path).map_err(|source| DocGuardError::Load {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!("Loaded {} ({} bytes)", path.display(), text.len());
        Ok(Self {
            path: Some(path.to_path_buf()),
            text: Arc::from(text),
        })
    }

    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            path: None,
            text: Arc::from(text.into()),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Lines with any trailing whitespace (including `\r`) removed.
    pub(crate) fn lines(&self) -> impl Iterator<Item = &str> {
        self.text.split('\n').map(str::trim_end)
    }
}
