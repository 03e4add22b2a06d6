//! Writing redacted documents out.

use crate::document::ParsedDocument;
use crate::error::{RedactorError, RedactorResult};
use std::fs;
use std::path::{Path, PathBuf};

/// Saves a redacted document's text under its filename.
pub trait Exporter {
    /// Writes `document.content` and returns where it went.
    fn export(&self, document: &ParsedDocument) -> RedactorResult<PathBuf>;
}

/// Writes UTF-8 text files into a directory, creating it if needed.
#[derive(Debug, Clone)]
pub struct FileExporter {
    output_dir: PathBuf,
}

impl FileExporter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Path the document would be written to.
    pub fn path_for(&self, document: &ParsedDocument) -> PathBuf {
        let name = Path::new(&document.filename)
            .file_name()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(&document.filename));
        self.output_dir.join(name)
    }
}

impl Exporter for FileExporter {
    fn export(&self, document: &ParsedDocument) -> RedactorResult<PathBuf> {
        fs::create_dir_all(&self.output_dir).map_err(|e| RedactorError::Export {
            path: self.output_dir.clone(),
            source: e,
        })?;

        let path = self.path_for(document);
        fs::write(&path, document.content.as_bytes()).map_err(|e| RedactorError::Export {
            path: path.clone(),
            source: e,
        })?;

        tracing::debug!(path = %path.display(), bytes = document.content.len(), "exported document");
        Ok(path)
    }
}
