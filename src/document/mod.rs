mod handler;
mod ingestion;
pub mod pdf;
mod session;

pub use handler::DocumentHandler;
pub use ingestion::DocumentIngestion;
pub use session::{clean_old_sessions, Session};

use crate::error::{DocumentPortalError, Result};
use std::borrow::Cow;
use std::fs;
use std::path::{Path, PathBuf};

pub const ANALYSIS_DIR: &str = "document_analysis";
pub const COMPARE_DIR: &str = "document_compare";

/// A file handed over by the caller: a display name plus its raw bytes.
pub trait UploadedFile {
    fn name(&self) -> &str;
    fn bytes(&self) -> Result<Cow<'_, [u8]>>;
}

/// An upload already held in memory.
#[derive(Debug, Clone)]
pub struct InMemoryFile {
    name: String,
    data: Vec<u8>,
}

impl InMemoryFile {
    pub fn new(name: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        InMemoryFile {
            name: name.into(),
            data: data.into(),
        }
    }
}

impl UploadedFile for InMemoryFile {
    fn name(&self) -> &str {
        &self.name
    }

    fn bytes(&self) -> Result<Cow<'_, [u8]>> {
        Ok(Cow::Borrowed(&self.data))
    }
}

/// An upload backed by a file on disk, read lazily.
#[derive(Debug, Clone)]
pub struct LocalFile {
    name: String,
    path: PathBuf,
}

impl LocalFile {
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        LocalFile {
            name: path.to_string_lossy().into_owned(),
            path,
        }
    }
}

impl UploadedFile for LocalFile {
    fn name(&self) -> &str {
        &self.name
    }

    fn bytes(&self) -> Result<Cow<'_, [u8]>> {
        fs::read(&self.path)
            .map(Cow::Owned)
            .map_err(|e| DocumentPortalError::io(&self.path, e))
    }
}
