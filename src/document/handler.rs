use super::pdf::{extract_pages, render_pages};
use super::{Session, UploadedFile, ANALYSIS_DIR};
use crate::config::EnvSettings;
use crate::error::{DocumentPortalError, Result};
use crate::utils::file_utils::{validate_pdf_name, write_bytes};
use log::{error, info};
use std::fs;
use std::path::{Path, PathBuf};

/// Saves single-document uploads into a session directory and reads them back.
///
/// Layout: `<data_dir>/<session_id>/<filename>.pdf`.
#[derive(Debug, Clone)]
pub struct DocumentHandler {
    data_dir: PathBuf,
    session: Session,
}

impl DocumentHandler {
    pub fn new(data_dir: impl Into<PathBuf>, session_id: Option<String>) -> Result<Self> {
        let data_dir = data_dir.into();
        let session = Session::open(&data_dir, session_id).map_err(|e| {
            error!("Error initializing DocumentHandler: {}", e);
            e
        })?;
        info!(
            "PDFHandler initialized: session_id={}, session_path={}",
            session.id(),
            session.path().display()
        );
        Ok(DocumentHandler { data_dir, session })
    }

    /// Uses `<data_root>/document_analysis` as the data directory.
    pub fn from_env(env: &EnvSettings, session_id: Option<String>) -> Result<Self> {
        Self::new(env.data_root().join(ANALYSIS_DIR), session_id)
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn save(&self, file: &dyn UploadedFile) -> Result<PathBuf> {
        let filename = validate_pdf_name(file.name()).map_err(|e| {
            error!("Error saving PDF: {}", e);
            e
        })?;

        let save_path = self.session.path().join(&filename);
        let bytes = file.bytes()?;
        write_bytes(&save_path, &bytes).map_err(|e| {
            error!("Error saving PDF: {}", e);
            e
        })?;
        let save_path =
            fs::canonicalize(&save_path).map_err(|e| DocumentPortalError::io(&save_path, e))?;

        info!(
            "PDF saved successfully: file={}, save_path={}, session_id={}",
            filename,
            save_path.display(),
            self.session.id()
        );
        Ok(save_path)
    }

    pub fn read(&self, pdf_path: &Path) -> Result<String> {
        let pages = extract_pages(pdf_path, false).map_err(|e| {
            error!("Error reading PDF: {}", e);
            e
        })?;
        let text = render_pages(&pages);
        info!(
            "PDF read successfully: pdf_path={}, session_id={}, pages={}",
            pdf_path.display(),
            self.session.id(),
            pages.len()
        );
        Ok(text)
    }
}
