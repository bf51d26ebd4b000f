use super::pdf::{extract_pages, render_non_blank_pages};
use super::{UploadedFile, ANALYSIS_DIR, COMPARE_DIR};
use crate::config::EnvSettings;
use crate::error::{DocumentPortalError, Result};
use crate::utils::file_utils::{clear_directory, collect_pdf_files, validate_pdf_name, write_bytes};
use log::{error, info};
use std::fs;
use std::path::{Path, PathBuf};

/// Flat workspace for a reference/actual pair of PDFs.
///
/// Every `save_pair` wipes the workspace first, so it only ever holds the
/// most recent pair. Analysis sessions are looked for in the sibling
/// `document_analysis` directory.
#[derive(Debug, Clone)]
pub struct DocumentIngestion {
    base_dir: PathBuf,
    sessions_dir: PathBuf,
}

impl DocumentIngestion {
    pub fn new(base_dir: impl Into<PathBuf>) -> Result<Self> {
        let base_dir = base_dir.into();
        fs::create_dir_all(&base_dir).map_err(|e| DocumentPortalError::io(&base_dir, e))?;
        let sessions_dir = base_dir
            .parent()
            .map(|parent| parent.join(ANALYSIS_DIR))
            .unwrap_or_else(|| PathBuf::from(ANALYSIS_DIR));
        Ok(DocumentIngestion {
            base_dir,
            sessions_dir,
        })
    }

    /// Uses `<data_root>/document_compare` as the workspace.
    pub fn from_env(env: &EnvSettings) -> Result<Self> {
        Self::new(env.data_root().join(COMPARE_DIR))
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn sessions_dir(&self) -> &Path {
        &self.sessions_dir
    }

    pub fn clear_workspace(&self) -> Result<usize> {
        clear_directory(&self.base_dir).map_err(|e| {
            error!("Error deleting existing files: {}", e);
            e
        })
    }

    /// Replaces the workspace contents with `reference` and `actual`.
    pub fn save_pair(
        &self,
        reference: &dyn UploadedFile,
        actual: &dyn UploadedFile,
    ) -> Result<(PathBuf, PathBuf)> {
        // Uploads may live inside the workspace, so take their bytes before clearing it.
        let reference_bytes = reference.bytes();
        let actual_bytes = actual.bytes();

        self.clear_workspace()?;
        info!("Existing files are deleted");

        let (reference_name, actual_name) =
            match (validate_pdf_name(reference.name()), validate_pdf_name(actual.name())) {
                (Ok(r), Ok(a)) => (r, a),
                (Err(e), _) | (_, Err(e)) => {
                    error!("Error saving PDF files: {}", e);
                    return Err(e);
                }
            };
        if reference_name == actual_name {
            return Err(DocumentPortalError::Validation(format!(
                "Reference and actual files share the name {}",
                reference_name
            )));
        }

        let reference_path = self.base_dir.join(&reference_name);
        let actual_path = self.base_dir.join(&actual_name);
        for (path, bytes) in [(&reference_path, reference_bytes), (&actual_path, actual_bytes)] {
            bytes
                .and_then(|bytes| write_bytes(path, &bytes))
                .map_err(|e| {
                    error!("Error saving PDF files: {}", e);
                    e
                })?;
        }

        info!(
            "Files saved: reference={}, actual={}",
            reference_path.display(),
            actual_path.display()
        );
        Ok((reference_path, actual_path))
    }

    /// Reads a PDF, rejecting encrypted files and skipping blank pages.
    pub fn read(&self, pdf_path: &Path) -> Result<String> {
        let pages = extract_pages(pdf_path, true).map_err(|e| {
            error!("Error reading PDF: {}", e);
            e
        })?;
        let text = render_non_blank_pages(&pages);
        let non_blank = pages.iter().filter(|p| !p.text.trim().is_empty()).count();
        info!("PDF read successfully: file={}, pages={}", pdf_path.display(), non_blank);
        Ok(text)
    }

    /// Every PDF in the workspace, in filename order, as `Document: <name>` blocks.
    pub fn combine(&self) -> Result<String> {
        let mut parts = Vec::new();
        for path in collect_pdf_files(&self.base_dir)? {
            let content = self.read(&path)?;
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            parts.push(format!("Document: {}\n{}", name, content));
        }
        info!(
            "Documents combined: count={}, directory={}",
            parts.len(),
            self.base_dir.display()
        );
        Ok(parts.join("\n\n"))
    }

    /// Keeps the `keep_latest` newest analysis sessions and removes the rest.
    pub fn clean_old_sessions(&self, keep_latest: usize) -> Result<Vec<PathBuf>> {
        super::clean_old_sessions(&self.sessions_dir, keep_latest)
    }
}
