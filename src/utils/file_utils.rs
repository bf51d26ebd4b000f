use crate::error::{DocumentPortalError, Result};
use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Last path component of an uploaded name, treating both `/` and `\` as separators.
pub fn bare_filename(name: &str) -> &str {
    name.rsplit(|c: char| c == '/' || c == '\\')
        .next()
        .unwrap_or(name)
}

pub fn has_pdf_extension(name: &str) -> bool {
    name.to_lowercase().ends_with(".pdf")
}

/// Returns the bare filename if it names a PDF.
pub fn validate_pdf_name(name: &str) -> Result<String> {
    let filename = bare_filename(name);
    if filename.is_empty() {
        return Err(DocumentPortalError::Validation(format!(
            "Uploaded file has no name: {:?}",
            name
        )));
    }
    if !has_pdf_extension(filename) {
        return Err(DocumentPortalError::Validation(format!(
            "Invalid file type. Only PDFs are allowed: {}",
            filename
        )));
    }
    Ok(filename.to_string())
}

/// Entries directly inside `dir`, without descending.
pub fn direct_children(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut children = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(dir).to_path_buf();
            let source = e
                .into_io_error()
                .unwrap_or_else(|| std::io::Error::new(std::io::ErrorKind::Other, "walk failed"));
            DocumentPortalError::io(path, source)
        })?;
        children.push(entry.into_path());
    }
    Ok(children)
}

pub fn remove_entry(path: &Path) -> Result<()> {
    let result = if path.is_dir() && !path.is_symlink() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    };
    result.map_err(|e| DocumentPortalError::io(path, e))?;
    info!("File deleted: path={}", path.display());
    Ok(())
}

/// Deletes every entry directly inside `dir` and returns how many went.
pub fn clear_directory(dir: &Path) -> Result<usize> {
    if !dir.is_dir() {
        debug!("Nothing to clear, not a directory: {}", dir.display());
        return Ok(0);
    }
    let children = direct_children(dir)?;
    for child in &children {
        remove_entry(child)?;
    }
    info!("Directory cleaned: directory={}, removed={}", dir.display(), children.len());
    Ok(children.len())
}

/// PDF files directly inside `dir`, sorted by filename.
pub fn collect_pdf_files(dir: &Path) -> Result<Vec<PathBuf>> {
    Ok(direct_children(dir)?
        .into_iter()
        .filter(|path| {
            path.is_file()
                && path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .map_or(false, has_pdf_extension)
        })
        .collect())
}

pub fn write_bytes(path: &Path, bytes: &[u8]) -> Result<()> {
    fs::write(path, bytes).map_err(|e| DocumentPortalError::io(path, e))
}
