use crate::error::{DocumentPortalError, Result};
use crate::utils::file_utils::{direct_children, remove_entry};
use chrono::Utc;
use log::info;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

const SESSION_PREFIX: &str = "session_";

/// A directory that groups the files of one upload session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    id: String,
    path: PathBuf,
}

impl Session {
    /// `session_YYYYmmdd_HHMMSS_<8 hex>`, timestamp in UTC.
    pub fn generate_id() -> String {
        let suffix = Uuid::new_v4().simple().to_string();
        format!(
            "{}{}_{}",
            SESSION_PREFIX,
            Utc::now().format("%Y%m%d_%H%M%S"),
            &suffix[..8]
        )
    }

    /// Opens (creating if needed) the session directory under `base_dir`.
    pub fn open(base_dir: &Path, id: Option<String>) -> Result<Self> {
        let id = id.unwrap_or_else(Self::generate_id);
        if id.is_empty() || id.contains(['/', '\\']) || id == "." || id == ".." {
            return Err(DocumentPortalError::Validation(format!(
                "Invalid session id: {:?}",
                id
            )));
        }
        let path = base_dir.join(&id);
        fs::create_dir_all(&path).map_err(|e| DocumentPortalError::io(&path, e))?;
        Ok(Session { id, path })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl fmt::Display for Session {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

/// Keeps the `keep_latest` newest session directories under `base_dir` and
/// removes the rest. Session ids sort chronologically by name.
pub fn clean_old_sessions(base_dir: &Path, keep_latest: usize) -> Result<Vec<PathBuf>> {
    if !base_dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut sessions: Vec<PathBuf> = direct_children(base_dir)?
        .into_iter()
        .filter(|path| {
            path.is_dir()
                && path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .map_or(false, |n| n.starts_with(SESSION_PREFIX))
        })
        .collect();
    sessions.sort();
    sessions.reverse();

    let stale: Vec<PathBuf> = sessions.into_iter().skip(keep_latest).collect();
    for path in &stale {
        remove_entry(path)?;
    }
    info!(
        "Old sessions cleaned: base_dir={}, kept={}, removed={}",
        base_dir.display(),
        keep_latest,
        stale.len()
    );
    Ok(stale)
}
