use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DocumentPortalError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("IO error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Upstream error: {0}")]
    Upstream(String),
}

pub type Result<T> = std::result::Result<T, DocumentPortalError>;

impl DocumentPortalError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DocumentPortalError::Io {
            path: path.into(),
            source,
        }
    }

    /// Wraps a PDF parser failure as an I/O error against `path`.
    pub fn pdf(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        DocumentPortalError::Io {
            path: path.into(),
            source: std::io::Error::new(std::io::ErrorKind::InvalidData, message.into()),
        }
    }
}

impl From<serde_json::Error> for DocumentPortalError {
    fn from(err: serde_json::Error) -> Self {
        DocumentPortalError::Upstream(format!("invalid JSON: {}", err))
    }
}

impl From<serde_yaml::Error> for DocumentPortalError {
    fn from(err: serde_yaml::Error) -> Self {
        DocumentPortalError::Config(format!("invalid YAML: {}", err))
    }
}

impl From<reqwest::Error> for DocumentPortalError {
    fn from(err: reqwest::Error) -> Self {
        DocumentPortalError::Upstream(err.to_string())
    }
}
