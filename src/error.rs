use std::path::PathBuf;
use thiserror::Error;
#[derive(Debug, Error)]
pub enum CortxtError {
    #[error("Directory not found: {0}")]
    RootNotFound(PathBuf),
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid manifest {path}: {reason}")]
    Manifest { path: PathBuf, reason: String },
    #[error("Not a file: {0}")]
    NotAFile(PathBuf),
    #[error("No files were successfully processed")]
    NothingExtracted,
}
impl CortxtError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CortxtError::Io {
            path: path.into(),
            source,
        }
    }
}
