use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Could not identify quality for: {files:?}")]
    UnresolvedQuality { files: Vec<PathBuf> },

    #[error("Could not refresh library entry '{identifier}': {reason}")]
    MetadataRefresh { identifier: String, reason: String },

    #[error("No disc structure marker found in: {file:?}")]
    StructureMarkerNotFound { file: PathBuf },

    #[error("Failed to move file {from:?} to {to:?}: {reason}")]
    MoveFailed {
        from: PathBuf,
        to: PathBuf,
        reason: String,
    },

    #[error("Failed to mark movie '{movie}' as {status}: {reason}")]
    StatusUpdate {
        movie: String,
        status: String,
        reason: String,
    },

    #[error("Invalid release group: {0}")]
    InvalidGroup(String),
}

pub type Result<T> = std::result::Result<T, AppError>;
