use serde::Deserialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to parse YAML: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Template '{field}' must not be empty")]
    EmptyTemplate { field: &'static str },

    #[error("Source and destination folders must differ: {path}")]
    SameSourceDestination { path: PathBuf },

    #[error("run_every_minutes must be at least 1")]
    ZeroInterval,
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Everything one organizing run needs, supplied per invocation.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct OrganizerConfig {
    /// Folder the scanner watches for finished downloads.
    pub source: PathBuf,
    /// Library root the renamed releases move into.
    pub destination: PathBuf,
    pub folder_name: String,
    pub file_name: String,
    pub trailer_name: String,
    pub nfo_name: String,
    pub backdrop_name: String,
    /// Replaces spaces in rendered names when set.
    #[serde(default)]
    pub separator: Option<String>,
    #[serde(default)]
    pub rename_nfo: bool,
    pub run_every_minutes: u64,
    /// Scanner handoff file; defaults to `<source>/groups.json`.
    #[serde(default)]
    pub intake_manifest: Option<PathBuf>,
    /// Metadata snapshot file; defaults to `<source>/library.json`.
    #[serde(default)]
    pub library_snapshot: Option<PathBuf>,
}

impl OrganizerConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        for (field, template) in [
            ("folder_name", &self.folder_name),
            ("file_name", &self.file_name),
            ("trailer_name", &self.trailer_name),
            ("nfo_name", &self.nfo_name),
            ("backdrop_name", &self.backdrop_name),
        ] {
            if template.trim().is_empty() {
                return Err(ConfigError::EmptyTemplate { field });
            }
        }

        if self.source == self.destination {
            return Err(ConfigError::SameSourceDestination {
                path: self.source.clone(),
            });
        }

        if self.run_every_minutes == 0 {
            return Err(ConfigError::ZeroInterval);
        }

        Ok(())
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.intake_manifest
            .clone()
            .unwrap_or_else(|| self.source.join("groups.json"))
    }

    pub fn snapshot_path(&self) -> PathBuf {
        self.library_snapshot
            .clone()
            .unwrap_or_else(|| self.source.join("library.json"))
    }
}
