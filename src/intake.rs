use crate::error::{AppError, Result};
use crate::group::ReleaseGroup;
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

/// Seam to the external scanner: something that yields the groups one run
/// should organize, keyed by group identifier.
pub trait ReleaseSource {
    fn groups(&self) -> Result<BTreeMap<String, ReleaseGroup>>;
}

/// Reads the scanner's JSON handoff file. An absent file means the scanner
/// has nothing for us, not an error.
pub struct ManifestSource {
    path: PathBuf,
}

impl ManifestSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ReleaseSource for ManifestSource {
    fn groups(&self) -> Result<BTreeMap<String, ReleaseGroup>> {
        if !self.path.exists() {
            tracing::debug!("No intake manifest at {}", self.path.display());
            return Ok(BTreeMap::new());
        }

        let contents = fs::read_to_string(&self.path)?;
        let groups: BTreeMap<String, ReleaseGroup> = serde_json::from_str(&contents)?;

        for (identifier, group) in &groups {
            group.validate().map_err(|e| {
                AppError::InvalidGroup(format!("group '{identifier}': {e}"))
            })?;
        }

        Ok(groups)
    }
}
