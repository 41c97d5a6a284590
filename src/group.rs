use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// What a scanned file is believed to be.
///
/// Declaration order is the planning order: movie files first, so the
/// rendered movie name is available to the meta templates.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum FileCategory {
    Movie,
    Trailer,
    Subtitle,
    SubtitleExtra,
    Nfo,
    Backdrop,
}

/// Metadata the scanner detected for a release group. Every field is
/// optional; the organizer fills the gaps it can.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DetectedMeta {
    #[serde(default)]
    pub quality: Option<String>,
    #[serde(default)]
    pub quality_type: Option<String>,
    #[serde(default)]
    pub video: Option<String>,
    #[serde(default)]
    pub audio: Option<String>,
    #[serde(default)]
    pub group: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub resolution_width: Option<u32>,
    #[serde(default)]
    pub resolution_height: Option<u32>,
}

/// A batch of files believed to constitute one download of one movie,
/// as handed over by the scanner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReleaseGroup {
    /// Name of the directory the release was downloaded into, if any.
    #[serde(default)]
    pub dirname: Option<String>,
    /// Full path of that directory.
    #[serde(default)]
    pub parent_dir: Option<PathBuf>,
    /// Disc layout (VIDEO_TS/BDMV style) rather than loose files.
    #[serde(default)]
    pub is_disc: bool,
    pub files: BTreeMap<FileCategory, Vec<PathBuf>>,
    /// Identifier of the linked library entry, when a match was found.
    #[serde(default)]
    pub library: Option<String>,
    #[serde(default)]
    pub meta: DetectedMeta,
}

impl ReleaseGroup {
    pub fn new(
        dirname: Option<String>,
        parent_dir: Option<PathBuf>,
        is_disc: bool,
        files: BTreeMap<FileCategory, Vec<PathBuf>>,
        library: Option<String>,
        meta: DetectedMeta,
    ) -> Result<Self> {
        let group = Self {
            dirname,
            parent_dir,
            is_disc,
            files,
            library,
            meta,
        };
        group.validate()?;
        Ok(group)
    }

    pub fn validate(&self) -> Result<()> {
        if self.parent_dir.is_some() != self.dirname.is_some() {
            return Err(AppError::InvalidGroup(
                "parent_dir and dirname must be set together".to_string(),
            ));
        }
        if let (Some(parent), Some(dirname)) = (&self.parent_dir, &self.dirname)
            && parent.file_name().is_none_or(|name| name.to_string_lossy() != *dirname)
        {
            return Err(AppError::InvalidGroup(format!(
                "parent_dir {} does not end in dirname '{dirname}'",
                parent.display()
            )));
        }
        if self.all_files().next().is_none() {
            return Err(AppError::InvalidGroup("group contains no files".to_string()));
        }
        Ok(())
    }

    pub fn files_in(&self, category: FileCategory) -> &[PathBuf] {
        self.files.get(&category).map_or(&[], Vec::as_slice)
    }

    pub fn movie_files(&self) -> &[PathBuf] {
        self.files_in(FileCategory::Movie)
    }

    pub fn all_files(&self) -> impl Iterator<Item = &PathBuf> {
        self.files.values().flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie_files(paths: &[&str]) -> BTreeMap<FileCategory, Vec<PathBuf>> {
        let mut files = BTreeMap::new();
        files.insert(
            FileCategory::Movie,
            paths.iter().map(PathBuf::from).collect(),
        );
        files
    }

    #[test]
    fn test_new_valid_group() {
        let group = ReleaseGroup::new(
            Some("Movie.2010.720p".to_string()),
            Some(PathBuf::from("/downloads/Movie.2010.720p")),
            false,
            movie_files(&["/downloads/Movie.2010.720p/movie.mkv"]),
            Some("tt0001".to_string()),
            DetectedMeta::default(),
        )
        .unwrap();

        assert_eq!(group.movie_files().len(), 1);
        assert!(!group.is_disc);
    }

    #[test]
    fn test_dirname_without_parent_rejected() {
        let result = ReleaseGroup::new(
            Some("Movie".to_string()),
            None,
            false,
            movie_files(&["/downloads/movie.mkv"]),
            None,
            DetectedMeta::default(),
        );
        assert!(matches!(result, Err(AppError::InvalidGroup(_))));
    }

    #[test]
    fn test_parent_must_end_in_dirname() {
        let result = ReleaseGroup::new(
            Some("Movie".to_string()),
            Some(PathBuf::from("/downloads/Other")),
            false,
            movie_files(&["/downloads/Other/movie.mkv"]),
            None,
            DetectedMeta::default(),
        );
        assert!(matches!(result, Err(AppError::InvalidGroup(_))));
    }

    #[test]
    fn test_empty_group_rejected() {
        let result = ReleaseGroup::new(
            None,
            None,
            false,
            BTreeMap::new(),
            None,
            DetectedMeta::default(),
        );
        assert!(matches!(result, Err(AppError::InvalidGroup(_))));
    }

    #[test]
    fn test_files_in_missing_category_is_empty() {
        let group = ReleaseGroup::new(
            None,
            None,
            false,
            movie_files(&["/downloads/movie.mkv"]),
            None,
            DetectedMeta::default(),
        )
        .unwrap();

        assert!(group.files_in(FileCategory::Subtitle).is_empty());
    }

    #[test]
    fn test_deserialize_scanner_handoff() {
        let json = r#"{
            "dirname": "Movie.2010.720p.BluRay",
            "parent_dir": "/downloads/Movie.2010.720p.BluRay",
            "is_disc": false,
            "files": {
                "movie": ["/downloads/Movie.2010.720p.BluRay/movie.mkv"],
                "subtitle": ["/downloads/Movie.2010.720p.BluRay/movie.srt"]
            },
            "library": "tt0001",
            "meta": {
                "quality": "720p",
                "group": "GROUP"
            }
        }"#;

        let group: ReleaseGroup = serde_json::from_str(json).unwrap();
        group.validate().unwrap();
        assert_eq!(group.library.as_deref(), Some("tt0001"));
        assert_eq!(group.meta.quality.as_deref(), Some("720p"));
        assert_eq!(group.files_in(FileCategory::Subtitle).len(), 1);
    }

    #[test]
    fn test_category_planning_order() {
        // Movie files must come first so their rendered name can feed the
        // trailer/nfo/backdrop templates.
        assert!(FileCategory::Movie < FileCategory::Trailer);
        assert!(FileCategory::Trailer < FileCategory::Subtitle);
        assert!(FileCategory::Subtitle < FileCategory::SubtitleExtra);
    }
}
