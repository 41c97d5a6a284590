use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Lifecycle status shared by movies and releases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Wanted,
    Active,
    Snatched,
    Done,
    Deleted,
}

impl Status {
    pub fn from_identifier(identifier: &str) -> Option<Self> {
        match identifier {
            "wanted" => Some(Self::Wanted),
            "active" => Some(Self::Active),
            "snatched" => Some(Self::Snatched),
            "done" => Some(Self::Done),
            "deleted" => Some(Self::Deleted),
            _ => None,
        }
    }

    pub fn identifier(self) -> &'static str {
        match self {
            Self::Wanted => "wanted",
            Self::Active => "active",
            Self::Snatched => "snatched",
            Self::Done => "done",
            Self::Deleted => "deleted",
        }
    }
}

/// One acceptable tier in a movie's profile. `finish` marks the tier whose
/// arrival completes the movie.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileEntry {
    pub quality: String,
    #[serde(default)]
    pub finish: bool,
    #[serde(default)]
    pub wait_for_hours: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub entries: Vec<ProfileEntry>,
}

/// A release already owned for a movie, as the store reports it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExistingRelease {
    pub quality_order: u32,
    pub quality_label: String,
    pub status: Status,
    #[serde(default)]
    pub files: Vec<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieRecord {
    pub id: String,
    pub status: Status,
    #[serde(default)]
    pub profile: Profile,
    #[serde(default)]
    pub releases: Vec<ExistingRelease>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LibraryEntry {
    pub identifier: String,
    pub title: String,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub movies: Vec<MovieRecord>,
}

/// Seam to the external metadata store.
pub trait MetadataStore {
    /// Refresh and return the library entry for an identifier.
    fn refresh_library(&self, identifier: &str) -> Result<LibraryEntry>;

    /// Persist a movie status change.
    fn set_movie_status(&self, movie_id: &str, status: Status) -> Result<()>;
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct SnapshotFile {
    libraries: Vec<LibraryEntry>,
}

/// Store implementation backed by a JSON snapshot the real metadata store
/// exported. Status updates are persisted back to the snapshot file when
/// one is configured; in-memory snapshots serve the tests.
#[derive(Debug)]
pub struct SnapshotStore {
    path: Option<PathBuf>,
    libraries: Mutex<BTreeMap<String, LibraryEntry>>,
}

impl SnapshotStore {
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let snapshot: SnapshotFile = serde_json::from_str(&contents)?;
        Ok(Self {
            path: Some(path.to_path_buf()),
            libraries: Mutex::new(Self::index(snapshot.libraries)),
        })
    }

    pub fn in_memory(libraries: Vec<LibraryEntry>) -> Self {
        Self {
            path: None,
            libraries: Mutex::new(Self::index(libraries)),
        }
    }

    fn index(libraries: Vec<LibraryEntry>) -> BTreeMap<String, LibraryEntry> {
        libraries
            .into_iter()
            .map(|library| (library.identifier.clone(), library))
            .collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, LibraryEntry>> {
        match self.libraries.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn persist(&self, libraries: &BTreeMap<String, LibraryEntry>) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let snapshot = SnapshotFile {
            libraries: libraries.values().cloned().collect(),
        };
        let contents = serde_json::to_string_pretty(&snapshot)?;
        fs::write(path, contents)?;
        Ok(())
    }
}

impl MetadataStore for SnapshotStore {
    fn refresh_library(&self, identifier: &str) -> Result<LibraryEntry> {
        self.lock()
            .get(identifier)
            .cloned()
            .ok_or_else(|| AppError::MetadataRefresh {
                identifier: identifier.to_string(),
                reason: "not present in snapshot".to_string(),
            })
    }

    fn set_movie_status(&self, movie_id: &str, status: Status) -> Result<()> {
        let mut libraries = self.lock();
        let movie = libraries
            .values_mut()
            .flat_map(|library| library.movies.iter_mut())
            .find(|movie| movie.id == movie_id);

        match movie {
            Some(movie) => {
                movie.status = status;
                self.persist(&libraries)
            }
            None => Err(AppError::StatusUpdate {
                movie: movie_id.to_string(),
                status: status.identifier().to_string(),
                reason: "movie not present in snapshot".to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_library() -> LibraryEntry {
        LibraryEntry {
            identifier: "tt0001".to_string(),
            title: "Up".to_string(),
            year: Some(2009),
            movies: vec![MovieRecord {
                id: "movie-1".to_string(),
                status: Status::Active,
                profile: Profile {
                    label: "HD".to_string(),
                    entries: vec![ProfileEntry {
                        quality: "720p".to_string(),
                        finish: true,
                        wait_for_hours: 0,
                    }],
                },
                releases: vec![],
            }],
        }
    }

    #[test]
    fn test_status_identifier_round_trip() {
        for status in [
            Status::Wanted,
            Status::Active,
            Status::Snatched,
            Status::Done,
            Status::Deleted,
        ] {
            assert_eq!(Status::from_identifier(status.identifier()), Some(status));
        }
        assert_eq!(Status::from_identifier("unknown"), None);
    }

    #[test]
    fn test_refresh_known_library() {
        let store = SnapshotStore::in_memory(vec![sample_library()]);
        let entry = store.refresh_library("tt0001").unwrap();
        assert_eq!(entry.title, "Up");
        assert_eq!(entry.year, Some(2009));
    }

    #[test]
    fn test_refresh_unknown_library_fails() {
        let store = SnapshotStore::in_memory(vec![]);
        let result = store.refresh_library("tt9999");
        assert!(matches!(result, Err(AppError::MetadataRefresh { .. })));
    }

    #[test]
    fn test_set_movie_status() {
        let store = SnapshotStore::in_memory(vec![sample_library()]);
        store.set_movie_status("movie-1", Status::Done).unwrap();

        let entry = store.refresh_library("tt0001").unwrap();
        assert_eq!(entry.movies[0].status, Status::Done);
    }

    #[test]
    fn test_set_status_unknown_movie_fails() {
        let store = SnapshotStore::in_memory(vec![sample_library()]);
        let result = store.set_movie_status("missing", Status::Done);
        assert!(matches!(result, Err(AppError::StatusUpdate { .. })));
    }

    #[test]
    fn test_snapshot_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("library.json");
        let snapshot = SnapshotFile {
            libraries: vec![sample_library()],
        };
        fs::write(&path, serde_json::to_string(&snapshot).unwrap()).unwrap();

        let store = SnapshotStore::from_file(&path).unwrap();
        store.set_movie_status("movie-1", Status::Done).unwrap();

        // A fresh store reading the same file sees the committed change.
        let reread = SnapshotStore::from_file(&path).unwrap();
        let entry = reread.refresh_library("tt0001").unwrap();
        assert_eq!(entry.movies[0].status, Status::Done);
    }
}
