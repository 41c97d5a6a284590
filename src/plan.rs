use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Prefix for releases no library entry could be matched to.
pub const UNKNOWN_PREFIX: &str = "_UNKNOWN_";
/// Prefix for releases superseded by a better finished release.
pub const EXISTS_PREFIX: &str = "_EXISTS_";

/// Rename a path to a sibling whose file name carries the given prefix.
pub fn prefixed_sibling(path: &Path, prefix: &str) -> PathBuf {
    match path.file_name() {
        Some(name) => path.with_file_name(format!("{prefix}{}", name.to_string_lossy())),
        None => path.to_path_buf(),
    }
}

/// The source-to-destination mapping computed for one release group.
///
/// A `None` destination means "suppress this move". Once a source has been
/// suppressed it stays suppressed for the rest of the pass; `insert`
/// refuses to bring it back.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MovePlan {
    entries: BTreeMap<PathBuf, Option<PathBuf>>,
}

impl MovePlan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, source: PathBuf, destination: PathBuf) {
        if let Some(None) = self.entries.get(&source) {
            tracing::warn!(
                "refusing to reinstate suppressed move for {}",
                source.display()
            );
            return;
        }
        self.entries.insert(source, Some(destination));
    }

    /// Null every destination in the plan.
    pub fn suppress_all(&mut self) {
        for destination in self.entries.values_mut() {
            *destination = None;
        }
    }

    /// Folder-level suppression: null every pending move, then rename the
    /// group directory out of the scanner's sight under a new key.
    pub fn suppress_into_folder_marker(&mut self, parent_dir: &Path, dirname: &str, prefix: &str) {
        self.suppress_all();
        let marker = parent_dir.with_file_name(format!("{prefix}{dirname}"));
        self.entries.insert(parent_dir.to_path_buf(), Some(marker));
    }

    /// Per-file suppression for groups without a parent directory: each
    /// pending destination is rewritten to a prefixed sibling of its
    /// source. Entries that were already suppressed stay null.
    pub fn suppress_into_file_markers(&mut self, prefix: &str) {
        for (source, destination) in &mut self.entries {
            if destination.is_some() {
                *destination = Some(prefixed_sibling(source, prefix));
            }
        }
    }

    pub fn get(&self, source: &Path) -> Option<Option<&Path>> {
        self.entries.get(source).map(|d| d.as_deref())
    }

    /// All entries in deterministic (path) order.
    pub fn entries(&self) -> impl Iterator<Item = (&Path, Option<&Path>)> {
        self.entries
            .iter()
            .map(|(source, destination)| (source.as_path(), destination.as_deref()))
    }

    /// Only the moves that will actually run.
    pub fn moves(&self) -> impl Iterator<Item = (&Path, &Path)> {
        self.entries.iter().filter_map(|(source, destination)| {
            destination
                .as_deref()
                .map(|destination| (source.as_path(), destination))
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn suppressed_count(&self) -> usize {
        self.entries.values().filter(|d| d.is_none()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_lookup() {
        let mut plan = MovePlan::new();
        plan.insert(PathBuf::from("/src/a.mkv"), PathBuf::from("/dst/a.mkv"));

        assert_eq!(plan.len(), 1);
        assert_eq!(
            plan.get(Path::new("/src/a.mkv")),
            Some(Some(Path::new("/dst/a.mkv")))
        );
    }

    #[test]
    fn test_insert_overwrites_pending_destination() {
        let mut plan = MovePlan::new();
        plan.insert(PathBuf::from("/src/a.mkv"), PathBuf::from("/dst/a.mkv"));
        plan.insert(PathBuf::from("/src/a.mkv"), PathBuf::from("/dst/b.mkv"));

        assert_eq!(plan.len(), 1);
        assert_eq!(
            plan.get(Path::new("/src/a.mkv")),
            Some(Some(Path::new("/dst/b.mkv")))
        );
    }

    #[test]
    fn test_suppressed_source_cannot_be_reinstated() {
        let mut plan = MovePlan::new();
        plan.insert(PathBuf::from("/src/a.mkv"), PathBuf::from("/dst/a.mkv"));
        plan.suppress_all();
        plan.insert(PathBuf::from("/src/a.mkv"), PathBuf::from("/dst/c.mkv"));

        assert_eq!(plan.get(Path::new("/src/a.mkv")), Some(None));
        assert_eq!(plan.suppressed_count(), 1);
    }

    #[test]
    fn test_insert_new_key_after_suppress_all_is_allowed() {
        let mut plan = MovePlan::new();
        plan.insert(PathBuf::from("/src/a.mkv"), PathBuf::from("/dst/a.mkv"));
        plan.suppress_all();
        plan.insert(PathBuf::from("/downloads/group"), PathBuf::from("/downloads/_EXISTS_group"));

        assert_eq!(plan.len(), 2);
        assert_eq!(plan.moves().count(), 1);
    }

    #[test]
    fn test_folder_marker_suppression() {
        let mut plan = MovePlan::new();
        plan.insert(PathBuf::from("/dl/g/a.mkv"), PathBuf::from("/lib/a.mkv"));
        plan.insert(PathBuf::from("/dl/g/a.srt"), PathBuf::from("/lib/a.srt"));

        plan.suppress_into_folder_marker(Path::new("/dl/g"), "g", EXISTS_PREFIX);

        assert_eq!(plan.get(Path::new("/dl/g/a.mkv")), Some(None));
        assert_eq!(plan.get(Path::new("/dl/g/a.srt")), Some(None));
        assert_eq!(
            plan.get(Path::new("/dl/g")),
            Some(Some(Path::new("/dl/_EXISTS_g")))
        );
        assert_eq!(plan.moves().count(), 1);
    }

    #[test]
    fn test_file_marker_suppression() {
        let mut plan = MovePlan::new();
        plan.insert(PathBuf::from("/dl/a.mkv"), PathBuf::from("/lib/a.mkv"));
        plan.insert(PathBuf::from("/dl/b.srt"), PathBuf::from("/lib/b.srt"));

        plan.suppress_into_file_markers(EXISTS_PREFIX);

        assert_eq!(
            plan.get(Path::new("/dl/a.mkv")),
            Some(Some(Path::new("/dl/_EXISTS_a.mkv")))
        );
        assert_eq!(
            plan.get(Path::new("/dl/b.srt")),
            Some(Some(Path::new("/dl/_EXISTS_b.srt")))
        );
    }

    #[test]
    fn test_file_marker_suppression_keeps_existing_nulls() {
        let mut plan = MovePlan::new();
        plan.insert(PathBuf::from("/dl/a.mkv"), PathBuf::from("/lib/a.mkv"));
        plan.suppress_all();
        plan.insert(PathBuf::from("/dl/b.srt"), PathBuf::from("/lib/b.srt"));

        plan.suppress_into_file_markers(EXISTS_PREFIX);

        assert_eq!(plan.get(Path::new("/dl/a.mkv")), Some(None));
        assert_eq!(
            plan.get(Path::new("/dl/b.srt")),
            Some(Some(Path::new("/dl/_EXISTS_b.srt")))
        );
    }

    #[test]
    fn test_prefixed_sibling() {
        assert_eq!(
            prefixed_sibling(Path::new("/dl/movie.mkv"), UNKNOWN_PREFIX),
            PathBuf::from("/dl/_UNKNOWN_movie.mkv")
        );
        assert_eq!(
            prefixed_sibling(Path::new("/dl/group"), EXISTS_PREFIX),
            PathBuf::from("/dl/_EXISTS_group")
        );
    }
}
