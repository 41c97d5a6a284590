use super::{QualityCatalog, QualityTier};
use lazy_regex::regex;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// A file under consideration for quality detection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateFile {
    pub path: PathBuf,
    pub size_mb: u64,
}

impl CandidateFile {
    pub fn new(path: impl Into<PathBuf>, size_mb: u64) -> Self {
        Self {
            path: path.into(),
            size_mb,
        }
    }

    /// Build a candidate from a path on disk. A file that cannot be stat'ed
    /// keeps size 0, which disables the size window rule for it.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let size_mb = fs::metadata(&path).map_or(0, |m| m.len() / 1024 / 1024);
        Self { path, size_mb }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolutionHint {
    pub width: u32,
    pub height: u32,
}

/// Width assumed for tiers that carry no expected width of their own.
const DEFAULT_WIDTH: u32 = 480;

struct TokenizedFile {
    words: HashSet<String>,
    size_mb: u64,
}

fn tokenize(path: &Path) -> HashSet<String> {
    let lowered = path.to_string_lossy().to_lowercase();
    regex!(r"\W+")
        .split(&lowered)
        .filter(|word| !word.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

/// Guesses the quality tier of a release from weak signals: filename
/// tokens first, file size and resolution only as a loose fallback.
#[derive(Debug, Clone)]
pub struct QualityMatcher {
    catalog: QualityCatalog,
}

impl QualityMatcher {
    pub fn new(catalog: QualityCatalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &QualityCatalog {
        &self.catalog
    }

    /// Find the quality tier for a set of release files.
    ///
    /// Signals are tried in strict precedence: exact identifier token,
    /// alternate identifier, tag keyword; within each rule, tiers are
    /// tried in canonical order so the better tier wins a tie. Only when
    /// the strict pass finds nothing does a single loose pass add the
    /// extension+size window and the resolution width. The loose pass is
    /// never re-entered.
    pub fn guess(
        &self,
        files: &[CandidateFile],
        hint: Option<ResolutionHint>,
    ) -> Option<&QualityTier> {
        let tokenized: Vec<TokenizedFile> = files
            .iter()
            .map(|file| TokenizedFile {
                words: tokenize(&file.path),
                size_mb: file.size_mb,
            })
            .collect();

        self.pass(&tokenized, hint, false)
            .or_else(|| self.pass(&tokenized, hint, true))
    }

    fn pass(
        &self,
        files: &[TokenizedFile],
        hint: Option<ResolutionHint>,
        loose: bool,
    ) -> Option<&QualityTier> {
        for tier in self.catalog.iter() {
            for file in files {
                if file.words.contains(tier.identifier) {
                    tracing::debug!("found {} via identifier token", tier.identifier);
                    return Some(tier);
                }
            }
        }

        for tier in self.catalog.iter() {
            for file in files {
                if tier.alternatives.iter().any(|alt| file.words.contains(*alt)) {
                    tracing::debug!(
                        "found {} via alternate identifier {:?}",
                        tier.identifier,
                        tier.alternatives
                    );
                    return Some(tier);
                }
            }
        }

        for tier in self.catalog.iter() {
            for file in files {
                if tier.tags.iter().any(|tag| file.words.contains(*tag)) {
                    tracing::debug!("found {} via tag {:?}", tier.identifier, tier.tags);
                    return Some(tier);
                }
            }
        }

        if !loose {
            return None;
        }

        for tier in self.catalog.iter() {
            for file in files {
                let extension_hit = tier.extensions.iter().any(|ext| file.words.contains(*ext));
                if extension_hit && file.size_mb >= tier.size_min && file.size_mb <= tier.size_max {
                    tracing::debug!(
                        "found {} via extension and size {}MB",
                        tier.identifier,
                        file.size_mb
                    );
                    return Some(tier);
                }
            }
        }

        if let Some(hint) = hint {
            for tier in self.catalog.iter() {
                if tier.width.unwrap_or(DEFAULT_WIDTH) == hint.width {
                    tracing::debug!(
                        "found {} via resolution width {}",
                        tier.identifier,
                        hint.width
                    );
                    return Some(tier);
                }
            }
        }

        None
    }
}
