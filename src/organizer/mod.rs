mod bindings;
mod conflicts;

pub use conflicts::RemovalIntent;

use crate::config::OrganizerConfig;
use crate::error::AppError;
use crate::group::{FileCategory, ReleaseGroup};
use crate::notify::NotificationBus;
use crate::plan::{MovePlan, UNKNOWN_PREFIX, prefixed_sibling};
use crate::quality::{CandidateFile, QualityMatcher, QualityTier, ResolutionHint};
use crate::store::MetadataStore;
use crate::template;
use crate::template::Bindings;
use std::path::{Component, Path, PathBuf};

/// Terminal state of one processed group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupState {
    /// No library entry linked; files were marked unknown.
    Unmatched,
    /// Plan built normally.
    Renamed,
    /// Suppressed because a better finished release already exists.
    Superseded,
    /// Nothing planned: refresh failed or quality stayed unresolved.
    Skipped,
}

/// Everything `process` decided for one group. Executing the plan and
/// committing the status transitions is the runner's job.
#[derive(Debug)]
pub struct GroupOutcome {
    pub state: GroupState,
    pub plan: MovePlan,
    pub removals: Vec<RemovalIntent>,
    pub finished_movies: Vec<String>,
    pub destination_root: Option<PathBuf>,
    pub title: Option<String>,
    pub quality_label: Option<String>,
}

impl GroupOutcome {
    fn terminal(state: GroupState, plan: MovePlan) -> Self {
        Self {
            state,
            plan,
            removals: Vec::new(),
            finished_movies: Vec::new(),
            destination_root: None,
            title: None,
            quality_label: None,
        }
    }
}

/// Top-level directories that anchor a disc layout.
const STRUCTURE_MARKERS: &[&str] = &["video_ts", "audio_ts", "bdmv", "certificate"];

/// Turns a classified release group into a concrete move plan, resolving
/// conflicts against what the library already owns.
pub struct ReleaseOrganizer<'a> {
    matcher: &'a QualityMatcher,
    store: &'a dyn MetadataStore,
    bus: &'a dyn NotificationBus,
}

impl<'a> ReleaseOrganizer<'a> {
    pub fn new(
        matcher: &'a QualityMatcher,
        store: &'a dyn MetadataStore,
        bus: &'a dyn NotificationBus,
    ) -> Self {
        Self {
            matcher,
            store,
            bus,
        }
    }

    pub fn process(&self, group: &ReleaseGroup, config: &OrganizerConfig) -> GroupOutcome {
        let mut plan = MovePlan::new();

        let Some(library_id) = &group.library else {
            tracing::warn!("No library entry linked; marking group files as unknown");
            Self::mark_unknown(&mut plan, group);
            return GroupOutcome::terminal(GroupState::Unmatched, plan);
        };

        let library = match self.store.refresh_library(library_id) {
            Ok(library) => library,
            Err(e) => {
                tracing::error!("Could not rename, no library item to work with: {e}");
                return GroupOutcome::terminal(GroupState::Skipped, plan);
            }
        };

        let Some(tier) = self.resolve_quality(group) else {
            tracing::warn!(
                "{}",
                AppError::UnresolvedQuality {
                    files: group.movie_files().to_vec(),
                }
            );
            return GroupOutcome::terminal(GroupState::Skipped, plan);
        };

        let separator = config.separator.as_deref();
        let mut bindings = bindings::base_bindings(group, &library, tier);
        let title = bindings.get("thename").unwrap_or_default().to_string();

        let mut destination_root = None;
        let multiple = group.movie_files().len() > 1 && !group.is_disc;

        for (&category, files) in &group.files {
            if category == FileCategory::Nfo && !config.rename_nfo {
                tracing::debug!("Skipping, renaming of nfo disabled");
                continue;
            }
            // Companions are planned next to their subtitle below.
            if category == FileCategory::SubtitleExtra {
                continue;
            }

            let mut part: u32 = u32::from(multiple);
            let mut sorted = files.clone();
            sorted.sort();

            for file in &sorted {
                bindings.set(
                    "original",
                    file.file_name().map(|n| n.to_string_lossy().into_owned()),
                );
                bindings.set(
                    "original_folder",
                    file.parent()
                        .and_then(Path::file_name)
                        .map(|n| n.to_string_lossy().into_owned()),
                );
                bindings.set("ext", extension_of(file));
                if multiple {
                    bindings.set("cd", Some(format!(" cd{part}")));
                    bindings.set("cd_nr", Some(part.to_string()));
                } else {
                    bindings.set("cd", None::<String>);
                    bindings.set("cd_nr", None::<String>);
                }

                let folder_name = template::render(&config.folder_name, &bindings, separator);
                let mut file_name = template::render(&config.file_name, &bindings, separator);
                bindings.set("filename", Some(stem_of(&file_name)));

                file_name = match category {
                    FileCategory::Trailer => {
                        template::render(&config.trailer_name, &bindings, separator)
                    }
                    FileCategory::Nfo => template::render(&config.nfo_name, &bindings, separator),
                    FileCategory::Backdrop => {
                        template::render(&config.backdrop_name, &bindings, separator)
                    }
                    _ => file_name,
                };

                let folder = config.destination.join(&folder_name);

                if group.is_disc && category == FileCategory::Movie {
                    // Keep the disc layout intact from the marker down.
                    match disc_structure_path(file) {
                        Some(structure) => plan.insert(file.clone(), folder.join(structure)),
                        None => {
                            tracing::error!(
                                "{}",
                                AppError::StructureMarkerNotFound { file: file.clone() }
                            );
                        }
                    }
                } else {
                    plan.insert(file.clone(), folder.join(&file_name));
                }

                if category == FileCategory::Subtitle {
                    Self::plan_subtitle_extras(
                        &mut plan,
                        group,
                        file,
                        &mut bindings,
                        config,
                        separator,
                    );
                }

                if category == FileCategory::Movie {
                    destination_root = Some(folder);
                }

                if multiple {
                    part += 1;
                }
            }
        }

        let resolution = conflicts::resolve(&mut plan, group, &library, tier, self.bus);
        if resolution.superseded {
            let mut outcome = GroupOutcome::terminal(GroupState::Superseded, plan);
            outcome.removals = resolution.removals;
            outcome.destination_root = destination_root;
            outcome.title = Some(title);
            outcome.quality_label = Some(tier.label.to_string());
            return outcome;
        }

        let finished = conflicts::finished_movies(&library, tier, self.matcher.catalog());

        GroupOutcome {
            state: GroupState::Renamed,
            plan,
            removals: resolution.removals,
            finished_movies: finished,
            destination_root,
            title: Some(title),
            quality_label: Some(tier.label.to_string()),
        }
    }

    fn mark_unknown(plan: &mut MovePlan, group: &ReleaseGroup) {
        match (&group.parent_dir, &group.dirname) {
            (Some(parent), Some(dirname)) => {
                let marker = parent.with_file_name(format!("{UNKNOWN_PREFIX}{dirname}"));
                plan.insert(parent.clone(), marker);
            }
            _ => {
                for file in group.all_files() {
                    plan.insert(file.clone(), prefixed_sibling(file, UNKNOWN_PREFIX));
                }
            }
        }
    }

    fn resolve_quality(&self, group: &ReleaseGroup) -> Option<&'a QualityTier> {
        if let Some(identifier) = &group.meta.quality
            && let Some(tier) = self.matcher.catalog().by_identifier(identifier)
        {
            return Some(tier);
        }

        let candidates: Vec<CandidateFile> = group
            .movie_files()
            .iter()
            .map(|path| CandidateFile::from_path(path.clone()))
            .collect();
        let hint = match (group.meta.resolution_width, group.meta.resolution_height) {
            (Some(width), Some(height)) => Some(ResolutionHint { width, height }),
            _ => None,
        };

        self.matcher.guess(&candidates, hint)
    }

    fn plan_subtitle_extras(
        plan: &mut MovePlan,
        group: &ReleaseGroup,
        subtitle: &Path,
        bindings: &mut Bindings,
        config: &OrganizerConfig,
        separator: Option<&str>,
    ) {
        let prefix = format!("{}.", subtitle.with_extension("").to_string_lossy());

        for extra in group.files_in(FileCategory::SubtitleExtra) {
            if !extra.to_string_lossy().starts_with(&prefix) {
                continue;
            }

            bindings.set("ext", extension_of(extra));
            let folder_name = template::render(&config.folder_name, bindings, separator);
            let file_name = template::render(&config.file_name, bindings, separator);
            plan.insert(
                extra.clone(),
                config.destination.join(folder_name).join(file_name),
            );
        }
    }
}

fn extension_of(path: &Path) -> Option<String> {
    path.extension().map(|ext| ext.to_string_lossy().into_owned())
}

fn stem_of(file_name: &str) -> String {
    Path::new(file_name)
        .file_stem()
        .map_or_else(|| file_name.to_string(), |s| s.to_string_lossy().into_owned())
}

/// Locate a disc marker component and return the path from it onward.
/// Matching is case-insensitive and per component, so it behaves the same
/// for either path separator.
fn disc_structure_path(file: &Path) -> Option<PathBuf> {
    let components: Vec<Component<'_>> = file.components().collect();
    let start = components.iter().position(|component| match component {
        Component::Normal(name) => {
            let lowered = name.to_string_lossy().to_lowercase();
            STRUCTURE_MARKERS.contains(&lowered.as_str())
        }
        _ => false,
    })?;
    Some(components[start..].iter().collect())
}
