use crate::group::ReleaseGroup;
use crate::notify::{Notification, NotificationBus};
use crate::plan::{EXISTS_PREFIX, MovePlan};
use crate::quality::{QualityCatalog, QualityTier};
use crate::store::{LibraryEntry, Status};
use std::path::PathBuf;

/// A file an external collaborator should delete: it belongs to a release
/// of strictly worse quality than the one just organized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemovalIntent {
    pub path: PathBuf,
    pub quality_label: String,
}

pub(crate) struct ConflictResolution {
    pub removals: Vec<RemovalIntent>,
    pub superseded: bool,
}

/// Walk the existing releases of every movie linked to the library entry,
/// in store order, and reconcile them with the incoming group.
///
/// A worse release yields removal intents. An equal finished release is
/// kept alongside the new one (assume repack). A better finished release
/// supersedes the group: the plan is suppressed behind an `_EXISTS_`
/// marker, a cancellation event fires, and evaluation stops.
pub(crate) fn resolve(
    plan: &mut MovePlan,
    group: &ReleaseGroup,
    library: &LibraryEntry,
    tier: &QualityTier,
    bus: &dyn NotificationBus,
) -> ConflictResolution {
    let mut removals = Vec::new();

    for movie in &library.movies {
        for release in &movie.releases {
            if release.quality_order > tier.order {
                tracing::info!(
                    "Removing older release for {}, with quality {}",
                    library.title,
                    release.quality_label
                );
                removals.extend(release.files.iter().map(|file| RemovalIntent {
                    path: file.clone(),
                    quality_label: release.quality_label.clone(),
                }));
            } else if release.status == Status::Done {
                if release.quality_order == tier.order {
                    tracing::info!(
                        "Same quality release already exists for {}, with quality {}. Assuming repack.",
                        library.title,
                        release.quality_label
                    );
                } else {
                    tracing::info!(
                        "Better quality release already exists for {}, with quality {}",
                        library.title,
                        release.quality_label
                    );

                    match (&group.parent_dir, &group.dirname) {
                        (Some(parent), Some(dirname)) => {
                            plan.suppress_into_folder_marker(parent, dirname, EXISTS_PREFIX);
                        }
                        _ => plan.suppress_into_file_markers(EXISTS_PREFIX),
                    }

                    let message = format!(
                        "Renaming of {} ({}) canceled, exists in {} already.",
                        library.title, tier.label, release.quality_label
                    );
                    bus.publish(Notification::cancelled(message, group));

                    return ConflictResolution {
                        removals,
                        superseded: true,
                    };
                }
            }
        }
    }

    ConflictResolution {
        removals,
        superseded: false,
    }
}

/// Movies that the incoming tier finishes: currently active, with a
/// profile entry at the same quality order flagged `finish`. Committing
/// the transition is the metadata store's job.
pub(crate) fn finished_movies(
    library: &LibraryEntry,
    tier: &QualityTier,
    catalog: &QualityCatalog,
) -> Vec<String> {
    library
        .movies
        .iter()
        .filter(|movie| movie.status == Status::Active)
        .filter(|movie| {
            movie.profile.entries.iter().any(|entry| {
                entry.finish
                    && catalog
                        .by_identifier(&entry.quality)
                        .is_some_and(|wanted| wanted.order == tier.order)
            })
        })
        .map(|movie| movie.id.clone())
        .collect()
}
