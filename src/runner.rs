use crate::config::OrganizerConfig;
use crate::executor::Executor;
use crate::group::ReleaseGroup;
use crate::mover::Mover;
use crate::notify::{Notification, NotificationBus};
use crate::organizer::{GroupState, ReleaseOrganizer};
use crate::quality::QualityMatcher;
use crate::store::{MetadataStore, Status};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub groups_processed: usize,
    pub files_moved: usize,
    pub move_errors: usize,
    pub groups_renamed: usize,
    pub groups_unmatched: usize,
    pub groups_superseded: usize,
    pub groups_skipped: usize,
    pub removal_intents: usize,
}

/// One batch pass over the scanner's groups: process, execute the plan,
/// commit status transitions, notify.
pub struct Runner<'a> {
    organizer: ReleaseOrganizer<'a>,
    store: &'a dyn MetadataStore,
    bus: &'a dyn NotificationBus,
    mover: &'a dyn Mover,
}

impl<'a> Runner<'a> {
    pub fn new(
        matcher: &'a QualityMatcher,
        store: &'a dyn MetadataStore,
        bus: &'a dyn NotificationBus,
        mover: &'a dyn Mover,
    ) -> Self {
        Self {
            organizer: ReleaseOrganizer::new(matcher, store, bus),
            store,
            bus,
            mover,
        }
    }

    /// Process every group in order. The shutdown flag is checked only
    /// between groups; an in-flight group always completes its plan.
    pub fn run_batch(
        &self,
        groups: &BTreeMap<String, ReleaseGroup>,
        config: &OrganizerConfig,
        shutdown: &AtomicBool,
    ) -> BatchSummary {
        let mut summary = BatchSummary::default();

        for (identifier, group) in groups {
            if shutdown.load(Ordering::SeqCst) {
                tracing::info!("Shutdown requested, not starting group '{identifier}'");
                break;
            }

            tracing::info!("Processing group '{identifier}'");

            if let Err(e) = group.validate() {
                tracing::warn!("Skipping group '{identifier}': {e}");
                summary.groups_skipped += 1;
                continue;
            }

            let outcome = self.organizer.process(group, config);
            summary.groups_processed += 1;
            match outcome.state {
                GroupState::Renamed => summary.groups_renamed += 1,
                GroupState::Unmatched => summary.groups_unmatched += 1,
                GroupState::Superseded => summary.groups_superseded += 1,
                GroupState::Skipped => summary.groups_skipped += 1,
            }

            let result = Executor::execute_plan(&outcome.plan, self.mover);
            summary.files_moved += result.files_moved;
            summary.move_errors += result.errors.len();

            for intent in &outcome.removals {
                tracing::info!(
                    "Removal intent ({}): {}",
                    intent.quality_label,
                    intent.path.display()
                );
            }
            summary.removal_intents += outcome.removals.len();

            // Commits happen after the moves so a failure here is only a
            // post-move warning.
            for movie_id in &outcome.finished_movies {
                if let Err(e) = self.store.set_movie_status(movie_id, Status::Done) {
                    tracing::warn!("{e}");
                }
            }

            if outcome.state == GroupState::Renamed {
                let title = outcome.title.as_deref().unwrap_or("unknown title");
                let quality = outcome.quality_label.as_deref().unwrap_or("unknown");

                let renamed_message = match &outcome.destination_root {
                    Some(root) => format!("Renamed {title} into {}.", root.display()),
                    None => format!("Renamed {title}."),
                };
                self.bus.publish(Notification::completed(renamed_message, group));
                self.bus.publish(Notification::completed(
                    format!("Download of {title} ({quality}) successful."),
                    group,
                ));
            }
        }

        tracing::info!(
            "Batch complete: {} groups, {} files moved, {} errors",
            summary.groups_processed,
            summary.files_moved,
            summary.move_errors
        );

        summary
    }
}
