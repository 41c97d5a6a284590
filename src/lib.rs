#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

pub mod cli;
pub mod config;
pub mod error;
pub mod executor;
pub mod group;
pub mod intake;
pub mod mover;
pub mod notify;
pub mod organizer;
pub mod plan;
pub mod quality;
pub mod runner;
pub mod store;
pub mod template;

pub use cli::{Cli, Commands, default_config_path};
pub use config::{ConfigError, OrganizerConfig};
pub use error::{AppError, Result};
pub use executor::{ExecutionError, ExecutionResult, Executor};
pub use group::{DetectedMeta, FileCategory, ReleaseGroup};
pub use intake::{ManifestSource, ReleaseSource};
pub use mover::{DryRunMover, Mover, NativeMover};
pub use notify::{EventKind, Notification, NotificationBus, RecordingBus, TracingBus};
pub use organizer::{GroupOutcome, GroupState, ReleaseOrganizer, RemovalIntent};
pub use plan::{EXISTS_PREFIX, MovePlan, UNKNOWN_PREFIX};
pub use quality::{CandidateFile, QualityCatalog, QualityMatcher, QualityTier, ResolutionHint};
pub use runner::{BatchSummary, Runner};
pub use store::{
    ExistingRelease, LibraryEntry, MetadataStore, MovieRecord, Profile, ProfileEntry,
    SnapshotStore, Status,
};
pub use template::{Bindings, render};
