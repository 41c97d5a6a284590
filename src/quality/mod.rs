mod catalog;
mod matcher;

pub use catalog::{QualityCatalog, QualityTier};
pub use matcher::{CandidateFile, QualityMatcher, ResolutionHint};
