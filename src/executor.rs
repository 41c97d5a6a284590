use crate::error::AppError;
use crate::mover::Mover;
use crate::plan::MovePlan;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionResult {
    pub files_moved: usize,
    pub files_suppressed: usize,
    pub errors: Vec<ExecutionError>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionError {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub error: String,
}

pub struct Executor;

impl Executor {
    /// Execute every non-null entry of a move plan.
    ///
    /// The destination directory is created first (create-if-absent, safe
    /// to retry). A per-entry failure is recorded and logged with both
    /// paths; the remaining entries still run. Nothing is rolled back.
    pub fn execute_plan(plan: &MovePlan, mover: &dyn Mover) -> ExecutionResult {
        let mut result = ExecutionResult::default();

        for (source, destination) in plan.entries() {
            let Some(destination) = destination else {
                tracing::debug!("suppressed: {}", source.display());
                result.files_suppressed += 1;
                continue;
            };

            tracing::info!(
                "Moving \"{}\" to \"{}\"",
                source.display(),
                destination.display()
            );

            if let Some(parent) = destination.parent()
                && let Err(e) = fs::create_dir_all(parent)
            {
                tracing::error!(
                    "Failed to create directory {}: {e}",
                    parent.display()
                );
                result.errors.push(ExecutionError {
                    source: source.to_path_buf(),
                    destination: destination.to_path_buf(),
                    error: e.to_string(),
                });
                continue;
            }

            match mover.move_file(source, destination) {
                Ok(()) => result.files_moved += 1,
                Err(e) => {
                    tracing::error!(
                        "{}",
                        AppError::MoveFailed {
                            from: source.to_path_buf(),
                            to: destination.to_path_buf(),
                            reason: e.to_string(),
                        }
                    );
                    result.errors.push(ExecutionError {
                        source: source.to_path_buf(),
                        destination: destination.to_path_buf(),
                        error: e.to_string(),
                    });
                }
            }
        }

        tracing::info!(
            "Execution complete: {} moved, {} suppressed, {} errors",
            result.files_moved,
            result.files_suppressed,
            result.errors.len()
        );

        result
    }
}
