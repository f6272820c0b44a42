//! Error types for each layer of the allocator

use std::path::PathBuf;
use thiserror::Error;

use crate::allocate::Conflict;

#[derive(Error, Debug)]
pub enum AllocationError {
    #[error("no staff available to receive assignments")]
    NoStaff,

    /// The placement filter let through a pairing it should have excluded
    #[error("allocation produced {} excluded pairing(s): {}", .conflicts.len(), format_conflicts(.conflicts))]
    InvariantViolation { conflicts: Vec<Conflict> },
}

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("failed to read {}: {}", .path.display(), .source)]
    Io { path: PathBuf, source: std::io::Error },

    #[error("invalid CSV in {}: {}", .path.display(), .source)]
    Csv { path: PathBuf, source: csv::Error },

    #[error("invalid JSON in {}: {}", .path.display(), .source)]
    Json { path: PathBuf, source: serde_json::Error },

    #[error("{}:{}: expected a staff login followed by a student login", .path.display(), .line)]
    MalformedRow { path: PathBuf, line: u64 },

    #[error("{}:{}: staff member {} is not on the staff list", .path.display(), .line, .staff)]
    UnknownStaff { path: PathBuf, line: u64, staff: String },
}

#[derive(Error, Debug)]
pub enum WriteError {
    #[error("failed to write {}: {}", .path.display(), .source)]
    Io { path: PathBuf, source: std::io::Error },

    #[error("failed to write CSV to {}: {}", .path.display(), .source)]
    Csv { path: PathBuf, source: csv::Error },

    #[error("failed to serialize {}: {}", .path.display(), .source)]
    Json { path: PathBuf, source: serde_json::Error },
}

#[derive(Error, Debug)]
pub enum RunError {
    #[error(transparent)]
    Allocation(#[from] AllocationError),

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Write(#[from] WriteError),

    #[error("found {count} conflicting assignment(s)")]
    ConflictsFound { count: usize },
}

pub type RunResult<T> = Result<T, RunError>;

fn format_conflicts(conflicts: &[Conflict]) -> String {
    conflicts
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
