//! Assigns student project groups to TAs, honouring block lists and never
//! repeating a TA/student pairing from earlier terms.

pub mod allocate;
pub mod config;
pub mod display;
pub mod error;
pub mod parser;
pub mod project;

pub use allocate::{allocate, find_conflicts, has_conflict, update_history};
pub use config::ProjectPaths;
pub use error::{AllocationError, LoadError, RunError, RunResult, WriteError};
pub use project::{check_assignments, run_project};
