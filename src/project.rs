use tracing::{error, info};

use crate::allocate::{allocate, find_conflicts, update_history, AllocationOutcome, Conflict};
use crate::config::ProjectPaths;
use crate::display::{write_assignments, write_history};
use crate::error::RunResult;
use crate::parser::{empty_history, load_assignments, load_blocks, load_groups, load_history, load_staff};

/// Runs a full project assignment: load inputs, allocate, then persist the
/// updated history and the per-staff assignment files.
///
/// `has_history` selects whether `paths.history` is read first. The updated
/// history is written there either way.
pub fn run_project(paths: &ProjectPaths, has_history: bool) -> RunResult<AllocationOutcome> {
    info!(has_history, "running project assignment");

    let staff = load_staff(&paths.staff)?;
    let blocks = load_blocks(&paths.blocks, &staff)?;
    let groups = load_groups(&paths.groups)?;
    let history = if has_history {
        load_history(&paths.history, &staff)?
    } else {
        empty_history(&staff)
    };

    let outcome = allocate(&staff, &groups, &history, &blocks)?;

    let history = update_history(history, &outcome.allocation);
    write_history(&history, &paths.history)?;
    write_assignments(&outcome.allocation, &paths.assignment_dir)?;

    info!(
        placed = outcome.placed(),
        unplaceable = outcome.unplaceable.len(),
        over_capacity = outcome.over_capacity.len(),
        "project assignment complete"
    );
    Ok(outcome)
}

/// Checks a written assignment directory against the block list
pub fn check_assignments(paths: &ProjectPaths) -> RunResult<Vec<Conflict>> {
    info!(path = %paths.assignment_dir.display(), "checking for project conflicts");

    let staff = load_staff(&paths.staff)?;
    let blocks = load_blocks(&paths.blocks, &staff)?;
    let allocation = load_assignments(&paths.assignment_dir, &staff)?;

    let conflicts = find_conflicts(&allocation, &blocks);
    for conflict in &conflicts {
        error!(staff = %conflict.staff, student = %conflict.student, "conflict: block requested by {}", conflict.staff);
    }
    Ok(conflicts)
}
