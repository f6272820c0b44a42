use tracing::debug;
use super::types::{Allocation, HistoryMap};

/// Folds this run's allocation into the history record.
///
/// Sets only grow: every student of every group assigned to a staff member is
/// added to that staff member's history. Staff absent from `history` get a new
/// entry; entries for staff absent from `allocation` are kept as they are.
pub fn update_history(mut history: HistoryMap, allocation: &Allocation) -> HistoryMap {
    for (staff, groups) in allocation {
        let seen = history.entry(staff.clone()).or_default();
        let before = seen.len();
        for group in groups {
            seen.extend(group.iter().cloned());
        }
        debug!(staff = %staff, added = seen.len() - before, "updated history");
    }
    history
}
