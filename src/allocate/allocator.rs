use tracing::{debug, info, warn};

use crate::error::AllocationError;
use super::conflicts::find_conflicts;
use super::types::{Allocation, AllocationOutcome, BlockMap, ExclusionMap, Group, HistoryMap, Roster, StaffId};

/// Assigns each group to one staff member, greedily and in input order.
///
/// A staff member is a candidate for a group only if none of its students is
/// blocked for them or already appears in their history. Candidates are tried
/// by ascending (load, staff id); the first one under the soft cap of
/// `ceil(groups / staff)` wins. When every candidate is at the cap the least
/// loaded one takes the group anyway. Groups with no candidate at all are
/// reported in `unplaceable` and left out of the allocation.
pub fn allocate(
    staff: &Roster,
    groups: &[Group],
    history: &HistoryMap,
    blocks: &BlockMap,
) -> Result<AllocationOutcome, AllocationError> {
    if staff.is_empty() {
        return Err(AllocationError::NoStaff);
    }

    info!(staff = staff.len(), groups = groups.len(), "assigning projects");

    let mut allocation: Allocation = staff.iter().map(|ta| (ta.clone(), Vec::new())).collect();
    let capacity = groups.len().div_ceil(staff.len());
    let mut unplaceable = Vec::new();
    let mut over_capacity = Vec::new();

    for group in groups {
        let mut options: Vec<&StaffId> = staff
            .iter()
            .filter(|ta| is_eligible(ta, group, history, blocks))
            .collect();
        options.sort_by_key(|ta| (load(&allocation, ta), *ta));

        let Some(&least_loaded) = options.first() else {
            warn!(group = ?group, "group had conflicts with all staff, leaving it unassigned");
            unplaceable.push(group.clone());
            continue;
        };

        let chosen = match options.iter().find(|ta| load(&allocation, ta) < capacity) {
            Some(ta) => *ta,
            None => {
                info!(group = ?group, staff = %least_loaded, capacity, "group placed over capacity");
                over_capacity.push((least_loaded.clone(), group.clone()));
                least_loaded
            }
        };

        debug!(group = ?group, staff = %chosen, "assigned group");
        allocation.entry(chosen.clone()).or_default().push(group.clone());
    }

    verify_allocation(&allocation, history, blocks)?;

    Ok(AllocationOutcome {
        allocation,
        unplaceable,
        over_capacity,
        capacity,
    })
}

/// Rejects an allocation that pairs any staff member with a blocked or
/// previously supervised student.
pub(crate) fn verify_allocation(
    allocation: &Allocation,
    history: &HistoryMap,
    blocks: &BlockMap,
) -> Result<(), AllocationError> {
    let mut conflicts = find_conflicts(allocation, blocks);
    conflicts.extend(find_conflicts(allocation, history));

    if conflicts.is_empty() {
        Ok(())
    } else {
        conflicts.sort();
        conflicts.dedup();
        Err(AllocationError::InvariantViolation { conflicts })
    }
}

fn is_eligible(ta: &StaffId, group: &Group, history: &HistoryMap, blocks: &BlockMap) -> bool {
    !group
        .iter()
        .any(|student| is_excluded(blocks, ta, student) || is_excluded(history, ta, student))
}

fn is_excluded(exclusions: &ExclusionMap, ta: &StaffId, student: &str) -> bool {
    exclusions.get(ta).is_some_and(|students| students.contains(student))
}

fn load(allocation: &Allocation, ta: &StaffId) -> usize {
    allocation.get(ta).map_or(0, Vec::len)
}
