use super::types::{Allocation, Conflict, ExclusionMap};

/// Lists every (staff, student) pairing in `allocation` that `exclusions` forbids.
///
/// Works with either the block map or a history map. Staff without an entry in
/// `exclusions` have nothing excluded.
pub fn find_conflicts(allocation: &Allocation, exclusions: &ExclusionMap) -> Vec<Conflict> {
    let mut conflicts = Vec::new();

    for (staff, groups) in allocation {
        let Some(excluded) = exclusions.get(staff) else {
            continue;
        };
        for group in groups {
            for student in group.iter().filter(|s| excluded.contains(*s)) {
                conflicts.push(Conflict {
                    staff: staff.clone(),
                    student: student.clone(),
                });
            }
        }
    }

    conflicts
}

/// True when any assigned group contains a student excluded from its staff member
pub fn has_conflict(allocation: &Allocation, exclusions: &ExclusionMap) -> bool {
    !find_conflicts(allocation, exclusions).is_empty()
}
