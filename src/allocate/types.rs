use std::collections::{BTreeMap, BTreeSet};
use serde::{Serialize, Deserialize};

pub type StaffId = String;
pub type StudentId = String;

/// A project team. Duplicate logins collapse, order carries no meaning.
pub type Group = BTreeSet<StudentId>;

/// The set of staff members that can receive groups
pub type Roster = BTreeSet<StaffId>;

/// Staff -> students that staff member must not receive
pub type ExclusionMap = BTreeMap<StaffId, BTreeSet<StudentId>>;

/// Conflict-of-interest pairings, fixed for a run
pub type BlockMap = ExclusionMap;

/// Every student a staff member has supervised in earlier runs
pub type HistoryMap = ExclusionMap;

/// Staff -> groups assigned this run, in assignment order
pub type Allocation = BTreeMap<StaffId, Vec<Group>>;

/// Result of a single allocation run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AllocationOutcome {
    pub allocation: Allocation,
    pub unplaceable: Vec<Group>, // groups every staff member was excluded from
    pub over_capacity: Vec<(StaffId, Group)>, // placements that overrode the soft cap
    pub capacity: usize,
}

impl AllocationOutcome {
    /// Number of groups placed with some staff member
    pub fn placed(&self) -> usize {
        self.allocation.values().map(Vec::len).sum()
    }
}

/// A banned staff/student pairing found in an allocation
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Conflict {
    pub staff: StaffId,
    pub student: StudentId,
}

impl std::fmt::Display for Conflict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} is excluded from {}", self.student, self.staff)
    }
}
