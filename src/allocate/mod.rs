pub mod types;
pub mod allocator;
pub mod conflicts;
pub mod history;

pub use types::{
    Allocation, AllocationOutcome, BlockMap, Conflict, ExclusionMap, Group, HistoryMap, Roster,
    StaffId, StudentId,
};
pub use allocator::allocate;
pub use conflicts::{find_conflicts, has_conflict};
pub use history::update_history;
