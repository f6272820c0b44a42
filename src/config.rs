use std::path::{Path, PathBuf};

pub const BLOCKS_FILE: &str = "blocks.csv";
pub const STAFF_FILE: &str = "tas.csv";
pub const GROUPS_FILE: &str = "project_student_pairs.csv";
pub const ASSIGNMENT_DIR: &str = "project_student_assignment";
pub const HISTORY_FILE: &str = "project_history.json";

/// Locations of every file a project run reads or writes
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectPaths {
    pub blocks: PathBuf,
    pub staff: PathBuf,
    pub groups: PathBuf,
    pub assignment_dir: PathBuf,
    /// Read when a history already exists, always written after assigning
    pub history: PathBuf,
}

impl ProjectPaths {
    /// Default file names resolved under `root`
    pub fn with_root<P: AsRef<Path>>(root: P) -> Self {
        let root = root.as_ref();
        ProjectPaths {
            blocks: root.join(BLOCKS_FILE),
            staff: root.join(STAFF_FILE),
            groups: root.join(GROUPS_FILE),
            assignment_dir: root.join(ASSIGNMENT_DIR),
            history: root.join(HISTORY_FILE),
        }
    }
}

impl Default for ProjectPaths {
    fn default() -> Self {
        ProjectPaths {
            blocks: PathBuf::from(BLOCKS_FILE),
            staff: PathBuf::from(STAFF_FILE),
            groups: PathBuf::from(GROUPS_FILE),
            assignment_dir: PathBuf::from(ASSIGNMENT_DIR),
            history: PathBuf::from(HISTORY_FILE),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_prefixes_every_default() {
        let paths = ProjectPaths::with_root("term1");
        assert_eq!(paths.blocks, Path::new("term1/blocks.csv"));
        assert_eq!(paths.assignment_dir, Path::new("term1/project_student_assignment"));
        assert_eq!(paths.history, Path::new("term1/project_history.json"));
    }

    #[test]
    fn default_uses_bare_file_names() {
        assert_eq!(ProjectPaths::default(), ProjectPaths::with_root(""));
    }
}
