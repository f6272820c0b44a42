use csv::{ReaderBuilder, StringRecord};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::path::Path;
use tracing::{debug, info, warn};

use crate::allocate::{Allocation, BlockMap, Group, HistoryMap, Roster, StaffId, StudentId};
use crate::error::LoadError;

/// Opens a header-less CSV whose rows may differ in width
fn open_csv(path: &Path) -> Result<csv::Reader<File>, LoadError> {
    ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(|source| LoadError::Csv { path: path.to_path_buf(), source })
}

/// Reads every record, pairing it with its 1-based line number
fn read_records(path: &Path) -> Result<Vec<(u64, StringRecord)>, LoadError> {
    let mut reader = open_csv(path)?;
    let mut records = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|source| LoadError::Csv { path: path.to_path_buf(), source })?;
        let line = record.position().map_or(0, |pos| pos.line());
        records.push((line, record));
    }
    Ok(records)
}

/// Non-blank, trimmed cells of a record
fn cells(record: &StringRecord) -> impl Iterator<Item = &str> {
    record.iter().map(str::trim).filter(|cell| !cell.is_empty())
}

/// Loads the staff list. Every non-blank cell in the file is a staff login.
pub fn load_staff<P: AsRef<Path>>(path: P) -> Result<Roster, LoadError> {
    let path = path.as_ref();
    let staff: Roster = read_records(path)?
        .iter()
        .flat_map(|(_, record)| cells(record).map(str::to_string).collect::<Vec<_>>())
        .collect();
    debug!(path = %path.display(), count = staff.len(), "loaded staff");
    Ok(staff)
}

/// Loads `staff,student` block rows. Every staff member gets an entry, even
/// with no blocks.
pub fn load_blocks<P: AsRef<Path>>(path: P, staff: &Roster) -> Result<BlockMap, LoadError> {
    let path = path.as_ref();
    info!(path = %path.display(), "loading blocks");

    let mut blocks: BlockMap = staff.iter().map(|ta| (ta.clone(), Default::default())).collect();

    for (line, record) in read_records(path)? {
        let row: Vec<&str> = cells(&record).collect();
        match row.as_slice() {
            [] => continue,
            [ta, student, ..] => {
                let Some(students) = blocks.get_mut(*ta) else {
                    return Err(LoadError::UnknownStaff {
                        path: path.to_path_buf(),
                        line,
                        staff: ta.to_string(),
                    });
                };
                students.insert(student.to_string());
            }
            [_] => return Err(LoadError::MalformedRow { path: path.to_path_buf(), line }),
        }
    }

    Ok(blocks)
}

/// Loads student groups, one per row. Blank cells are ignored and rows with
/// nothing in them are skipped.
pub fn load_groups<P: AsRef<Path>>(path: P) -> Result<Vec<Group>, LoadError> {
    let path = path.as_ref();
    info!(path = %path.display(), "loading groups");

    let mut groups = Vec::new();
    for (line, record) in read_records(path)? {
        let group: Group = cells(&record).map(str::to_string).collect();
        if group.is_empty() {
            warn!(path = %path.display(), line, "skipping empty group row");
            continue;
        }
        groups.push(group);
    }
    Ok(groups)
}

/// A history with an empty entry for every staff member
pub fn empty_history(staff: &Roster) -> HistoryMap {
    staff.iter().map(|ta| (ta.clone(), Default::default())).collect()
}

/// Loads a history record written by a previous run. Staff missing from the
/// record start with an empty history.
pub fn load_history<P: AsRef<Path>>(path: P, staff: &Roster) -> Result<HistoryMap, LoadError> {
    let path = path.as_ref();
    info!(path = %path.display(), "loading history");

    let file = File::open(path).map_err(|source| LoadError::Io { path: path.to_path_buf(), source })?;
    let raw: BTreeMap<StaffId, Vec<StudentId>> = serde_json::from_reader(file)
        .map_err(|source| LoadError::Json { path: path.to_path_buf(), source })?;

    let mut history = empty_history(staff);
    for (ta, students) in raw {
        if !staff.contains(&ta) {
            debug!(staff = %ta, "history entry for staff not on the current list");
        }
        history.entry(ta).or_default().extend(students);
    }
    Ok(history)
}

/// Reads back an assignment directory: one `<staff>.csv` per staff member, one
/// group per row. Staff without a file have no groups.
pub fn load_assignments<P: AsRef<Path>>(dir: P, staff: &Roster) -> Result<Allocation, LoadError> {
    let dir = dir.as_ref();
    let mut allocation = Allocation::new();

    for ta in staff {
        let path = dir.join(format!("{ta}.csv"));
        let groups = if path.exists() { load_groups(&path)? } else { Vec::new() };
        allocation.insert(ta.clone(), groups);
    }

    // Files for staff no longer on the list still count
    let entries = fs::read_dir(dir).map_err(|source| LoadError::Io { path: dir.to_path_buf(), source })?;
    for entry in entries {
        let entry = entry.map_err(|source| LoadError::Io { path: dir.to_path_buf(), source })?;
        let path = entry.path();
        if path.extension().and_then(|ext| ext.to_str()) != Some("csv") {
            continue;
        }
        let Some(ta) = path.file_stem().and_then(|stem| stem.to_str()) else {
            continue;
        };
        if !allocation.contains_key(ta) {
            warn!(staff = %ta, "assignment file for staff not on the staff list");
            allocation.insert(ta.to_string(), load_groups(&path)?);
        }
    }

    Ok(allocation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn staff_list_ignores_blank_cells() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "tas.csv", "ta1\nta2,\n\n ta3 \nta1\n");

        assert_eq!(load_staff(&path).unwrap(), set(&["ta1", "ta2", "ta3"]));
    }

    #[test]
    fn blocks_cover_every_staff_member() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "blocks.csv", "ta1,student1\nta1,student2\nta3,student1\n");
        let staff = set(&["ta1", "ta2", "ta3"]);

        let blocks = load_blocks(&path, &staff).unwrap();

        assert_eq!(blocks["ta1"], set(&["student1", "student2"]));
        assert!(blocks["ta2"].is_empty());
        assert_eq!(blocks["ta3"], set(&["student1"]));
    }

    #[test]
    fn block_for_unknown_staff_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "blocks.csv", "ta1,student1\nghost,student2\n");

        let err = load_blocks(&path, &set(&["ta1"])).unwrap_err();

        assert!(matches!(err, LoadError::UnknownStaff { line: 2, ref staff, .. } if staff == "ghost"));
    }

    #[test]
    fn block_row_without_student_is_malformed() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "blocks.csv", "ta1,student1\nta1,\n");

        let err = load_blocks(&path, &set(&["ta1"])).unwrap_err();

        assert!(matches!(err, LoadError::MalformedRow { line: 2, .. }));
    }

    #[test]
    fn groups_keep_row_order_and_drop_blank_cells() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "pairs.csv", "a,b,\nc,d,e\nf,,\n,,\n");

        let groups = load_groups(&path).unwrap();

        assert_eq!(groups, vec![set(&["a", "b"]), set(&["c", "d", "e"]), set(&["f"])]);
    }

    #[test]
    fn history_fills_missing_staff() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "history.json", r#"{"ta1": ["s1", "s2"], "old": ["s3"]}"#);

        let history = load_history(&path, &set(&["ta1", "ta2"])).unwrap();

        assert_eq!(history["ta1"], set(&["s1", "s2"]));
        assert!(history["ta2"].is_empty());
        assert_eq!(history["old"], set(&["s3"]));
    }

    #[test]
    fn missing_history_file_is_an_io_error() {
        let dir = TempDir::new().unwrap();
        let err = load_history(dir.path().join("nope.json"), &set(&["ta1"])).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }

    #[test]
    fn invalid_history_json_is_reported() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "history.json", "[1, 2");
        let err = load_history(&path, &set(&["ta1"])).unwrap_err();
        assert!(matches!(err, LoadError::Json { .. }));
    }

    #[test]
    fn assignments_read_back_per_staff_files() {
        let dir = TempDir::new().unwrap();
        write(&dir, "ta1.csv", "a,b\nc\n");
        write(&dir, "ta3.csv", "d\n");
        write(&dir, "notes.txt", "ignored");

        let allocation = load_assignments(dir.path(), &set(&["ta1", "ta2"])).unwrap();

        assert_eq!(allocation["ta1"], vec![set(&["a", "b"]), set(&["c"])]);
        assert!(allocation["ta2"].is_empty());
        assert_eq!(allocation["ta3"], vec![set(&["d"])]);
        assert_eq!(allocation.len(), 3);
    }
}
