use csv::WriterBuilder;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

use crate::allocate::{Allocation, AllocationOutcome, Group, HistoryMap};
use crate::error::WriteError;

/// Formats a group as a comma separated list of logins
pub fn format_group(group: &Group) -> String {
    group.iter().map(String::as_str).collect::<Vec<_>>().join(", ")
}

/// Writes one `<staff>.csv` per staff member into `dir`, one group per row.
/// Staff without groups get an empty file. The directory is created if needed.
pub fn write_assignments<P: AsRef<Path>>(allocation: &Allocation, dir: P) -> Result<(), WriteError> {
    let dir = dir.as_ref();
    info!(path = %dir.display(), "writing project assignments");

    fs::create_dir_all(dir).map_err(|source| WriteError::Io { path: dir.to_path_buf(), source })?;

    for (ta, groups) in allocation {
        let path = dir.join(format!("{ta}.csv"));
        let csv_error = |source| WriteError::Csv { path: path.clone(), source };

        let mut wtr = WriterBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(&path)
            .map_err(csv_error)?;
        for group in groups {
            wtr.write_record(group).map_err(csv_error)?;
        }
        wtr.flush().map_err(|source| WriteError::Io { path: path.clone(), source })?;
    }

    Ok(())
}

/// Overwrites `path` with the history as staff -> sorted list of students
pub fn write_history<P: AsRef<Path>>(history: &HistoryMap, path: P) -> Result<(), WriteError> {
    let path = path.as_ref();
    info!(path = %path.display(), "writing project history");

    let file = File::create(path).map_err(|source| WriteError::Io { path: path.to_path_buf(), source })?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, history)
        .map_err(|source| WriteError::Json { path: path.to_path_buf(), source })?;
    writer.flush().map_err(|source| WriteError::Io { path: path.to_path_buf(), source })
}

/// Prints a summary of an allocation run
pub fn print_allocation(outcome: &AllocationOutcome) {
    println!("\n=== Project Assignments ===");
    println!(
        "Groups assigned: {} (soft cap {} per staff member)",
        outcome.placed(),
        outcome.capacity
    );

    if !outcome.unplaceable.is_empty() {
        println!("⚠️  Groups with conflicts against every staff member ({}):", outcome.unplaceable.len());
        for group in &outcome.unplaceable {
            println!("  - {}", format_group(group));
        }
    }

    if !outcome.over_capacity.is_empty() {
        println!("Groups placed over capacity ({}):", outcome.over_capacity.len());
        for (ta, group) in &outcome.over_capacity {
            println!("  - {} -> {}", format_group(group), ta);
        }
    }

    println!("\nGroups per staff member:");
    for (ta, groups) in &outcome.allocation {
        println!("  {} ({})", ta, groups.len());
        for group in groups {
            println!("    {}", format_group(group));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{load_assignments, load_history};
    use std::collections::BTreeSet;
    use tempfile::TempDir;

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn assignments_written_one_file_per_staff() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("project_student_assignment");
        let allocation = Allocation::from([
            ("ta1".to_string(), vec![set(&["b", "a"]), set(&["c", "d", "e"])]),
            ("ta2".to_string(), Vec::new()),
        ]);

        write_assignments(&allocation, &out).unwrap();

        assert_eq!(fs::read_to_string(out.join("ta1.csv")).unwrap(), "a,b\nc,d,e\n");
        assert_eq!(fs::read_to_string(out.join("ta2.csv")).unwrap(), "");
        let staff = set(&["ta1", "ta2"]);
        assert_eq!(load_assignments(&out, &staff).unwrap(), allocation);
    }

    #[test]
    fn history_written_as_lists() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("project_history.json");
        let history = HistoryMap::from([
            ("ta1".to_string(), set(&["s2", "s1"])),
            ("ta2".to_string(), set(&[])),
        ]);

        write_history(&history, &path).unwrap();

        let raw: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw, serde_json::json!({"ta1": ["s1", "s2"], "ta2": []}));
        assert_eq!(load_history(&path, &set(&["ta1", "ta2"])).unwrap(), history);
    }

    #[test]
    fn history_overwrites_previous_record() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("project_history.json");
        fs::write(&path, r#"{"stale": ["x"], "padding": ["yyyyyyyyyyyyyyyyyyyyyyyy"]}"#).unwrap();

        write_history(&HistoryMap::from([("ta1".to_string(), set(&["s1"]))]), &path).unwrap();

        let raw: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw, serde_json::json!({"ta1": ["s1"]}));
    }

    #[test]
    fn groups_format_in_sorted_order() {
        assert_eq!(format_group(&set(&["zed", "amy"])), "amy, zed");
    }
}
