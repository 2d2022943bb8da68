//! Comma-delimited output: one header row, no index column.
//!
//! Parent directories are created as needed.

use serde::Serialize;
use std::fs;
use std::path::Path;

use crate::error::WriteResult;
use crate::models::Table;

fn ensure_parent(path: &Path) -> WriteResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

/// Write a table; missing cells become empty fields.
pub fn write_table<P: AsRef<Path>>(table: &Table, path: P) -> WriteResult<()> {
    let path = path.as_ref();
    ensure_parent(path)?;

    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(table.columns())?;
    for row in table.rows() {
        writer.write_record(row.iter().map(|cell| cell.to_string()))?;
    }
    writer.flush()?;
    Ok(())
}

/// Write serializable records; the header comes from the field names.
pub fn write_records<T: Serialize, P: AsRef<Path>>(records: &[T], path: P) -> WriteResult<()> {
    let path = path.as_ref();
    ensure_parent(path)?;

    let mut writer = csv::Writer::from_path(path)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WriteError;
    use crate::models::{Cell, StatePopulationRecord};

    #[test]
    fn test_write_table_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("processed").join("out.csv");
        let table = Table::new(
            vec!["label_(grouping)".into(), "new_york".into()],
            vec![vec![Cell::Text("Total, all".into()), Cell::Int(19_000_000)]],
        );

        write_table(&table, &path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "label_(grouping),new_york\n\"Total, all\",19000000\n");
    }

    #[test]
    fn test_write_records_header_and_null() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.csv");
        let records = vec![StatePopulationRecord {
            state: "texas".into(),
            state_population: 0,
            us_avg_population: 0,
            percent_diff_from_us_avg: None,
            population_rank: 1,
        }];

        write_records(&records, &path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();
        assert_eq!(
            lines.next(),
            Some("state,state_population,us_avg_population,PercentDiffFromUSAvg,Population_Rank")
        );
        assert_eq!(lines.next(), Some("texas,0,0,,1"));
    }

    #[test]
    fn test_write_into_file_as_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "x").unwrap();
        let table = Table::new(vec!["a".into()], vec![vec![Cell::Int(1)]]);

        let err = write_table(&table, blocker.join("out.csv")).unwrap_err();
        assert!(matches!(err, WriteError::Io(_)));
    }
}
