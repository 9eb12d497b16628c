// 📤 CSV Exchange
// Export the register to CSV, import entries from CSV through the normal submit rules

use crate::adapter::submit_entry;
use crate::entry::{Entry, EntryForm};
use crate::registry::Registry;
use crate::store::KeyValueStore;
use anyhow::{Context, Result};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

/// A CSV row that was not added
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedRow {
    /// 1-based data line (the header is not counted)
    pub line: usize,
    pub reason: String,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ImportReport {
    pub added: usize,
    pub rejected: Vec<RejectedRow>,
}

pub fn export_csv<W: Write>(entries: &[Entry], writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);

    for entry in entries {
        wtr.serialize(entry).context("Failed to write CSV row")?;
    }

    // An empty export still carries the header row
    if entries.is_empty() {
        wtr.write_record(["owner", "vehicle", "licensePlate", "entryDate", "slotNumber"])?;
    }

    wtr.flush()?;
    Ok(())
}

pub fn export_csv_file(entries: &[Entry], path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create CSV file {}", path.display()))?;
    export_csv(entries, file)
}

/// Add every acceptable row; rows failing validation, slot checks or
/// CSV decoding are collected in the report instead of aborting.
pub fn import_csv<S: KeyValueStore, R: Read>(
    registry: &mut Registry<S>,
    reader: R,
) -> Result<ImportReport> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut report = ImportReport::default();

    for (index, result) in rdr.deserialize::<EntryForm>().enumerate() {
        let line = index + 1;

        let form = match result {
            Ok(form) => form,
            Err(err) => {
                report.rejected.push(RejectedRow {
                    line,
                    reason: err.to_string(),
                });
                continue;
            }
        };

        match submit_entry(registry, &form) {
            Ok(_) => report.added += 1,
            Err(err) => report.rejected.push(RejectedRow {
                line,
                reason: err.to_string(),
            }),
        }
    }

    tracing::info!(
        added = report.added,
        rejected = report.rejected.len(),
        "CSV import finished"
    );

    Ok(report)
}

pub fn import_csv_file<S: KeyValueStore>(
    registry: &mut Registry<S>,
    path: &Path,
) -> Result<ImportReport> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open CSV file {}", path.display()))?;
    import_csv(registry, file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn sample_entries() -> Vec<Entry> {
        vec![
            Entry::new("Jane", "Civic", "ABC-1234", "2024-01-01", "1"),
            Entry::new("John, Jr.", "Vespa", "AB-12345", "2024-01-02", "2"),
        ]
    }

    #[test]
    fn test_export_header_and_rows() {
        let mut out = Vec::new();
        export_csv(&sample_entries(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "owner,vehicle,licensePlate,entryDate,slotNumber");
        assert_eq!(lines[1], "Jane,Civic,ABC-1234,2024-01-01,1");
        assert_eq!(lines[2], "\"John, Jr.\",Vespa,AB-12345,2024-01-02,2");
    }

    #[test]
    fn test_export_empty_register() {
        let mut out = Vec::new();
        export_csv(&[], &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap().trim_end(),
            "owner,vehicle,licensePlate,entryDate,slotNumber"
        );
    }

    #[test]
    fn test_export_then_import() {
        let mut out = Vec::new();
        export_csv(&sample_entries(), &mut out).unwrap();

        let mut registry = Registry::new(MemoryStore::new());
        let report = import_csv(&mut registry, out.as_slice()).unwrap();

        assert_eq!(report.added, 2);
        assert!(report.rejected.is_empty());
        assert_eq!(registry.list(), sample_entries().as_slice());
    }

    #[test]
    fn test_import_reports_rejections() {
        let csv_text = "\
owner,vehicle,licensePlate,entryDate,slotNumber
Jane,Civic,ABC-1234,2024-01-01,1
Bob,Golf,BAD,2024-01-01,2
Ann,Polo,XYZ-1111,2024-01-01,1
,Fiat,QQQ-2222,2024-01-01,3
";
        let mut registry = Registry::new(MemoryStore::new());
        let report = import_csv(&mut registry, csv_text.as_bytes()).unwrap();

        assert_eq!(report.added, 1);
        let lines: Vec<usize> = report.rejected.iter().map(|r| r.line).collect();
        assert_eq!(lines, vec![2, 3, 4]);
        assert!(report.rejected[1].reason.contains("already taken"));
        assert_eq!(report.rejected[2].reason, "All fields must be filled!");
    }

    #[test]
    fn test_import_skips_slots_already_in_registry() {
        let mut registry = Registry::new(MemoryStore::new());
        registry
            .add(Entry::new("Jane", "Civic", "ABC-1234", "2024-01-01", "1"))
            .unwrap();

        let csv_text = "owner,vehicle,licensePlate,entryDate,slotNumber\nAnn,Polo,XYZ-1111,2024-01-01,1\n";
        let report = import_csv(&mut registry, csv_text.as_bytes()).unwrap();

        assert_eq!(report.added, 0);
        assert_eq!(report.rejected.len(), 1);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("entries.csv");

        export_csv_file(&sample_entries(), &path).unwrap();

        let mut registry = Registry::new(MemoryStore::new());
        let report = import_csv_file(&mut registry, &path).unwrap();
        assert_eq!(report.added, 2);
    }

    #[test]
    fn test_missing_file_is_error() {
        let mut registry = Registry::new(MemoryStore::new());
        assert!(import_csv_file(&mut registry, Path::new("/nonexistent/entries.csv")).is_err());
    }
}
