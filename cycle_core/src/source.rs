//! Record sources: JSON Lines files written by the storage layer.
//!
//! Files are read under a shared lock. A malformed line is skipped with a
//! warning, and a source that cannot be read at all is left out so the
//! remaining sources can still be aggregated.

use crate::{CycleRecord, PregnancyRecord, Result, SymptomEntry};
use fs2::FileExt;
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

/// Read every well-formed record from a JSONL file
///
/// A missing file is an empty source.
pub fn read_records<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    if !path.exists() {
        tracing::debug!("No record file at {:?}", path);
        return Ok(Vec::new());
    }

    let file = File::open(path)?;
    file.lock_shared()?;

    let reader = BufReader::new(&file);
    let mut records = Vec::new();

    for (line_num, line_result) in reader.lines().enumerate() {
        let line = match line_result {
            Ok(line) => line,
            Err(e) => {
                let _ = file.unlock();
                return Err(e.into());
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        match serde_json::from_str::<T>(&line) {
            Ok(record) => records.push(record),
            Err(e) => {
                tracing::warn!(
                    "Skipping malformed record at {:?} line {}: {}",
                    path,
                    line_num + 1,
                    e
                );
            }
        }
    }

    file.unlock()?;
    tracing::debug!("Read {} records from {:?}", records.len(), path);
    Ok(records)
}

/// Read a source, treating an unreadable one as empty
fn read_or_skip<T: DeserializeOwned>(path: &Path) -> Vec<T> {
    match read_records(path) {
        Ok(records) => records,
        Err(e) => {
            tracing::warn!("Source {:?} unavailable, continuing without it: {}", path, e);
            Vec::new()
        }
    }
}

/// Concatenate raw cycle records from every source, best effort
///
/// The result is raw; run it through [`crate::reconcile_cycles`].
pub fn load_cycle_sources(paths: &[PathBuf]) -> Vec<CycleRecord> {
    let mut records = Vec::new();
    for path in paths {
        records.extend(read_or_skip::<CycleRecord>(path));
    }
    tracing::info!(
        "Loaded {} raw cycle records from {} sources",
        records.len(),
        paths.len()
    );
    records
}

/// Load symptom entries, best effort
pub fn load_symptoms(path: &Path) -> Vec<SymptomEntry> {
    let entries = read_or_skip(path);
    tracing::info!("Loaded {} symptom entries", entries.len());
    entries
}

/// Load the pregnancy record, if one exists
///
/// Returns None if the file doesn't exist or cannot be parsed.
pub fn load_pregnancy(path: &Path) -> Result<Option<PregnancyRecord>> {
    if !path.exists() {
        tracing::debug!("No pregnancy file found at {:?}", path);
        return Ok(None);
    }

    let contents = std::fs::read_to_string(path)?;
    match serde_json::from_str::<PregnancyRecord>(&contents) {
        Ok(record) => {
            tracing::info!(
                "Loaded pregnancy from {} (active: {})",
                record.last_period_date,
                record.is_active
            );
            Ok(Some(record))
        }
        Err(e) => {
            tracing::warn!(
                "Failed to parse pregnancy at {:?}: {}. Ignoring it.",
                path,
                e
            );
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Mood;
    use std::fs;

    #[test]
    fn test_read_records_skips_bad_lines() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("cycles.jsonl");
        fs::write(
            &path,
            concat!(
                r#"{"id":"a","start_date":"2024-01-01","end_date":"2024-01-05"}"#,
                "\n{ not json }\n\n",
                r#"{"start_date":"2024-02-01","notes":"light"}"#,
                "\n",
            ),
        )
        .unwrap();

        let records: Vec<CycleRecord> = read_records(&path).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id.as_deref(), Some("a"));
        assert_eq!(records[1].notes.as_deref(), Some("light"));
    }

    #[test]
    fn test_missing_file_is_empty() {
        let temp_dir = tempfile::tempdir().unwrap();
        let records: Vec<CycleRecord> =
            read_records(&temp_dir.path().join("nope.jsonl")).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_unavailable_source_does_not_fail_others() {
        let temp_dir = tempfile::tempdir().unwrap();
        let good = temp_dir.path().join("cycles.jsonl");
        fs::write(&good, "{\"start_date\":\"2024-01-01\"}\n").unwrap();

        // A directory cannot be read as a record file
        let broken = temp_dir.path().join("broken.jsonl");
        fs::create_dir(&broken).unwrap();

        let records = load_cycle_sources(&[broken, good]);
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_overlapping_sources_reconcile() {
        let temp_dir = tempfile::tempdir().unwrap();
        let server = temp_dir.path().join("cycles.jsonl");
        let pending = temp_dir.path().join("cycles_pending.jsonl");
        fs::write(
            &server,
            "{\"id\":\"1\",\"start_date\":\"2024-01-01\",\"end_date\":\"2024-01-05\"}\n",
        )
        .unwrap();
        fs::write(
            &pending,
            "{\"id\":\"1\",\"start_date\":\"2024-01-01\"}\n{\"start_date\":\"2024-01-29\"}\n",
        )
        .unwrap();

        let raw = load_cycle_sources(&[server, pending]);
        assert_eq!(raw.len(), 3);

        let canonical = crate::reconcile_cycles(&raw);
        assert_eq!(canonical.len(), 2);
        assert_eq!(canonical[1].end_date.as_deref(), Some("2024-01-05"));
    }

    #[test]
    fn test_load_symptoms() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("symptoms.jsonl");
        fs::write(
            &path,
            r#"{"id":"s1","date":"2024-01-02","mood":"tired","pain_level":4,"symptoms":["cramps","bloating"]}"#,
        )
        .unwrap();

        let entries = load_symptoms(&path);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].mood, Some(Mood::Tired));
        assert!(entries[0].symptoms.contains("cramps"));
    }

    #[test]
    fn test_load_pregnancy() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("pregnancy.json");

        assert!(load_pregnancy(&path).unwrap().is_none());

        fs::write(&path, r#"{"last_period_date":"2024-01-01","is_active":false}"#).unwrap();
        let pregnancy = load_pregnancy(&path).unwrap().unwrap();
        assert!(!pregnancy.is_active);

        fs::write(&path, "{ broken").unwrap();
        assert!(load_pregnancy(&path).unwrap().is_none());
    }
}
