//! CSV export of the canonical cycle history.
//!
//! The export is written to a temporary file next to the destination,
//! fsynced, then renamed into place so a reader never sees a partial report.

use crate::date_math::days_between;
use crate::{CycleRecord, Error, Result};
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// A row in the CSV output
#[derive(Debug, serde::Serialize)]
struct CsvRow {
    id: Option<String>,
    start_date: Option<String>,
    end_date: Option<String>,
    period_length: Option<i64>,
    cycle_length: Option<i64>,
    pregnancy_start: bool,
    notes: Option<String>,
}

/// Build rows in history order (newest first)
///
/// A cycle's length is the gap to the next newer start, so the current
/// cycle has none yet.
fn rows(history: &[CycleRecord]) -> Vec<CsvRow> {
    history
        .iter()
        .map(|record| {
            let cycle_length = record.start().and_then(|start| {
                history
                    .iter()
                    .filter_map(CycleRecord::start)
                    .filter(|other| *other > start)
                    .min()
                    .map(|next| days_between(next, start))
            });

            CsvRow {
                id: record.id.clone(),
                start_date: record.start_date.clone(),
                end_date: record.end_date.clone(),
                period_length: record.period_length(),
                cycle_length,
                pregnancy_start: record.pregnancy_start,
                notes: record.notes.clone(),
            }
        })
        .collect()
}

/// Write a canonical history to `csv_path`, replacing any previous export
///
/// Returns the number of rows written.
pub fn export_history_csv(history: &[CycleRecord], csv_path: &Path) -> Result<usize> {
    let parent = match csv_path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent)?;

    let temp = NamedTempFile::new_in(parent)?;
    let mut writer = csv::WriterBuilder::new()
        .has_headers(true)
        .from_writer(temp);

    let rows = rows(history);
    for row in &rows {
        writer.serialize(row)?;
    }

    writer.flush()?;
    let mut temp = writer
        .into_inner()
        .map_err(|e| Error::Other(format!("Failed to finish CSV export: {}", e)))?;
    temp.flush()?;
    temp.as_file().sync_all()?;
    temp.persist(csv_path).map_err(|e| Error::Io(e.error))?;

    tracing::info!("Exported {} cycles to {:?}", rows.len(), csv_path);
    Ok(rows.len())
}
