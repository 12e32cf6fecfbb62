//! Merged history feed of cycles and symptom logs.

use crate::{CycleRecord, SymptomEntry, TimelineEntry};
use std::cmp::Ordering;

/// Interleave cycles and symptoms, newest first
///
/// The sort is stable: entries sharing a date keep their input order
/// (cycles before symptoms), and entries without a usable date sink to the
/// end in input order.
pub fn merge_timeline(cycles: &[CycleRecord], symptoms: &[SymptomEntry]) -> Vec<TimelineEntry> {
    let mut feed: Vec<TimelineEntry> = cycles
        .iter()
        .cloned()
        .map(TimelineEntry::Cycle)
        .chain(symptoms.iter().cloned().map(TimelineEntry::Symptom))
        .collect();

    feed.sort_by(|a, b| match (a.date(), b.date()) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });

    let undated = feed.iter().filter(|e| e.date().is_none()).count();
    if undated > 0 {
        tracing::debug!("{} timeline entries have no usable date", undated);
    }

    feed
}
