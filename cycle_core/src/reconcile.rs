//! Reconciliation of raw cycle records into a canonical history.
//!
//! Records arrive from several places (repeated fetches, optimistic local
//! inserts alongside their server echoes), so the same cycle can show up
//! more than once, sometimes before it was assigned an id. This is the only
//! place records are dropped, so every decision is logged.

use crate::CycleRecord;
use std::cmp::Ordering;
use std::collections::HashMap;

/// Bonus awarded to a record whose period has been marked as ended
const END_DATE_BONUS: usize = 10;

fn populated(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|s| !s.trim().is_empty())
}

/// Identity of a record: its id, else the date part of its start
///
/// The two kinds live in separate namespaces so an id that happens to
/// look like a date never matches an id-less record.
fn dedup_key(record: &CycleRecord) -> Option<String> {
    if let Some(id) = record.id.as_deref().filter(|id| !id.trim().is_empty()) {
        return Some(format!("id:{}", id));
    }
    let start = record.start_date.as_deref()?.trim();
    let date_part = start.get(..10).unwrap_or(start);
    Some(format!("date:{}", date_part))
}

/// Higher means fuller; an ended period outweighs any number of other fields
pub fn completeness_score(record: &CycleRecord) -> usize {
    let fields = [
        populated(&record.id),
        populated(&record.start_date),
        populated(&record.end_date),
        populated(&record.notes),
        record.pregnancy_start,
    ];
    let filled = fields.iter().filter(|f| **f).count();

    if populated(&record.end_date) {
        END_DATE_BONUS + filled
    } else {
        filled
    }
}

/// Newest first; unparseable starts sink to the end and keep their order
fn by_start_descending(a: &CycleRecord, b: &CycleRecord) -> Ordering {
    match (a.start(), b.start()) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Merge raw records into a duplicate-free, newest-first history
///
/// Records without a start date are discarded. Colliding records keep the
/// one with the higher [`completeness_score`]; on a tie the first seen wins.
/// Reconciling an already canonical history returns it unchanged.
pub fn reconcile_cycles(raw: &[CycleRecord]) -> Vec<CycleRecord> {
    let mut canonical: Vec<CycleRecord> = Vec::with_capacity(raw.len());
    let mut slots: HashMap<String, usize> = HashMap::new();
    let mut discarded = 0;

    for record in raw {
        if !populated(&record.start_date) {
            discarded += 1;
            continue;
        }
        let Some(key) = dedup_key(record) else {
            discarded += 1;
            continue;
        };

        match slots.get(&key) {
            Some(&slot) => {
                let kept = &canonical[slot];
                if completeness_score(record) > completeness_score(kept) {
                    tracing::debug!(
                        "Duplicate cycle {}: replacing score {} with {}",
                        key,
                        completeness_score(kept),
                        completeness_score(record)
                    );
                    canonical[slot] = record.clone();
                } else {
                    tracing::debug!("Duplicate cycle {}: keeping existing record", key);
                }
            }
            None => {
                slots.insert(key, canonical.len());
                canonical.push(record.clone());
            }
        }
    }

    if discarded > 0 {
        tracing::warn!("Discarded {} cycle records without a start date", discarded);
    }

    canonical.sort_by(by_start_descending);

    tracing::debug!(
        "Reconciled {} raw cycle records into {}",
        raw.len(),
        canonical.len()
    );

    canonical
}
