//! Aggregate statistics over a canonical cycle history.

use crate::date_math::days_between;
use crate::{CycleRecord, Stats};

/// Lengths of each completed cycle, oldest first
///
/// A cycle's length is the gap between its start and the next later start.
/// Records whose start cannot be parsed are ignored, and records sharing a
/// start day (a local insert next to its server copy) count as one start.
pub fn cycle_lengths(history: &[CycleRecord]) -> Vec<i64> {
    let mut starts: Vec<_> = history.iter().filter_map(CycleRecord::start).collect();
    starts.sort();
    starts.dedup();
    starts
        .windows(2)
        .map(|pair| days_between(pair[1], pair[0]))
        .collect()
}

/// Inclusive period lengths of records that have a usable end date
pub fn period_lengths(history: &[CycleRecord]) -> Vec<i64> {
    history.iter().filter_map(CycleRecord::period_length).collect()
}

/// Mean rounded to the nearest whole day; 0 without samples
fn rounded_mean(samples: &[i64]) -> i64 {
    if samples.is_empty() {
        return 0;
    }
    let sum: i64 = samples.iter().sum();
    (sum as f64 / samples.len() as f64).round() as i64
}

/// Compute summary statistics
///
/// An empty history yields all zeros; a single cycle has no defined
/// length, so the range stays at zero until a second one exists.
pub fn compute_stats(history: &[CycleRecord]) -> Stats {
    let cycles = cycle_lengths(history);
    let periods = period_lengths(history);

    let stats = Stats {
        total_cycles: history.len(),
        avg_cycle_length: rounded_mean(&cycles),
        avg_period_length: rounded_mean(&periods),
        cycle_range_min: cycles.iter().copied().min().unwrap_or(0),
        cycle_range_max: cycles.iter().copied().max().unwrap_or(0),
    };

    tracing::debug!(
        "Computed stats over {} cycles ({} lengths, {} periods)",
        stats.total_cycles,
        cycles.len(),
        periods.len()
    );

    stats
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cycle(start: &str, end: Option<&str>) -> CycleRecord {
        CycleRecord {
            end_date: end.map(String::from),
            ..CycleRecord::starting(start)
        }
    }

    #[test]
    fn test_empty_history_is_all_zero() {
        assert_eq!(compute_stats(&[]), Stats::default());
    }

    #[test]
    fn test_single_cycle_has_no_range() {
        let stats = compute_stats(&[cycle("2024-01-01", Some("2024-01-05"))]);
        assert_eq!(stats.total_cycles, 1);
        assert_eq!(stats.cycle_range_min, 0);
        assert_eq!(stats.cycle_range_max, 0);
        assert_eq!(stats.avg_cycle_length, 0);
        assert_eq!(stats.avg_period_length, 5);
    }

    #[test]
    fn test_lengths_and_range() {
        // Canonical histories are newest first; stats must not care
        let history = vec![
            cycle("2024-03-27", None),
            cycle("2024-02-27", Some("2024-03-02")),
            cycle("2024-01-29", Some("2024-02-01")),
            cycle("2024-01-01", Some("2024-01-05")),
        ];
        let stats = compute_stats(&history);

        assert_eq!(cycle_lengths(&history), vec![28, 29, 29]);
        assert_eq!(stats.total_cycles, 4);
        assert_eq!(stats.avg_cycle_length, 29); // 86 / 3 = 28.67
        assert_eq!(stats.avg_period_length, 5); // (5 + 4 + 5) / 3 = 4.67
        assert_eq!(stats.cycle_range_min, 28);
        assert_eq!(stats.cycle_range_max, 29);
    }

    #[test]
    fn test_half_day_rounds_up() {
        let history = vec![
            cycle("2024-01-01", Some("2024-01-04")),
            cycle("2024-01-29", Some("2024-02-02")),
        ];
        // Periods of 4 and 5 days
        assert_eq!(compute_stats(&history).avg_period_length, 5);
    }

    #[test]
    fn test_unusable_records_are_counted_but_not_sampled() {
        let history = vec![
            cycle("2024-02-01", Some("2024-01-20")), // end before start
            cycle("whenever", Some("2024-01-03")),
            cycle("2024-01-01", Some("bad")),
        ];
        let stats = compute_stats(&history);

        assert_eq!(stats.total_cycles, 3);
        assert_eq!(stats.avg_period_length, 0);
        assert_eq!(stats.avg_cycle_length, 31);
        assert_eq!(stats.cycle_range_min, 31);
        assert_eq!(stats.cycle_range_max, 31);
    }

    #[test]
    fn test_shared_start_day_is_not_a_zero_length_cycle() {
        // Both survive reconciliation: different keys, same day
        let history = crate::reconcile_cycles(&[
            cycle("2024-01-29", None),
            CycleRecord {
                id: Some("srv-2".into()),
                ..cycle("2024-01-29", None)
            },
            cycle("2024-01-01", Some("2024-01-05")),
        ]);
        assert_eq!(history.len(), 3);

        let stats = compute_stats(&history);
        assert_eq!(cycle_lengths(&history), vec![28]);
        assert_eq!(stats.total_cycles, 3);
        assert_eq!(stats.avg_cycle_length, 28);
        assert_eq!(stats.cycle_range_min, 28);
    }
}
