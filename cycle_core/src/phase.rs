//! Phase classification and cycle predictions.
//!
//! The active cycle is anchored on its start date and assumed to repeat
//! every `cycle_len` days. Within a cycle:
//! - days `0..period_len` are the period
//! - ovulation falls on day `cycle_len - 14` (fixed luteal phase)
//! - the fertile window spans the configured days around ovulation
//!
//! Checks run in that order and the first match wins, so on very short
//! cycles the period takes precedence over an overlapping fertile window.

use crate::date_math::{add_days, day_in_cycle, days_between};
use crate::{CycleRecord, DateWindow, Phase, Prediction, ResolvedConfig};
use chrono::{Datelike, NaiveDate};

/// Luteal phase length in days. Not configurable: a known approximation.
pub const LUTEAL_PHASE_DAYS: i64 = 14;

/// Day index of ovulation within a cycle (may be negative for tiny cycles)
pub fn ovulation_day_index(config: &ResolvedConfig) -> i64 {
    config.cycle_len - LUTEAL_PHASE_DAYS
}

/// Classify `query` relative to a cycle that started on `active_start`
///
/// Dates before the active cycle have no retroactive phase.
pub fn classify_day(active_start: NaiveDate, config: &ResolvedConfig, query: NaiveDate) -> Phase {
    let diff = days_between(query, active_start);
    if diff < 0 {
        return Phase::None;
    }

    let day = day_in_cycle(diff, config.cycle_len);
    if day < config.period_len {
        return Phase::Period;
    }

    let ovulation = ovulation_day_index(config);
    if day == ovulation {
        return Phase::Ovulation;
    }

    if (ovulation - config.fertile_days_before..=ovulation + config.fertile_days_after)
        .contains(&day)
    {
        return Phase::Fertile;
    }

    Phase::None
}

/// Start of the most recent cycle in a history, the classifier's anchor
pub fn active_cycle_start(history: &[CycleRecord]) -> Option<NaiveDate> {
    history.iter().filter_map(CycleRecord::start).max()
}

/// Classify against the latest cycle of a history; `None` without one
pub fn classify_with_history(
    history: &[CycleRecord],
    config: &ResolvedConfig,
    query: NaiveDate,
) -> Phase {
    match active_cycle_start(history) {
        Some(start) => classify_day(start, config, query),
        None => {
            tracing::debug!("No cycle with a usable start date, nothing to anchor on");
            Phase::None
        }
    }
}

/// Predict the next period and the fertility dates of the cycle before it
///
/// The next period starts on the first cycle boundary strictly after
/// `today`. If `today` predates the anchor, the boundary right after the
/// anchor is used. Returns `None` when a predicted date falls outside
/// the representable calendar.
pub fn predict(
    active_start: NaiveDate,
    config: &ResolvedConfig,
    today: NaiveDate,
) -> Option<Prediction> {
    let prediction = project(active_start, config, today);
    if prediction.is_none() {
        tracing::warn!(
            "Cannot predict from {} with a {}-day cycle: date out of range",
            active_start,
            config.cycle_len
        );
    }
    prediction
}

fn project(
    active_start: NaiveDate,
    config: &ResolvedConfig,
    today: NaiveDate,
) -> Option<Prediction> {
    let cycle_len = config.cycle_len.max(1);
    let elapsed = days_between(today, active_start).max(0);
    let cycles_ahead = elapsed / cycle_len + 1;
    let next_period_start = add_days(active_start, cycles_ahead.checked_mul(cycle_len)?)?;
    let next_period_end = add_days(next_period_start, config.period_len - 1)?;

    let ovulation_date = add_days(next_period_start, -LUTEAL_PHASE_DAYS)?;
    let fertile_window = DateWindow {
        start: add_days(ovulation_date, -config.fertile_days_before)?,
        end: add_days(ovulation_date, config.fertile_days_after)?,
    };

    Some(Prediction {
        next_period_start,
        next_period_end,
        ovulation_date,
        fertile_window,
    })
}

/// Phase of every day in a calendar month; empty for an invalid month
pub fn month_phases(
    active_start: NaiveDate,
    config: &ResolvedConfig,
    year: i32,
    month: u32,
) -> Vec<(NaiveDate, Phase)> {
    let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
        return Vec::new();
    };

    first
        .iter_days()
        .take_while(|day| day.month() == month)
        .map(|day| (day, classify_day(active_start, config, day)))
        .collect()
}
