//! Core domain types for cycle and pregnancy tracking.
//!
//! This module defines the fundamental types used throughout the system:
//! - Raw records as they arrive from storage (string dates, optional fields)
//! - User cycle configuration, raw and resolved
//! - Derived values (phases, predictions, statistics, timeline entries)

use crate::date_math;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

// ============================================================================
// Cycle Records
// ============================================================================

/// A cycle record as persisted: one period start, optionally its end.
///
/// Dates are kept in their wire form (`YYYY-MM-DD`) so a malformed value
/// survives reconciliation and can be sunk to the end of a listing instead
/// of failing the whole load.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CycleRecord {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    /// Marks the record as the start of a pregnancy
    #[serde(default)]
    pub pregnancy_start: bool,
}

impl CycleRecord {
    /// Convenience constructor for a record with only a start date
    pub fn starting(start_date: impl Into<String>) -> Self {
        Self {
            start_date: Some(start_date.into()),
            ..Self::default()
        }
    }

    /// Parsed start date, `None` if absent or malformed
    pub fn start(&self) -> Option<NaiveDate> {
        self.start_date.as_deref().and_then(date_math::parse_date)
    }

    /// Parsed end date, `None` if absent or malformed
    pub fn end(&self) -> Option<NaiveDate> {
        self.end_date.as_deref().and_then(date_math::parse_date)
    }

    /// Inclusive period length in days, when the record has a usable end
    pub fn period_length(&self) -> Option<i64> {
        let start = self.start()?;
        let end = self.end()?;
        let days = date_math::days_between(end, start);
        (days >= 0).then_some(days + 1)
    }
}

// ============================================================================
// Configuration
// ============================================================================

/// Raw per-user cycle configuration, possibly partial or out of range
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CycleConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cycle_avg_length: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period_avg_length: Option<i64>,
}

/// Normalized configuration consumed by the phase classifier
#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub cycle_len: i64,
    pub period_len: i64,
    pub fertile_days_before: i64,
    pub fertile_days_after: i64,
}

// ============================================================================
// Derived Values
// ============================================================================

/// Phase of a calendar day relative to the active cycle
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Period,
    Fertile,
    Ovulation,
    None,
}

impl Phase {
    pub fn label(&self) -> &'static str {
        match self {
            Phase::Period => "period",
            Phase::Fertile => "fertile",
            Phase::Ovulation => "ovulation",
            Phase::None => "none",
        }
    }
}

/// Inclusive date range
#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Upcoming period and fertility dates, derived on demand
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct Prediction {
    pub next_period_start: NaiveDate,
    pub next_period_end: NaiveDate,
    pub ovulation_date: NaiveDate,
    pub fertile_window: DateWindow,
}

/// Aggregate statistics over a canonical cycle history
#[derive(Clone, Debug, Default, Serialize, PartialEq, Eq)]
pub struct Stats {
    pub total_cycles: usize,
    pub avg_cycle_length: i64,
    pub avg_period_length: i64,
    pub cycle_range_min: i64,
    pub cycle_range_max: i64,
}

// ============================================================================
// Symptoms
// ============================================================================

/// Self-reported mood
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Mood {
    Happy,
    Calm,
    Sad,
    Anxious,
    Irritable,
    Tired,
}

/// Menstrual flow intensity
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FlowIntensity {
    Light,
    Medium,
    Heavy,
}

/// A daily symptom log entry; more than one may exist for a date
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SymptomEntry {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub mood: Option<Mood>,
    #[serde(default)]
    pub flow_intensity: Option<FlowIntensity>,
    /// 0 (none) to 10 (worst)
    #[serde(default)]
    pub pain_level: Option<u8>,
    #[serde(default)]
    pub symptoms: BTreeSet<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl SymptomEntry {
    pub fn day(&self) -> Option<NaiveDate> {
        self.date.as_deref().and_then(date_math::parse_date)
    }
}

// ============================================================================
// Timeline
// ============================================================================

/// Origin of a history feed entry
#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    Cycle,
    Symptom,
}

/// One entry of the merged history feed
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
#[serde(tag = "origin", content = "record", rename_all = "snake_case")]
pub enum TimelineEntry {
    Cycle(CycleRecord),
    Symptom(SymptomEntry),
}

impl TimelineEntry {
    pub fn origin(&self) -> Origin {
        match self {
            TimelineEntry::Cycle(_) => Origin::Cycle,
            TimelineEntry::Symptom(_) => Origin::Symptom,
        }
    }

    /// Date the entry is filed under (cycle start, or symptom day)
    pub fn date(&self) -> Option<NaiveDate> {
        match self {
            TimelineEntry::Cycle(record) => record.start(),
            TimelineEntry::Symptom(entry) => entry.day(),
        }
    }
}

// ============================================================================
// Pregnancy
// ============================================================================

/// An active or concluded pregnancy, dated from the last menstrual period
///
/// `due_date` is always derived from `last_period_date`; a stored value is
/// ignored on load.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(try_from = "PregnancyWire")]
pub struct PregnancyRecord {
    pub last_period_date: NaiveDate,
    pub due_date: NaiveDate,
    pub is_active: bool,
}

#[derive(Deserialize)]
struct PregnancyWire {
    last_period_date: NaiveDate,
    #[serde(default = "default_active")]
    is_active: bool,
}

fn default_active() -> bool {
    true
}

impl TryFrom<PregnancyWire> for PregnancyRecord {
    type Error = crate::Error;

    fn try_from(wire: PregnancyWire) -> crate::Result<Self> {
        let due_date = crate::gestation::due_date_for(wire.last_period_date)
            .ok_or(crate::Error::DateOutOfRange(wire.last_period_date))?;
        Ok(Self {
            last_period_date: wire.last_period_date,
            due_date,
            is_active: wire.is_active,
        })
    }
}
