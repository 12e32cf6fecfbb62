//! Normalization of raw cycle configuration.
//!
//! Settings may be missing, partial or nonsensical (loaded before defaults
//! were written, typed into a form, or corrupted). Resolution never fails:
//! it always hands the classifier a usable, internally consistent pair.

use crate::config::FertileWindowConfig;
use crate::{CycleConfig, ResolvedConfig};

pub const DEFAULT_CYCLE_LENGTH: i64 = 28;
pub const DEFAULT_PERIOD_LENGTH: i64 = 5;

/// Shortest cycle accepted as real; tolerates polymenorrhea
pub const MIN_CYCLE_LENGTH: i64 = 10;

/// Longest cycle accepted as real; anything above is treated as corrupt
pub const MAX_CYCLE_LENGTH: i64 = 45;

/// Resolve with the default fertile window (5 days before, 1 after)
pub fn resolve_config(raw: &CycleConfig) -> ResolvedConfig {
    resolve_config_with(raw, &FertileWindowConfig::default())
}

/// Resolve a raw config, carrying the configured fertile-window offsets
pub fn resolve_config_with(raw: &CycleConfig, window: &FertileWindowConfig) -> ResolvedConfig {
    let cycle_len = match raw.cycle_avg_length {
        Some(len) if (MIN_CYCLE_LENGTH..=MAX_CYCLE_LENGTH).contains(&len) => len,
        other => {
            tracing::debug!(
                "Cycle length {:?} unset or outside {}..={}, using {}",
                other,
                MIN_CYCLE_LENGTH,
                MAX_CYCLE_LENGTH,
                DEFAULT_CYCLE_LENGTH
            );
            DEFAULT_CYCLE_LENGTH
        }
    };

    let mut period_len = match raw.period_avg_length {
        Some(len) if len >= 1 => len,
        other => {
            tracing::debug!(
                "Period length {:?} unset or non-positive, using {}",
                other,
                DEFAULT_PERIOD_LENGTH
            );
            DEFAULT_PERIOD_LENGTH
        }
    };

    if period_len >= cycle_len {
        tracing::debug!(
            "Period length {} does not fit a {}-day cycle, clamping to {}",
            period_len,
            cycle_len,
            cycle_len - 1
        );
        period_len = cycle_len - 1;
    }

    ResolvedConfig {
        cycle_len,
        period_len,
        fertile_days_before: window.days_before.max(0),
        fertile_days_after: window.days_after.max(0),
    }
}
