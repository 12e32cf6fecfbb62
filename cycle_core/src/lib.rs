#![forbid(unsafe_code)]

//! Calendar-state derivation for cycle and pregnancy tracking.
//!
//! This crate provides:
//! - Domain types (cycle records, symptoms, pregnancies, derived values)
//! - Pure derivations: config resolution, phase classification and
//!   prediction, reconciliation, statistics, gestational dating, timeline
//! - Record sources (JSONL) and CSV export for the host application
//!
//! Derivations take immutable snapshots and return fresh values; none of
//! them touch the filesystem.

pub mod types;
pub mod error;
pub mod config;
pub mod logging;
pub mod date_math;
pub mod resolve;
pub mod phase;
pub mod reconcile;
pub mod stats;
pub mod gestation;
pub mod timeline;
pub mod source;
pub mod export;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use config::Config;
pub use resolve::{resolve_config, resolve_config_with};
pub use phase::{classify_day, classify_with_history, month_phases, predict};
pub use reconcile::reconcile_cycles;
pub use stats::compute_stats;
pub use gestation::{gestational_age, GestationalAge, NextMilestone};
pub use timeline::merge_timeline;
pub use source::{load_cycle_sources, load_pregnancy, load_symptoms};
pub use export::export_history_csv;
