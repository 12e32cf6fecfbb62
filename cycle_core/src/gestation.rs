//! Gestational dating for an active pregnancy.
//!
//! Pregnancy is dated from the first day of the last menstrual period (LMP)
//! using the 40-week convention. The prenatal milestone schedule is fixed
//! and ordered by gestational week.

use crate::date_math::{add_days, days_between};
use crate::{CycleRecord, Error, PregnancyRecord, Result};
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use serde::Serialize;

/// 40 weeks from LMP to the estimated due date
pub const GESTATION_DAYS: i64 = 280;

/// A prenatal check-up scheduled at a gestational week
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct Milestone {
    pub week: i64,
    pub title: &'static str,
    pub description: &'static str,
}

/// The milestone to show next
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct NextMilestone {
    pub milestone: Milestone,
    /// Whole weeks until the milestone week; 0 when it is this week
    pub weeks_until: i64,
    /// Every milestone is behind; `milestone` is the last one
    pub completed: bool,
}

/// Elapsed time since LMP and what comes next
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct GestationalAge {
    pub weeks: i64,
    pub days: i64,
    pub due_date: NaiveDate,
    pub days_until_due: i64,
    pub trimester: u8,
    pub next_milestone: NextMilestone,
}

static SCHEDULE: Lazy<Vec<Milestone>> = Lazy::new(build_schedule);

fn build_schedule() -> Vec<Milestone> {
    vec![
        Milestone {
            week: 8,
            title: "First prenatal visit",
            description: "Confirm pregnancy, dating ultrasound, baseline blood work",
        },
        Milestone {
            week: 12,
            title: "First-trimester screening",
            description: "Nuchal translucency scan and combined screening",
        },
        Milestone {
            week: 16,
            title: "Second-trimester blood work",
            description: "Maternal serum screening",
        },
        Milestone {
            week: 20,
            title: "Anatomy scan",
            description: "Detailed morphology ultrasound",
        },
        Milestone {
            week: 24,
            title: "Glucose screening",
            description: "Gestational diabetes test (weeks 24-28)",
        },
        Milestone {
            week: 28,
            title: "Third-trimester check",
            description: "Blood count and Rh antibody screening",
        },
        Milestone {
            week: 32,
            title: "Growth scan",
            description: "Fetal growth and position ultrasound",
        },
        Milestone {
            week: 36,
            title: "Group B strep test",
            description: "GBS swab and birth plan review",
        },
        Milestone {
            week: 40,
            title: "Due date",
            description: "Estimated date of delivery",
        },
    ]
}

/// The fixed milestone schedule, ascending by week
pub fn milestone_schedule() -> &'static [Milestone] {
    &SCHEDULE
}

/// First milestone at or after `weeks`, or the last one once all are done
pub fn next_milestone(weeks: i64) -> Option<NextMilestone> {
    let schedule = milestone_schedule();
    match schedule.iter().find(|m| m.week >= weeks) {
        Some(milestone) => Some(NextMilestone {
            milestone: milestone.clone(),
            weeks_until: milestone.week - weeks,
            completed: false,
        }),
        None => schedule.last().map(|milestone| NextMilestone {
            milestone: milestone.clone(),
            weeks_until: 0,
            completed: true,
        }),
    }
}

fn trimester(weeks: i64) -> u8 {
    match weeks {
        w if w < 14 => 1,
        w if w < 28 => 2,
        _ => 3,
    }
}

/// Date a pregnancy from its LMP
///
/// A last period after `today` cannot be dated and returns
/// [`Error::FutureLastPeriod`]; callers must handle it before formatting.
pub fn gestational_age(last_period: NaiveDate, today: NaiveDate) -> Result<GestationalAge> {
    let elapsed = days_between(today, last_period);
    if elapsed < 0 {
        tracing::warn!(
            "Last period {} is {} days in the future",
            last_period,
            -elapsed
        );
        return Err(Error::FutureLastPeriod { last_period, today });
    }

    let weeks = elapsed / 7;
    let due_date = due_date_for(last_period).ok_or(Error::DateOutOfRange(last_period))?;
    let next_milestone = next_milestone(weeks)
        .ok_or_else(|| Error::Other("Milestone schedule is empty".into()))?;

    Ok(GestationalAge {
        weeks,
        days: elapsed % 7,
        due_date,
        days_until_due: days_between(due_date, today),
        trimester: trimester(weeks),
        next_milestone,
    })
}

/// Estimated due date, 280 days after the LMP
pub fn due_date_for(last_period: NaiveDate) -> Option<NaiveDate> {
    add_days(last_period, GESTATION_DAYS)
}

impl PregnancyRecord {
    /// Start tracking a pregnancy from its LMP
    ///
    /// `None` if the due date would fall outside the calendar.
    pub fn start(last_period_date: NaiveDate) -> Option<Self> {
        Some(Self {
            last_period_date,
            due_date: due_date_for(last_period_date)?,
            is_active: true,
        })
    }

    /// Derive a pregnancy from a cycle record marked as its start
    pub fn from_cycle(record: &CycleRecord) -> Option<Self> {
        if !record.pregnancy_start {
            return None;
        }
        let lmp = record.start()?;
        tracing::info!("Cycle starting {} marks a pregnancy", lmp);
        Self::start(lmp)
    }

    /// Concluded copy of this pregnancy; tracking returns to cycles
    pub fn end(&self) -> Self {
        Self {
            is_active: false,
            ..self.clone()
        }
    }

    /// Gestational age as of `today`
    pub fn age(&self, today: NaiveDate) -> Result<GestationalAge> {
        gestational_age(self.last_period_date, today)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_ten_weeks_exactly() {
        let today = d(2024, 6, 1);
        let lmp = add_days(today, -70).unwrap();
        let age = gestational_age(lmp, today).unwrap();

        assert_eq!(age.weeks, 10);
        assert_eq!(age.days, 0);
        assert_eq!(Some(age.due_date), add_days(lmp, 280));
        assert_eq!(age.trimester, 1);
        assert_eq!(age.next_milestone.milestone.week, 12);
        assert_eq!(age.next_milestone.weeks_until, 2);
        assert!(!age.next_milestone.completed);
    }

    #[test]
    fn test_weeks_and_days() {
        let age = gestational_age(d(2024, 1, 1), d(2024, 3, 1)).unwrap();
        // 60 days
        assert_eq!(age.weeks, 8);
        assert_eq!(age.days, 4);
        assert_eq!(age.next_milestone.milestone.week, 8);
        assert_eq!(age.next_milestone.weeks_until, 0);
    }

    #[test]
    fn test_same_day_is_week_zero() {
        let age = gestational_age(d(2024, 1, 1), d(2024, 1, 1)).unwrap();
        assert_eq!((age.weeks, age.days), (0, 0));
        assert_eq!(age.days_until_due, 280);
        assert_eq!(age.next_milestone.milestone.title, "First prenatal visit");
    }

    #[test]
    fn test_future_lmp_is_rejected() {
        let result = gestational_age(d(2024, 1, 2), d(2024, 1, 1));
        assert!(matches!(result, Err(Error::FutureLastPeriod { .. })));
    }

    #[test]
    fn test_due_date_out_of_range() {
        let result = gestational_age(NaiveDate::MAX, NaiveDate::MAX);
        assert!(matches!(result, Err(Error::DateOutOfRange(_))));
        assert!(PregnancyRecord::start(NaiveDate::MAX).is_none());
    }

    #[test]
    fn test_past_schedule_falls_back_to_last_milestone() {
        let lmp = d(2024, 1, 1);
        let age = gestational_age(lmp, add_days(lmp, 41 * 7 + 3).unwrap()).unwrap();

        assert_eq!(age.weeks, 41);
        assert_eq!(age.trimester, 3);
        assert!(age.days_until_due < 0);
        assert!(age.next_milestone.completed);
        assert_eq!(age.next_milestone.milestone.week, 40);
    }

    #[test]
    fn test_schedule_is_ascending() {
        let weeks: Vec<i64> = milestone_schedule().iter().map(|m| m.week).collect();
        let mut sorted = weeks.clone();
        sorted.sort();
        assert_eq!(weeks, sorted);
        assert_eq!(weeks.last(), Some(&40));
    }

    #[test]
    fn test_pregnancy_lifecycle() {
        let mut record = CycleRecord::starting("2024-02-10");
        assert!(PregnancyRecord::from_cycle(&record).is_none());

        record.pregnancy_start = true;
        let pregnancy = PregnancyRecord::from_cycle(&record).unwrap();
        assert!(pregnancy.is_active);
        assert_eq!(pregnancy.due_date, d(2024, 11, 16));

        let ended = pregnancy.end();
        assert!(!ended.is_active);
        assert!(pregnancy.is_active);
        assert_eq!(ended.last_period_date, pregnancy.last_period_date);
    }

    #[test]
    fn test_stored_due_date_is_rederived() {
        let json = r#"{"last_period_date":"2024-01-01","due_date":"1999-01-01"}"#;
        let pregnancy: PregnancyRecord = serde_json::from_str(json).unwrap();
        assert_eq!(pregnancy.due_date, d(2024, 10, 7));
        assert!(pregnancy.is_active);
    }
}
