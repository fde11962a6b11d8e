//! Monthly pace evaluation.
//!
//! Linear elapsed-time model: a habit is on pace when the completions so far,
//! projected over the whole month, reach the monthly target.

use crate::calendar::{days_in_month, days_between, format_iso_date, month_start};
use crate::model::{Habit, HabitEntry};
use chrono::NaiveDate;
use serde::Serialize;

/// Outcome class for one habit in its current period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendVerdict {
    OnPace,
    /// Off pace with days still remaining; drives the `trending` overlay.
    Trending,
    /// Off pace with the period over.
    Missed,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendReport {
    pub on_pace: bool,
    /// `complete`/`extra` entries from period start through the as-of day.
    pub completed_count: u32,
    /// Completions a linear pace would have reached by the as-of day.
    pub expected_count: f64,
    /// Days of the period after the as-of day.
    pub remaining_days: u32,
    /// Days of the period up to and including the as-of day.
    pub elapsed_days: u32,
    pub period_days: u32,
    pub verdict: TrendVerdict,
}

impl TrendReport {
    /// Whether the derived `trending` overlay should be shown.
    pub fn is_trending(&self) -> bool {
        self.verdict == TrendVerdict::Trending
    }
}

/// Evaluates `habit` against its monthly target as of `as_of`.
///
/// Only entries of `habit` dated inside the month of `as_of`, up to `as_of`,
/// are counted. A habit without a monthly target is always on pace.
pub fn evaluate_trend(habit: &Habit, entries: &[HabitEntry], as_of: NaiveDate) -> TrendReport {
    let period_start = month_start(as_of);
    let period_days = days_in_month(as_of);
    let elapsed_days = u32::try_from(days_between(period_start, as_of) + 1).unwrap_or(1);
    let remaining_days = period_days.saturating_sub(elapsed_days);

    let start_id = format_iso_date(period_start);
    let as_of_id = format_iso_date(as_of);
    let completed_count = entries
        .iter()
        .filter(|entry| entry.habit_uuid == habit.uuid)
        .filter(|entry| entry.day.as_str() >= start_id.as_str() && entry.day <= as_of_id)
        .filter(|entry| entry.status.counts_toward_target())
        .count() as u32;

    let elapsed_fraction = f64::from(elapsed_days) / f64::from(period_days);
    let (on_pace, expected_count) = match habit.monthly_target {
        None => (true, 0.0),
        Some(target) => {
            let projected = f64::from(completed_count) / elapsed_fraction;
            (
                projected >= f64::from(target),
                f64::from(target) * elapsed_fraction,
            )
        }
    };

    let verdict = if on_pace {
        TrendVerdict::OnPace
    } else if remaining_days > 0 {
        TrendVerdict::Trending
    } else {
        TrendVerdict::Missed
    };

    TrendReport {
        on_pace,
        completed_count,
        expected_count,
        remaining_days,
        elapsed_days,
        period_days,
        verdict,
    }
}
