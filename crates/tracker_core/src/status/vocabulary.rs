//! Closed status vocabulary and quick-toggle cycle.

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Per-day status of a habit entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HabitStatus {
    /// No status recorded yet.
    #[default]
    Empty,
    Complete,
    Missed,
    Partial,
    /// Not applicable today.
    Na,
    /// Excused; does not count for or against the habit.
    Exempt,
    /// Done beyond what was planned.
    Extra,
    /// Derived off-pace overlay. Never user-settable.
    Trending,
    Pink,
}

impl HabitStatus {
    /// Every member of the vocabulary.
    pub const ALL: [HabitStatus; 9] = [
        Self::Empty,
        Self::Complete,
        Self::Missed,
        Self::Partial,
        Self::Na,
        Self::Exempt,
        Self::Extra,
        Self::Trending,
        Self::Pink,
    ];

    /// Quick-toggle order; the successor of the last item is the first.
    pub const CYCLE: [HabitStatus; 8] = [
        Self::Empty,
        Self::Complete,
        Self::Missed,
        Self::Partial,
        Self::Na,
        Self::Exempt,
        Self::Extra,
        Self::Pink,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Complete => "complete",
            Self::Missed => "missed",
            Self::Partial => "partial",
            Self::Na => "na",
            Self::Exempt => "exempt",
            Self::Extra => "extra",
            Self::Trending => "trending",
            Self::Pink => "pink",
        }
    }

    /// Next status in the quick-toggle cycle.
    pub fn next(self) -> Self {
        cycle_status(self)
    }

    /// False only for the derived `trending` overlay.
    pub fn is_user_settable(self) -> bool {
        self != Self::Trending
    }

    /// Statuses counted as completions by pace evaluation.
    pub fn counts_toward_target(self) -> bool {
        matches!(self, Self::Complete | Self::Extra)
    }
}

impl Display for HabitStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HabitStatus {
    type Err = CoreError;

    /// Parses an exact vocabulary member; nothing is coerced.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == value)
            .ok_or_else(|| CoreError::InvalidStatus(value.to_string()))
    }
}

/// Returns the successor of `current` in the quick-toggle cycle.
///
/// `empty → complete → missed → partial → na → exempt → extra → pink → empty`.
/// The `trending` overlay sits on top of an otherwise empty cell, so it
/// advances like `empty`.
pub fn cycle_status(current: HabitStatus) -> HabitStatus {
    let position = HabitStatus::CYCLE
        .iter()
        .position(|status| *status == current)
        .unwrap_or(0);
    HabitStatus::CYCLE[(position + 1) % HabitStatus::CYCLE.len()]
}

/// Parses a raw status and returns its cycle successor.
///
/// # Errors
/// - `CoreError::InvalidStatus` when `value` is outside the vocabulary.
pub fn cycle_status_str(value: &str) -> CoreResult<HabitStatus> {
    value.parse::<HabitStatus>().map(cycle_status)
}

/// Parses a status a user may set directly.
///
/// # Errors
/// - `CoreError::InvalidStatus` for unknown values and for `trending`.
pub fn parse_settable_status(value: &str) -> CoreResult<HabitStatus> {
    let status = value.parse::<HabitStatus>()?;
    ensure_settable(status)?;
    Ok(status)
}

pub(crate) fn ensure_settable(status: HabitStatus) -> CoreResult<()> {
    if status.is_user_settable() {
        Ok(())
    } else {
        Err(CoreError::InvalidStatus(status.as_str().to_string()))
    }
}

/// Validates a signed count for count-based habits.
///
/// # Errors
/// - `CoreError::InvalidCount` for negative or out-of-range values.
pub fn validate_count(count: i64) -> CoreResult<u32> {
    u32::try_from(count).map_err(|_| CoreError::InvalidCount(count.to_string()))
}

/// Parses a raw count from text.
///
/// # Errors
/// - `CoreError::InvalidCount` for non-integer, negative, or out-of-range text.
pub fn parse_count(value: &str) -> CoreResult<u32> {
    let parsed = value
        .trim()
        .parse::<i64>()
        .map_err(|_| CoreError::InvalidCount(value.to_string()))?;
    validate_count(parsed)
}
