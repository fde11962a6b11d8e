//! Calendar resolver: wall-clock instants to logical days.
//!
//! # Responsibility
//! - Own the single day-boundary rule every date-sensitive feature uses.
//! - Convert calendar dates to and from the `YYYY-MM-DD` wire format.
//!
//! # Invariants
//! - For boundary `b` and instant `t`, the logical day is `date(t)` when
//!   `hour(t) >= b`, otherwise `date(t) - 1 day`.
//! - The boundary hour is always a call parameter, never cached state.
//! - "Today"/"past" checks go through `to_logical_day_id` only.

use crate::error::{CoreError, CoreResult};
use chrono::{Datelike, Days, Local, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Weekday};
use std::fmt::{Display, Formatter};

/// `strftime` pattern of the persisted logical-day representation.
pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

const DEFAULT_BOUNDARY_HOUR: u8 = 6;

/// Hour of day (0..=23) at which a new logical day begins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BoundaryHour(u8);

impl BoundaryHour {
    /// Midnight boundary: logical days equal calendar days.
    pub const MIDNIGHT: BoundaryHour = BoundaryHour(0);

    /// Validates and wraps a boundary hour.
    ///
    /// # Errors
    /// - `CoreError::InvalidBoundaryHour` when `hour` is outside `0..=23`.
    pub fn new(hour: i64) -> CoreResult<Self> {
        match u8::try_from(hour) {
            Ok(value) if value <= 23 => Ok(Self(value)),
            _ => Err(CoreError::InvalidBoundaryHour(hour)),
        }
    }

    pub fn hour(self) -> u32 {
        u32::from(self.0)
    }
}

impl Default for BoundaryHour {
    fn default() -> Self {
        Self(DEFAULT_BOUNDARY_HOUR)
    }
}

impl TryFrom<i64> for BoundaryHour {
    type Error = CoreError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl Display for BoundaryHour {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Resolves the logical day an instant belongs to.
pub fn to_logical_day(instant: NaiveDateTime, boundary: BoundaryHour) -> NaiveDate {
    let date = instant.date();
    if instant.hour() >= boundary.hour() {
        date
    } else {
        date.pred_opt().unwrap_or(NaiveDate::MIN)
    }
}

/// Resolves the logical day of `instant` as a `YYYY-MM-DD` identifier.
pub fn to_logical_day_id(instant: NaiveDateTime, boundary: BoundaryHour) -> String {
    format_iso_date(to_logical_day(instant, boundary))
}

/// Resolves the logical day of `instant` normalized to local midnight.
///
/// Used as a stable grouping/sort key.
pub fn to_logical_day_start(instant: NaiveDateTime, boundary: BoundaryHour) -> NaiveDateTime {
    to_logical_day(instant, boundary).and_time(NaiveTime::MIN)
}

/// Formats a calendar date as zero-padded `YYYY-MM-DD`.
pub fn format_iso_date(date: NaiveDate) -> String {
    date.format(ISO_DATE_FORMAT).to_string()
}

/// Parses a strict `YYYY-MM-DD` identifier.
///
/// # Errors
/// - `CoreError::InvalidDate` for unpadded, malformed, or impossible dates.
pub fn parse_iso_date(value: &str) -> CoreResult<NaiveDate> {
    let bytes = value.as_bytes();
    let shaped = bytes.len() == 10
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && bytes
            .iter()
            .enumerate()
            .all(|(index, byte)| index == 4 || index == 7 || byte.is_ascii_digit());
    if !shaped {
        return Err(CoreError::InvalidDate(value.to_string()));
    }

    NaiveDate::parse_from_str(value, ISO_DATE_FORMAT)
        .map_err(|_| CoreError::InvalidDate(value.to_string()))
}

/// Parses a `YYYY-MM-DD` identifier into its local-midnight instant.
pub fn parse_iso_date_start(value: &str) -> CoreResult<NaiveDateTime> {
    Ok(parse_iso_date(value)?.and_time(NaiveTime::MIN))
}

/// Returns every day from `start` to `end`, both inclusive.
///
/// A reversed range yields an empty list rather than an error.
pub fn date_range(start: NaiveDate, end: NaiveDate) -> Vec<String> {
    if start > end {
        return Vec::new();
    }
    start
        .iter_days()
        .take_while(|day| *day <= end)
        .map(format_iso_date)
        .collect()
}

/// String-typed variant of [`date_range`] for wire inputs.
pub fn date_range_ids(start: &str, end: &str) -> CoreResult<Vec<String>> {
    Ok(date_range(parse_iso_date(start)?, parse_iso_date(end)?))
}

/// Signed whole days from `start` to `end`.
pub fn days_between(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days()
}

/// First day of the calendar month containing `date`.
pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Number of days in the calendar month containing `date`.
pub fn days_in_month(date: NaiveDate) -> u32 {
    if date.month() == 12 {
        return 31;
    }
    NaiveDate::from_ymd_opt(date.year(), date.month() + 1, 1)
        .and_then(|next| next.pred_opt())
        .map_or(31, |last| last.day())
}

/// First day of the week containing `date`, given the configured week start.
pub fn week_start_of(date: NaiveDate, week_start: Weekday) -> NaiveDate {
    let offset = (date.weekday().num_days_from_monday() + 7
        - week_start.num_days_from_monday())
        % 7;
    date.checked_sub_days(Days::new(u64::from(offset)))
        .unwrap_or(date)
}

/// Logical day identifier of the current local time.
pub fn today_id(boundary: BoundaryHour) -> String {
    to_logical_day_id(Local::now().naive_local(), boundary)
}

/// Returns true when `date_id` is before the logical day of `now`.
///
/// # Errors
/// - `InvalidDate` when `date_id` is not a zero-padded `YYYY-MM-DD` id.
pub fn is_past_at(date_id: &str, boundary: BoundaryHour, now: NaiveDateTime) -> CoreResult<bool> {
    Ok(parse_iso_date(date_id)? < to_logical_day(now, boundary))
}

/// Returns true when `date_id` is the logical day of `now`.
pub fn is_effectively_today_at(
    date_id: &str,
    boundary: BoundaryHour,
    now: NaiveDateTime,
) -> CoreResult<bool> {
    Ok(parse_iso_date(date_id)? == to_logical_day(now, boundary))
}

/// [`is_past_at`] against the local wall clock.
pub fn is_past(date_id: &str, boundary: BoundaryHour) -> CoreResult<bool> {
    is_past_at(date_id, boundary, Local::now().naive_local())
}

/// [`is_effectively_today_at`] against the local wall clock.
pub fn is_effectively_today(date_id: &str, boundary: BoundaryHour) -> CoreResult<bool> {
    is_effectively_today_at(date_id, boundary, Local::now().naive_local())
}
