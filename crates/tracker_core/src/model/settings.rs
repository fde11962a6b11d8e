//! Process-wide tracker settings.
//!
//! Settings are read at request time and passed into calendar calls
//! explicitly; nothing in the core caches them.

use crate::calendar::BoundaryHour;
use chrono::Weekday;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    /// Hour at which a new logical day begins.
    pub day_boundary_hour: BoundaryHour,
    /// First day of the week for weekly views.
    pub week_start: Weekday,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            day_boundary_hour: BoundaryHour::default(),
            week_start: Weekday::Mon,
        }
    }
}

/// Lowercase full weekday name used in persisted settings.
pub fn weekday_label(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "monday",
        Weekday::Tue => "tuesday",
        Weekday::Wed => "wednesday",
        Weekday::Thu => "thursday",
        Weekday::Fri => "friday",
        Weekday::Sat => "saturday",
        Weekday::Sun => "sunday",
    }
}
