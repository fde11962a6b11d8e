//! Core domain logic for the habit tracker.
//! This crate is the single source of truth for calendar, status, and import
//! invariants.

pub mod calendar;
pub mod db;
pub mod error;
pub mod import;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod status;

pub use calendar::{
    date_range, date_range_ids, days_between, days_in_month, format_iso_date,
    is_effectively_today, is_effectively_today_at, is_past, is_past_at, month_start,
    parse_iso_date, parse_iso_date_start, to_logical_day, to_logical_day_id,
    to_logical_day_start, today_id, week_start_of, BoundaryHour,
};
pub use error::{CoreError, CoreResult};
pub use import::{
    parse as parse_list, parse_for_import, validate as validate_list, ImportResult, ImportStats,
    ImportValidation, ImportedCategory, ImportedHabit,
};
pub use logging::{
    default_log_level, flush_logging, init_logging, init_logging_with, logging_status, LogConfig,
};
pub use model::{Category, CategoryId, Habit, HabitEntry, HabitId, Settings};
pub use repo::category_repo::{CategoryRepository, SqliteCategoryRepository};
pub use repo::entry_repo::{EntryRepository, SqliteEntryRepository};
pub use repo::habit_repo::{HabitListQuery, HabitRepository, SqliteHabitRepository};
pub use repo::import_repo::{ImportOutcome, ImportRepository, SqliteImportRepository};
pub use repo::settings_repo::{SettingsRepository, SqliteSettingsRepository};
pub use repo::{RepoError, RepoResult};
pub use service::habit_service::{DailyHabit, HabitService, NewHabit};
pub use service::import_service::{ImportReport, ImportService};
pub use status::{
    compare_for_display, cycle_status, cycle_status_str, evaluate_trend, parse_count,
    parse_settable_status, sort_for_display, validate_count, DisplayKey, HabitStatus,
    TrendReport, TrendVerdict,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
