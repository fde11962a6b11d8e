//! Route layer between raw command-line text and core use-cases.
//!
//! # Responsibility
//! - Parse raw text arguments into core types at the boundary.
//! - Call core services with per-call repositories.
//!
//! # Invariants
//! - Settings are loaded per call and passed explicitly into calendar calls.
//! - A missing day argument means today's logical day, never the calendar
//!   date.

use chrono::{Days, Local, NaiveDateTime, Weekday};
use rusqlite::Connection;
use serde::Serialize;
use tracker_core::model::weekday_label;
use tracker_core::{
    date_range, date_range_ids, format_iso_date, parse_count, parse_iso_date,
    parse_settable_status, to_logical_day, to_logical_day_start, today_id, week_start_of,
    BoundaryHour, Category, CategoryRepository, CoreError, CoreResult, DailyHabit, Habit,
    HabitEntry, HabitId, HabitService, ImportReport, ImportResult, ImportService,
    ImportValidation, NewHabit, Settings, SettingsRepository, SqliteCategoryRepository,
    SqliteEntryRepository, SqliteHabitRepository, SqliteImportRepository,
    SqliteSettingsRepository, TrendReport,
};
use uuid::Uuid;

const INSTANT_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogicalDayView {
    pub day: String,
    pub day_start: String,
    pub boundary_hour: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SettingsView {
    pub day_boundary_hour: u32,
    pub week_start: &'static str,
}

impl From<Settings> for SettingsView {
    fn from(value: Settings) -> Self {
        Self {
            day_boundary_hour: value.day_boundary_hour.hour(),
            week_start: weekday_label(value.week_start),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeekView {
    pub week_start: &'static str,
    pub days: Vec<String>,
}

/// Raw habit creation input, as typed on the command line.
#[derive(Debug, Clone, Default)]
pub struct NewHabitArgs {
    pub name: String,
    pub category: Option<String>,
    pub parent: Option<String>,
    pub daily_target: Option<String>,
    pub monthly_target: Option<String>,
    pub priority: Option<i64>,
}

/// Resolves `at` (or now) to its logical day under the stored boundary hour.
pub fn logical_day(conn: &Connection, at: Option<&str>) -> CoreResult<LogicalDayView> {
    let boundary = load_settings(conn)?.day_boundary_hour;
    let instant = match at {
        Some(raw) => parse_instant(raw)?,
        None => Local::now().naive_local(),
    };
    Ok(LogicalDayView {
        day: format_iso_date(to_logical_day(instant, boundary)),
        day_start: to_logical_day_start(instant, boundary)
            .format(INSTANT_FORMATS[0])
            .to_string(),
        boundary_hour: boundary.hour(),
    })
}

/// Inclusive day-id range; empty when `start` is after `end`.
pub fn range(start: &str, end: &str) -> CoreResult<Vec<String>> {
    date_range_ids(start.trim(), end.trim())
}

/// The seven day ids of the week holding `day`, starting on the configured
/// week start.
pub fn week(conn: &Connection, day: Option<&str>) -> CoreResult<WeekView> {
    let settings = load_settings(conn)?;
    let day = resolve_day(conn, day)?;
    let start = week_start_of(parse_iso_date(&day)?, settings.week_start);
    let end = start.checked_add_days(Days::new(6)).unwrap_or(start);
    Ok(WeekView {
        week_start: weekday_label(settings.week_start),
        days: date_range(start, end),
    })
}

pub fn set_status(
    conn: &Connection,
    habit: &str,
    day: Option<&str>,
    status: &str,
    count: Option<&str>,
) -> CoreResult<HabitEntry> {
    let status = parse_settable_status(status)?;
    let count = count.map(parse_count).transpose()?.map(i64::from);
    let habit = parse_id(habit)?;
    let day = resolve_day(conn, day)?;
    with_habit_service(conn, |service| {
        service.set_status(habit, &day, status, count)
    })
}

pub fn cycle(conn: &Connection, habit: &str, day: Option<&str>) -> CoreResult<HabitEntry> {
    let habit = parse_id(habit)?;
    let day = resolve_day(conn, day)?;
    with_habit_service(conn, |service| service.cycle_entry(habit, &day))
}

pub fn set_notes(
    conn: &Connection,
    habit: &str,
    day: Option<&str>,
    notes: Option<String>,
) -> CoreResult<HabitEntry> {
    let habit = parse_id(habit)?;
    let day = resolve_day(conn, day)?;
    with_habit_service(conn, |service| service.set_notes(habit, &day, notes))
}

pub fn trend(conn: &Connection, habit: &str, day: Option<&str>) -> CoreResult<TrendReport> {
    let habit = parse_id(habit)?;
    let day = resolve_day(conn, day)?;
    with_habit_service(conn, |service| service.evaluate_trend(habit, &day))
}

/// Active habits for one logical day, in display order.
pub fn daily(conn: &Connection, day: Option<&str>) -> CoreResult<Vec<DailyHabit>> {
    let day = resolve_day(conn, day)?;
    with_habit_service(conn, |service| service.daily_view(&day))
}

pub fn add_habit(conn: &Connection, args: NewHabitArgs) -> CoreResult<Habit> {
    let category_uuid = match args.category.as_deref() {
        Some(raw) => {
            let id = parse_id(raw)?;
            SqliteCategoryRepository::try_new(conn)?
                .get_category(id, false)?
                .ok_or(CoreError::CategoryNotFound(id))?;
            Some(id)
        }
        None => None,
    };
    let request = NewHabit {
        name: args.name,
        category_uuid,
        parent_uuid: args.parent.as_deref().map(parse_id).transpose()?,
        daily_target: args.daily_target.as_deref().map(parse_count).transpose()?,
        monthly_target: args.monthly_target.as_deref().map(parse_count).transpose()?,
        priority: args.priority,
    };
    with_habit_service(conn, |service| service.create_habit(request))
}

pub fn list_habits(conn: &Connection) -> CoreResult<Vec<Habit>> {
    with_habit_service(conn, |service| service.list_habits())
}

pub fn rename_habit(conn: &Connection, habit: &str, name: &str) -> CoreResult<Habit> {
    let habit = parse_id(habit)?;
    with_habit_service(conn, |service| service.rename_habit(habit, name))
}

/// Re-parents a habit; no parent makes it top-level.
pub fn move_habit(conn: &Connection, habit: &str, parent: Option<&str>) -> CoreResult<Habit> {
    let habit = parse_id(habit)?;
    let parent = parent.map(parse_id).transpose()?;
    with_habit_service(conn, |service| service.move_habit(habit, parent))
}

pub fn delete_habit(conn: &Connection, habit: &str) -> CoreResult<HabitId> {
    let habit = parse_id(habit)?;
    with_habit_service(conn, |service| service.soft_delete_habit(habit))?;
    Ok(habit)
}

pub fn restore_habit(conn: &Connection, habit: &str) -> CoreResult<HabitId> {
    let habit = parse_id(habit)?;
    with_habit_service(conn, |service| service.restore_habit(habit))?;
    Ok(habit)
}

pub fn list_categories(conn: &Connection) -> CoreResult<Vec<Category>> {
    let repo = SqliteCategoryRepository::try_new(conn)?;
    Ok(repo.list_categories(false)?)
}

/// Parses and bulk-writes a habit list.
pub fn import_list(conn: &Connection, content: &str) -> CoreResult<ImportReport> {
    import_service(conn)?.import_list(content)
}

/// Parses a habit list without writing.
pub fn preview_import(conn: &Connection, content: &str) -> CoreResult<ImportResult> {
    Ok(import_service(conn)?.preview(content))
}

pub fn validate_import(conn: &Connection, content: &str) -> CoreResult<ImportValidation> {
    Ok(import_service(conn)?.validate(content))
}

pub fn show_settings(conn: &Connection) -> CoreResult<SettingsView> {
    load_settings(conn).map(SettingsView::from)
}

/// Updates whichever settings are given; others keep their stored value.
pub fn update_settings(
    conn: &Connection,
    boundary_hour: Option<i64>,
    week_start: Option<&str>,
) -> CoreResult<SettingsView> {
    let repo = SqliteSettingsRepository::try_new(conn)?;
    let mut settings = repo.load_settings()?;
    if let Some(hour) = boundary_hour {
        settings.day_boundary_hour = BoundaryHour::new(hour)?;
    }
    if let Some(raw) = week_start {
        settings.week_start = parse_weekday(raw)?;
    }
    repo.save_settings(&settings)?;
    Ok(SettingsView::from(settings))
}

fn with_habit_service<T>(
    conn: &Connection,
    f: impl FnOnce(
        &HabitService<SqliteHabitRepository<'_>, SqliteEntryRepository<'_>>,
    ) -> CoreResult<T>,
) -> CoreResult<T> {
    let habits = SqliteHabitRepository::try_new(conn)?;
    let entries = SqliteEntryRepository::try_new(conn)?;
    f(&HabitService::new(habits, entries))
}

fn import_service(conn: &Connection) -> CoreResult<ImportService<SqliteImportRepository<'_>>> {
    Ok(ImportService::new(SqliteImportRepository::try_new(conn)?))
}

fn load_settings(conn: &Connection) -> CoreResult<Settings> {
    let repo = SqliteSettingsRepository::try_new(conn)?;
    Ok(repo.load_settings()?)
}

fn resolve_day(conn: &Connection, day: Option<&str>) -> CoreResult<String> {
    match day {
        Some(raw) => {
            let trimmed = raw.trim();
            parse_iso_date(trimmed)?;
            Ok(trimmed.to_string())
        }
        None => Ok(today_id(load_settings(conn)?.day_boundary_hour)),
    }
}

fn parse_id(raw: &str) -> CoreResult<HabitId> {
    Uuid::parse_str(raw.trim()).map_err(|_| CoreError::InvalidId(raw.to_string()))
}

fn parse_instant(raw: &str) -> CoreResult<NaiveDateTime> {
    let trimmed = raw.trim();
    INSTANT_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
        .ok_or_else(|| CoreError::InvalidDate(raw.to_string()))
}

fn parse_weekday(raw: &str) -> CoreResult<Weekday> {
    raw.trim()
        .parse::<Weekday>()
        .map_err(|_| CoreError::InvalidWeekStart(raw.to_string()))
}
