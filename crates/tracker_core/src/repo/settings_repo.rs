//! Settings repository over the key/value `settings` table.
//!
//! Missing keys fall back to `Settings::default()`; malformed values are
//! reported instead of silently defaulted.

use super::{ensure_connection_ready, RepoError, RepoResult};
use crate::calendar::BoundaryHour;
use crate::model::{weekday_label, Settings};
use chrono::Weekday;
use rusqlite::{params, Connection, OptionalExtension};

const KEY_DAY_BOUNDARY_HOUR: &str = "day_boundary_hour";
const KEY_WEEK_START: &str = "week_start";

pub trait SettingsRepository {
    fn load_settings(&self) -> RepoResult<Settings>;
    fn save_settings(&self, settings: &Settings) -> RepoResult<()>;
}

pub struct SqliteSettingsRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteSettingsRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }

    fn read_value(&self, key: &str) -> RepoResult<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM settings WHERE key = ?1;", [key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    fn write_value(&self, key: &str, value: &str) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO settings (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![key, value],
        )?;
        Ok(())
    }
}

impl SettingsRepository for SqliteSettingsRepository<'_> {
    fn load_settings(&self) -> RepoResult<Settings> {
        let mut settings = Settings::default();

        if let Some(raw) = self.read_value(KEY_DAY_BOUNDARY_HOUR)? {
            settings.day_boundary_hour = raw
                .trim()
                .parse::<i64>()
                .ok()
                .and_then(|hour| BoundaryHour::new(hour).ok())
                .ok_or_else(|| {
                    RepoError::InvalidData(format!(
                        "invalid day boundary hour `{raw}` in settings.{KEY_DAY_BOUNDARY_HOUR}"
                    ))
                })?;
        }

        if let Some(raw) = self.read_value(KEY_WEEK_START)? {
            settings.week_start = raw.trim().parse::<Weekday>().map_err(|_| {
                RepoError::InvalidData(format!(
                    "invalid weekday `{raw}` in settings.{KEY_WEEK_START}"
                ))
            })?;
        }

        Ok(settings)
    }

    fn save_settings(&self, settings: &Settings) -> RepoResult<()> {
        self.write_value(
            KEY_DAY_BOUNDARY_HOUR,
            &settings.day_boundary_hour.to_string(),
        )?;
        self.write_value(KEY_WEEK_START, weekday_label(settings.week_start))?;
        Ok(())
    }
}
