//! Habit entry repository contracts and SQLite implementation.
//!
//! # Invariants
//! - At most one row per `(habit_uuid, day)`.
//! - Upsert is a single `INSERT ... ON CONFLICT DO UPDATE` statement, so the
//!   per-key read-modify-write is atomic at the storage layer.
//! - Entries are never deleted.

use super::{ensure_connection_ready, parse_optional_u32, parse_uuid, RepoError, RepoResult};
use crate::model::{HabitEntry, HabitId};
use crate::status::HabitStatus;
use rusqlite::{params, Connection, Row};

const ENTRY_SELECT_SQL: &str = "SELECT habit_uuid, day, status, count, notes FROM habit_entries";

/// Repository interface for per-day habit entries.
pub trait EntryRepository {
    fn get_entry(&self, habit_uuid: HabitId, day: &str) -> RepoResult<Option<HabitEntry>>;
    /// Creates or overwrites the entry for `(entry.habit_uuid, entry.day)`.
    fn upsert_entry(&self, entry: &HabitEntry) -> RepoResult<HabitEntry>;
    /// Entries of one habit with `from <= day <= to`, ordered by day.
    fn list_entries(&self, habit_uuid: HabitId, from: &str, to: &str)
        -> RepoResult<Vec<HabitEntry>>;
    /// Entries of every habit on one day.
    fn list_entries_for_day(&self, day: &str) -> RepoResult<Vec<HabitEntry>>;
}

/// SQLite-backed entry repository.
pub struct SqliteEntryRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteEntryRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl EntryRepository for SqliteEntryRepository<'_> {
    fn get_entry(&self, habit_uuid: HabitId, day: &str) -> RepoResult<Option<HabitEntry>> {
        let mut stmt = self.conn.prepare(&format!(
            "{ENTRY_SELECT_SQL} WHERE habit_uuid = ?1 AND day = ?2;"
        ))?;
        let mut rows = stmt.query(params![habit_uuid.to_string(), day])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_entry_row(row)?));
        }
        Ok(None)
    }

    fn upsert_entry(&self, entry: &HabitEntry) -> RepoResult<HabitEntry> {
        self.conn.execute(
            "INSERT INTO habit_entries (habit_uuid, day, status, count, notes)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(habit_uuid, day) DO UPDATE SET
                status = excluded.status,
                count = excluded.count,
                notes = excluded.notes,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![
                entry.habit_uuid.to_string(),
                entry.day.as_str(),
                entry.status.as_str(),
                entry.count,
                entry.notes.as_deref(),
            ],
        )?;

        self.get_entry(entry.habit_uuid, &entry.day)?
            .ok_or_else(|| {
                RepoError::InvalidData(format!(
                    "entry for habit {} on {} missing after upsert",
                    entry.habit_uuid, entry.day
                ))
            })
    }

    fn list_entries(
        &self,
        habit_uuid: HabitId,
        from: &str,
        to: &str,
    ) -> RepoResult<Vec<HabitEntry>> {
        let mut stmt = self.conn.prepare(&format!(
            "{ENTRY_SELECT_SQL}
             WHERE habit_uuid = ?1
               AND day >= ?2
               AND day <= ?3
             ORDER BY day ASC;"
        ))?;
        let mut rows = stmt.query(params![habit_uuid.to_string(), from, to])?;
        let mut entries = Vec::new();
        while let Some(row) = rows.next()? {
            entries.push(parse_entry_row(row)?);
        }
        Ok(entries)
    }

    fn list_entries_for_day(&self, day: &str) -> RepoResult<Vec<HabitEntry>> {
        let mut stmt = self.conn.prepare(&format!(
            "{ENTRY_SELECT_SQL} WHERE day = ?1 ORDER BY habit_uuid ASC;"
        ))?;
        let mut rows = stmt.query([day])?;
        let mut entries = Vec::new();
        while let Some(row) = rows.next()? {
            entries.push(parse_entry_row(row)?);
        }
        Ok(entries)
    }
}

fn parse_entry_row(row: &Row<'_>) -> RepoResult<HabitEntry> {
    let habit_text: String = row.get("habit_uuid")?;
    let status_text: String = row.get("status")?;
    let status = status_text.parse::<HabitStatus>().map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid status `{status_text}` in habit_entries.status"
        ))
    })?;

    Ok(HabitEntry {
        habit_uuid: parse_uuid(&habit_text, "habit_entries.habit_uuid")?,
        day: row.get("day")?,
        status,
        count: parse_optional_u32(row.get("count")?, "habit_entries.count")?,
        notes: row.get("notes")?,
    })
}
