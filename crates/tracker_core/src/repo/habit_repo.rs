//! Habit repository contracts and SQLite implementation.
//!
//! # Invariants
//! - Listing order is deterministic: `sort_order ASC, uuid ASC`.
//! - Soft-deleted habits are hidden unless explicitly requested.

use super::{
    bool_to_int, ensure_connection_ready, parse_bool, parse_optional_u32, parse_optional_uuid,
    parse_uuid, RepoError, RepoResult,
};
use crate::model::{CategoryId, Habit, HabitId};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};

const HABIT_SELECT_SQL: &str = "SELECT
    uuid,
    name,
    category_uuid,
    parent_uuid,
    daily_target,
    monthly_target,
    priority,
    sort_order,
    is_deleted
FROM habits";

/// Query options for listing habits.
#[derive(Debug, Clone, Default)]
pub struct HabitListQuery {
    pub category_uuid: Option<CategoryId>,
    /// Restrict to direct children of this composite habit.
    pub parent_uuid: Option<HabitId>,
    pub include_deleted: bool,
}

/// Repository interface for habit persistence.
pub trait HabitRepository {
    fn create_habit(&self, habit: &Habit) -> RepoResult<HabitId>;
    fn update_habit(&self, habit: &Habit) -> RepoResult<()>;
    fn get_habit(&self, id: HabitId, include_deleted: bool) -> RepoResult<Option<Habit>>;
    fn list_habits(&self, query: &HabitListQuery) -> RepoResult<Vec<Habit>>;
    fn soft_delete_habit(&self, id: HabitId) -> RepoResult<()>;
    fn restore_habit(&self, id: HabitId) -> RepoResult<()>;
    /// Sort order one past the current maximum.
    fn next_sort_order(&self) -> RepoResult<i64>;
}

/// SQLite-backed habit repository.
pub struct SqliteHabitRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteHabitRepository<'conn> {
    /// Creates repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl HabitRepository for SqliteHabitRepository<'_> {
    fn create_habit(&self, habit: &Habit) -> RepoResult<HabitId> {
        habit.validate()?;
        insert_habit(self.conn, habit)?;
        Ok(habit.uuid)
    }

    fn update_habit(&self, habit: &Habit) -> RepoResult<()> {
        habit.validate()?;

        let changed = self.conn.execute(
            "UPDATE habits
             SET
                name = ?1,
                category_uuid = ?2,
                parent_uuid = ?3,
                daily_target = ?4,
                monthly_target = ?5,
                priority = ?6,
                sort_order = ?7,
                is_deleted = ?8,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?9;",
            params![
                habit.name.trim(),
                habit.category_uuid.map(|id| id.to_string()),
                habit.parent_uuid.map(|id| id.to_string()),
                habit.daily_target,
                habit.monthly_target,
                habit.priority,
                habit.sort_order,
                bool_to_int(habit.is_deleted),
                habit.uuid.to_string(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::HabitNotFound(habit.uuid));
        }
        Ok(())
    }

    fn get_habit(&self, id: HabitId, include_deleted: bool) -> RepoResult<Option<Habit>> {
        let mut stmt = self.conn.prepare(&format!(
            "{HABIT_SELECT_SQL}
             WHERE uuid = ?1
               AND (?2 = 1 OR is_deleted = 0);"
        ))?;

        let mut rows = stmt.query(params![id.to_string(), bool_to_int(include_deleted)])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_habit_row(row)?));
        }
        Ok(None)
    }

    fn list_habits(&self, query: &HabitListQuery) -> RepoResult<Vec<Habit>> {
        let mut sql = format!("{HABIT_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if !query.include_deleted {
            sql.push_str(" AND is_deleted = 0");
        }
        if let Some(category_uuid) = query.category_uuid {
            sql.push_str(" AND category_uuid = ?");
            bind_values.push(Value::Text(category_uuid.to_string()));
        }
        if let Some(parent_uuid) = query.parent_uuid {
            sql.push_str(" AND parent_uuid = ?");
            bind_values.push(Value::Text(parent_uuid.to_string()));
        }
        sql.push_str(" ORDER BY sort_order ASC, uuid ASC");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut habits = Vec::new();
        while let Some(row) = rows.next()? {
            habits.push(parse_habit_row(row)?);
        }
        Ok(habits)
    }

    fn soft_delete_habit(&self, id: HabitId) -> RepoResult<()> {
        set_deleted(self.conn, id, true)
    }

    fn restore_habit(&self, id: HabitId) -> RepoResult<()> {
        set_deleted(self.conn, id, false)
    }

    fn next_sort_order(&self) -> RepoResult<i64> {
        next_habit_sort_order(self.conn)
    }
}

pub(crate) fn insert_habit(conn: &Connection, habit: &Habit) -> RepoResult<()> {
    conn.execute(
        "INSERT INTO habits (
            uuid,
            name,
            category_uuid,
            parent_uuid,
            daily_target,
            monthly_target,
            priority,
            sort_order,
            is_deleted
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9);",
        params![
            habit.uuid.to_string(),
            habit.name.trim(),
            habit.category_uuid.map(|id| id.to_string()),
            habit.parent_uuid.map(|id| id.to_string()),
            habit.daily_target,
            habit.monthly_target,
            habit.priority,
            habit.sort_order,
            bool_to_int(habit.is_deleted),
        ],
    )?;
    Ok(())
}

pub(crate) fn next_habit_sort_order(conn: &Connection) -> RepoResult<i64> {
    let next: i64 = conn.query_row(
        "SELECT COALESCE(MAX(sort_order) + 1, 0) FROM habits;",
        [],
        |row| row.get(0),
    )?;
    Ok(next)
}

fn set_deleted(conn: &Connection, id: HabitId, deleted: bool) -> RepoResult<()> {
    let changed = conn.execute(
        "UPDATE habits
         SET
            is_deleted = ?1,
            updated_at = (strftime('%s', 'now') * 1000)
         WHERE uuid = ?2;",
        params![bool_to_int(deleted), id.to_string()],
    )?;

    if changed == 0 {
        return Err(RepoError::HabitNotFound(id));
    }
    Ok(())
}

fn parse_habit_row(row: &Row<'_>) -> RepoResult<Habit> {
    let uuid_text: String = row.get("uuid")?;
    let habit = Habit {
        uuid: parse_uuid(&uuid_text, "habits.uuid")?,
        name: row.get("name")?,
        category_uuid: parse_optional_uuid(row.get("category_uuid")?, "habits.category_uuid")?,
        parent_uuid: parse_optional_uuid(row.get("parent_uuid")?, "habits.parent_uuid")?,
        daily_target: parse_optional_u32(row.get("daily_target")?, "habits.daily_target")?,
        monthly_target: parse_optional_u32(row.get("monthly_target")?, "habits.monthly_target")?,
        priority: row.get("priority")?,
        sort_order: row.get("sort_order")?,
        is_deleted: parse_bool(row.get("is_deleted")?, "habits.is_deleted")?,
    };
    habit.validate()?;
    Ok(habit)
}
