//! Category repository contracts and SQLite implementation.
//!
//! # Invariants
//! - Categories are matched by exact fully-qualified name.
//! - Listing order is deterministic: `sort_order ASC, uuid ASC`.

use super::{bool_to_int, ensure_connection_ready, parse_bool, parse_uuid, RepoError, RepoResult};
use crate::model::{Category, CategoryId};
use rusqlite::{params, Connection, OptionalExtension, Row};

const CATEGORY_SELECT_SQL: &str = "SELECT uuid, name, sort_order, is_deleted FROM categories";

/// Repository interface for category persistence.
pub trait CategoryRepository {
    fn create_category(&self, category: &Category) -> RepoResult<CategoryId>;
    fn get_category(&self, id: CategoryId, include_deleted: bool)
        -> RepoResult<Option<Category>>;
    /// Finds an active category by fully-qualified name.
    fn find_category_by_name(&self, name: &str) -> RepoResult<Option<Category>>;
    fn list_categories(&self, include_deleted: bool) -> RepoResult<Vec<Category>>;
    fn soft_delete_category(&self, id: CategoryId) -> RepoResult<()>;
    fn restore_category(&self, id: CategoryId) -> RepoResult<()>;
}

/// SQLite-backed category repository.
pub struct SqliteCategoryRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCategoryRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl CategoryRepository for SqliteCategoryRepository<'_> {
    fn create_category(&self, category: &Category) -> RepoResult<CategoryId> {
        insert_category(self.conn, category)?;
        Ok(category.uuid)
    }

    fn get_category(
        &self,
        id: CategoryId,
        include_deleted: bool,
    ) -> RepoResult<Option<Category>> {
        let mut stmt = self.conn.prepare(&format!(
            "{CATEGORY_SELECT_SQL}
             WHERE uuid = ?1
               AND (?2 = 1 OR is_deleted = 0);"
        ))?;
        let mut rows = stmt.query(params![id.to_string(), bool_to_int(include_deleted)])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_category_row(row)?));
        }
        Ok(None)
    }

    fn find_category_by_name(&self, name: &str) -> RepoResult<Option<Category>> {
        find_active_category(self.conn, name)
    }

    fn list_categories(&self, include_deleted: bool) -> RepoResult<Vec<Category>> {
        let mut stmt = self.conn.prepare(&format!(
            "{CATEGORY_SELECT_SQL}
             WHERE (?1 = 1 OR is_deleted = 0)
             ORDER BY sort_order ASC, uuid ASC;"
        ))?;
        let mut rows = stmt.query([bool_to_int(include_deleted)])?;
        let mut categories = Vec::new();
        while let Some(row) = rows.next()? {
            categories.push(parse_category_row(row)?);
        }
        Ok(categories)
    }

    fn soft_delete_category(&self, id: CategoryId) -> RepoResult<()> {
        set_deleted(self.conn, id, true)
    }

    fn restore_category(&self, id: CategoryId) -> RepoResult<()> {
        set_deleted(self.conn, id, false)
    }
}

pub(crate) fn insert_category(conn: &Connection, category: &Category) -> RepoResult<()> {
    conn.execute(
        "INSERT INTO categories (uuid, name, sort_order, is_deleted)
         VALUES (?1, ?2, ?3, ?4);",
        params![
            category.uuid.to_string(),
            category.name.as_str(),
            category.sort_order,
            bool_to_int(category.is_deleted),
        ],
    )?;
    Ok(())
}

pub(crate) fn find_active_category(conn: &Connection, name: &str) -> RepoResult<Option<Category>> {
    conn.query_row(
        &format!(
            "{CATEGORY_SELECT_SQL}
             WHERE name = ?1
               AND is_deleted = 0
             ORDER BY sort_order ASC, uuid ASC
             LIMIT 1;"
        ),
        [name],
        |row| Ok(parse_category_row(row)),
    )
    .optional()?
    .transpose()
}

pub(crate) fn next_category_sort_order(conn: &Connection) -> RepoResult<i64> {
    let next: i64 = conn.query_row(
        "SELECT COALESCE(MAX(sort_order) + 1, 0) FROM categories;",
        [],
        |row| row.get(0),
    )?;
    Ok(next)
}

fn set_deleted(conn: &Connection, id: CategoryId, deleted: bool) -> RepoResult<()> {
    let changed = conn.execute(
        "UPDATE categories
         SET
            is_deleted = ?1,
            updated_at = (strftime('%s', 'now') * 1000)
         WHERE uuid = ?2;",
        params![bool_to_int(deleted), id.to_string()],
    )?;
    if changed == 0 {
        return Err(RepoError::CategoryNotFound(id));
    }
    Ok(())
}

fn parse_category_row(row: &Row<'_>) -> RepoResult<Category> {
    let uuid_text: String = row.get("uuid")?;
    Ok(Category {
        uuid: parse_uuid(&uuid_text, "categories.uuid")?,
        name: row.get("name")?,
        sort_order: row.get("sort_order")?,
        is_deleted: parse_bool(row.get("is_deleted")?, "categories.is_deleted")?,
    })
}
