//! Bulk persistence of a parsed habit list.
//!
//! # Invariants
//! - One import is one immediate transaction; a failure writes nothing.
//! - An active category with the same fully-qualified name is reused.
//! - Imported rows are appended after existing rows, keeping their relative
//!   import order.

use super::category_repo::{find_active_category, insert_category, next_category_sort_order};
use super::habit_repo::{insert_habit, next_habit_sort_order};
use super::{ensure_connection_ready, RepoResult};
use crate::import::ImportResult;
use crate::model::{Category, CategoryId, Habit, HabitId};
use rusqlite::{Connection, Transaction, TransactionBehavior};
use serde::Serialize;
use std::collections::HashMap;

/// Ids written (or reused) by one import.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportOutcome {
    /// `(fully-qualified name, id)` in import order.
    pub categories: Vec<(String, CategoryId)>,
    pub habits: Vec<HabitId>,
    /// Categories that already existed and were reused.
    pub reused_categories: usize,
}

pub trait ImportRepository {
    fn apply_import(&self, result: &ImportResult) -> RepoResult<ImportOutcome>;
}

pub struct SqliteImportRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteImportRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl ImportRepository for SqliteImportRepository<'_> {
    fn apply_import(&self, result: &ImportResult) -> RepoResult<ImportOutcome> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let mut outcome = ImportOutcome::default();
        let mut ids_by_name: HashMap<&str, CategoryId> = HashMap::new();

        let category_base = next_category_sort_order(&tx)?;
        for imported in &result.categories {
            let id = match find_active_category(&tx, &imported.name)? {
                Some(existing) => {
                    outcome.reused_categories += 1;
                    existing.uuid
                }
                None => {
                    let category = Category::new(
                        imported.name.clone(),
                        category_base + imported.sort_order as i64,
                    );
                    insert_category(&tx, &category)?;
                    category.uuid
                }
            };
            ids_by_name.insert(imported.name.as_str(), id);
            outcome.categories.push((imported.name.clone(), id));
        }

        let habit_base = next_habit_sort_order(&tx)?;
        for imported in &result.habits {
            let mut habit = Habit::new(imported.name.clone());
            habit.category_uuid = imported
                .category
                .as_deref()
                .and_then(|name| ids_by_name.get(name).copied());
            habit.sort_order = habit_base + imported.sort_order as i64;
            habit.validate()?;
            insert_habit(&tx, &habit)?;
            outcome.habits.push(habit.uuid);
        }

        tx.commit()?;
        Ok(outcome)
    }
}
