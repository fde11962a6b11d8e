//! Habit and entry use-case service.
//!
//! # Responsibility
//! - Validate status/count input at the boundary and upsert entries.
//! - Guard the composite-habit tree against self-reference and cycles.
//! - Assemble pace reports and the ordered per-day habit list.
//!
//! # Invariants
//! - `trending` is never written from user input.
//! - Counts are only stored for count-based habits.
//! - Upserting the same `(habit, day, status, count)` twice yields the same
//!   entry.

use crate::calendar::{format_iso_date, month_start, parse_iso_date};
use crate::error::{CoreError, CoreResult};
use crate::model::{CategoryId, Habit, HabitEntry, HabitId};
use crate::repo::entry_repo::EntryRepository;
use crate::repo::habit_repo::{HabitListQuery, HabitRepository};
use crate::status::{
    cycle_status, ensure_settable, evaluate_trend, sort_for_display, validate_count, DisplayKey,
    HabitStatus, TrendReport,
};
use chrono::NaiveDate;
use log::info;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// Input for creating one habit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewHabit {
    pub name: String,
    pub category_uuid: Option<CategoryId>,
    pub parent_uuid: Option<HabitId>,
    pub daily_target: Option<u32>,
    pub monthly_target: Option<u32>,
    pub priority: Option<i64>,
}

/// One row of a day's habit list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyHabit {
    pub habit: Habit,
    pub entry: Option<HabitEntry>,
    /// Stored status, or `trending` when an empty cell is off pace.
    pub display_status: HabitStatus,
    pub trend: TrendReport,
}

/// Habit service facade over repository implementations.
pub struct HabitService<H: HabitRepository, E: EntryRepository> {
    habits: H,
    entries: E,
}

impl<H: HabitRepository, E: EntryRepository> HabitService<H, E> {
    pub fn new(habits: H, entries: E) -> Self {
        Self { habits, entries }
    }

    /// Creates one habit, appended after existing habits.
    ///
    /// # Errors
    /// - `InvalidName` for a blank name.
    /// - `HabitNotFound` when the parent is missing or soft-deleted.
    pub fn create_habit(&self, request: NewHabit) -> CoreResult<Habit> {
        let name = normalize_name(&request.name)?;
        if let Some(parent_uuid) = request.parent_uuid {
            self.require_habit(parent_uuid)?;
        }

        let mut habit = Habit::new(name);
        habit.category_uuid = request.category_uuid;
        habit.parent_uuid = request.parent_uuid;
        habit.daily_target = request.daily_target;
        habit.monthly_target = request.monthly_target;
        habit.priority = request.priority;
        habit.sort_order = self.habits.next_sort_order()?;
        self.habits.create_habit(&habit)?;

        info!(
            "event=habit_create module=service status=ok habit={} has_parent={}",
            habit.uuid,
            habit.parent_uuid.is_some()
        );
        Ok(habit)
    }

    /// Loads one active habit.
    pub fn get_habit(&self, habit_uuid: HabitId) -> CoreResult<Habit> {
        self.require_habit(habit_uuid)
    }

    /// Lists active habits in stored order.
    pub fn list_habits(&self) -> CoreResult<Vec<Habit>> {
        Ok(self.habits.list_habits(&HabitListQuery::default())?)
    }

    /// Lists the direct children of a composite habit.
    pub fn children(&self, habit_uuid: HabitId) -> CoreResult<Vec<Habit>> {
        self.require_habit(habit_uuid)?;
        let query = HabitListQuery {
            parent_uuid: Some(habit_uuid),
            ..HabitListQuery::default()
        };
        Ok(self.habits.list_habits(&query)?)
    }

    pub fn rename_habit(&self, habit_uuid: HabitId, name: &str) -> CoreResult<Habit> {
        let mut habit = self.require_habit(habit_uuid)?;
        habit.name = normalize_name(name)?;
        self.habits.update_habit(&habit)?;
        Ok(habit)
    }

    /// Re-parents a habit; `None` makes it top-level.
    ///
    /// # Errors
    /// - `CycleDetected` when the new parent is the habit or a descendant.
    pub fn move_habit(
        &self,
        habit_uuid: HabitId,
        new_parent_uuid: Option<HabitId>,
    ) -> CoreResult<Habit> {
        let mut habit = self.require_habit(habit_uuid)?;

        if let Some(parent_uuid) = new_parent_uuid {
            if parent_uuid != habit_uuid {
                self.require_habit(parent_uuid)?;
            }
            if parent_uuid == habit_uuid || self.would_create_cycle(habit_uuid, parent_uuid)? {
                return Err(CoreError::CycleDetected {
                    habit_id: habit_uuid,
                    parent_id: parent_uuid,
                });
            }
        }

        habit.parent_uuid = new_parent_uuid;
        self.habits.update_habit(&habit)?;
        Ok(habit)
    }

    pub fn soft_delete_habit(&self, habit_uuid: HabitId) -> CoreResult<()> {
        self.habits.soft_delete_habit(habit_uuid)?;
        info!("event=habit_delete module=service status=ok habit={habit_uuid}");
        Ok(())
    }

    pub fn restore_habit(&self, habit_uuid: HabitId) -> CoreResult<()> {
        self.habits.restore_habit(habit_uuid)?;
        info!("event=habit_restore module=service status=ok habit={habit_uuid}");
        Ok(())
    }

    /// Creates or overwrites the entry for `(habit, day)`.
    ///
    /// A `None` count keeps the stored count. Counts are ignored for habits
    /// that are not count-based.
    ///
    /// # Errors
    /// - `InvalidStatus` for `trending`.
    /// - `InvalidCount` for negative or out-of-range counts.
    /// - `InvalidDate` for a malformed day.
    /// - `HabitNotFound` when the habit is missing or soft-deleted.
    pub fn set_status(
        &self,
        habit_uuid: HabitId,
        day: &str,
        status: HabitStatus,
        count: Option<i64>,
    ) -> CoreResult<HabitEntry> {
        ensure_settable(status)?;
        let count = count.map(validate_count).transpose()?;
        parse_iso_date(day)?;
        let habit = self.require_habit(habit_uuid)?;

        let mut entry = self
            .entries
            .get_entry(habit_uuid, day)?
            .unwrap_or_else(|| HabitEntry::new(habit_uuid, day));
        entry.status = status;
        if habit.is_count_based() {
            if let Some(count) = count {
                entry.count = Some(count);
            }
        } else {
            entry.count = None;
        }

        let saved = self.entries.upsert_entry(&entry)?;
        info!(
            "event=entry_upsert module=service status=ok habit={} day={} value={}",
            habit_uuid, day, saved.status
        );
        Ok(saved)
    }

    /// Advances the entry for `(habit, day)` one step in the quick-toggle cycle.
    pub fn cycle_entry(&self, habit_uuid: HabitId, day: &str) -> CoreResult<HabitEntry> {
        parse_iso_date(day)?;
        self.require_habit(habit_uuid)?;
        let current = self
            .entries
            .get_entry(habit_uuid, day)?
            .map_or(HabitStatus::Empty, |entry| entry.status);
        self.set_status(habit_uuid, day, cycle_status(current), None)
    }

    /// Replaces the notes of an entry, creating an empty entry if needed.
    pub fn set_notes(
        &self,
        habit_uuid: HabitId,
        day: &str,
        notes: Option<String>,
    ) -> CoreResult<HabitEntry> {
        parse_iso_date(day)?;
        self.require_habit(habit_uuid)?;
        let mut entry = self
            .entries
            .get_entry(habit_uuid, day)?
            .unwrap_or_else(|| HabitEntry::new(habit_uuid, day));
        entry.notes = notes
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty());
        Ok(self.entries.upsert_entry(&entry)?)
    }

    /// Loads the stored entry, if any.
    pub fn get_entry(&self, habit_uuid: HabitId, day: &str) -> CoreResult<Option<HabitEntry>> {
        parse_iso_date(day)?;
        Ok(self.entries.get_entry(habit_uuid, day)?)
    }

    /// Evaluates monthly pace for one habit as of `as_of_day`.
    pub fn evaluate_trend(&self, habit_uuid: HabitId, as_of_day: &str) -> CoreResult<TrendReport> {
        let as_of = parse_iso_date(as_of_day)?;
        let habit = self.require_habit(habit_uuid)?;
        self.trend_for(&habit, as_of_day, as_of)
    }

    /// Active habits with their entry for `day`, in display order.
    pub fn daily_view(&self, day: &str) -> CoreResult<Vec<DailyHabit>> {
        let as_of = parse_iso_date(day)?;
        let habits = self.habits.list_habits(&HabitListQuery::default())?;
        let mut entries: HashMap<HabitId, HabitEntry> = self
            .entries
            .list_entries_for_day(day)?
            .into_iter()
            .map(|entry| (entry.habit_uuid, entry))
            .collect();

        let mut rows = Vec::with_capacity(habits.len());
        for habit in habits {
            let entry = entries.remove(&habit.uuid);
            let trend = self.trend_for(&habit, day, as_of)?;
            let stored = entry
                .as_ref()
                .map_or(HabitStatus::Empty, |entry| entry.status);
            let display_status = if stored == HabitStatus::Empty && trend.is_trending() {
                HabitStatus::Trending
            } else {
                stored
            };
            rows.push(DailyHabit {
                habit,
                entry,
                display_status,
                trend,
            });
        }

        sort_for_display(&mut rows, |row| DisplayKey {
            status: row.display_status,
            priority: row.habit.priority,
            sort_order: row.habit.sort_order,
        });
        Ok(rows)
    }

    fn trend_for(
        &self,
        habit: &Habit,
        as_of_day: &str,
        as_of: NaiveDate,
    ) -> CoreResult<TrendReport> {
        let period_start = format_iso_date(month_start(as_of));
        let entries = self
            .entries
            .list_entries(habit.uuid, &period_start, as_of_day)?;
        Ok(evaluate_trend(habit, &entries, as_of))
    }

    fn require_habit(&self, habit_uuid: HabitId) -> CoreResult<Habit> {
        self.habits
            .get_habit(habit_uuid, false)?
            .ok_or(CoreError::HabitNotFound(habit_uuid))
    }

    fn would_create_cycle(
        &self,
        habit_uuid: HabitId,
        candidate_parent_uuid: HabitId,
    ) -> CoreResult<bool> {
        let mut visited = HashSet::new();
        let mut cursor = Some(candidate_parent_uuid);
        while let Some(current) = cursor {
            if current == habit_uuid || !visited.insert(current) {
                return Ok(true);
            }
            // Deleted ancestors still hold the chain together.
            cursor = self
                .habits
                .get_habit(current, true)?
                .and_then(|node| node.parent_uuid);
        }
        Ok(false)
    }
}

fn normalize_name(value: &str) -> CoreResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CoreError::InvalidName);
    }
    Ok(trimmed.to_string())
}
