//! Habit entry domain model.
//!
//! # Invariants
//! - One entry per `(habit_uuid, day)`; `day` is always `YYYY-MM-DD`.
//! - Entries are never deleted; soft-delete applies to the parent habit.
//! - `count` is only meaningful for count-based habits.

use super::habit::HabitId;
use crate::status::HabitStatus;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HabitEntry {
    pub habit_uuid: HabitId,
    /// Logical day identifier.
    pub day: String,
    pub status: HabitStatus,
    pub count: Option<u32>,
    pub notes: Option<String>,
}

impl HabitEntry {
    /// Creates a blank entry for `(habit, day)`.
    pub fn new(habit_uuid: HabitId, day: impl Into<String>) -> Self {
        Self {
            habit_uuid,
            day: day.into(),
            status: HabitStatus::Empty,
            count: None,
            notes: None,
        }
    }
}
