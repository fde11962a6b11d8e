//! Habit domain model.
//!
//! # Responsibility
//! - Define the canonical habit record and its soft-delete lifecycle.
//! - Express composite habits as a parent identifier, never as embedded
//!   child collections.
//!
//! # Invariants
//! - `uuid` is stable and never reused for another habit.
//! - `name` is non-blank after trim.
//! - `parent_uuid` never equals `uuid`; deeper cycles are rejected by the
//!   service layer before persistence.

use super::category::CategoryId;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for habits.
pub type HabitId = Uuid;

/// Record-level validation failures for habits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HabitValidationError {
    /// Name is empty after trim.
    BlankName,
    /// Habit references itself as parent.
    SelfParent(HabitId),
}

impl Display for HabitValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankName => write!(f, "habit name must not be blank"),
            Self::SelfParent(id) => write!(f, "habit {id} cannot be its own parent"),
        }
    }
}

impl Error for HabitValidationError {}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Habit {
    /// Stable global ID.
    pub uuid: HabitId,
    pub name: String,
    /// Optional category membership.
    pub category_uuid: Option<CategoryId>,
    /// Optional composite parent. `None` means a top-level habit.
    pub parent_uuid: Option<HabitId>,
    /// Daily count threshold. Presence makes the habit count-based.
    pub daily_target: Option<u32>,
    /// Completions expected per calendar month, used by pace evaluation.
    pub monthly_target: Option<u32>,
    /// Display priority; lower sorts first, `None` sorts last.
    pub priority: Option<i64>,
    /// Stable order key within a listing.
    pub sort_order: i64,
    /// Soft delete tombstone.
    pub is_deleted: bool,
}

impl Habit {
    /// Creates a top-level habit with a generated stable ID.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4(), name)
    }

    /// Creates a habit with a caller-provided stable ID.
    ///
    /// Does not validate; persistence paths call [`Habit::validate`].
    pub fn with_id(uuid: HabitId, name: impl Into<String>) -> Self {
        Self {
            uuid,
            name: name.into(),
            category_uuid: None,
            parent_uuid: None,
            daily_target: None,
            monthly_target: None,
            priority: None,
            sort_order: 0,
            is_deleted: false,
        }
    }

    /// Checks record-level invariants.
    pub fn validate(&self) -> Result<(), HabitValidationError> {
        if self.name.trim().is_empty() {
            return Err(HabitValidationError::BlankName);
        }
        if self.parent_uuid == Some(self.uuid) {
            return Err(HabitValidationError::SelfParent(self.uuid));
        }
        Ok(())
    }

    /// Count-based habits carry a per-day count alongside their status.
    pub fn is_count_based(&self) -> bool {
        self.daily_target.is_some()
    }

    pub fn soft_delete(&mut self) {
        self.is_deleted = true;
    }

    pub fn restore(&mut self) {
        self.is_deleted = false;
    }

    pub fn is_active(&self) -> bool {
        !self.is_deleted
    }
}
