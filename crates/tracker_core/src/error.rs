//! Core error kinds shared by engine, importer, and services.
//!
//! # Responsibility
//! - Name every rejection the core can produce with a stable code.
//! - Give route collaborators an HTTP-style status for each kind.
//!
//! # Invariants
//! - Calendar and status computations over well-formed inputs never fail.
//! - Every validation kind maps to a 400-class status; none is fatal.

use crate::model::{CategoryId, HabitId, HabitValidationError};
use crate::repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Result alias used by core use-case APIs.
pub type CoreResult<T> = Result<T, CoreError>;

/// Error kinds raised by the effective-date and habit-status core.
#[derive(Debug)]
pub enum CoreError {
    /// Status value outside the closed vocabulary, or not user-settable.
    InvalidStatus(String),
    /// Negative, non-integer, or out-of-range count.
    InvalidCount(String),
    /// Day-boundary hour outside `0..=23`.
    InvalidBoundaryHour(i64),
    /// Date text that is not a valid `YYYY-MM-DD` calendar date.
    InvalidDate(String),
    /// Identifier text that is not a UUID.
    InvalidId(String),
    /// Week-start text that is not a weekday name.
    InvalidWeekStart(String),
    /// Import content is empty or whitespace-only.
    EmptyImportContent,
    /// Import content parsed without yielding any habit.
    NoHabitsFound,
    /// Habit or category name is blank after trim.
    InvalidName,
    /// Habit does not exist or is soft-deleted.
    HabitNotFound(HabitId),
    /// Category does not exist or is soft-deleted.
    CategoryNotFound(CategoryId),
    /// Parent assignment would make a habit its own ancestor.
    CycleDetected {
        habit_id: HabitId,
        parent_id: HabitId,
    },
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl CoreError {
    /// Stable machine-readable code for envelopes and logs.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidStatus(_) => "INVALID_STATUS",
            Self::InvalidCount(_) => "INVALID_COUNT",
            Self::InvalidBoundaryHour(_) => "INVALID_BOUNDARY_HOUR",
            Self::InvalidDate(_) => "INVALID_DATE",
            Self::InvalidId(_) => "INVALID_ID",
            Self::InvalidWeekStart(_) => "INVALID_WEEK_START",
            Self::EmptyImportContent => "EMPTY_IMPORT_CONTENT",
            Self::NoHabitsFound => "NO_HABITS_FOUND",
            Self::InvalidName => "INVALID_NAME",
            Self::HabitNotFound(_) => "HABIT_NOT_FOUND",
            Self::CategoryNotFound(_) => "CATEGORY_NOT_FOUND",
            Self::CycleDetected { .. } => "CYCLE_DETECTED",
            Self::Repo(_) => "STORAGE_ERROR",
        }
    }

    /// HTTP-style status a route collaborator should answer with.
    pub fn http_status(&self) -> u16 {
        match self {
            Self::HabitNotFound(_) | Self::CategoryNotFound(_) => 404,
            Self::Repo(_) => 500,
            _ => 400,
        }
    }

    /// Returns true for caller-input rejections (400-class).
    pub fn is_validation(&self) -> bool {
        self.http_status() == 400
    }
}

impl Display for CoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidStatus(value) => write!(
                f,
                "invalid status `{value}`; expected empty|complete|missed|partial|na|exempt|extra|pink"
            ),
            Self::InvalidCount(value) => {
                write!(f, "invalid count `{value}`; expected a non-negative integer")
            }
            Self::InvalidBoundaryHour(hour) => {
                write!(f, "invalid day boundary hour {hour}; expected 0..=23")
            }
            Self::InvalidDate(value) => {
                write!(f, "invalid date `{value}`; expected YYYY-MM-DD")
            }
            Self::InvalidId(value) => write!(f, "invalid id `{value}`; expected a UUID"),
            Self::InvalidWeekStart(value) => {
                write!(f, "invalid week start `{value}`; expected a weekday name")
            }
            Self::EmptyImportContent => write!(f, "Content cannot be empty"),
            Self::NoHabitsFound => write!(
                f,
                "No habits found. Add lines like `- Habit name`, optionally under `# Category` headings"
            ),
            Self::InvalidName => write!(f, "name must not be blank"),
            Self::HabitNotFound(id) => write!(f, "habit not found: {id}"),
            Self::CategoryNotFound(id) => write!(f, "category not found: {id}"),
            Self::CycleDetected {
                habit_id,
                parent_id,
            } => write!(
                f,
                "parent would create cycle: habit {habit_id} under parent {parent_id}"
            ),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for CoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for CoreError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::HabitNotFound(id) => Self::HabitNotFound(id),
            RepoError::CategoryNotFound(id) => Self::CategoryNotFound(id),
            RepoError::Validation(err) => err.into(),
            other => Self::Repo(other),
        }
    }
}

impl From<HabitValidationError> for CoreError {
    fn from(value: HabitValidationError) -> Self {
        match value {
            HabitValidationError::BlankName => Self::InvalidName,
            HabitValidationError::SelfParent(habit_id) => Self::CycleDetected {
                habit_id,
                parent_id: habit_id,
            },
        }
    }
}
