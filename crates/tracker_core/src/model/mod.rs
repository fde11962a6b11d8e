//! Domain model for habits, categories, entries, and settings.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//!
//! # Invariants
//! - Habits and categories are identified by stable UUIDs.
//! - Deletion is represented by soft-delete tombstones, not hard delete.
//! - Composite habits reference their parent by id only.

pub mod category;
pub mod entry;
pub mod habit;
pub mod settings;

pub use category::{Category, CategoryId, CATEGORY_PATH_SEPARATOR};
pub use entry::HabitEntry;
pub use habit::{Habit, HabitId, HabitValidationError};
pub use settings::{weekday_label, Settings};
