//! Habit status engine.
//!
//! # Responsibility
//! - Own the closed status vocabulary and its quick-toggle cycle.
//! - Validate counts for count-based habits.
//! - Evaluate monthly pace and derive the `trending` overlay.
//! - Order a day's habits for display.
//!
//! # Invariants
//! - Malformed statuses are rejected, never coerced.
//! - `trending` is derived only; it is never stored from user input.
//! - Everything here is pure; the only write is the service-level upsert.

mod ordering;
mod trend;
mod vocabulary;

pub use ordering::{compare_for_display, sort_for_display, DisplayKey};
pub use trend::{evaluate_trend, TrendReport, TrendVerdict};
pub(crate) use vocabulary::ensure_settable;
pub use vocabulary::{
    cycle_status, cycle_status_str, parse_count, parse_settable_status, validate_count,
    HabitStatus,
};
