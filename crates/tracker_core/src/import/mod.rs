//! Structured-text habit list importer.
//!
//! # Responsibility
//! - Turn markdown-like heading/bullet text into ordered categories and habits.
//! - Report per-line problems without aborting the import.
//!
//! # Invariants
//! - Categories are a flat list of distinct fully-qualified names, in
//!   first-seen order. Equal leaf names under different parents stay distinct.
//! - Only document-level conditions (empty content, zero habits) are errors.

mod list_parser;

pub use list_parser::{
    parse, parse_for_import, validate, ImportResult, ImportStats, ImportValidation,
    ImportedCategory, ImportedHabit, MAX_HEADING_DEPTH,
};
