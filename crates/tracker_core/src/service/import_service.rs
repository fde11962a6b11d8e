//! Habit list import use-case.
//!
//! # Responsibility
//! - Short-circuit on document-level problems before any write.
//! - Hand the parsed list to the repository as one bulk write.
//!
//! # Invariants
//! - Nothing is written when validation fails.
//! - Per-line errors and warnings are returned alongside the written ids.

use crate::error::CoreResult;
use crate::import::{self, ImportResult, ImportValidation};
use crate::repo::import_repo::{ImportOutcome, ImportRepository};
use log::{info, warn};
use serde::Serialize;

/// Parse report plus the ids written for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    pub parsed: ImportResult,
    pub outcome: ImportOutcome,
}

pub struct ImportService<R: ImportRepository> {
    repo: R,
}

impl<R: ImportRepository> ImportService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Cheap pre-check; see [`import::validate`].
    pub fn validate(&self, content: &str) -> ImportValidation {
        import::validate(content)
    }

    /// Parses without writing.
    pub fn preview(&self, content: &str) -> ImportResult {
        import::parse(content)
    }

    /// Parses `content` and bulk-inserts its categories and habits.
    ///
    /// # Errors
    /// - `EmptyImportContent` / `NoHabitsFound` before any write.
    /// - `Repo` when the bulk write fails; nothing is persisted then.
    pub fn import_list(&self, content: &str) -> CoreResult<ImportReport> {
        let parsed = match import::parse_for_import(content) {
            Ok(parsed) => parsed,
            Err(err) => {
                warn!(
                    "event=import_list module=service status=rejected error_code={}",
                    err.code()
                );
                return Err(err);
            }
        };

        let outcome = self.repo.apply_import(&parsed)?;
        info!(
            "event=import_list module=service status=ok habits={} categories={} reused_categories={} line_errors={}",
            outcome.habits.len(),
            outcome.categories.len(),
            outcome.reused_categories,
            parsed.errors.len()
        );
        Ok(ImportReport { parsed, outcome })
    }
}
