//! Line-oriented habit list parser.
//!
//! # Grammar
//! - `# Heading` (1-6 `#`): depth `d` replaces path segments at levels `>= d`.
//! - `- Habit` / `* Habit` (optionally indented): habit in the current path.
//! - Blank lines, `// ...` and `<!-- ... -->` are skipped.
//!
//! # Invariants
//! - Parsing never fails; line problems become `errors`/`warnings` entries.
//! - Skipped lines never reset the current category.
//! - Category and habit sort orders are global zero-based appearance indexes.

use crate::error::{CoreError, CoreResult};
use crate::model::CATEGORY_PATH_SEPARATOR;
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::HashSet;

/// Deepest heading level treated as a category.
pub const MAX_HEADING_DEPTH: usize = 6;

static HEADING_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"^(#{{1,{MAX_HEADING_DEPTH}}})\s+(.*)$")).expect("valid heading regex")
});
static BULLET_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*[-*](?:\s+(.*))?$").expect("valid bullet regex"));

/// Category discovered by the importer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportedCategory {
    /// Fully-qualified name joined with `" > "`.
    pub name: String,
    pub sort_order: usize,
}

/// Habit discovered by the importer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportedHabit {
    pub name: String,
    /// Fully-qualified category name, `None` before any heading.
    pub category: Option<String>,
    pub sort_order: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportStats {
    pub total_lines: usize,
    pub skipped_lines: usize,
    pub habits_found: usize,
    pub categories_found: usize,
}

/// Outcome of one parse call. Consumed by the caller, then discarded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportResult {
    pub categories: Vec<ImportedCategory>,
    pub habits: Vec<ImportedHabit>,
    /// Lines that looked like content but could not be used.
    pub errors: Vec<String>,
    /// Lines that were ignored.
    pub warnings: Vec<String>,
    pub stats: ImportStats,
}

/// Document-level pre-check result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportValidation {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

enum LineKind<'a> {
    Skip,
    Heading { depth: usize, text: &'a str },
    Bullet { text: &'a str },
    Unrecognized,
}

fn classify(line: &str) -> LineKind<'_> {
    let trimmed = line.trim();
    if trimmed.is_empty()
        || trimmed.starts_with("//")
        || (trimmed.starts_with("<!--") && trimmed.ends_with("-->"))
    {
        return LineKind::Skip;
    }

    if let Some(captures) = HEADING_RE.captures(trimmed) {
        let depth = captures.get(1).map_or(1, |hashes| hashes.as_str().len());
        let text = captures.get(2).map_or("", |text| text.as_str());
        // Closing hashes (`## Morning ##`) are decoration.
        let text = text.trim().trim_end_matches('#').trim_end();
        return LineKind::Heading { depth, text };
    }

    if let Some(captures) = BULLET_RE.captures(line) {
        let text = captures.get(1).map_or("", |text| text.as_str().trim());
        return LineKind::Bullet { text };
    }

    LineKind::Unrecognized
}

/// Parses a structured-text habit list. Never fails.
pub fn parse(content: &str) -> ImportResult {
    let mut result = ImportResult::default();
    let mut path: Vec<String> = Vec::new();
    let mut current_category: Option<String> = None;
    let mut seen_categories: HashSet<String> = HashSet::new();

    for (index, line) in content.lines().enumerate() {
        let line_number = index + 1;
        result.stats.total_lines += 1;

        match classify(line) {
            LineKind::Skip => result.stats.skipped_lines += 1,
            LineKind::Heading { text, .. } if text.is_empty() => {
                result.stats.skipped_lines += 1;
                result
                    .warnings
                    .push(format!("Empty category heading at line {line_number} ignored"));
            }
            LineKind::Heading { depth, text } => {
                path.truncate(depth.saturating_sub(1));
                path.push(text.to_string());
                let name = path.join(CATEGORY_PATH_SEPARATOR);
                if seen_categories.insert(name.clone()) {
                    result.categories.push(ImportedCategory {
                        name: name.clone(),
                        sort_order: result.categories.len(),
                    });
                }
                current_category = Some(name);
            }
            LineKind::Bullet { text } if text.is_empty() => {
                result
                    .errors
                    .push(format!("Empty habit name at line {line_number}"));
            }
            LineKind::Bullet { text } => {
                result.habits.push(ImportedHabit {
                    name: text.to_string(),
                    category: current_category.clone(),
                    sort_order: result.habits.len(),
                });
            }
            LineKind::Unrecognized => {
                result.stats.skipped_lines += 1;
                result
                    .warnings
                    .push(format!("Unrecognized line {line_number} ignored"));
            }
        }
    }

    result.stats.habits_found = result.habits.len();
    result.stats.categories_found = result.categories.len();

    debug!(
        "event=import_parse module=import status=ok total_lines={} skipped_lines={} habits={} categories={} errors={}",
        result.stats.total_lines,
        result.stats.skipped_lines,
        result.stats.habits_found,
        result.stats.categories_found,
        result.errors.len()
    );

    result
}

/// Parses `content` and enforces the document-level import requirements.
///
/// # Errors
/// - `CoreError::EmptyImportContent` for empty or whitespace-only content.
/// - `CoreError::NoHabitsFound` when parsing yields zero habits.
pub fn parse_for_import(content: &str) -> CoreResult<ImportResult> {
    if content.trim().is_empty() {
        return Err(CoreError::EmptyImportContent);
    }
    let result = parse(content);
    if result.habits.is_empty() {
        return Err(CoreError::NoHabitsFound);
    }
    Ok(result)
}

/// Cheap pre-check before a bulk write.
pub fn validate(content: &str) -> ImportValidation {
    match parse_for_import(content) {
        Ok(_) => ImportValidation {
            is_valid: true,
            errors: Vec::new(),
        },
        Err(err) => ImportValidation {
            is_valid: false,
            errors: vec![err.to_string()],
        },
    }
}
