//! Category domain model.
//!
//! Categories are identified by their fully-qualified name (heading path
//! joined with [`CATEGORY_PATH_SEPARATOR`]). The hierarchy lives in the name
//! only; there is no parent-link column.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for categories.
pub type CategoryId = Uuid;

/// Separator between heading segments in a fully-qualified category name.
pub const CATEGORY_PATH_SEPARATOR: &str = " > ";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub uuid: CategoryId,
    /// Fully-qualified name, e.g. `Health > Morning`.
    pub name: String,
    pub sort_order: i64,
    pub is_deleted: bool,
}

impl Category {
    pub fn new(name: impl Into<String>, sort_order: i64) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            name: name.into(),
            sort_order,
            is_deleted: false,
        }
    }

    /// Heading segments of the fully-qualified name.
    pub fn segments(&self) -> Vec<&str> {
        self.name.split(CATEGORY_PATH_SEPARATOR).collect()
    }

    /// Last segment, shown as the display label.
    pub fn leaf_name(&self) -> &str {
        self.name
            .rsplit(CATEGORY_PATH_SEPARATOR)
            .next()
            .unwrap_or(self.name.as_str())
    }

    /// Fully-qualified name of the enclosing category, if nested.
    pub fn parent_name(&self) -> Option<&str> {
        self.name
            .rfind(CATEGORY_PATH_SEPARATOR)
            .map(|index| &self.name[..index])
    }

    pub fn is_active(&self) -> bool {
        !self.is_deleted
    }
}

#[cfg(test)]
mod tests {
    use super::Category;

    #[test]
    fn path_helpers_split_on_separator() {
        let category = Category::new("Health > Morning > Early", 0);
        assert_eq!(category.segments(), vec!["Health", "Morning", "Early"]);
        assert_eq!(category.leaf_name(), "Early");
        assert_eq!(category.parent_name(), Some("Health > Morning"));

        let root = Category::new("Health", 1);
        assert_eq!(root.leaf_name(), "Health");
        assert_eq!(root.parent_name(), None);
    }
}
