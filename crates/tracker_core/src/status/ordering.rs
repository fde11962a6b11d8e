//! Display ordering for a day's habit list.
//!
//! Pending (anything but `complete`) before `complete`, then priority
//! ascending with absent priority last, then sort order ascending. The sort is
//! stable, so equal keys keep their input order.

use super::vocabulary::HabitStatus;
use std::cmp::Ordering;

/// Fields the display order looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayKey {
    pub status: HabitStatus,
    pub priority: Option<i64>,
    pub sort_order: i64,
}

pub fn compare_for_display(left: &DisplayKey, right: &DisplayKey) -> Ordering {
    let done = |key: &DisplayKey| key.status == HabitStatus::Complete;
    done(left)
        .cmp(&done(right))
        .then_with(|| match (left.priority, right.priority) {
            (Some(a), Some(b)) => a.cmp(&b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        })
        .then_with(|| left.sort_order.cmp(&right.sort_order))
}

/// Sorts `items` in place by their display key.
pub fn sort_for_display<T>(items: &mut [T], key: impl Fn(&T) -> DisplayKey) {
    items.sort_by(|left, right| compare_for_display(&key(left), &key(right)));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(
        name: &'static str,
        status: HabitStatus,
        priority: Option<i64>,
        sort_order: i64,
    ) -> (&'static str, DisplayKey) {
        (
            name,
            DisplayKey {
                status,
                priority,
                sort_order,
            },
        )
    }

    #[test]
    fn pending_then_priority_then_sort_order() {
        let mut items = vec![
            key("done-first", HabitStatus::Complete, Some(0), 0),
            key("no-priority", HabitStatus::Empty, None, 0),
            key("p2", HabitStatus::Missed, Some(2), 0),
            key("p1-late", HabitStatus::Empty, Some(1), 5),
            key("p1-early", HabitStatus::Partial, Some(1), 1),
        ];
        sort_for_display(&mut items, |(_, key)| *key);

        let names: Vec<_> = items.iter().map(|(name, _)| *name).collect();
        assert_eq!(
            names,
            vec!["p1-early", "p1-late", "p2", "no-priority", "done-first"]
        );
    }

    #[test]
    fn extra_counts_as_pending_for_display() {
        let extra = DisplayKey {
            status: HabitStatus::Extra,
            priority: None,
            sort_order: 9,
        };
        let complete = DisplayKey {
            status: HabitStatus::Complete,
            priority: Some(0),
            sort_order: 0,
        };
        assert_eq!(compare_for_display(&extra, &complete), Ordering::Less);
    }
}
