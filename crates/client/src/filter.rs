//! Client-side filtering for list views.
//!
//! Filtering happens entirely in memory over the store's collection; the
//! backend list endpoints take no query parameters. A record matches when it
//! passes BOTH the status filter and the search filter. Search is a
//! case-insensitive substring match over title and description.

use taskmart_core::{Product, ProductStatus, Task, TaskStatus};

/// Filter over a task collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    /// Exact status to match; `None` matches every status.
    pub status: Option<TaskStatus>,
    /// Substring to search for in title and description.
    pub search: Option<String>,
}

impl TaskFilter {
    /// Whether a task passes both the status and search filters.
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        if let Some(status) = self.status
            && task.status != status
        {
            return false;
        }
        matches_search(
            self.search.as_deref(),
            &task.title,
            task.description.as_deref(),
        )
    }

    /// The tasks that pass the filter, in collection order.
    #[must_use]
    pub fn apply<'a>(&self, tasks: &'a [Task]) -> Vec<&'a Task> {
        tasks.iter().filter(|task| self.matches(task)).collect()
    }
}

/// Filter over a product catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    /// Exact status to match; `None` matches every status.
    pub status: Option<ProductStatus>,
    /// Substring to search for in title and description.
    pub search: Option<String>,
}

impl ProductFilter {
    /// Whether a product passes both the status and search filters.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        if let Some(status) = self.status
            && product.status != status
        {
            return false;
        }
        matches_search(
            self.search.as_deref(),
            &product.title,
            Some(&product.description),
        )
    }

    /// The products that pass the filter, in catalog order.
    #[must_use]
    pub fn apply<'a>(&self, products: &'a [Product]) -> Vec<&'a Product> {
        products
            .iter()
            .filter(|product| self.matches(product))
            .collect()
    }
}

/// Case-insensitive substring match over title and description.
///
/// An empty or absent search term matches everything.
fn matches_search(search: Option<&str>, title: &str, description: Option<&str>) -> bool {
    let Some(term) = search else {
        return true;
    };
    let term = term.to_lowercase();
    if term.is_empty() {
        return true;
    }
    title.to_lowercase().contains(&term)
        || description.is_some_and(|text| text.to_lowercase().contains(&term))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    use chrono::Utc;

    use taskmart_core::{TaskDraft, TaskId};

    fn task(title: &str, description: &str, status: TaskStatus) -> Task {
        let draft = TaskDraft::new(title)
            .with_description(description)
            .with_status(status);
        let now = Utc::now();
        Task {
            id: TaskId::new(1),
            title: draft.title,
            description: draft.description,
            status: draft.status,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        let filter = TaskFilter::default();
        assert!(filter.matches(&task("Buy milk", "", TaskStatus::Pending)));
        assert!(filter.matches(&task("Ship it", "", TaskStatus::Completed)));
    }

    #[test]
    fn test_status_filter_is_exact() {
        let filter = TaskFilter {
            status: Some(TaskStatus::InProgress),
            search: None,
        };
        assert!(filter.matches(&task("a", "", TaskStatus::InProgress)));
        assert!(!filter.matches(&task("a", "", TaskStatus::Pending)));
    }

    #[test]
    fn test_search_is_case_insensitive_over_title_and_description() {
        let filter = TaskFilter {
            status: None,
            search: Some("MILK".to_string()),
        };
        assert!(filter.matches(&task("Buy milk", "", TaskStatus::Pending)));
        assert!(filter.matches(&task("Groceries", "skim milk, eggs", TaskStatus::Pending)));
        assert!(!filter.matches(&task("Groceries", "eggs", TaskStatus::Pending)));
    }

    #[test]
    fn test_both_criteria_must_pass() {
        let filter = TaskFilter {
            status: Some(TaskStatus::Completed),
            search: Some("foo".to_string()),
        };
        let tasks = vec![
            task("foo one", "", TaskStatus::Completed),
            task("foo two", "", TaskStatus::Pending),
            task("bar", "", TaskStatus::Completed),
            task("has foo inside", "", TaskStatus::Completed),
        ];

        let matched = filter.apply(&tasks);
        let titles: Vec<&str> = matched.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["foo one", "has foo inside"]);
    }

    #[test]
    fn test_empty_search_term_matches_everything() {
        let filter = TaskFilter {
            status: None,
            search: Some(String::new()),
        };
        assert!(filter.matches(&task("anything", "", TaskStatus::Pending)));
    }

    #[test]
    fn test_missing_description_only_searches_title() {
        let filter = TaskFilter {
            status: None,
            search: Some("detail".to_string()),
        };
        let mut t = task("Plain", "", TaskStatus::Pending);
        t.description = None;
        assert!(!filter.matches(&t));
    }
}
