//! Task entity, drafts, and patches.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{TaskId, TaskStatus};

/// A task owned by the authenticated user.
///
/// Wire format matches the backend: camelCase timestamps, snake_case status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: TaskStatus,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

/// Validation errors for task input.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TaskValidationError {
    /// Title is empty or whitespace-only.
    #[error("task title cannot be blank")]
    BlankTitle,
}

/// Input for creating or fully updating a task.
///
/// Validated client-side before any network call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskDraft {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: TaskStatus,
}

impl TaskDraft {
    /// Create a draft with the default `pending` status.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            status: TaskStatus::default(),
        }
    }

    /// Set the description, mapping empty strings to `None`.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        let description = description.into();
        self.description = if description.is_empty() {
            None
        } else {
            Some(description)
        };
        self
    }

    /// Set the status.
    #[must_use]
    pub const fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    /// Validate the draft.
    ///
    /// # Errors
    ///
    /// Returns [`TaskValidationError::BlankTitle`] if the title is empty or
    /// whitespace-only.
    pub fn validate(&self) -> Result<(), TaskValidationError> {
        if self.title.trim().is_empty() {
            return Err(TaskValidationError::BlankTitle);
        }
        Ok(())
    }
}

/// Partial task update; only present fields are sent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
}

impl TaskPatch {
    /// A patch that only changes the status.
    #[must_use]
    pub fn status(status: TaskStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_draft_blank_title_rejected() {
        assert_eq!(
            TaskDraft::new("").validate(),
            Err(TaskValidationError::BlankTitle)
        );
        assert_eq!(
            TaskDraft::new("   \t").validate(),
            Err(TaskValidationError::BlankTitle)
        );
    }

    #[test]
    fn test_draft_valid() {
        let draft = TaskDraft::new("Buy milk")
            .with_description("2 liters")
            .with_status(TaskStatus::InProgress);
        assert!(draft.validate().is_ok());
        assert_eq!(draft.description.as_deref(), Some("2 liters"));
    }

    #[test]
    fn test_draft_empty_description_maps_to_none() {
        let draft = TaskDraft::new("Buy milk").with_description("");
        assert!(draft.description.is_none());
    }

    #[test]
    fn test_patch_skips_absent_fields() {
        let patch = TaskPatch::status(TaskStatus::Completed);
        let json = serde_json::to_value(&patch).unwrap();
        assert_eq!(json, serde_json::json!({"status": "completed"}));
    }

    #[test]
    fn test_task_wire_format() {
        let json = serde_json::json!({
            "id": 3,
            "title": "Ship release",
            "status": "in_progress",
            "createdAt": "2026-01-05T10:00:00Z",
            "updatedAt": "2026-01-06T09:30:00Z"
        });
        let task: Task = serde_json::from_value(json).unwrap();
        assert_eq!(task.id, TaskId::new(3));
        assert_eq!(task.status, TaskStatus::InProgress);
        assert!(task.description.is_none());
    }
}
