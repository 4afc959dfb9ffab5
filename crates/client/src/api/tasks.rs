//! Task API client: `/api/tasks`.

use reqwest::Method;
use tracing::instrument;

use taskmart_core::{Task, TaskDraft, TaskId, TaskPatch};

use super::{ApiClient, check_status, read_json};
use crate::error::ApiError;

/// Client for the task endpoints.
#[derive(Debug, Clone)]
pub struct TaskApi {
    client: ApiClient,
}

impl TaskApi {
    pub(crate) fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Fetch the full task collection.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be
    /// decoded.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Task>, ApiError> {
        let response = self
            .client
            .request(Method::GET, "/api/tasks")
            .send()
            .await?;
        read_json(response).await
    }

    /// Fetch a single task.
    ///
    /// # Errors
    ///
    /// Returns an error if the task does not exist or the request fails.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn get(&self, id: TaskId) -> Result<Task, ApiError> {
        let response = self
            .client
            .request(Method::GET, &format!("/api/tasks/{id}"))
            .send()
            .await?;
        read_json(response).await
    }

    /// Create a task; returns the server's copy.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects the
    /// payload.
    #[instrument(skip(self, draft), fields(title = %draft.title))]
    pub async fn create(&self, draft: &TaskDraft) -> Result<Task, ApiError> {
        let response = self
            .client
            .request(Method::POST, "/api/tasks")
            .json(draft)
            .send()
            .await?;
        read_json(response).await
    }

    /// Fully update a task; returns the server's copy.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects the
    /// payload.
    #[instrument(skip(self, draft), fields(id = %id))]
    pub async fn update(&self, id: TaskId, draft: &TaskDraft) -> Result<Task, ApiError> {
        let response = self
            .client
            .request(Method::PUT, &format!("/api/tasks/{id}"))
            .json(draft)
            .send()
            .await?;
        read_json(response).await
    }

    /// Partially update a task; returns the server's copy.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects the
    /// payload.
    #[instrument(skip(self, patch), fields(id = %id))]
    pub async fn patch(&self, id: TaskId, patch: &TaskPatch) -> Result<Task, ApiError> {
        let response = self
            .client
            .request(Method::PATCH, &format!("/api/tasks/{id}"))
            .json(patch)
            .send()
            .await?;
        read_json(response).await
    }

    /// Delete a task.
    ///
    /// # Errors
    ///
    /// Returns an error if the task does not exist or the request fails.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn delete(&self, id: TaskId) -> Result<(), ApiError> {
        let response = self
            .client
            .request(Method::DELETE, &format!("/api/tasks/{id}"))
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }
}
