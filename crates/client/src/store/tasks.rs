//! Task collection store.

use std::path::PathBuf;

use tracing::{instrument, warn};

use taskmart_core::{Task, TaskDraft, TaskId, TaskPatch};

use super::StoreError;
use crate::api::TaskApi;

/// In-memory task collection, reconciled by id after each mutation.
///
/// Optionally snapshots the collection to a cache file after each
/// successful change; the session store removes that file on logout.
#[derive(Debug)]
pub struct TaskStore {
    api: TaskApi,
    tasks: Vec<Task>,
    error: Option<String>,
    loaded: bool,
    cache_path: Option<PathBuf>,
}

impl TaskStore {
    /// Create an empty store; call [`refresh`](Self::refresh) to load.
    #[must_use]
    pub const fn new(api: TaskApi) -> Self {
        Self {
            api,
            tasks: Vec::new(),
            error: None,
            loaded: false,
            cache_path: None,
        }
    }

    /// Create a store that snapshots its collection to `cache_path`.
    #[must_use]
    pub const fn with_cache(api: TaskApi, cache_path: PathBuf) -> Self {
        Self {
            api,
            tasks: Vec::new(),
            error: None,
            loaded: false,
            cache_path: Some(cache_path),
        }
    }

    /// The current collection.
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Error string from the most recent failed operation, if any.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Whether an initial fetch has completed successfully.
    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Fetch the full collection, replacing local state.
    ///
    /// # Errors
    ///
    /// On failure the previous collection is kept and the error string is
    /// set to "Failed to fetch tasks".
    #[instrument(skip(self))]
    pub async fn refresh(&mut self) -> Result<(), StoreError> {
        self.error = None;
        match self.api.list().await {
            Ok(tasks) => {
                self.tasks = tasks;
                self.loaded = true;
                self.snapshot();
                Ok(())
            }
            Err(err) => {
                self.error = Some("Failed to fetch tasks".to_string());
                Err(err.into())
            }
        }
    }

    /// Create a task and append the server's copy.
    ///
    /// The draft is validated client-side first; an invalid draft is
    /// rejected before any network call.
    ///
    /// # Errors
    ///
    /// Returns a validation error for invalid input, or an API error (and
    /// sets the error string) when the backend call fails.
    #[instrument(skip(self, draft), fields(title = %draft.title))]
    pub async fn create(&mut self, draft: &TaskDraft) -> Result<Task, StoreError> {
        draft.validate()?;

        self.error = None;
        match self.api.create(draft).await {
            Ok(task) => {
                self.tasks.push(task.clone());
                self.snapshot();
                Ok(task)
            }
            Err(err) => {
                self.error = Some("Failed to create task".to_string());
                Err(err.into())
            }
        }
    }

    /// Fully update a task and replace the local copy by id.
    ///
    /// # Errors
    ///
    /// Returns a validation error for invalid input, or an API error (and
    /// sets the error string) when the backend call fails.
    #[instrument(skip(self, draft), fields(id = %id))]
    pub async fn update(&mut self, id: TaskId, draft: &TaskDraft) -> Result<Task, StoreError> {
        draft.validate()?;

        self.error = None;
        match self.api.update(id, draft).await {
            Ok(task) => {
                self.replace(id, task.clone());
                Ok(task)
            }
            Err(err) => {
                self.error = Some("Failed to update task".to_string());
                Err(err.into())
            }
        }
    }

    /// Partially update a task and replace the local copy by id.
    ///
    /// # Errors
    ///
    /// Returns an API error (and sets the error string) when the backend
    /// call fails.
    #[instrument(skip(self, patch), fields(id = %id))]
    pub async fn patch(&mut self, id: TaskId, patch: &TaskPatch) -> Result<Task, StoreError> {
        self.error = None;
        match self.api.patch(id, patch).await {
            Ok(task) => {
                self.replace(id, task.clone());
                Ok(task)
            }
            Err(err) => {
                self.error = Some("Failed to update task".to_string());
                Err(err.into())
            }
        }
    }

    /// Delete a task and drop the local copy by id.
    ///
    /// # Errors
    ///
    /// On failure the collection is unchanged and the error string is set
    /// to "Failed to delete task".
    #[instrument(skip(self), fields(id = %id))]
    pub async fn delete(&mut self, id: TaskId) -> Result<(), StoreError> {
        self.error = None;
        match self.api.delete(id).await {
            Ok(()) => {
                self.tasks.retain(|task| task.id != id);
                self.snapshot();
                Ok(())
            }
            Err(err) => {
                self.error = Some("Failed to delete task".to_string());
                Err(err.into())
            }
        }
    }

    /// Fetch a single task without touching the collection.
    ///
    /// # Errors
    ///
    /// Returns an API error (and sets the error string) when the backend
    /// call fails.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn get(&mut self, id: TaskId) -> Result<Task, StoreError> {
        self.error = None;
        match self.api.get(id).await {
            Ok(task) => Ok(task),
            Err(err) => {
                self.error = Some("Failed to fetch task".to_string());
                Err(err.into())
            }
        }
    }

    fn replace(&mut self, id: TaskId, task: Task) {
        if let Some(slot) = self.tasks.iter_mut().find(|task| task.id == id) {
            *slot = task;
        }
        self.snapshot();
    }

    /// Best-effort snapshot of the collection to the cache file.
    fn snapshot(&self) {
        let Some(path) = &self.cache_path else {
            return;
        };
        let result = serde_json::to_vec(&self.tasks)
            .map_err(std::io::Error::other)
            .and_then(|bytes| {
                if let Some(parent) = path.parent() {
                    std::fs::create_dir_all(parent)?;
                }
                std::fs::write(path, bytes)
            });
        if let Err(err) = result {
            warn!(error = %err, path = %path.display(), "Failed to write task cache");
        }
    }
}
