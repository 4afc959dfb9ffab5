//! Integration tests for the task store against the mock backend.

use std::path::Path;

use taskmart_client::{ApiClient, ClientConfig, SessionStore, StoreError, TaskFilter, TaskStore};
use taskmart_core::{TaskDraft, TaskId, TaskPatch, TaskStatus};
use taskmart_integration_tests::MockBackend;

/// Build a client against the mock backend and sign up a fresh user.
async fn signed_in(backend: &MockBackend, dir: &Path) -> ApiClient {
    let config = ClientConfig::new(&backend.base_url, dir);
    let client = ApiClient::new(&config).expect("build client");
    let mut session = SessionStore::new(client.auth(), client.clone(), dir.to_path_buf());
    session
        .signup("Ada", "ada@example.com", "hunter2!")
        .await
        .expect("signup");
    client
}

// ============================================================================
// Create
// ============================================================================

#[tokio::test]
async fn test_create_appends_exactly_once() {
    let backend = MockBackend::spawn().await;
    let dir = tempfile::tempdir().expect("tempdir");
    let client = signed_in(&backend, dir.path()).await;
    let mut store = TaskStore::new(client.tasks());

    let task = store
        .create(&TaskDraft::new("Buy milk"))
        .await
        .expect("create task");

    assert_eq!(store.tasks().len(), 1);
    assert_eq!(store.tasks()[0].id, task.id);
    assert_eq!(backend.task_count(), 1);
    assert_eq!(backend.task_create_calls(), 1);
}

#[tokio::test]
async fn test_blank_title_makes_no_request() {
    let backend = MockBackend::spawn().await;
    let dir = tempfile::tempdir().expect("tempdir");
    let client = signed_in(&backend, dir.path()).await;
    let mut store = TaskStore::new(client.tasks());

    let result = store.create(&TaskDraft::new("   ")).await;

    assert!(matches!(result, Err(StoreError::InvalidTask(_))));
    assert_eq!(backend.task_create_calls(), 0);
    assert!(store.tasks().is_empty());
}

// ============================================================================
// Refresh & reconcile
// ============================================================================

#[tokio::test]
async fn test_refresh_replaces_collection() {
    let backend = MockBackend::spawn().await;
    let dir = tempfile::tempdir().expect("tempdir");
    let client = signed_in(&backend, dir.path()).await;

    let mut writer = TaskStore::new(client.tasks());
    writer.create(&TaskDraft::new("One")).await.expect("create");
    writer.create(&TaskDraft::new("Two")).await.expect("create");

    let mut reader = TaskStore::new(client.tasks());
    assert!(!reader.is_loaded());
    reader.refresh().await.expect("refresh");

    assert!(reader.is_loaded());
    let titles: Vec<&str> = reader.tasks().iter().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, vec!["One", "Two"]);
}

#[tokio::test]
async fn test_patch_replaces_matching_record_in_place() {
    let backend = MockBackend::spawn().await;
    let dir = tempfile::tempdir().expect("tempdir");
    let client = signed_in(&backend, dir.path()).await;
    let mut store = TaskStore::new(client.tasks());

    let first = store.create(&TaskDraft::new("One")).await.expect("create");
    let second = store.create(&TaskDraft::new("Two")).await.expect("create");

    store
        .patch(second.id, &TaskPatch::status(TaskStatus::Completed))
        .await
        .expect("patch");

    assert_eq!(store.tasks().len(), 2);
    assert_eq!(store.tasks()[0].id, first.id);
    assert_eq!(store.tasks()[0].status, TaskStatus::Pending);
    assert_eq!(store.tasks()[1].id, second.id);
    assert_eq!(store.tasks()[1].status, TaskStatus::Completed);
}

// ============================================================================
// Failure handling
// ============================================================================

#[tokio::test]
async fn test_delete_failure_keeps_collection_and_sets_error() {
    let backend = MockBackend::spawn().await;
    let dir = tempfile::tempdir().expect("tempdir");
    let client = signed_in(&backend, dir.path()).await;
    let mut store = TaskStore::new(client.tasks());

    store.create(&TaskDraft::new("Keep me")).await.expect("create");

    let result = store.delete(TaskId::new(999)).await;

    assert!(result.is_err());
    assert_eq!(store.tasks().len(), 1);
    assert_eq!(store.error(), Some("Failed to delete task"));
}

#[tokio::test]
async fn test_unauthenticated_fetch_sets_error() {
    let backend = MockBackend::spawn().await;
    let dir = tempfile::tempdir().expect("tempdir");
    let config = ClientConfig::new(&backend.base_url, dir.path());
    let client = ApiClient::new(&config).expect("build client");
    let mut store = TaskStore::new(client.tasks());

    let result = store.refresh().await;

    assert!(result.is_err());
    assert!(!store.is_loaded());
    assert_eq!(store.error(), Some("Failed to fetch tasks"));
}

#[tokio::test]
async fn test_error_clears_on_next_success() {
    let backend = MockBackend::spawn().await;
    let dir = tempfile::tempdir().expect("tempdir");
    let client = signed_in(&backend, dir.path()).await;
    let mut store = TaskStore::new(client.tasks());

    let _ = store.delete(TaskId::new(999)).await;
    assert!(store.error().is_some());

    store.refresh().await.expect("refresh");
    assert!(store.error().is_none());
}

// ============================================================================
// Filtering
// ============================================================================

#[tokio::test]
async fn test_filter_combines_status_and_search() {
    let backend = MockBackend::spawn().await;
    let dir = tempfile::tempdir().expect("tempdir");
    let client = signed_in(&backend, dir.path()).await;
    let mut store = TaskStore::new(client.tasks());

    store
        .create(&TaskDraft::new("Ship foo release").with_status(TaskStatus::Completed))
        .await
        .expect("create");
    store
        .create(&TaskDraft::new("Draft foo notes"))
        .await
        .expect("create");
    store
        .create(&TaskDraft::new("Ship bar release").with_status(TaskStatus::Completed))
        .await
        .expect("create");

    let filter = TaskFilter {
        status: Some(TaskStatus::Completed),
        search: Some("FOO".to_string()),
    };
    let matched = filter.apply(store.tasks());

    assert_eq!(matched.len(), 1);
    assert_eq!(matched[0].title, "Ship foo release");
}

// ============================================================================
// Snapshot cache
// ============================================================================

#[tokio::test]
async fn test_cache_file_written_after_mutations() {
    let backend = MockBackend::spawn().await;
    let dir = tempfile::tempdir().expect("tempdir");
    let client = signed_in(&backend, dir.path()).await;

    let cache = dir.path().join("tasks.json");
    let mut store = TaskStore::with_cache(client.tasks(), cache.clone());

    store.create(&TaskDraft::new("Persist me")).await.expect("create");

    let bytes = std::fs::read(&cache).expect("cache file written");
    let cached: Vec<taskmart_core::Task> = serde_json::from_slice(&bytes).expect("cache is JSON");
    assert_eq!(cached.len(), 1);
    assert_eq!(cached[0].title, "Persist me");
}
