//! Task commands: list, add, show, edit, done, rm.

use clap::Subcommand;

use taskmart_client::{ApiClient, SessionStore, TaskFilter, TaskStore};
use taskmart_core::{Task, TaskDraft, TaskId, TaskPatch, TaskStatus};

use super::confirm;

#[derive(Subcommand)]
pub enum TaskAction {
    /// List tasks, optionally filtered
    List {
        /// Only show tasks with this status (`pending`, `in_progress`, `completed`)
        #[arg(short, long)]
        status: Option<TaskStatus>,

        /// Only show tasks whose title or description contains this text
        #[arg(long)]
        search: Option<String>,
    },
    /// Create a task
    Add {
        /// Task title
        title: String,

        /// Task description
        #[arg(short, long)]
        description: Option<String>,

        /// Initial status (defaults to `pending`)
        #[arg(short, long)]
        status: Option<TaskStatus>,
    },
    /// Show a single task
    Show {
        /// Task id
        id: TaskId,
    },
    /// Edit a task's fields
    Edit {
        /// Task id
        id: TaskId,

        /// New title
        #[arg(short, long)]
        title: Option<String>,

        /// New description
        #[arg(short, long)]
        description: Option<String>,

        /// New status
        #[arg(short, long)]
        status: Option<TaskStatus>,
    },
    /// Mark a task completed
    Done {
        /// Task id
        id: TaskId,
    },
    /// Delete a task
    Rm {
        /// Task id
        id: TaskId,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

pub async fn dispatch(
    action: TaskAction,
    client: &ApiClient,
    session: &SessionStore,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = TaskStore::with_cache(client.tasks(), session.task_cache_path());

    match action {
        TaskAction::List { status, search } => {
            fetch(&mut store).await?;
            let filter = TaskFilter { status, search };
            let matched = filter.apply(store.tasks());
            if matched.is_empty() {
                println!("No tasks");
            }
            for task in matched {
                print_line(task);
            }
        }
        TaskAction::Add {
            title,
            description,
            status,
        } => {
            let mut draft = TaskDraft::new(title);
            if let Some(description) = description {
                draft = draft.with_description(description);
            }
            if let Some(status) = status {
                draft = draft.with_status(status);
            }
            let task = match store.create(&draft).await {
                Ok(task) => task,
                Err(err) => return Err(store_error(&store, err)),
            };
            println!("Created task {}", task.id);
        }
        TaskAction::Show { id } => {
            let task = match store.get(id).await {
                Ok(task) => task,
                Err(err) => return Err(store_error(&store, err)),
            };
            print_full(&task);
        }
        TaskAction::Edit {
            id,
            title,
            description,
            status,
        } => {
            let patch = TaskPatch {
                title,
                description,
                status,
            };
            let task = match store.patch(id, &patch).await {
                Ok(task) => task,
                Err(err) => return Err(store_error(&store, err)),
            };
            println!("Updated task {}", task.id);
        }
        TaskAction::Done { id } => {
            let patch = TaskPatch::status(TaskStatus::Completed);
            let task = match store.patch(id, &patch).await {
                Ok(task) => task,
                Err(err) => return Err(store_error(&store, err)),
            };
            println!("Completed task {}", task.id);
        }
        TaskAction::Rm { id, yes } => {
            if !confirm(&format!("Delete task {id}?"), yes)? {
                return Ok(());
            }
            if let Err(err) = store.delete(id).await {
                return Err(store_error(&store, err));
            }
            println!("Deleted task {id}");
        }
    }
    Ok(())
}

async fn fetch(store: &mut TaskStore) -> Result<(), Box<dyn std::error::Error>> {
    if let Err(err) = store.refresh().await {
        return Err(store_error(store, err));
    }
    Ok(())
}

/// Prefer the store's user-facing error string over the raw error.
fn store_error(
    store: &TaskStore,
    err: taskmart_client::StoreError,
) -> Box<dyn std::error::Error> {
    match store.error() {
        Some(message) => message.to_string().into(),
        None => err.into(),
    }
}

fn print_line(task: &Task) {
    let description = task.description.as_deref().unwrap_or("");
    println!(
        "{:>4}  [{}]  {}  {}",
        task.id.as_i64(),
        task.status.label(),
        task.title,
        description
    );
}

fn print_full(task: &Task) {
    println!("Task {}", task.id);
    println!("  Title:       {}", task.title);
    if let Some(description) = &task.description {
        println!("  Description: {description}");
    }
    println!("  Status:      {}", task.status.label());
    println!("  Created:     {}", task.created_at.to_rfc3339());
    println!("  Updated:     {}", task.updated_at.to_rfc3339());
}
