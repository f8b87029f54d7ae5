//! Record lifecycle rules: validation, identity, timestamps, and merges.
//!
//! # Design
//! `TodoService` is the sole owner of business rules. Each operation makes at
//! most one read and one write through the store and holds no lock between
//! them, so concurrent updates to the same record are last-writer-wins.
//! Errors are never swallowed; every failure comes back as a `TodoError`.

use std::sync::Arc;

use mockable::{Clock, DefaultClock};
use tracing::{debug, info, warn};

use crate::error::TodoError;
use crate::model::{NewTodo, Todo, TodoId, TodoPatch};
use crate::store::{MemoryStore, TodoStore};

#[derive(Clone)]
pub struct TodoService {
    store: Arc<dyn TodoStore>,
    clock: Arc<dyn Clock + Send + Sync>,
}

impl TodoService {
    pub fn new(store: Arc<dyn TodoStore>, clock: Arc<dyn Clock + Send + Sync>) -> Self {
        Self { store, clock }
    }

    /// Service over a fresh `MemoryStore` using the system clock.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()), Arc::new(DefaultClock))
    }

    pub async fn create(&self, input: NewTodo) -> Result<Todo, TodoError> {
        let draft = input.validate()?;
        let todo = Todo::from_draft(TodoId::generate(), draft, self.clock.utc());
        self.store.set(&todo).await?;
        info!(todo_id = %todo.id, priority = %todo.priority, "todo created");
        Ok(todo)
    }

    pub async fn get(&self, id: &TodoId) -> Result<Todo, TodoError> {
        self.store
            .get(id)
            .await?
            .ok_or_else(|| TodoError::NotFound(id.clone()))
    }

    /// Every record in store order. Ordering for display is the client's job.
    pub async fn list(&self) -> Result<Vec<Todo>, TodoError> {
        let todos = self.store.list().await?;
        debug!(count = todos.len(), "listed todos");
        Ok(todos)
    }

    /// Apply the fields present in `patch` and refresh `updated_at`, even
    /// when nothing else changes.
    pub async fn update(&self, id: &TodoId, patch: TodoPatch) -> Result<Todo, TodoError> {
        let mut todo = self.get(id).await?;
        let changes = patch.validate()?;
        changes.apply_to(&mut todo);
        // A clock that steps backwards must not move updated_at behind a prior write.
        todo.updated_at = self.clock.utc().max(todo.updated_at);
        self.store.set(&todo).await?;
        info!(todo_id = %todo.id, completed = todo.completed, "todo updated");
        Ok(todo)
    }

    pub async fn delete(&self, id: &TodoId) -> Result<(), TodoError> {
        if !self.store.delete(id).await? {
            return Err(TodoError::NotFound(id.clone()));
        }
        info!(todo_id = %id, "todo deleted");
        Ok(())
    }

    /// Shorthand for an update that only sets `completed`.
    pub async fn toggle_complete(&self, id: &TodoId, completed: bool) -> Result<Todo, TodoError> {
        self.update(id, TodoPatch::completed(completed)).await
    }

    /// Whether the backing store answers.
    pub async fn store_reachable(&self) -> bool {
        match self.store.ping().await {
            Ok(()) => true,
            Err(err) => {
                warn!(error = %err, "store health check failed");
                false
            }
        }
    }
}
