//! Client-side state container for the todo list.
//!
//! # Design
//! `TodoListState` holds the one authoritative snapshot of the last fetched
//! list. It only changes through `apply(Action)`, driven by operation
//! results. Mutation results are reconciled against the snapshot by `id`;
//! a result that cannot be reconciled marks the snapshot stale instead of
//! being trusted on its own, and the host should re-fetch. Failures never
//! touch the snapshot.

use tracing::debug;

use crate::error::ApiError;
use crate::types::Todo;
use crate::view::{build_view, TodoView};

/// Lifecycle of the list fetch.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadStatus {
    #[default]
    Idle,
    Loading,
    Loaded,
    /// The last fetch failed; the UI should offer a retry.
    Failed(ApiError),
}

/// Results that drive state transitions.
#[derive(Debug, Clone)]
pub enum Action {
    FetchStarted,
    Fetched(Vec<Todo>),
    FetchFailed(ApiError),
    Created(Todo),
    Updated(Todo),
    Deleted(String),
    /// A create, update, toggle, or delete failed.
    MutationFailed(ApiError),
}

#[derive(Debug, Clone, Default)]
pub struct TodoListState {
    todos: Vec<Todo>,
    status: LoadStatus,
    last_error: Option<ApiError>,
    stale: bool,
}

impl TodoListState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, action: Action) {
        match action {
            Action::FetchStarted => self.status = LoadStatus::Loading,
            Action::Fetched(todos) => {
                self.todos = todos;
                self.status = LoadStatus::Loaded;
                self.last_error = None;
                self.stale = false;
            }
            Action::FetchFailed(err) => {
                self.last_error = Some(err.clone());
                self.status = LoadStatus::Failed(err);
            }
            Action::Created(todo) => {
                if let Some(existing) = self.find_mut(&todo.id) {
                    *existing = todo;
                } else {
                    self.todos.push(todo);
                }
                self.last_error = None;
            }
            Action::Updated(todo) => {
                let id = todo.id.clone();
                match self.find_mut(&id) {
                    Some(existing) => *existing = todo,
                    None => {
                        debug!(todo_id = %id, "update for unknown todo, marking snapshot stale");
                        self.stale = true;
                    }
                }
                self.last_error = None;
            }
            Action::Deleted(id) => {
                let before = self.todos.len();
                self.todos.retain(|todo| todo.id != id);
                if self.todos.len() == before {
                    debug!(todo_id = %id, "delete for unknown todo, marking snapshot stale");
                    self.stale = true;
                }
                self.last_error = None;
            }
            Action::MutationFailed(err) => self.last_error = Some(err),
        }
    }

    fn find_mut(&mut self, id: &str) -> Option<&mut Todo> {
        self.todos.iter_mut().find(|todo| todo.id == id)
    }

    pub fn todos(&self) -> &[Todo] {
        &self.todos
    }

    pub fn status(&self) -> &LoadStatus {
        &self.status
    }

    pub fn last_error(&self) -> Option<&ApiError> {
        self.last_error.as_ref()
    }

    /// The snapshot may disagree with the server and should be re-fetched.
    pub fn is_stale(&self) -> bool {
        self.stale
    }

    pub fn can_retry(&self) -> bool {
        matches!(self.status, LoadStatus::Failed(_))
    }

    pub fn view(&self) -> TodoView<'_> {
        build_view(&self.todos)
    }
}
