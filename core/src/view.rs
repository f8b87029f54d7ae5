//! Display partitions and ordering derived from a fetched list.
//!
//! Records split into an active section (stable-sorted high → medium → low)
//! and a completed section (input order, never re-sorted). Pure functions of
//! the list; nothing here touches the network or the state container.

use crate::types::Todo;

/// One display section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Section<'a> {
    /// Nothing to show; the consumer may suppress the section entirely.
    Empty,
    Items(Vec<&'a Todo>),
}

impl<'a> Section<'a> {
    fn from_items(items: Vec<&'a Todo>) -> Self {
        if items.is_empty() {
            Section::Empty
        } else {
            Section::Items(items)
        }
    }

    pub fn items(&self) -> &[&'a Todo] {
        match self {
            Section::Empty => &[],
            Section::Items(items) => items,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Section::Empty)
    }
}

/// Display-ready view of a todo list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TodoView<'a> {
    /// Zero records in total. A legitimate state, not an error.
    NoRecords,
    Partitioned {
        active: Section<'a>,
        completed: Section<'a>,
    },
}

/// Split into (active, completed), preserving input order in both.
pub fn partition(todos: &[Todo]) -> (Vec<&Todo>, Vec<&Todo>) {
    todos.iter().partition(|todo| !todo.completed)
}

/// Stable sort by priority tier; equal tiers keep their relative order.
pub fn sort_by_priority(todos: &mut [&Todo]) {
    todos.sort_by_key(|todo| todo.priority);
}

pub fn build_view(todos: &[Todo]) -> TodoView<'_> {
    if todos.is_empty() {
        return TodoView::NoRecords;
    }
    let (mut active, completed) = partition(todos);
    sort_by_priority(&mut active);
    TodoView::Partitioned {
        active: Section::from_items(active),
        completed: Section::from_items(completed),
    }
}
