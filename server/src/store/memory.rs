use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::TodoStore;
use crate::error::StoreError;
use crate::model::{Todo, TodoId};

#[derive(Debug, Default)]
struct Inner {
    records: HashMap<TodoId, Todo>,
    // Insertion order, so listing is stable across calls.
    order: Vec<TodoId>,
}

/// Process-local store. Lists records in insertion order.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Inner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TodoStore for MemoryStore {
    async fn get(&self, id: &TodoId) -> Result<Option<Todo>, StoreError> {
        Ok(self.inner.read().await.records.get(id).cloned())
    }

    async fn set(&self, todo: &Todo) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        if inner.records.insert(todo.id.clone(), todo.clone()).is_none() {
            inner.order.push(todo.id.clone());
        }
        Ok(())
    }

    async fn delete(&self, id: &TodoId) -> Result<bool, StoreError> {
        let mut inner = self.inner.write().await;
        if inner.records.remove(id).is_none() {
            return Ok(false);
        }
        inner.order.retain(|existing| existing != id);
        Ok(true)
    }

    async fn list(&self) -> Result<Vec<Todo>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .order
            .iter()
            .filter_map(|id| inner.records.get(id).cloned())
            .collect())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Priority;
    use chrono::Utc;

    fn todo(id: &str, title: &str) -> Todo {
        let now = Utc::now();
        Todo {
            id: TodoId::from(id),
            title: title.to_string(),
            description: None,
            completed: false,
            priority: Priority::Medium,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn empty_store_lists_nothing() {
        let store = MemoryStore::new();
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn lists_in_insertion_order() {
        let store = MemoryStore::new();
        for (id, title) in [("b", "second"), ("a", "first"), ("c", "third")] {
            store.set(&todo(id, title)).await.unwrap();
        }
        let ids: Vec<String> = store
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.id.to_string())
            .collect();
        assert_eq!(ids, vec!["b", "a", "c"]);
    }

    #[tokio::test]
    async fn overwrite_keeps_position() {
        let store = MemoryStore::new();
        store.set(&todo("a", "one")).await.unwrap();
        store.set(&todo("b", "two")).await.unwrap();
        store.set(&todo("a", "one again")).await.unwrap();

        let listed = store.list().await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].title, "one again");
    }

    #[tokio::test]
    async fn delete_reports_whether_anything_was_removed() {
        let store = MemoryStore::new();
        store.set(&todo("a", "one")).await.unwrap();
        assert!(store.delete(&TodoId::from("a")).await.unwrap());
        assert!(!store.delete(&TodoId::from("a")).await.unwrap());
        assert!(store.get(&TodoId::from("a")).await.unwrap().is_none());
        assert!(store.list().await.unwrap().is_empty());
    }
}
