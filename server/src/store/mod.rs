//! Persistence boundary for todo records.
//!
//! # Design
//! A store maps records onto a single key namespace keyed by `id`. It does no
//! merging and enforces no business rules; the service reads, merges, and
//! writes back whole records. There is no compare-and-swap, so two concurrent
//! updates to one `id` resolve as last-writer-wins.

mod memory;
mod redis;

use async_trait::async_trait;

use crate::error::StoreError;
use crate::model::{Todo, TodoId};

pub use self::memory::MemoryStore;
pub use self::redis::RedisStore;

/// Key-value persistence for todo records.
#[async_trait]
pub trait TodoStore: Send + Sync {
    /// Fetch the record stored under `id`, if any.
    async fn get(&self, id: &TodoId) -> Result<Option<Todo>, StoreError>;

    /// Write `todo` under its `id`, replacing any previous value.
    async fn set(&self, todo: &Todo) -> Result<(), StoreError>;

    /// Remove the record under `id`. Returns `false` if nothing was stored.
    async fn delete(&self, id: &TodoId) -> Result<bool, StoreError>;

    /// Every stored record, in the store's own order.
    async fn list(&self) -> Result<Vec<Todo>, StoreError>;

    /// Check that the backend is reachable.
    async fn ping(&self) -> Result<(), StoreError>;
}
