//! Redis-backed store.
//!
//! Each record is a JSON string under `todo:{id}`. A sorted set `todos:index`
//! scored by creation time (milliseconds) provides listing order; writes and
//! deletes touch the record key and the index in one MULTI/EXEC.

use std::time::Duration;

use async_trait::async_trait;
use bb8_redis::bb8::{Pool, PooledConnection, RunError};
use bb8_redis::redis::{self, RedisError};
use bb8_redis::RedisConnectionManager;
use tracing::debug;

use super::TodoStore;
use crate::error::StoreError;
use crate::model::{Todo, TodoId};

const KEY_PREFIX: &str = "todo:";
const INDEX_KEY: &str = "todos:index";

fn record_key(id: &str) -> String {
    format!("{KEY_PREFIX}{id}")
}

fn decode(key: &str, raw: &str) -> Result<Todo, StoreError> {
    serde_json::from_str(raw).map_err(|source| StoreError::Corrupt {
        key: key.to_string(),
        source,
    })
}

impl From<RedisError> for StoreError {
    fn from(err: RedisError) -> Self {
        StoreError::Unavailable(err.to_string())
    }
}

impl From<RunError<RedisError>> for StoreError {
    fn from(err: RunError<RedisError>) -> Self {
        StoreError::Unavailable(err.to_string())
    }
}

/// Pooled Redis connection implementing `TodoStore`.
#[derive(Clone)]
pub struct RedisStore {
    pool: Pool<RedisConnectionManager>,
}

impl RedisStore {
    /// Build a connection pool for `url`. Checking out a connection fails
    /// with `StoreError::Unavailable` after `connect_timeout`.
    pub async fn connect(url: &str, connect_timeout: Duration) -> Result<Self, StoreError> {
        let manager = RedisConnectionManager::new(url)?;
        let pool = Pool::builder()
            .connection_timeout(connect_timeout)
            .build(manager)
            .await?;
        Ok(Self { pool })
    }

    async fn connection(
        &self,
    ) -> Result<PooledConnection<'_, RedisConnectionManager>, StoreError> {
        Ok(self.pool.get().await?)
    }
}

#[async_trait]
impl TodoStore for RedisStore {
    async fn get(&self, id: &TodoId) -> Result<Option<Todo>, StoreError> {
        let key = record_key(id.as_str());
        let mut conn = self.connection().await?;
        let raw: Option<String> = redis::cmd("GET").arg(&key).query_async(&mut *conn).await?;
        raw.map(|raw| decode(&key, &raw)).transpose()
    }

    async fn set(&self, todo: &Todo) -> Result<(), StoreError> {
        let payload = serde_json::to_string(todo).map_err(StoreError::Encode)?;
        let mut conn = self.connection().await?;

        let mut pipe = redis::pipe();
        pipe.atomic()
            .cmd("SET")
            .arg(record_key(todo.id.as_str()))
            .arg(payload)
            .ignore()
            .cmd("ZADD")
            .arg(INDEX_KEY)
            .arg("NX")
            .arg(todo.created_at.timestamp_millis())
            .arg(todo.id.as_str())
            .ignore();
        let _: () = pipe.query_async(&mut *conn).await?;
        Ok(())
    }

    async fn delete(&self, id: &TodoId) -> Result<bool, StoreError> {
        let mut conn = self.connection().await?;

        let mut pipe = redis::pipe();
        pipe.atomic()
            .cmd("DEL")
            .arg(record_key(id.as_str()))
            .cmd("ZREM")
            .arg(INDEX_KEY)
            .arg(id.as_str());
        let (removed, _unindexed): (i64, i64) = pipe.query_async(&mut *conn).await?;
        Ok(removed > 0)
    }

    async fn list(&self) -> Result<Vec<Todo>, StoreError> {
        let mut conn = self.connection().await?;
        let ids: Vec<String> = redis::cmd("ZRANGE")
            .arg(INDEX_KEY)
            .arg(0)
            .arg(-1)
            .query_async(&mut *conn)
            .await?;
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let keys: Vec<String> = ids.iter().map(|id| record_key(id)).collect();
        let values: Vec<Option<String>> =
            redis::cmd("MGET").arg(&keys).query_async(&mut *conn).await?;

        let mut todos = Vec::with_capacity(values.len());
        for (key, raw) in keys.iter().zip(values) {
            match raw {
                Some(raw) => todos.push(decode(key, &raw)?),
                None => debug!(%key, "index entry without record, skipping"),
            }
        }
        Ok(todos)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        let mut conn = self.connection().await?;
        let _: String = redis::cmd("PING").query_async(&mut *conn).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NewTodo;
    use chrono::Utc;

    #[test]
    fn record_keys_are_prefixed() {
        assert_eq!(record_key("abc-123"), "todo:abc-123");
    }

    #[test]
    fn decode_reports_the_offending_key() {
        let err = decode("todo:x", "not json").unwrap_err();
        assert!(matches!(err, StoreError::Corrupt { ref key, .. } if key == "todo:x"));
    }

    #[tokio::test]
    #[ignore = "requires a running Redis at REDIS_URL"]
    async fn round_trips_against_live_redis() {
        let url = std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1:6379/15".into());
        let store = RedisStore::connect(&url, Duration::from_secs(2)).await.unwrap();
        store.ping().await.unwrap();

        let draft = NewTodo::titled("live").validate().unwrap();
        let todo = Todo::from_draft(TodoId::generate(), draft, Utc::now());
        store.set(&todo).await.unwrap();

        assert_eq!(store.get(&todo.id).await.unwrap(), Some(todo.clone()));
        assert!(store.list().await.unwrap().iter().any(|t| t.id == todo.id));
        assert!(store.delete(&todo.id).await.unwrap());
        assert!(!store.delete(&todo.id).await.unwrap());
        assert!(store.get(&todo.id).await.unwrap().is_none());
    }
}
