// List store backends

pub mod config;
pub mod memory;
pub mod redis_store;

pub use config::ConnectionConfig;
pub use memory::MemoryStore;
pub use redis_store::RedisStore;

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::StoreError;

/// An ordered list store keyed by string, with atomic single-command
/// push/pop/delete/length primitives.
///
/// A blocking pop suspends inside the store until an element arrives or
/// `timeout` elapses. `None` or a zero timeout waits indefinitely.
#[async_trait]
pub trait ListStore: Send + Sync {
    async fn push_tail(&self, key: &str, payloads: Vec<Bytes>) -> Result<(), StoreError>;

    async fn push_head(&self, key: &str, payloads: Vec<Bytes>) -> Result<(), StoreError>;

    async fn pop_head(&self, key: &str) -> Result<Option<Bytes>, StoreError>;

    async fn pop_tail(&self, key: &str) -> Result<Option<Bytes>, StoreError>;

    async fn blocking_pop_head(
        &self,
        key: &str,
        timeout: Option<Duration>,
    ) -> Result<Option<Bytes>, StoreError>;

    async fn blocking_pop_tail(
        &self,
        key: &str,
        timeout: Option<Duration>,
    ) -> Result<Option<Bytes>, StoreError>;

    /// Removes the key. Deleting an absent key is not an error.
    async fn delete(&self, key: &str) -> Result<(), StoreError>;

    /// Number of elements stored under `key`, zero when absent.
    async fn len(&self, key: &str) -> Result<usize, StoreError>;
}

/// Normalizes a blocking-pop timeout: `None` and zero both mean "forever".
pub(crate) fn effective_timeout(timeout: Option<Duration>) -> Option<Duration> {
    timeout.filter(|t| !t.is_zero())
}
