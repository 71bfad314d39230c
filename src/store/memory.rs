use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use dashmap::DashMap;
use parking_lot::Mutex;
use tokio::sync::Notify;

use super::{effective_timeout, ListStore};
use crate::error::StoreError;
use crate::queue::End;

#[derive(Default)]
struct MemoryList {
    items: Mutex<VecDeque<Bytes>>,
    notify: Notify,
}

impl MemoryList {
    fn push(&self, end: End, payloads: Vec<Bytes>) {
        let pushed = payloads.len();
        {
            let mut items = self.items.lock();
            for payload in payloads {
                match end {
                    End::Head => items.push_front(payload),
                    End::Tail => items.push_back(payload),
                }
            }
        }
        // One wake-up per element so each waiting consumer gets a chance.
        for _ in 0..pushed {
            self.notify.notify_one();
        }
    }

    fn pop(&self, end: End) -> Option<Bytes> {
        let mut items = self.items.lock();
        match end {
            End::Head => items.pop_front(),
            End::Tail => items.pop_back(),
        }
    }

    async fn pop_wait(&self, end: End) -> Bytes {
        loop {
            let notified = self.notify.notified();
            tokio::pin!(notified);
            // Register before checking so a push between the check and the
            // await still wakes us.
            notified.as_mut().enable();

            if let Some(payload) = self.pop(end) {
                return payload;
            }

            notified.await;
            // Spurious wakeup or another consumer took the element; retry.
        }
    }

    async fn blocking_pop(&self, end: End, timeout: Option<Duration>) -> Option<Bytes> {
        let Some(timeout) = effective_timeout(timeout) else {
            return Some(self.pop_wait(end).await);
        };

        match tokio::time::timeout(timeout, self.pop_wait(end)).await {
            Ok(payload) => Some(payload),
            // Timeout expired, do final check before returning None
            Err(_) => self.pop(end),
        }
    }
}

/// In-process list store with the same semantics as the Redis backend.
///
/// Clones share the same lists, so a producer and a consumer can each hold
/// their own handle. An emptied list counts as absent, as in Redis.
#[derive(Clone, Default)]
pub struct MemoryStore {
    lists: Arc<DashMap<String, Arc<MemoryList>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn list(&self, key: &str) -> Arc<MemoryList> {
        if let Some(list) = self.lists.get(key) {
            return list.clone();
        }
        self.lists.entry(key.to_string()).or_default().clone()
    }

    /// Drops the entry for `key` once it is empty and no caller holds it.
    fn release(&self, key: &str) {
        self.lists
            .remove_if(key, |_, list| Arc::strong_count(list) == 1 && list.items.lock().is_empty());
    }

    fn pop(&self, key: &str, end: End) -> Option<Bytes> {
        let payload = self.lists.get(key).and_then(|list| list.pop(end));
        self.release(key);
        payload
    }

    async fn blocking_pop(&self, key: &str, end: End, timeout: Option<Duration>) -> Option<Bytes> {
        let lease = Lease {
            store: self,
            key,
            list: Some(self.list(key)),
        };
        lease.list.as_ref()?.blocking_pop(end, timeout).await
    }

    /// Keys currently holding at least one element, sorted.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .lists
            .iter()
            .filter(|entry| !entry.value().items.lock().is_empty())
            .map(|entry| entry.key().clone())
            .collect();
        keys.sort();
        keys
    }
}

/// Holds a list while a blocking pop waits on it and releases the entry
/// afterwards, including when the pop is cancelled.
struct Lease<'a> {
    store: &'a MemoryStore,
    key: &'a str,
    list: Option<Arc<MemoryList>>,
}

impl Drop for Lease<'_> {
    fn drop(&mut self) {
        self.list.take();
        self.store.release(self.key);
    }
}

impl std::fmt::Display for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "memory")
    }
}

#[async_trait]
impl ListStore for MemoryStore {
    async fn push_tail(&self, key: &str, payloads: Vec<Bytes>) -> Result<(), StoreError> {
        self.list(key).push(End::Tail, payloads);
        Ok(())
    }

    async fn push_head(&self, key: &str, payloads: Vec<Bytes>) -> Result<(), StoreError> {
        self.list(key).push(End::Head, payloads);
        Ok(())
    }

    async fn pop_head(&self, key: &str) -> Result<Option<Bytes>, StoreError> {
        Ok(self.pop(key, End::Head))
    }

    async fn pop_tail(&self, key: &str) -> Result<Option<Bytes>, StoreError> {
        Ok(self.pop(key, End::Tail))
    }

    async fn blocking_pop_head(
        &self,
        key: &str,
        timeout: Option<Duration>,
    ) -> Result<Option<Bytes>, StoreError> {
        Ok(self.blocking_pop(key, End::Head, timeout).await)
    }

    async fn blocking_pop_tail(
        &self,
        key: &str,
        timeout: Option<Duration>,
    ) -> Result<Option<Bytes>, StoreError> {
        Ok(self.blocking_pop(key, End::Tail, timeout).await)
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        if let Some(list) = self.lists.get(key) {
            list.items.lock().clear();
        }
        // Blocked consumers still hold the entry, and with it their Notify.
        self.release(key);
        Ok(())
    }

    async fn len(&self, key: &str) -> Result<usize, StoreError> {
        Ok(self
            .lists
            .get(key)
            .map(|list| list.items.lock().len())
            .unwrap_or(0))
    }
}
