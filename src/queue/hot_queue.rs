use std::borrow::Borrow;
use std::fmt;
use std::future::Future;
use std::marker::PhantomData;

use bytes::Bytes;
use futures_util::stream::{self, Stream};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::options::GetOptions;
use super::policy::{End, Policy};
use super::worker::Worker;
use crate::error::{QueueError, QueueResult};
use crate::serializer::{Bincode, Serializer};
use crate::store::{ConnectionConfig, ListStore, RedisStore};

/// Prefix shared by every queue key.
pub const KEY_PREFIX: &str = "hotqueue";

/// Returns the store key used for the queue called `name`.
pub fn key_for_name(name: &str) -> String {
    format!("{}:{}", KEY_PREFIX, name)
}

/// A named message queue stored in a single list of a [`ListStore`].
///
/// Messages of type `T` are encoded with `S` before being pushed and decoded
/// after being popped. Two queues with the same name against the same store
/// are interchangeable.
///
/// ```no_run
/// # async fn demo() -> hotqueue::QueueResult<()> {
/// use hotqueue::{ConnectionConfig, GetOptions, Queue};
///
/// let queue: Queue<String> = Queue::connect("myqueue", ConnectionConfig::default()).await?;
/// queue.put(&"my message".to_string()).await?;
/// let message = queue.get(GetOptions::default()).await?;
/// assert_eq!(message.as_deref(), Some("my message"));
/// # Ok(())
/// # }
/// ```
pub struct Queue<T, L = RedisStore, S = Bincode> {
    name: String,
    key: String,
    policy: Policy,
    store: L,
    serializer: S,
    _message: PhantomData<fn() -> T>,
}

impl<T> Queue<T, RedisStore, Bincode> {
    /// Connects a FIFO queue to Redis.
    pub async fn connect(name: impl Into<String>, config: ConnectionConfig) -> QueueResult<Self> {
        let store = RedisStore::connect(config).await?;
        Ok(Self::new(name, store))
    }

    /// Connects a LIFO queue (a stack) to Redis.
    pub async fn connect_stack(
        name: impl Into<String>,
        config: ConnectionConfig,
    ) -> QueueResult<Self> {
        let store = RedisStore::connect(config).await?;
        Ok(Self::stack(name, store))
    }
}

impl<T, L> Queue<T, L, Bincode> {
    /// FIFO queue over `store` with the default serializer.
    pub fn new(name: impl Into<String>, store: L) -> Self {
        let name = name.into();
        Self {
            key: key_for_name(&name),
            name,
            policy: Policy::Fifo,
            store,
            serializer: Bincode,
            _message: PhantomData,
        }
    }

    /// LIFO queue over `store` with the default serializer.
    pub fn stack(name: impl Into<String>, store: L) -> Self {
        Self::new(name, store).with_policy(Policy::Lifo)
    }
}

impl<T, L, S> Queue<T, L, S> {
    pub fn with_serializer<S2: Serializer>(self, serializer: S2) -> Queue<T, L, S2> {
        Queue {
            name: self.name,
            key: self.key,
            policy: self.policy,
            store: self.store,
            serializer,
            _message: PhantomData,
        }
    }

    pub fn with_policy(mut self, policy: Policy) -> Self {
        self.policy = policy;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The store key backing this queue, `hotqueue:<name>`.
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn policy(&self) -> Policy {
        self.policy
    }

    pub fn store(&self) -> &L {
        &self.store
    }
}

impl<T, L, S> Queue<T, L, S>
where
    T: Serialize + DeserializeOwned,
    L: ListStore,
    S: Serializer,
{
    /// Puts one message onto the queue.
    pub async fn put(&self, message: &T) -> QueueResult<()> {
        self.put_many(std::iter::once(message)).await
    }

    /// Puts messages onto the tail of the queue, in iteration order.
    ///
    /// Every message is encoded before anything is pushed, so a
    /// serialization failure leaves the queue untouched.
    pub async fn put_many<I>(&self, messages: I) -> QueueResult<()>
    where
        I: IntoIterator,
        I::Item: Borrow<T>,
    {
        let payloads = self.encode(messages)?;
        if payloads.is_empty() {
            return Ok(());
        }

        tracing::debug!("Putting {} message(s) onto {}", payloads.len(), self.key);
        self.store.push_tail(&self.key, payloads).await?;
        Ok(())
    }

    /// Puts one message onto the front of the queue.
    pub async fn put_head(&self, message: &T) -> QueueResult<()> {
        self.put_head_many(std::iter::once(message)).await
    }

    /// Puts messages onto the head of the queue one after another, so the
    /// last message ends up frontmost.
    pub async fn put_head_many<I>(&self, messages: I) -> QueueResult<()>
    where
        I: IntoIterator,
        I::Item: Borrow<T>,
    {
        let payloads = self.encode(messages)?;
        if payloads.is_empty() {
            return Ok(());
        }

        tracing::debug!("Putting {} message(s) onto the head of {}", payloads.len(), self.key);
        self.store.push_head(&self.key, payloads).await?;
        Ok(())
    }

    /// Takes a message from the queue.
    ///
    /// Non-blocking gets return `Ok(None)` straight away on an empty queue.
    /// Blocking gets wait in the store for up to `timeout` (forever when unset
    /// or zero) and return `Ok(None)` if it elapses.
    pub async fn get(&self, options: GetOptions) -> QueueResult<Option<T>> {
        let payload = if options.is_blocking() {
            match self.policy.blocking_pop_end() {
                End::Head => self.store.blocking_pop_head(&self.key, options.timeout).await?,
                End::Tail => self.store.blocking_pop_tail(&self.key, options.timeout).await?,
            }
        } else {
            match self.policy.pop_end() {
                End::Head => self.store.pop_head(&self.key).await?,
                End::Tail => self.store.pop_tail(&self.key).await?,
            }
        };

        payload
            .map(|bytes| {
                self.serializer
                    .loads(&bytes)
                    .map_err(QueueError::Deserialization)
            })
            .transpose()
    }

    /// Streams messages until a get comes back empty or Ctrl-C is received.
    ///
    /// `block` defaults to `true`, so without a timeout the stream waits for
    /// new messages indefinitely.
    ///
    /// Listening for Ctrl-C installs a process-wide SIGINT handler through
    /// [`tokio::signal::ctrl_c`] that stays in place after the stream ends:
    /// from then on Ctrl-C no longer terminates the process by default.
    /// Use [`consume_until`](Self::consume_until) with your own shutdown
    /// future to keep the default SIGINT behaviour.
    pub fn consume(&self, options: GetOptions) -> impl Stream<Item = QueueResult<T>> + '_ {
        self.consume_until(options, async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::warn!("Unable to listen for ctrl-c: {}", e);
                std::future::pending::<()>().await;
            }
        })
    }

    /// Streams messages until a get comes back empty or `shutdown` resolves.
    ///
    /// Shutdown ends the stream without an error. Any store or decode error
    /// is yielded once and ends the stream. A blocking get interrupted by
    /// shutdown is abandoned on the client side only.
    pub fn consume_until<'a, F>(
        &'a self,
        options: GetOptions,
        shutdown: F,
    ) -> impl Stream<Item = QueueResult<T>> + 'a
    where
        F: Future<Output = ()> + 'a,
    {
        let options = options.with_default_block(true);

        stream::unfold(Some(Box::pin(shutdown)), move |state| async move {
            let mut shutdown = state?;
            tokio::select! {
                _ = &mut shutdown => {
                    tracing::debug!("Consumer of {} interrupted", self.key);
                    None
                }
                result = self.get(options) => match result {
                    Ok(Some(message)) => Some((Ok(message), Some(shutdown))),
                    Ok(None) => {
                        tracing::debug!("Consumer of {} found no message, stopping", self.key);
                        None
                    }
                    Err(e) => {
                        tracing::warn!("Consumer of {} stopped: {}", self.key, e);
                        Some((Err(e), None))
                    }
                },
            }
        })
    }

    /// Wraps `handler` as a worker consuming with default options
    /// (blocking, no timeout).
    pub fn worker<F>(&self, handler: F) -> Worker<'_, T, L, S, F>
    where
        F: FnMut(T),
    {
        self.worker_with(GetOptions::default(), handler)
    }

    /// Wraps `handler` as a worker whose gets use `options`.
    pub fn worker_with<F>(&self, options: GetOptions, handler: F) -> Worker<'_, T, L, S, F>
    where
        F: FnMut(T),
    {
        Worker::new(self, options, handler)
    }

    /// Deletes the backing key. Clearing an absent queue is a no-op.
    pub async fn clear(&self) -> QueueResult<()> {
        tracing::debug!("Clearing {}", self.key);
        self.store.delete(&self.key).await?;
        Ok(())
    }

    /// Number of messages waiting in the queue.
    pub async fn len(&self) -> QueueResult<usize> {
        Ok(self.store.len(&self.key).await?)
    }

    pub async fn is_empty(&self) -> QueueResult<bool> {
        Ok(self.len().await? == 0)
    }

    fn encode<I>(&self, messages: I) -> QueueResult<Vec<Bytes>>
    where
        I: IntoIterator,
        I::Item: Borrow<T>,
    {
        messages
            .into_iter()
            .map(|message| {
                self.serializer
                    .dumps(<I::Item as Borrow<T>>::borrow(&message))
                    .map(Bytes::from)
                    .map_err(QueueError::Serialization)
            })
            .collect()
    }
}

impl<T, L: fmt::Display, S> fmt::Display for Queue<T, L, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<{}: '{}', {}>",
            self.policy.type_name(),
            self.name,
            self.store
        )
    }
}

impl<T, L, S> fmt::Debug for Queue<T, L, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Queue")
            .field("name", &self.name)
            .field("key", &self.key)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}
