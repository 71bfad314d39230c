//! Error types for queue, store and serializer operations.

use thiserror::Error;

/// Result type for queue operations
pub type QueueResult<T> = Result<T, QueueError>;

/// Errors raised while talking to the backing list store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The Redis client reported a connection, timeout or protocol failure.
    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),

    /// Connection parameters could not be parsed.
    #[error("invalid connection config: {0}")]
    InvalidConfig(String),

    /// The store replied with something the adapter cannot interpret.
    #[error("unexpected store response: {0}")]
    UnexpectedResponse(String),
}

/// Errors raised by a [`Serializer`](crate::Serializer) implementation.
#[derive(Debug, Error)]
pub enum SerializerError {
    #[error("bincode: {0}")]
    Bincode(#[from] bincode::Error),

    #[error("json: {0}")]
    Json(#[from] serde_json::Error),

    /// Escape hatch for user-supplied serializers.
    #[error("{0}")]
    Custom(Box<dyn std::error::Error + Send + Sync>),
}

impl SerializerError {
    pub fn custom(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Custom(err.into())
    }
}

/// Errors surfaced to callers of [`Queue`](crate::Queue).
#[derive(Debug, Error)]
pub enum QueueError {
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// A message could not be encoded before being pushed.
    #[error("failed to serialize message: {0}")]
    Serialization(#[source] SerializerError),

    /// Bytes popped from the store could not be decoded, usually because the
    /// producer used a different serializer.
    #[error("failed to deserialize message: {0}")]
    Deserialization(#[source] SerializerError),
}
