//! Pluggable message serializers.
//!
//! A queue never inspects message content; it hands values to a
//! [`Serializer`] on the way in and hands raw bytes back on the way out.
//! Producers and consumers of one queue must agree on the serializer.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::SerializerError;

/// Encode/decode capability pair used by [`Queue`](crate::Queue).
///
/// Implementations must round-trip: `loads(&dumps(&v)?)? == v` for every
/// value they accept.
pub trait Serializer: Send + Sync {
    fn dumps<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>, SerializerError>;

    fn loads<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, SerializerError>;
}

/// Compact binary encoding. The default serializer.
#[derive(Debug, Clone, Copy, Default)]
pub struct Bincode;

impl Serializer for Bincode {
    fn dumps<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>, SerializerError> {
        Ok(bincode::serialize(value)?)
    }

    fn loads<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, SerializerError> {
        Ok(bincode::deserialize(bytes)?)
    }
}

/// JSON encoding, readable from other languages sharing the queue.
#[derive(Debug, Clone, Copy, Default)]
pub struct Json;

impl Serializer for Json {
    fn dumps<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>, SerializerError> {
        Ok(serde_json::to_vec(value)?)
    }

    fn loads<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, SerializerError> {
        Ok(serde_json::from_slice(bytes)?)
    }
}
