// HotQueue - FIFO and LIFO message queues stored in Redis lists
//
// A queue maps onto a single list key (`hotqueue:<name>`). Producers push
// serialized messages onto it, consumers pop them back, optionally blocking
// inside the store until one arrives.
//
// `Queue::consume` and `Worker::run` stop on Ctrl-C by listening through
// `tokio::signal::ctrl_c`, which replaces the default SIGINT action for the
// rest of the process. Programs that must still die on Ctrl-C afterwards
// should use `consume_until` / `run_until` with their own shutdown future.

pub mod error;
pub mod queue;
pub mod serializer;
pub mod store;

pub use error::{QueueError, QueueResult, SerializerError, StoreError};
pub use queue::{key_for_name, End, GetOptions, Policy, Queue, Worker, KEY_PREFIX};
pub use serializer::{Bincode, Json, Serializer};
pub use store::{ConnectionConfig, ListStore, MemoryStore, RedisStore};
