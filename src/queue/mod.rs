// Queue module exports

pub mod hot_queue;
pub mod options;
pub mod policy;
pub mod worker;

pub use hot_queue::{key_for_name, Queue, KEY_PREFIX};
pub use options::GetOptions;
pub use policy::{End, Policy};
pub use worker::Worker;
