use std::future::Future;

use futures_util::stream::Stream;
use futures_util::{pin_mut, StreamExt};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::hot_queue::Queue;
use super::options::GetOptions;
use crate::error::QueueResult;
use crate::serializer::Serializer;
use crate::store::ListStore;

/// A handler bound to a queue. Running it consumes the queue and calls the
/// handler for every message until the consume stream ends.
///
/// ```no_run
/// # async fn demo(queue: hotqueue::Queue<String>) -> hotqueue::QueueResult<()> {
/// use std::time::Duration;
/// use hotqueue::GetOptions;
///
/// let mut printer = queue.worker_with(
///     GetOptions::blocking().timeout(Duration::from_secs(1)),
///     |message: String| println!("{}", message),
/// );
/// printer.run().await?;
/// # Ok(())
/// # }
/// ```
pub struct Worker<'q, T, L, S, F> {
    queue: &'q Queue<T, L, S>,
    options: GetOptions,
    handler: F,
}

impl<'q, T, L, S, F> Worker<'q, T, L, S, F>
where
    T: Serialize + DeserializeOwned,
    L: ListStore,
    S: Serializer,
    F: FnMut(T),
{
    pub(crate) fn new(queue: &'q Queue<T, L, S>, options: GetOptions, handler: F) -> Self {
        Self {
            queue,
            options,
            handler,
        }
    }

    pub fn options(&self) -> GetOptions {
        self.options
    }

    /// Handles messages until the queue runs dry or Ctrl-C is received.
    /// Returns how many messages were handled.
    ///
    /// Like [`Queue::consume`], this replaces the default SIGINT action for
    /// the rest of the process. Use [`run_until`](Self::run_until) to avoid it.
    pub async fn run(&mut self) -> QueueResult<usize> {
        let queue = self.queue;
        let messages = queue.consume(self.options);
        pin_mut!(messages);
        self.drain(messages).await
    }

    /// Like [`run`](Self::run) but stops when `shutdown` resolves.
    pub async fn run_until<Fut>(&mut self, shutdown: Fut) -> QueueResult<usize>
    where
        Fut: Future<Output = ()>,
    {
        let queue = self.queue;
        let messages = queue.consume_until(self.options, shutdown);
        pin_mut!(messages);
        self.drain(messages).await
    }

    async fn drain<M>(&mut self, mut messages: M) -> QueueResult<usize>
    where
        M: Stream<Item = QueueResult<T>> + Unpin,
    {
        let mut handled = 0;
        while let Some(message) = messages.next().await {
            (self.handler)(message?);
            handled += 1;
        }

        tracing::debug!("Worker on {} handled {} message(s)", self.queue.key(), handled);
        Ok(handled)
    }
}
