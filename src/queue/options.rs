use std::time::Duration;

/// Options controlling a single `get`, and every `get` issued by `consume`
/// or a worker.
///
/// `block` left unset means non-blocking for [`Queue::get`] and blocking for
/// [`Queue::consume`]. A `timeout` only applies to blocking gets; unset or
/// zero waits indefinitely.
///
/// [`Queue::get`]: crate::Queue::get
/// [`Queue::consume`]: crate::Queue::consume
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GetOptions {
    pub block: Option<bool>,
    pub timeout: Option<Duration>,
}

impl GetOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Blocking get with no timeout.
    pub fn blocking() -> Self {
        Self::new().block(true)
    }

    pub fn non_blocking() -> Self {
        Self::new().block(false)
    }

    pub fn block(mut self, block: bool) -> Self {
        self.block = Some(block);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Fills in `block` if the caller did not choose explicitly.
    pub(crate) fn with_default_block(mut self, block: bool) -> Self {
        self.block.get_or_insert(block);
        self
    }

    pub(crate) fn is_blocking(&self) -> bool {
        self.block.unwrap_or(false)
    }
}
