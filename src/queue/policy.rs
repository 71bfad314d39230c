use std::fmt;

/// Which end of the backing list a queue pops from.
///
/// Both policies push onto the tail. FIFO pops from the head, LIFO pops from
/// the tail it pushed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Policy {
    #[default]
    Fifo,
    Lifo,
}

/// One end of a list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum End {
    Head,
    Tail,
}

impl Policy {
    pub fn pop_end(self) -> End {
        match self {
            Policy::Fifo => End::Head,
            Policy::Lifo => End::Tail,
        }
    }

    /// Blocking pops use the same end as non-blocking ones.
    pub fn blocking_pop_end(self) -> End {
        self.pop_end()
    }

    /// Name used when rendering a queue: `HotQueue` or `HotStack`.
    pub fn type_name(self) -> &'static str {
        match self {
            Policy::Fifo => "HotQueue",
            Policy::Lifo => "HotStack",
        }
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Policy::Fifo => write!(f, "fifo"),
            Policy::Lifo => write!(f, "lifo"),
        }
    }
}
