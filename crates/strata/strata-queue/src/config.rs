//! Queue admission configuration.
//!
//! The default is unbounded: `push` never blocks, and a consumer slower than
//! the producer accumulates an ever-growing backlog. A bounded capacity is an
//! explicit opt-in that turns a full queue into producer backpressure.

use crate::error::QueueError;

/// Capacity policy for a [`BlockingQueue`](crate::BlockingQueue).
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct QueueConfig {
    /// Maximum number of queued entries. `None` means unbounded.
    pub capacity: Option<usize>,
}

impl QueueConfig {
    pub fn unbounded() -> Self {
        Self { capacity: None }
    }

    /// Opt-in bounded mode. `push` blocks while the queue holds `capacity` items.
    ///
    /// ```
    /// use strata_queue::QueueConfig;
    /// assert!(QueueConfig::bounded(4).validate().is_ok());
    /// assert!(QueueConfig::bounded(0).validate().is_err());
    /// ```
    pub fn bounded(capacity: usize) -> Self {
        Self {
            capacity: Some(capacity),
        }
    }

    pub fn is_bounded(&self) -> bool {
        self.capacity.is_some()
    }

    pub fn validate(&self) -> Result<(), QueueError> {
        match self.capacity {
            Some(0) => Err(QueueError::ZeroCapacity),
            _ => Ok(()),
        }
    }
}
