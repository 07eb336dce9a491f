//! Blocking FIFO hand-off between one producer-side caller and one worker thread.
//!
//! The queue is the only mutable state shared between the producer and a
//! consumer worker. It is guarded by a local mutex and two condition
//! variables, so an idle worker sleeps instead of spinning.

mod blocking;
mod config;
mod error;

pub use blocking::BlockingQueue;
pub use config::QueueConfig;
pub use error::QueueError;
