//! Asynchronous, level-filtered append-only log file.
//!
//! Callers format and enqueue lines; a single writer thread owns the file and
//! drains the queue. A journal whose file cannot be opened still accepts
//! lines and discards them, so producers never fail on a missing sink.
//!
//! A process-wide instance can be installed with [`install`] and must be
//! released with [`teardown`], which flushes and closes the file.

mod error;
mod global;
mod journal;
mod level;

pub use error::JournalError;
pub use global::{global, install, teardown};
pub use journal::Journal;
pub use level::Level;
