//! Single-producer fan-out of immutable matrices to threaded consumers.
//!
//! # Design
//! - **Broadcaster**: builds one [`Matrix`] per generation event and hands the
//!   same [`SharedMatrix`] to every registered observer, in registration order.
//! - **Consumers**: each owns a [`BlockingQueue`](strata_queue::BlockingQueue)
//!   and one worker thread. Workers run at their own pace; a slow consumer
//!   never holds back a fast one.
//! - **Shutdown**: `stop` queues an [`Envelope::Shutdown`] behind all pending
//!   data and joins the worker, so everything published before `stop` is
//!   processed before it returns.
//!
//! # Ordering
//! Per-consumer delivery order equals publication order. There is no ordering
//! across consumers.

pub mod broadcaster;
pub mod consumer;
pub mod envelope;
pub mod error;
pub mod process;
pub mod sink;

pub use broadcaster::Broadcaster;
pub use consumer::{Consumer, MatrixObserver, WorkerState};
pub use envelope::Envelope;
pub use error::FanoutError;
pub use process::{Aggregator, DEFAULT_RENDER_DELAY, Logger, Process, Renderer};
pub use sink::{CaptureSink, JournalSink, StatusLine, StatusSink, TeeSink, TracingSink};
pub use strata_matrix::{Matrix, SharedMatrix};
pub use strata_queue::QueueConfig;
