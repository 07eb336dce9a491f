//! Threaded consumer: one queue, one worker, one processor.
//!
//! # Lifecycle
//!
//! ```text
//!   spawn ──> Running ──stop()──> Draining ──(worker sees Shutdown)──> Stopped
//! ```
//!
//! - **Running**: the worker blocks on its queue and processes each `Data`
//!   entry as it arrives.
//! - **Draining**: `stop` has queued the `Shutdown` sentinel behind every entry
//!   already submitted. FIFO order alone guarantees those entries are
//!   processed first; there is no separate flush step.
//! - **Stopped**: the worker has exited and `stop` has joined it.
//!
//! The worker exits on the sentinel only, never on the `running` flag, so no
//! queued entry can be skipped.
//!
//! If a processor panics, the worker goes straight to `Stopped`: `submit`
//! starts returning [`FanoutError::Stopped`], queued entries are released,
//! and `stop` still returns (logging the panic).

use crate::envelope::Envelope;
use crate::error::FanoutError;
use crate::process::Process;
use crate::sink::StatusSink;
use std::marker::PhantomData;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU8, AtomicU64, Ordering};
use std::thread::{self, JoinHandle};
use strata_matrix::SharedMatrix;
use strata_queue::{BlockingQueue, QueueConfig};

/// Capability the broadcaster needs from a consumer.
pub trait MatrixObserver: Send {
    fn name(&self) -> &'static str;

    /// Queues `matrix` for processing. Never waits for processing itself.
    fn submit(&self, matrix: SharedMatrix) -> Result<(), FanoutError>;

    /// Drains pending entries and joins the worker thread.
    fn stop(&mut self);
}

#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WorkerState {
    Running = 0,
    Draining = 1,
    Stopped = 2,
}

impl WorkerState {
    fn from_u8(raw: u8) -> Self {
        match raw {
            0 => WorkerState::Running,
            1 => WorkerState::Draining,
            _ => WorkerState::Stopped,
        }
    }
}

/// State shared between the consumer handle and its worker thread.
struct Shared {
    /// Cleared by `stop` or by the worker exiting; gates `submit`.
    running: AtomicBool,
    state: AtomicU8,
    processed: AtomicU64,
}

impl Shared {
    fn set_state(&self, state: WorkerState) {
        self.state.store(state as u8, Ordering::Release);
    }
}

/// A consumer running processor `P` on a dedicated worker thread.
pub struct Consumer<P: Process> {
    queue: Arc<BlockingQueue<Envelope>>,
    shared: Arc<Shared>,
    worker: Option<JoinHandle<()>>,
    _pd: PhantomData<fn() -> P>,
}

impl<P: Process> Consumer<P> {
    /// Creates the queue and starts the worker thread immediately.
    ///
    /// # Errors
    /// - [`FanoutError::Queue`] if `queue` is an invalid bounded config
    /// - [`FanoutError::Spawn`] if the OS refuses the thread
    pub fn spawn(
        processor: P,
        sink: Arc<dyn StatusSink>,
        queue: QueueConfig,
    ) -> Result<Self, FanoutError> {
        let queue = Arc::new(BlockingQueue::with_config(queue)?);
        let shared = Arc::new(Shared {
            running: AtomicBool::new(true),
            state: AtomicU8::new(WorkerState::Running as u8),
            processed: AtomicU64::new(0),
        });

        let worker = {
            let queue = Arc::clone(&queue);
            let shared = Arc::clone(&shared);
            thread::Builder::new()
                .name(format!("strata-{}", P::NAME))
                .spawn(move || run_worker(processor, &queue, &shared, sink.as_ref()))
                .map_err(|source| FanoutError::Spawn {
                    consumer: P::NAME,
                    source,
                })?
        };

        Ok(Self {
            queue,
            shared,
            worker: Some(worker),
            _pd: PhantomData,
        })
    }

    pub fn name(&self) -> &'static str {
        P::NAME
    }

    pub fn state(&self) -> WorkerState {
        WorkerState::from_u8(self.shared.state.load(Ordering::Acquire))
    }

    pub fn is_running(&self) -> bool {
        self.shared.running.load(Ordering::Acquire)
    }

    /// Data entries fully processed so far.
    pub fn processed(&self) -> u64 {
        self.shared.processed.load(Ordering::Acquire)
    }

    /// Entries waiting in the queue. Grows without limit in unbounded mode
    /// when this consumer is slower than the producer.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Queues `matrix` as a `Data` entry.
    ///
    /// Submitting after `stop` is a caller bug: the matrix is rejected and
    /// nothing is emitted.
    pub fn submit(&self, matrix: SharedMatrix) -> Result<(), FanoutError> {
        if !self.is_running() {
            tracing::warn!(consumer = P::NAME, "consumer stopped, submit rejected");
            return Err(FanoutError::Stopped { consumer: P::NAME });
        }
        self.queue.push(Envelope::Data(matrix));
        Ok(())
    }

    /// Queues the shutdown sentinel and waits for the worker to exit.
    ///
    /// Returns once every entry submitted before this call has been
    /// processed, or at once if the worker already died from a panicking
    /// processor. Calling it again is a no-op.
    pub fn stop(&mut self) {
        let Some(handle) = self.worker.take() else {
            return;
        };
        self.shared.running.store(false, Ordering::Release);
        if !handle.is_finished() {
            self.shared.set_state(WorkerState::Draining);
        }
        // Forced so a full bounded queue behind a dead worker cannot block us.
        self.queue.force_push(Envelope::Shutdown);

        if handle.join().is_err() {
            tracing::error!(consumer = P::NAME, "worker thread panicked");
        }
        self.shared.set_state(WorkerState::Stopped);
    }
}

impl<P: Process> MatrixObserver for Consumer<P> {
    fn name(&self) -> &'static str {
        P::NAME
    }

    fn submit(&self, matrix: SharedMatrix) -> Result<(), FanoutError> {
        Consumer::submit(self, matrix)
    }

    fn stop(&mut self) {
        Consumer::stop(self)
    }
}

impl<P: Process> Drop for Consumer<P> {
    fn drop(&mut self) {
        if self.worker.is_some() {
            tracing::debug!(consumer = P::NAME, "consumer dropped while running, stopping");
            self.stop();
        }
    }
}

/// Marks the consumer stopped when the worker leaves, including by unwinding
/// out of a panicking processor.
struct ExitGuard<'a> {
    queue: &'a BlockingQueue<Envelope>,
    shared: &'a Shared,
}

impl Drop for ExitGuard<'_> {
    fn drop(&mut self) {
        self.shared.running.store(false, Ordering::Release);
        self.shared.set_state(WorkerState::Stopped);
        // Release queued payloads and unblock a producer waiting on a full
        // bounded queue; nothing will pop them anymore.
        while self.queue.try_pop().is_some() {}
    }
}

fn run_worker<P: Process>(
    mut processor: P,
    queue: &BlockingQueue<Envelope>,
    shared: &Shared,
    sink: &dyn StatusSink,
) {
    let _guard = ExitGuard { queue, shared };
    tracing::debug!(consumer = P::NAME, "worker started");
    loop {
        match queue.pop_blocking() {
            Envelope::Data(matrix) => {
                let line = processor.process(&matrix);
                sink.emit(P::NAME, &line);
                shared.processed.fetch_add(1, Ordering::AcqRel);
            }
            Envelope::Shutdown => break,
        }
    }
    tracing::debug!(
        consumer = P::NAME,
        processed = shared.processed.load(Ordering::Acquire),
        "worker exited"
    );
}
