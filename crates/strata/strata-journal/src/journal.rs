use crate::error::JournalError;
use crate::level::Level;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use strata_queue::BlockingQueue;

enum Command {
    Line(String),
    Stop,
}

/// Handle to a background file writer.
///
/// `log` never touches the file: it formats the line and hands it to the
/// writer thread. `shutdown` flushes every line queued before it and closes
/// the file.
pub struct Journal {
    path: PathBuf,
    queue: Arc<BlockingQueue<Command>>,
    min_level: AtomicU8,
    closed: AtomicBool,
    degraded: bool,
    writer: Mutex<Option<JoinHandle<()>>>,
}

impl Journal {
    /// Opens `path` in append mode and starts the writer thread.
    ///
    /// If the file cannot be opened a warning is logged once and the journal
    /// runs degraded: lines are accepted and discarded.
    ///
    /// # Errors
    /// Only fails if the writer thread cannot be spawned.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, JournalError> {
        let path = path.as_ref().to_path_buf();
        let file = match OpenOptions::new().create(true).append(true).open(&path) {
            Ok(file) => Some(file),
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "journal file unavailable, running degraded");
                None
            }
        };
        let degraded = file.is_none();

        let queue = Arc::new(BlockingQueue::new());
        let writer = {
            let queue = Arc::clone(&queue);
            thread::Builder::new()
                .name("strata-journal".into())
                .spawn(move || run_writer(&queue, file))
                .map_err(JournalError::Spawn)?
        };

        Ok(Self {
            path,
            queue,
            min_level: AtomicU8::new(Level::Debug as u8),
            closed: AtomicBool::new(false),
            degraded,
            writer: Mutex::new(Some(writer)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// True when the file could not be opened and lines are being discarded.
    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    pub fn set_level(&self, level: Level) {
        self.min_level.store(level as u8, Ordering::Relaxed);
    }

    pub fn level(&self) -> Level {
        Level::from_u8(self.min_level.load(Ordering::Relaxed))
    }

    /// Queues `message` if `level` passes the current filter.
    pub fn log(&self, level: Level, message: &str) {
        if level < self.level() || self.closed.load(Ordering::Acquire) {
            return;
        }
        // A line racing a concurrent `shutdown` can land behind `Stop` and is dropped.
        self.queue.push(Command::Line(format_line(level, message)));
    }

    /// Flushes all queued lines, closes the file and joins the writer.
    ///
    /// Later calls (and later `log` calls) are no-ops.
    pub fn shutdown(&self) {
        if self.closed.swap(true, Ordering::AcqRel) {
            return;
        }
        self.queue.push(Command::Stop);
        let handle = self
            .writer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(handle) = handle {
            if handle.join().is_err() {
                tracing::error!(path = %self.path.display(), "journal writer panicked");
            }
        }
    }
}

impl Drop for Journal {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn run_writer(queue: &BlockingQueue<Command>, file: Option<File>) {
    let mut out = file.map(BufWriter::new);
    loop {
        match queue.pop_blocking() {
            Command::Line(line) => {
                if let Some(w) = out.as_mut() {
                    // Write errors are swallowed; the journal is best effort.
                    let _ = writeln!(w, "{line}");
                    if queue.is_empty() {
                        let _ = w.flush();
                    }
                }
            }
            Command::Stop => break,
        }
    }
    if let Some(mut w) = out {
        let _ = w.flush();
    }
}

/// Timestamp layout of every journal line, local time with millis.
const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

fn format_line(level: Level, message: &str) -> String {
    format!(
        "[{}] [{}] {}",
        chrono::Local::now().format(TIME_FORMAT),
        level,
        message
    )
}
