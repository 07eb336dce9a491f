//! Destinations for consumer status lines.
//!
//! Every processed matrix produces exactly one call to [`StatusSink::emit`];
//! shutdown entries produce none. Sinks are shared between worker threads, so
//! implementations must be `Send + Sync`.

use std::sync::{Arc, Mutex, PoisonError};
use strata_journal::{Journal, Level};

pub trait StatusSink: Send + Sync {
    fn emit(&self, consumer: &str, line: &str);
}

/// Emits each status line as a `tracing` info event.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl StatusSink for TracingSink {
    fn emit(&self, consumer: &str, line: &str) {
        tracing::info!(consumer, "{line}");
    }
}

/// Writes status lines to a [`Journal`] at a fixed level.
///
/// A degraded journal silently discards them.
pub struct JournalSink {
    journal: Arc<Journal>,
    level: Level,
}

impl JournalSink {
    pub fn new(journal: Arc<Journal>, level: Level) -> Self {
        Self { journal, level }
    }
}

impl StatusSink for JournalSink {
    fn emit(&self, consumer: &str, line: &str) {
        self.journal.log(self.level, &format!("[{consumer}] {line}"));
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub consumer: String,
    pub line: String,
}

/// Keeps every emitted line in memory, in emission order.
#[derive(Debug, Default)]
pub struct CaptureSink {
    lines: Mutex<Vec<StatusLine>>,
}

impl CaptureSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<StatusLine> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Lines emitted by one consumer, in order.
    pub fn lines_for(&self, consumer: &str) -> Vec<String> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|l| l.consumer == consumer)
            .map(|l| l.line.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.lines.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl StatusSink for CaptureSink {
    fn emit(&self, consumer: &str, line: &str) {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(StatusLine {
                consumer: consumer.to_string(),
                line: line.to_string(),
            });
    }
}

/// Forwards every line to each inner sink in turn.
#[derive(Default, Clone)]
pub struct TeeSink {
    sinks: Vec<Arc<dyn StatusSink>>,
}

impl TeeSink {
    pub fn new(sinks: Vec<Arc<dyn StatusSink>>) -> Self {
        Self { sinks }
    }

    pub fn push(&mut self, sink: Arc<dyn StatusSink>) {
        self.sinks.push(sink);
    }
}

impl StatusSink for TeeSink {
    fn emit(&self, consumer: &str, line: &str) {
        for sink in &self.sinks {
            sink.emit(consumer, line);
        }
    }
}
