//! Process-wide journal slot.
//!
//! Lifecycle is explicit: nothing exists until `install` runs, and the file is
//! only flushed and closed by `teardown`. Handles returned by `global` keep the
//! journal alive, but after teardown their `log` calls are no-ops.

use crate::journal::Journal;
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

static SLOT: OnceLock<Mutex<Option<Arc<Journal>>>> = OnceLock::new();

fn slot() -> &'static Mutex<Option<Arc<Journal>>> {
    SLOT.get_or_init(|| Mutex::new(None))
}

/// Makes `journal` the process-wide instance and returns a handle to it.
///
/// A previously installed journal is shut down first.
pub fn install(journal: Journal) -> Arc<Journal> {
    let journal = Arc::new(journal);
    let previous = slot()
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .replace(Arc::clone(&journal));
    if let Some(previous) = previous {
        previous.shutdown();
    }
    journal
}

/// The installed journal, if any.
pub fn global() -> Option<Arc<Journal>> {
    slot()
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}

/// Removes the installed journal, flushing and closing its file.
///
/// Returns false if nothing was installed.
pub fn teardown() -> bool {
    let current = slot().lock().unwrap_or_else(PoisonError::into_inner).take();
    match current {
        Some(journal) => {
            journal.shutdown();
            true
        }
        None => false,
    }
}
