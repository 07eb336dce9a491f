//! Shared helpers for the strata benchmarks.

use strata_fanout::StatusSink;
use strata_matrix::{Matrix, SharedMatrix};

/// Sink that discards every line, so benches measure the pipeline and not I/O.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl StatusSink for NullSink {
    #[inline(always)]
    fn emit(&self, _consumer: &str, _line: &str) {}
}

pub fn make_test_matrix(rows: usize, cols: usize) -> SharedMatrix {
    Matrix::sequential(rows, cols).into_shared()
}
