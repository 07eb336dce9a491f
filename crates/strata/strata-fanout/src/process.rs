//! Per-consumer processing functions.
//!
//! Each consumer variant is just a `Process` impl; the worker loop, queue and
//! shutdown handling are shared in `Consumer<P>`. A processor turns one matrix
//! into exactly one status line.

use std::time::Duration;
use strata_matrix::Matrix;

/// Simulated cost of one render in the default [`Renderer`].
pub const DEFAULT_RENDER_DELAY: Duration = Duration::from_millis(200);

/// Processing step run on a consumer's worker thread.
pub trait Process: Send + 'static {
    /// Short consumer name, used for the thread name and in status lines.
    const NAME: &'static str;

    /// Handles one matrix and returns its status line.
    fn process(&mut self, matrix: &Matrix) -> String;
}

/// Reports the dimensions of every matrix received.
#[derive(Debug, Default, Clone, Copy)]
pub struct Logger;

impl Process for Logger {
    const NAME: &'static str = "logger";

    fn process(&mut self, matrix: &Matrix) -> String {
        format!("received matrix: {}x{}", matrix.rows(), matrix.cols())
    }
}

/// Models an expensive preview render, then reports the top-left cell.
#[derive(Debug, Clone, Copy)]
pub struct Renderer {
    delay: Duration,
}

impl Renderer {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(DEFAULT_RENDER_DELAY)
    }
}

impl Process for Renderer {
    const NAME: &'static str = "renderer";

    fn process(&mut self, matrix: &Matrix) -> String {
        if !self.delay.is_zero() {
            std::thread::sleep(self.delay);
        }
        match matrix.top_left() {
            Some(v) => format!("top-left = {v}"),
            None => "top-left = <empty>".to_string(),
        }
    }
}

/// Sums every cell.
#[derive(Debug, Default, Clone, Copy)]
pub struct Aggregator;

impl Process for Aggregator {
    const NAME: &'static str = "aggregator";

    fn process(&mut self, matrix: &Matrix) -> String {
        format!("matrix sum = {}", matrix.sum())
    }
}
