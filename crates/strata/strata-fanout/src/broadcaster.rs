//! Producer side: build one matrix, hand the same handle to every observer.
//!
//! The broadcaster only borrows its observers. The `'a` lifetime makes the
//! compiler enforce that every consumer outlives the broadcaster, and since
//! `stop` needs `&mut`, no registered consumer can be stopped while the
//! broadcaster can still submit to it. Drop the broadcaster, then stop.

use crate::consumer::MatrixObserver;
use crate::error::FanoutError;
use strata_matrix::{Matrix, SharedMatrix};

pub struct Broadcaster<'a> {
    observers: Vec<&'a dyn MatrixObserver>,
    generated: u64,
}

impl<'a> Broadcaster<'a> {
    pub fn new() -> Self {
        Self {
            observers: Vec::new(),
            generated: 0,
        }
    }

    /// Registers `observer`. Only events generated afterwards reach it.
    pub fn add_observer(&mut self, observer: &'a dyn MatrixObserver) {
        tracing::debug!(consumer = observer.name(), "observer registered");
        self.observers.push(observer);
    }

    /// Builds a `rows x cols` matrix with cell `[i][j] = i * cols + j` and fans
    /// it out to every observer in registration order.
    ///
    /// Only enqueues; never waits for consumers to process. Returns the shared
    /// handle that was published.
    pub fn generate(&mut self, rows: usize, cols: usize) -> Result<SharedMatrix, FanoutError> {
        let matrix = Matrix::sequential(rows, cols).into_shared();
        self.publish(&matrix)?;
        Ok(matrix)
    }

    /// Fans an already-built matrix out to every observer.
    ///
    /// An observer that rejects the matrix does not stop delivery to the ones
    /// after it; the first rejection is returned once all were tried. The
    /// matrix counts as published either way.
    pub fn publish(&mut self, matrix: &SharedMatrix) -> Result<(), FanoutError> {
        let mut first_err = None;
        for observer in &self.observers {
            if let Err(err) = observer.submit(SharedMatrix::clone(matrix)) {
                first_err.get_or_insert(err);
            }
        }
        self.generated += 1;
        match first_err {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Number of matrices published so far.
    pub fn generated(&self) -> u64 {
        self.generated
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}

impl Default for Broadcaster<'_> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Records submissions in place, no thread involved.
    struct Recorder {
        name: &'static str,
        seen: Mutex<Vec<SharedMatrix>>,
    }

    impl Recorder {
        fn new(name: &'static str) -> Self {
            Self {
                name,
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    impl MatrixObserver for Recorder {
        fn name(&self) -> &'static str {
            self.name
        }

        fn submit(&self, matrix: SharedMatrix) -> Result<(), FanoutError> {
            self.seen.lock().unwrap().push(matrix);
            Ok(())
        }

        fn stop(&mut self) {}
    }

    #[test]
    fn every_observer_gets_the_same_handle() {
        let a = Recorder::new("a");
        let b = Recorder::new("b");

        let mut bus = Broadcaster::new();
        bus.add_observer(&a);
        bus.add_observer(&b);
        assert_eq!(bus.len(), 2);

        let published = bus.generate(3, 3).unwrap();
        assert_eq!(bus.generated(), 1);

        let seen_a = a.seen.lock().unwrap();
        let seen_b = b.seen.lock().unwrap();
        assert!(Arc::ptr_eq(&seen_a[0], &published));
        assert!(Arc::ptr_eq(&seen_b[0], &published));
        assert_eq!(seen_a[0].sum(), 36.0);
    }

    /// Always refuses, like a consumer that has already been stopped.
    struct Closed;

    impl MatrixObserver for Closed {
        fn name(&self) -> &'static str {
            "closed"
        }

        fn submit(&self, _matrix: SharedMatrix) -> Result<(), FanoutError> {
            Err(FanoutError::Stopped { consumer: "closed" })
        }

        fn stop(&mut self) {}
    }

    #[test]
    fn rejection_does_not_starve_later_observers() {
        let before = Recorder::new("before");
        let closed = Closed;
        let after = Recorder::new("after");

        let mut bus = Broadcaster::new();
        bus.add_observer(&before);
        bus.add_observer(&closed);
        bus.add_observer(&after);

        let err = bus.generate(2, 2).unwrap_err();
        assert!(matches!(err, FanoutError::Stopped { consumer: "closed" }));
        assert_eq!(before.seen.lock().unwrap().len(), 1);
        assert_eq!(after.seen.lock().unwrap().len(), 1);
        assert_eq!(bus.generated(), 1);
    }

    #[test]
    fn late_observer_misses_earlier_events() {
        let early = Recorder::new("early");
        let late = Recorder::new("late");

        let mut bus = Broadcaster::new();
        bus.add_observer(&early);
        bus.generate(1, 1).unwrap();
        bus.add_observer(&late);
        bus.generate(2, 2).unwrap();

        assert_eq!(early.seen.lock().unwrap().len(), 2);
        assert_eq!(late.seen.lock().unwrap().len(), 1);
    }

    #[test]
    fn repeated_shapes_are_distinct_allocations() {
        let mut bus = Broadcaster::new();
        let first = bus.generate(4, 5).unwrap();
        let second = bus.generate(4, 5).unwrap();
        assert_eq!(*first, *second);
        assert!(!Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn empty_registry_still_generates() {
        let mut bus = Broadcaster::default();
        assert!(bus.is_empty());
        let m = bus.generate(0, 0).unwrap();
        assert!(m.is_empty());
        assert_eq!(bus.generated(), 1);
    }
}
