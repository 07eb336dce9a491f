//! Mutex + condvar blocking queue.
//!
//! # Protocol
//!
//! **Producer (`push`):**
//! 1. Lock, and in bounded mode wait on `not_full` while at capacity
//! 2. Append to the tail
//! 3. Unlock, then `notify_one` on `not_empty`
//!
//! **Consumer (`pop_blocking`):**
//! 1. Lock; while empty, wait on `not_empty` (releases the lock while asleep)
//! 2. Remove the head
//! 3. Unlock, then in bounded mode `notify_one` on `not_full`
//!
//! # Thread Safety
//! Designed for exactly one producer-side caller and one consumer thread per
//! instance. Several threads calling `pop_blocking` on the same queue is not
//! a supported configuration.

use crate::config::QueueConfig;
use crate::error::QueueError;
use std::collections::VecDeque;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

pub struct BlockingQueue<T> {
    items: Mutex<VecDeque<T>>,
    /// Signalled after every push.
    not_empty: Condvar,
    /// Signalled after every pop, only waited on in bounded mode.
    not_full: Condvar,
    capacity: Option<usize>,
}

impl<T> BlockingQueue<T> {
    /// Creates an unbounded queue. `push` never blocks.
    pub fn new() -> Self {
        Self {
            items: Mutex::new(VecDeque::new()),
            not_empty: Condvar::new(),
            not_full: Condvar::new(),
            capacity: None,
        }
    }

    /// Creates a queue with the given admission policy.
    ///
    /// # Errors
    /// Returns [`QueueError::ZeroCapacity`] for a bounded capacity of 0, which
    /// would block every push forever.
    pub fn with_config(cfg: QueueConfig) -> Result<Self, QueueError> {
        cfg.validate()?;
        let items = match cfg.capacity {
            Some(cap) => VecDeque::with_capacity(cap),
            None => VecDeque::new(),
        };
        Ok(Self {
            items: Mutex::new(items),
            not_empty: Condvar::new(),
            not_full: Condvar::new(),
            capacity: cfg.capacity,
        })
    }

    // A panic on the other side of the queue must not take this side down
    // with it; the VecDeque is never left half-modified.
    #[inline]
    fn lock(&self) -> MutexGuard<'_, VecDeque<T>> {
        self.items.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Appends `item` to the tail and wakes one waiting consumer.
    ///
    /// Unbounded mode never blocks. Bounded mode blocks while the queue is full.
    pub fn push(&self, item: T) {
        let mut items = self.lock();
        if let Some(cap) = self.capacity {
            items = self
                .not_full
                .wait_while(items, |q| q.len() >= cap)
                .unwrap_or_else(PoisonError::into_inner);
        }
        items.push_back(item);
        drop(items);
        self.not_empty.notify_one();
    }

    /// Appends `item` to the tail without waiting for room, even in bounded
    /// mode. The queue can exceed its capacity by these entries.
    ///
    /// Meant for control entries that must get through when the consumer may
    /// never pop again.
    pub fn force_push(&self, item: T) {
        self.lock().push_back(item);
        self.not_empty.notify_one();
    }

    /// Removes and returns the head item, sleeping until one is available.
    ///
    /// There is no timeout: with nothing ever pushed this never returns.
    pub fn pop_blocking(&self) -> T {
        let mut items = self.lock();
        loop {
            if let Some(item) = items.pop_front() {
                drop(items);
                self.wake_producer();
                return item;
            }
            items = self
                .not_empty
                .wait(items)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Non-blocking variant of [`pop_blocking`](Self::pop_blocking).
    pub fn try_pop(&self) -> Option<T> {
        let item = self.lock().pop_front();
        if item.is_some() {
            self.wake_producer();
        }
        item
    }

    #[inline]
    fn wake_producer(&self) {
        if self.capacity.is_some() {
            self.not_full.notify_one();
        }
    }

    /// Number of queued entries at the time of the call.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Bounded capacity, or `None` for an unbounded queue.
    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }
}

impl<T> Default for BlockingQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::thread;
    use std::time::Duration;

    #[test]
    fn preserves_insertion_order() {
        let q = BlockingQueue::new();
        for i in 0..5 {
            q.push(i);
        }
        assert_eq!(q.len(), 5);
        let out: Vec<i32> = (0..5).map(|_| q.pop_blocking()).collect();
        assert_eq!(out, vec![0, 1, 2, 3, 4]);
        assert!(q.is_empty());
    }

    #[test]
    fn try_pop_on_empty_returns_none() {
        let q: BlockingQueue<u8> = BlockingQueue::new();
        assert_eq!(q.try_pop(), None);
        q.push(7);
        assert_eq!(q.try_pop(), Some(7));
        assert_eq!(q.try_pop(), None);
    }

    /// A consumer parked on an empty queue must be woken by a later push.
    #[test]
    fn pop_blocks_until_push() {
        let q = Arc::new(BlockingQueue::new());
        let got = Arc::new(AtomicBool::new(false));

        let consumer = {
            let q = Arc::clone(&q);
            let got = Arc::clone(&got);
            thread::spawn(move || {
                let v: u32 = q.pop_blocking();
                got.store(true, Ordering::SeqCst);
                v
            })
        };

        thread::sleep(Duration::from_millis(50));
        assert!(!got.load(Ordering::SeqCst), "pop returned on an empty queue");

        q.push(42);
        assert_eq!(consumer.join().unwrap(), 42);
        assert!(got.load(Ordering::SeqCst));
    }

    /// One producer and one consumer running concurrently never lose or
    /// reorder entries.
    #[test]
    fn concurrent_spsc_keeps_fifo() {
        const N: u64 = 20_000;
        let q = Arc::new(BlockingQueue::new());

        let consumer = {
            let q = Arc::clone(&q);
            thread::spawn(move || {
                let mut expected = 0u64;
                while expected < N {
                    let v = q.pop_blocking();
                    assert_eq!(v, expected, "out of order");
                    expected += 1;
                }
                expected
            })
        };

        for i in 0..N {
            q.push(i);
        }
        assert_eq!(consumer.join().unwrap(), N);
        assert!(q.is_empty());
    }

    #[test]
    fn bounded_push_waits_for_room() {
        let q = Arc::new(BlockingQueue::with_config(QueueConfig::bounded(1)).unwrap());
        assert_eq!(q.capacity(), Some(1));
        q.push(1);

        let pushed = Arc::new(AtomicBool::new(false));
        let producer = {
            let q = Arc::clone(&q);
            let pushed = Arc::clone(&pushed);
            thread::spawn(move || {
                q.push(2);
                pushed.store(true, Ordering::SeqCst);
            })
        };

        thread::sleep(Duration::from_millis(50));
        assert!(!pushed.load(Ordering::SeqCst), "push ignored the capacity");
        assert_eq!(q.len(), 1);

        assert_eq!(q.pop_blocking(), 1);
        producer.join().unwrap();
        assert!(pushed.load(Ordering::SeqCst));
        assert_eq!(q.pop_blocking(), 2);
    }

    /// A full bounded queue with nobody popping still accepts a forced entry,
    /// behind the ones already queued.
    #[test]
    fn force_push_ignores_capacity() {
        let q = BlockingQueue::with_config(QueueConfig::bounded(1)).unwrap();
        q.push("data");
        q.force_push("stop");
        assert_eq!(q.len(), 2);
        assert_eq!(q.pop_blocking(), "data");
        assert_eq!(q.pop_blocking(), "stop");
    }

    #[test]
    fn bounded_concurrent_transfer() {
        const N: usize = 5_000;
        let q = Arc::new(BlockingQueue::with_config(QueueConfig::bounded(8)).unwrap());

        let consumer = {
            let q = Arc::clone(&q);
            thread::spawn(move || (0..N).map(|_| q.pop_blocking()).collect::<Vec<_>>())
        };
        for i in 0..N {
            q.push(i);
            assert!(q.len() <= 8);
        }
        let out = consumer.join().unwrap();
        assert_eq!(out, (0..N).collect::<Vec<_>>());
    }

    #[test]
    fn zero_capacity_config_is_an_error() {
        let err = BlockingQueue::<u8>::with_config(QueueConfig::bounded(0)).err();
        assert_eq!(err, Some(QueueError::ZeroCapacity));
    }
}
