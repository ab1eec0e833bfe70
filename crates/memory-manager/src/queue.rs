// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Budget-bounded blocking FIFO between one producer and one consumer.
//!
//! [`BlockQueue`] is the only back-pressure mechanism of the pipeline:
//!
//! 1. `push` blocks while the queued bytes plus the new item would exceed
//!    the [`MemoryBudget`]. An item larger than the whole budget is still
//!    admitted once the queue is empty, so an oversized block slows the
//!    pipeline down instead of deadlocking it.
//! 2. `pop` blocks while the queue is empty and the producer has not called
//!    [`BlockQueue::finish`]. Once finished and drained it returns `None`.
//! 3. `close` aborts both sides: waiters wake up, pushes fail, pops return
//!    `None` and queued items are dropped.
//!
//! # Termination
//! The finished flag is written while holding the queue lock and `pop`
//! checks it under the same lock after finding the queue empty, so the
//! consumer can never observe "finished" without also observing every push
//! that preceded it.
//!
//! # Thread Safety
//! `BlockQueue<T>` is `Send + Sync` for `T: Send`; share it via `Arc`.

use crate::{MemoryBudget, MemoryError, QueueStats};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

struct QueueState<T> {
    items: VecDeque<(T, usize)>,
    used_bytes: usize,
    stats: QueueStats,
}

/// A memory-budgeted, blocking, FIFO hand-off queue.
///
/// # Example
/// ```
/// use memory_manager::{BlockQueue, MemoryBudget};
/// use std::sync::Arc;
///
/// let queue = Arc::new(BlockQueue::new(MemoryBudget::from_bytes(1024)));
/// let producer = {
///     let queue = Arc::clone(&queue);
///     std::thread::spawn(move || {
///         for i in 0..4u32 {
///             queue.push(i, 512).unwrap();
///         }
///         queue.finish();
///     })
/// };
///
/// let mut seen = Vec::new();
/// while let Some(item) = queue.pop() {
///     seen.push(item);
/// }
/// producer.join().unwrap();
/// assert_eq!(seen, vec![0, 1, 2, 3]);
/// ```
pub struct BlockQueue<T> {
    budget: MemoryBudget,
    state: Mutex<QueueState<T>>,
    not_empty: Condvar,
    not_full: Condvar,
    finished: AtomicBool,
    closed: AtomicBool,
}

impl<T> BlockQueue<T> {
    /// Creates an empty queue bounded by `budget`.
    pub fn new(budget: MemoryBudget) -> Self {
        Self {
            budget,
            state: Mutex::new(QueueState {
                items: VecDeque::new(),
                used_bytes: 0,
                stats: QueueStats::default(),
            }),
            not_empty: Condvar::new(),
            not_full: Condvar::new(),
            finished: AtomicBool::new(false),
            closed: AtomicBool::new(false),
        }
    }

    /// Enqueues `item`, accounting `size_bytes` against the budget.
    ///
    /// Blocks while the queue is non-empty and the item does not fit.
    pub fn push(&self, item: T, size_bytes: usize) -> Result<(), MemoryError> {
        let budget = self.budget.as_bytes();
        let mut state = self.lock();
        let mut waited = false;

        loop {
            if self.closed.load(Ordering::Acquire) {
                return Err(MemoryError::QueueClosed);
            }
            if self.finished.load(Ordering::Acquire) {
                return Err(MemoryError::QueueFinished);
            }
            if state.items.is_empty() || state.used_bytes + size_bytes <= budget {
                break;
            }
            waited = true;
            state = self
                .not_full
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }

        if size_bytes > budget {
            tracing::warn!(
                "queued item of {size_bytes} bytes exceeds the whole budget ({})",
                self.budget,
            );
        }

        state.items.push_back((item, size_bytes));
        state.used_bytes += size_bytes;
        let (used, len) = (state.used_bytes, state.items.len());
        state.stats.record_push(size_bytes, waited, used, len);
        drop(state);

        self.not_empty.notify_one();
        Ok(())
    }

    /// Dequeues the oldest item, blocking while the queue is empty.
    ///
    /// Returns `None` once the queue is finished and drained, or closed.
    pub fn pop(&self) -> Option<T> {
        let mut state = self.lock();
        loop {
            if self.closed.load(Ordering::Acquire) {
                return None;
            }
            if let Some(item) = self.take_front(&mut state) {
                drop(state);
                self.not_full.notify_one();
                return Some(item);
            }
            if self.finished.load(Ordering::Acquire) {
                return None;
            }
            state = self
                .not_empty
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Dequeues the oldest item without blocking.
    pub fn try_pop(&self) -> Option<T> {
        if self.closed.load(Ordering::Acquire) {
            return None;
        }
        let mut state = self.lock();
        let item = self.take_front(&mut state);
        drop(state);
        if item.is_some() {
            self.not_full.notify_one();
        }
        item
    }

    /// Declares that no further items will be pushed. Idempotent.
    pub fn finish(&self) {
        let state = self.lock();
        self.finished.store(true, Ordering::Release);
        drop(state);
        self.not_empty.notify_all();
    }

    /// Aborts the queue, dropping queued items and waking every waiter.
    pub fn close(&self) {
        let mut state = self.lock();
        self.closed.store(true, Ordering::Release);
        state.items.clear();
        state.used_bytes = 0;
        drop(state);
        self.not_empty.notify_all();
        self.not_full.notify_all();
    }

    /// Returns `true` once [`finish`](Self::finish) has been called.
    pub fn is_finished(&self) -> bool {
        self.finished.load(Ordering::Acquire)
    }

    /// Returns `true` once [`close`](Self::close) has been called.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Returns `true` if no items are queued.
    pub fn is_empty(&self) -> bool {
        self.lock().items.is_empty()
    }

    /// Returns the number of queued items.
    pub fn len(&self) -> usize {
        self.lock().items.len()
    }

    /// Returns the bytes currently accounted against the budget.
    pub fn used_bytes(&self) -> usize {
        self.lock().used_bytes
    }

    /// Returns the budget this queue enforces.
    pub fn budget(&self) -> MemoryBudget {
        self.budget
    }

    /// Returns a snapshot of the queue statistics.
    pub fn stats(&self) -> QueueStats {
        self.lock().stats.clone()
    }

    fn take_front(&self, state: &mut QueueState<T>) -> Option<T> {
        let (item, size) = state.items.pop_front()?;
        state.used_bytes -= size;
        state.stats.record_pop();
        Some(item)
    }

    // A panic while holding the lock cannot leave the state half-updated,
    // so a poisoned mutex is still safe to use.
    fn lock(&self) -> MutexGuard<'_, QueueState<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T> std::fmt::Debug for BlockQueue<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockQueue")
            .field("budget", &self.budget)
            .field("len", &self.len())
            .field("used_bytes", &self.used_bytes())
            .field("finished", &self.is_finished())
            .field("closed", &self.is_closed())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    fn queue(bytes: usize) -> Arc<BlockQueue<u32>> {
        Arc::new(BlockQueue::new(MemoryBudget::from_bytes(bytes)))
    }

    #[test]
    fn test_fifo_order() {
        let q = queue(1000);
        for i in 0..5 {
            q.push(i, 10).unwrap();
        }
        q.finish();
        let drained: Vec<u32> = std::iter::from_fn(|| q.pop()).collect();
        assert_eq!(drained, vec![0, 1, 2, 3, 4]);
        assert!(q.is_empty());
    }

    #[test]
    fn test_accounting() {
        let q = queue(1000);
        q.push(1, 300).unwrap();
        q.push(2, 200).unwrap();
        assert_eq!(q.used_bytes(), 500);
        assert_eq!(q.len(), 2);
        assert_eq!(q.try_pop(), Some(1));
        assert_eq!(q.used_bytes(), 200);
    }

    #[test]
    fn test_oversized_item_admitted_when_empty() {
        let q = queue(100);
        q.push(7, 10_000).unwrap();
        assert_eq!(q.used_bytes(), 10_000);
        assert_eq!(q.try_pop(), Some(7));
    }

    #[test]
    fn test_try_pop_empty() {
        let q = queue(100);
        assert_eq!(q.try_pop(), None);
    }

    #[test]
    fn test_pop_returns_none_after_finish() {
        let q = queue(100);
        q.push(1, 10).unwrap();
        q.finish();
        assert_eq!(q.pop(), Some(1));
        assert_eq!(q.pop(), None);
        assert!(q.is_finished());
    }

    #[test]
    fn test_push_after_finish_fails() {
        let q = queue(100);
        q.finish();
        assert_eq!(q.push(1, 1), Err(MemoryError::QueueFinished));
    }

    #[test]
    fn test_push_blocks_until_budget_frees() {
        let q = queue(100);
        q.push(1, 80).unwrap();

        let producer = {
            let q = Arc::clone(&q);
            thread::spawn(move || q.push(2, 80))
        };

        // The second push cannot fit until the first item is consumed.
        thread::sleep(Duration::from_millis(50));
        assert_eq!(q.len(), 1);

        assert_eq!(q.pop(), Some(1));
        producer.join().unwrap().unwrap();
        assert_eq!(q.pop(), Some(2));
    }

    #[test]
    fn test_pop_blocks_until_push() {
        let q = queue(100);
        let consumer = {
            let q = Arc::clone(&q);
            thread::spawn(move || q.pop())
        };
        thread::sleep(Duration::from_millis(20));
        q.push(42, 1).unwrap();
        assert_eq!(consumer.join().unwrap(), Some(42));
    }

    #[test]
    fn test_finish_wakes_blocked_consumer() {
        let q = queue(100);
        let consumer = {
            let q = Arc::clone(&q);
            thread::spawn(move || q.pop())
        };
        thread::sleep(Duration::from_millis(20));
        q.finish();
        assert_eq!(consumer.join().unwrap(), None);
    }

    #[test]
    fn test_close_unblocks_producer() {
        let q = queue(10);
        q.push(1, 10).unwrap();
        let producer = {
            let q = Arc::clone(&q);
            thread::spawn(move || q.push(2, 10))
        };
        thread::sleep(Duration::from_millis(20));
        q.close();
        assert_eq!(producer.join().unwrap(), Err(MemoryError::QueueClosed));
        assert_eq!(q.pop(), None);
        assert_eq!(q.used_bytes(), 0);
    }

    #[test]
    fn test_concurrent_producer_consumer_preserves_order() {
        let q = queue(64);
        let producer = {
            let q = Arc::clone(&q);
            thread::spawn(move || {
                for i in 0..1000 {
                    q.push(i, 16).unwrap();
                }
                q.finish();
            })
        };

        let mut expected = 0;
        while let Some(v) = q.pop() {
            assert_eq!(v, expected);
            expected += 1;
        }
        producer.join().unwrap();
        assert_eq!(expected, 1000);

        let stats = q.stats();
        assert_eq!(stats.pushes, 1000);
        assert_eq!(stats.pops, 1000);
        assert!(stats.peak_queued_bytes <= 64);
    }

    #[test]
    fn test_debug_format() {
        let q = queue(2048);
        let debug = format!("{q:?}");
        assert!(debug.contains("BlockQueue"));
        assert!(debug.contains("budget"));
    }
}
