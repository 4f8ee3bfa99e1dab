//! Unbounded work queue with a completion barrier
//!
//! Producers `put` items, consumers `get` them and call `task_done` once the
//! item is fully processed. `join` resolves when every item ever put has been
//! marked done. `close` releases idle consumers so they can exit.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::sync::Notify;

#[derive(Debug)]
struct QueueState<T> {
    items: VecDeque<T>,
    unfinished: usize,
    closed: bool,
}

/// FIFO queue shared between a producer and a set of async consumers
#[derive(Debug)]
pub struct WorkQueue<T> {
    state: Mutex<QueueState<T>>,
    available: Notify,
    all_done: Notify,
}

/// Marks one item done when dropped, including on unwind
#[must_use = "the item is marked done as soon as the guard is dropped"]
pub struct TaskDone<'a, T> {
    queue: &'a WorkQueue<T>,
}

impl<T> Drop for TaskDone<'_, T> {
    fn drop(&mut self) {
        self.queue.task_done();
    }
}

impl<T> WorkQueue<T> {
    /// Create an empty, open queue
    pub fn new() -> Self {
        Self {
            state: Mutex::new(QueueState {
                items: VecDeque::new(),
                unfinished: 0,
                closed: false,
            }),
            available: Notify::new(),
            all_done: Notify::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, QueueState<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append an item and wake one waiting consumer
    pub fn put(&self, item: T) {
        {
            let mut state = self.lock();
            state.items.push_back(item);
            state.unfinished += 1;
        }
        self.available.notify_one();
    }

    /// Take the next item, suspending while the queue is empty.
    ///
    /// Returns `None` once the queue is closed and drained.
    pub async fn get(&self) -> Option<T> {
        loop {
            let notified = self.available.notified();
            tokio::pin!(notified);
            // Register before checking state so a concurrent put/close is not missed
            notified.as_mut().enable();

            {
                let mut state = self.lock();
                if let Some(item) = state.items.pop_front() {
                    return Some(item);
                }
                if state.closed {
                    return None;
                }
            }

            notified.await;
        }
    }

    /// Mark one previously taken item as processed
    pub fn task_done(&self) {
        let finished = {
            let mut state = self.lock();
            debug_assert!(
                state.unfinished > 0,
                "task_done called more times than items were put"
            );
            state.unfinished = state.unfinished.saturating_sub(1);
            state.unfinished == 0
        };

        if finished {
            self.all_done.notify_waiters();
        }
    }

    /// Guard that calls [`WorkQueue::task_done`] when dropped
    pub fn task_guard(&self) -> TaskDone<'_, T> {
        TaskDone { queue: self }
    }

    /// Wait until every item put so far has been marked done
    pub async fn join(&self) {
        loop {
            let notified = self.all_done.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            let done = self.lock().unfinished == 0;
            if done {
                return;
            }

            notified.await;
        }
    }

    /// Stop handing out new waits: idle consumers receive `None`.
    ///
    /// Items still queued are drained before consumers see the close.
    pub fn close(&self) {
        self.lock().closed = true;
        self.available.notify_waiters();
    }

    /// Number of items waiting to be taken
    pub fn len(&self) -> usize {
        self.lock().items.len()
    }

    /// Returns true if no item is waiting to be taken
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of items put but not yet marked done
    pub fn unfinished(&self) -> usize {
        self.lock().unfinished
    }
}

impl<T> Default for WorkQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::time::timeout;

    const WAIT: Duration = Duration::from_secs(5);

    #[tokio::test]
    async fn test_fifo_order() {
        let queue = WorkQueue::new();
        queue.put(1);
        queue.put(2);
        queue.put(3);

        assert_eq!(queue.len(), 3);
        assert_eq!(queue.get().await, Some(1));
        assert_eq!(queue.get().await, Some(2));
        assert_eq!(queue.get().await, Some(3));
        assert!(queue.is_empty());
        assert_eq!(queue.unfinished(), 3);
    }

    #[tokio::test]
    async fn test_get_waits_for_put() {
        let queue = Arc::new(WorkQueue::new());
        let consumer = {
            let queue = Arc::clone(&queue);
            tokio::spawn(async move { queue.get().await })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!consumer.is_finished());

        queue.put("flask");
        let got = timeout(WAIT, consumer).await.unwrap().unwrap();
        assert_eq!(got, Some("flask"));
    }

    #[tokio::test]
    async fn test_close_releases_idle_consumers() {
        let queue: Arc<WorkQueue<u32>> = Arc::new(WorkQueue::new());
        let consumers: Vec<_> = (0..3)
            .map(|_| {
                let queue = Arc::clone(&queue);
                tokio::spawn(async move { queue.get().await })
            })
            .collect();

        tokio::time::sleep(Duration::from_millis(20)).await;
        queue.close();
        assert!(queue.lock().closed);

        for consumer in consumers {
            let got = timeout(WAIT, consumer).await.unwrap().unwrap();
            assert_eq!(got, None);
        }
    }

    #[tokio::test]
    async fn test_close_drains_remaining_items_first() {
        let queue = WorkQueue::new();
        queue.put(7);
        queue.close();
        assert_eq!(queue.get().await, Some(7));
        assert_eq!(queue.get().await, None);
    }

    #[tokio::test]
    async fn test_join_on_empty_queue_returns_immediately() {
        let queue: WorkQueue<u32> = WorkQueue::new();
        timeout(WAIT, queue.join()).await.unwrap();
    }

    #[tokio::test]
    async fn test_join_waits_for_task_done() {
        let queue = Arc::new(WorkQueue::new());
        queue.put(1);
        queue.put(2);

        let joiner = {
            let queue = Arc::clone(&queue);
            tokio::spawn(async move { queue.join().await })
        };

        let _ = queue.get().await;
        queue.task_done();
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!joiner.is_finished());

        let _ = queue.get().await;
        queue.task_done();
        timeout(WAIT, joiner).await.unwrap().unwrap();
        assert_eq!(queue.unfinished(), 0);
    }

    #[tokio::test]
    async fn test_task_guard_marks_done_on_drop() {
        let queue = WorkQueue::new();
        queue.put("numpy");
        let item = queue.get().await;
        assert_eq!(item, Some("numpy"));
        {
            let _done = queue.task_guard();
            assert_eq!(queue.unfinished(), 1);
        }
        assert_eq!(queue.unfinished(), 0);
        timeout(WAIT, queue.join()).await.unwrap();
    }
}
