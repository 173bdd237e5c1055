//! Deferred execution on the host application's thread.
//!
//! Command handlers run on the console's event-loop thread. Work that must
//! touch host state (pausing a simulation, flushing a cache) is submitted
//! through a [`MainThreadExecutor`] instead; the console never blocks
//! waiting for it. A handler that wants to answer the client afterwards
//! captures a [`ClientHandle`](crate::ClientHandle) clone and replies from
//! inside the task, asynchronously from the original request.

use tokio::sync::mpsc;

/// A deferred unit of work.
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// Submission interface for work that must run on the host's own thread.
///
/// Fire-and-forget: each task runs exactly once, in submission order, with
/// no completion signal back to the console.
pub trait MainThreadExecutor: Send + Sync {
    fn submit(&self, task: Task);
}

/// Channel-backed [`MainThreadExecutor`].
///
/// The host keeps the paired [`TaskRunner`] and drains it from its own loop.
/// Clones share the same queue.
#[derive(Clone)]
pub struct TaskQueue {
    tx: mpsc::UnboundedSender<Task>,
}

impl TaskQueue {
    pub fn new() -> (TaskQueue, TaskRunner) {
        let (tx, rx) = mpsc::unbounded_channel();
        (TaskQueue { tx }, TaskRunner { rx })
    }
}

impl MainThreadExecutor for TaskQueue {
    fn submit(&self, task: Task) {
        // Dropped silently if the host stopped draining; there is no
        // completion contract to break.
        let _ = self.tx.send(task);
    }
}

/// Host-side consumer for a [`TaskQueue`].
pub struct TaskRunner {
    rx: mpsc::UnboundedReceiver<Task>,
}

impl TaskRunner {
    /// Run every task queued so far, in FIFO order. Returns how many ran.
    pub fn run_pending(&mut self) -> usize {
        let mut ran = 0;
        while let Ok(task) = self.rx.try_recv() {
            task();
            ran += 1;
        }
        ran
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn tasks_run_in_submission_order() {
        let (queue, mut runner) = TaskQueue::new();
        let log = Arc::new(parking_lot::Mutex::new(Vec::new()));

        for n in 0..3 {
            let log = Arc::clone(&log);
            queue.submit(Box::new(move || log.lock().push(n)));
        }

        assert_eq!(runner.run_pending(), 3);
        assert_eq!(*log.lock(), vec![0, 1, 2]);
    }

    #[test]
    fn submission_works_from_another_thread() {
        let (queue, mut runner) = TaskQueue::new();
        let counter = Arc::new(AtomicUsize::new(0));

        let producer = {
            let queue = queue.clone();
            let counter = Arc::clone(&counter);
            std::thread::spawn(move || {
                queue.submit(Box::new(move || {
                    counter.fetch_add(1, Ordering::SeqCst);
                }));
            })
        };
        producer.join().unwrap();

        assert_eq!(runner.run_pending(), 1);
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn run_pending_on_an_empty_queue_is_zero() {
        let (_queue, mut runner) = TaskQueue::new();
        assert_eq!(runner.run_pending(), 0);
    }
}
