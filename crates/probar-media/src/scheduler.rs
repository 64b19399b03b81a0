//! Render Scheduling
//!
//! `set` runs inside a flush boundary: any follow-on work a listener schedules
//! (typically a re-render) has completed by the time `set` returns.
//!
//! ## Re-entrancy Safety
//!
//! Tasks may schedule more tasks. The queue is never borrowed while a task
//! runs, and a single flush is bounded so a task that keeps rescheduling
//! itself cannot hang the test.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

/// Maximum tasks drained by one flush
pub const MAX_TASKS_PER_FLUSH: usize = 10_000;

/// A flush boundary around a unit of work (the test framework's `act`)
pub trait RenderScheduler {
    /// Run `work`, then flush follow-on work before returning
    fn act(&self, work: &mut dyn FnMut());
}

/// Runs the work and nothing else
#[derive(Debug, Clone, Copy, Default)]
pub struct ImmediateScheduler;

impl RenderScheduler for ImmediateScheduler {
    fn act(&self, work: &mut dyn FnMut()) {
        work();
    }
}

type Task = Box<dyn FnOnce()>;

/// FIFO of follow-on tasks drained at the end of every `act`
///
/// Clones share the same queue, so a clone can be captured by listeners
/// while the original is handed to the mock.
#[derive(Clone, Default)]
pub struct RenderQueue {
    tasks: Rc<RefCell<VecDeque<Task>>>,
    flushes: Rc<Cell<usize>>,
    executed: Rc<Cell<usize>>,
}

impl fmt::Debug for RenderQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderQueue")
            .field("pending", &self.pending_count())
            .field("flushes", &self.flushes.get())
            .field("executed", &self.executed.get())
            .finish()
    }
}

impl RenderQueue {
    /// Create an empty queue
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule a task for the next flush
    pub fn schedule<F>(&self, task: F)
    where
        F: FnOnce() + 'static,
    {
        self.tasks.borrow_mut().push_back(Box::new(task));
    }

    /// Run one task; returns `false` if the queue was empty
    pub fn tick(&self) -> bool {
        let task = self.tasks.borrow_mut().pop_front();
        match task {
            Some(task) => {
                task();
                self.executed.set(self.executed.get() + 1);
                true
            }
            None => false,
        }
    }

    /// Run pending tasks up to `max_tasks`; returns the number run
    pub fn drain_bounded(&self, max_tasks: usize) -> usize {
        let mut processed = 0;
        while processed < max_tasks && self.tick() {
            processed += 1;
        }
        processed
    }

    /// Tasks waiting for a flush
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.tasks.borrow().len()
    }

    /// Number of completed `act` boundaries
    #[must_use]
    pub fn flush_count(&self) -> usize {
        self.flushes.get()
    }

    /// Total tasks run
    #[must_use]
    pub fn executed_count(&self) -> usize {
        self.executed.get()
    }
}

impl RenderScheduler for RenderQueue {
    fn act(&self, work: &mut dyn FnMut()) {
        work();
        let drained = self.drain_bounded(MAX_TASKS_PER_FLUSH);
        self.flushes.set(self.flushes.get() + 1);
        if self.pending_count() > 0 {
            tracing::warn!(
                drained,
                pending = self.pending_count(),
                "flush bound reached with tasks still queued"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_immediate_runs_work() {
        let mut ran = false;
        ImmediateScheduler.act(&mut || ran = true);
        assert!(ran);
    }

    #[test]
    fn test_act_drains_scheduled_tasks() {
        let queue = RenderQueue::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        let inner_queue = queue.clone();
        let inner_log = Rc::clone(&log);
        queue.act(&mut || {
            inner_log.borrow_mut().push("work");
            let task_log = Rc::clone(&inner_log);
            inner_queue.schedule(move || task_log.borrow_mut().push("render"));
        });

        assert_eq!(*log.borrow(), vec!["work", "render"]);
        assert_eq!(queue.pending_count(), 0);
        assert_eq!(queue.flush_count(), 1);
        assert_eq!(queue.executed_count(), 1);
    }

    #[test]
    fn test_tasks_may_schedule_tasks() {
        let queue = RenderQueue::new();
        let count = Rc::new(Cell::new(0));

        let outer_queue = queue.clone();
        let outer_count = Rc::clone(&count);
        queue.schedule(move || {
            outer_count.set(outer_count.get() + 1);
            let inner_count = Rc::clone(&outer_count);
            outer_queue.schedule(move || inner_count.set(inner_count.get() + 1));
        });

        queue.act(&mut || {});
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn test_drain_bounded() {
        let queue = RenderQueue::new();
        for _ in 0..10 {
            queue.schedule(|| {});
        }

        assert_eq!(queue.drain_bounded(4), 4);
        assert_eq!(queue.pending_count(), 6);
        assert_eq!(queue.drain_bounded(100), 6);
        assert!(!queue.tick());
    }

    #[test]
    fn test_self_rescheduling_task_is_bounded() {
        fn reschedule(queue: &RenderQueue) {
            let next = queue.clone();
            queue.schedule(move || reschedule(&next));
        }

        let queue = RenderQueue::new();
        reschedule(&queue);
        queue.act(&mut || {});

        assert_eq!(queue.executed_count(), MAX_TASKS_PER_FLUSH);
        assert_eq!(queue.pending_count(), 1);
    }
}
