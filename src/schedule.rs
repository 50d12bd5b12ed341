//! Deferred-work scheduling
//!
//! The widget defers exactly two things: focus transfer after open/close
//! (next scheduling turn) and the debounced refresh evaluation. Both go
//! through a [`Scheduler`] injected into the controller so tests and
//! cooperative hosts can drive time deterministically instead of using
//! real timers.

use std::time::Duration;

/// Handle to a scheduled task, used for cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskHandle(u64);

/// Host scheduling turns: schedule, cancel, and deliver due work.
///
/// A zero delay means "the next turn of the host's update cycle", not a
/// synchronous call.
pub trait Scheduler<T> {
    /// Schedule `task` to be delivered once `delay` has elapsed.
    fn schedule(&mut self, delay: Duration, task: T) -> TaskHandle;

    /// Cancel a pending task. Returns whether it was still pending.
    fn cancel(&mut self, handle: TaskHandle) -> bool;

    /// Advance time and return the tasks that came due, in schedule order.
    fn advance(&mut self, elapsed: Duration) -> Vec<T>;

    /// Whether any task is still pending.
    fn has_pending(&self) -> bool;
}

#[derive(Debug)]
struct Entry<T> {
    handle: TaskHandle,
    due: Duration,
    seq: u64,
    task: T,
}

/// Deterministic scheduler driven by explicit [`advance`](Scheduler::advance)
/// calls. The default for tests and cooperative single-threaded hosts.
#[derive(Debug)]
pub struct ManualScheduler<T> {
    now: Duration,
    next_id: u64,
    pending: Vec<Entry<T>>,
}

impl<T> Default for ManualScheduler<T> {
    fn default() -> Self {
        Self {
            now: Duration::ZERO,
            next_id: 0,
            pending: Vec::new(),
        }
    }
}

impl<T> ManualScheduler<T> {
    /// Create an empty scheduler at time zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl<T> Scheduler<T> for ManualScheduler<T> {
    fn schedule(&mut self, delay: Duration, task: T) -> TaskHandle {
        self.next_id += 1;
        let handle = TaskHandle(self.next_id);
        self.pending.push(Entry {
            handle,
            due: self.now + delay,
            seq: self.next_id,
            task,
        });
        handle
    }

    fn cancel(&mut self, handle: TaskHandle) -> bool {
        let before = self.pending.len();
        self.pending.retain(|entry| entry.handle != handle);
        self.pending.len() != before
    }

    fn advance(&mut self, elapsed: Duration) -> Vec<T> {
        self.now += elapsed;
        let now = self.now;
        let mut due = Vec::new();
        let mut rest = Vec::new();
        for entry in self.pending.drain(..) {
            if entry.due <= now {
                due.push(entry);
            } else {
                rest.push(entry);
            }
        }
        self.pending = rest;
        due.sort_by_key(|entry| (entry.due, entry.seq));
        due.into_iter().map(|entry| entry.task).collect()
    }

    fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }
}
