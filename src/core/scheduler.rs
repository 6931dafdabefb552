//! Deferred work for windows that are not ready to be acted on yet
use crate::{rules::resolve::Attempt, window::Handle};
use std::{
    cmp::Ordering,
    collections::BinaryHeap,
    time::{Duration, Instant},
};
use tracing::trace;

/// The kind of work deferred for a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deferred {
    /// Re-query the descriptor and resolve it again
    Retry(Attempt),
    /// Act on a placement whose created-delay has elapsed
    CreatedDelay {
        /// Whether the window was placed on the current workspace when it was created
        on_current: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Entry {
    deadline: Instant,
    seq: u64,
    handle: Handle,
    kind: Deferred,
}

// BinaryHeap is a max-heap: invert the ordering so that the earliest deadline is at the top,
// breaking ties by insertion order.
impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .deadline
            .cmp(&self.deadline)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A queue of deferred work keyed by deadline.
///
/// The scheduler never reads the clock itself: callers provide the current time so that all
/// deferred work is delivered back on the same context that processes window events.
#[derive(Debug, Default)]
pub struct Scheduler {
    queue: BinaryHeap<Entry>,
    seq: u64,
}

impl Scheduler {
    /// Create an empty scheduler
    pub fn new() -> Self {
        Self::default()
    }

    /// Defer work for a window until `now + after`.
    pub fn schedule(&mut self, handle: Handle, now: Instant, after: Duration, kind: Deferred) {
        let deadline = now + after;
        trace!(%handle, ?kind, ?after, "scheduling deferred work");

        self.seq += 1;
        self.queue.push(Entry {
            deadline,
            seq: self.seq,
            handle,
            kind,
        });
    }

    /// Drop all deferred work for a window, returning the number of entries removed.
    pub fn cancel(&mut self, handle: Handle) -> usize {
        let before = self.queue.len();
        self.queue.retain(|e| e.handle != handle);
        let removed = before - self.queue.len();

        if removed > 0 {
            trace!(%handle, removed, "cancelled deferred work");
        }

        removed
    }

    /// Whether any work is deferred for the given window
    pub fn is_pending(&self, handle: Handle) -> bool {
        self.queue.iter().any(|e| e.handle == handle)
    }

    /// The earliest deadline currently scheduled
    pub fn next_deadline(&self) -> Option<Instant> {
        self.queue.peek().map(|e| e.deadline)
    }

    /// Remove and return the next piece of work whose deadline is at or before `now`.
    pub fn pop_due(&mut self, now: Instant) -> Option<(Handle, Deferred)> {
        if self.queue.peek()?.deadline > now {
            return None;
        }

        self.queue.pop().map(|e| (e.handle, e.kind))
    }

    /// The number of pieces of deferred work
    #[inline]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Whether there is no deferred work at all
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
