//! One-shot timers on a host-driven clock.
//!
//! The queue never reads the wall clock: the host calls [`TimerQueue::advance`]
//! with elapsed time and receives the payloads that came due, in deadline
//! order. Handles returned by [`TimerQueue::schedule`] cancel their timer when
//! dropped, so a timer's lifetime is scoped to whoever owns the handle.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};
use std::time::Duration;

#[derive(Debug)]
struct Scheduled<T> {
    deadline: Duration,
    seq: u64,
    cancelled: Arc<AtomicBool>,
    payload: T,
}

impl<T> PartialEq for Scheduled<T> {
    fn eq(&self, other: &Self) -> bool {
        self.deadline == other.deadline && self.seq == other.seq
    }
}

impl<T> Eq for Scheduled<T> {}

impl<T> PartialOrd for Scheduled<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Scheduled<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.deadline
            .cmp(&other.deadline)
            .then(self.seq.cmp(&other.seq))
    }
}

/// Handle to a pending timer.
///
/// The timer is automatically cancelled when this handle is dropped.
#[derive(Debug)]
pub struct TimerHandle {
    cancelled: Arc<AtomicBool>,
}

impl TimerHandle {
    /// Cancel the timer; its payload will never be delivered.
    pub fn cancel(&mut self) {
        self.cancelled.store(true, AtomicOrdering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(AtomicOrdering::Relaxed)
    }
}

impl Drop for TimerHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[derive(Debug)]
pub struct TimerQueue<T> {
    now: Duration,
    seq: u64,
    heap: BinaryHeap<Reverse<Scheduled<T>>>,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TimerQueue<T> {
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            seq: 0,
            heap: BinaryHeap::new(),
        }
    }

    /// Time elapsed since the queue was created.
    pub fn now(&self) -> Duration {
        self.now
    }

    fn push(&mut self, delay: Duration, payload: T) -> Arc<AtomicBool> {
        let cancelled = Arc::new(AtomicBool::new(false));
        self.heap.push(Reverse(Scheduled {
            deadline: self.now + delay,
            seq: self.seq,
            cancelled: Arc::clone(&cancelled),
            payload,
        }));
        self.seq += 1;
        cancelled
    }

    /// Schedules `payload` after `delay`; dropping the handle cancels it.
    pub fn schedule(&mut self, delay: Duration, payload: T) -> TimerHandle {
        TimerHandle {
            cancelled: self.push(delay, payload),
        }
    }

    /// Schedules `payload` after `delay` with no way to cancel it short of
    /// [`TimerQueue::clear`].
    pub fn schedule_detached(&mut self, delay: Duration, payload: T) {
        self.push(delay, payload);
    }

    /// Deadline of the earliest queued timer, cancelled or not.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.heap.peek().map(|Reverse(next)| next.deadline)
    }

    /// Number of timers not yet fired, including cancelled ones not yet reaped.
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Moves the clock forward and returns every live payload that came due.
    pub fn advance(&mut self, elapsed: Duration) -> Vec<T> {
        self.now += elapsed;
        let mut due = Vec::new();
        while self
            .heap
            .peek()
            .is_some_and(|Reverse(next)| next.deadline <= self.now)
        {
            let Some(Reverse(timer)) = self.heap.pop() else {
                break;
            };
            if !timer.cancelled.load(AtomicOrdering::Relaxed) {
                due.push(timer.payload);
            }
        }
        due
    }

    /// Drops every pending timer.
    pub fn clear(&mut self) {
        self.heap.clear();
    }
}
