// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Deadline-ordered timer queue.

use alloc::vec::Vec;

/// Identifier of a scheduled timer.
///
/// Ids are allocated monotonically by a [`TimerQueue`] and never reused, so
/// holding on to an id after its timer fired or was cancelled is harmless.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

impl TimerId {
    /// Raw numeric value, mostly useful for logging.
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// A timer whose deadline has passed, returned by [`TimerQueue::pop_due`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Expired<T> {
    /// Id the timer was scheduled under.
    pub id: TimerId,
    /// Deadline the timer was scheduled for, in host milliseconds.
    pub deadline: u64,
    /// Payload supplied at scheduling time.
    pub payload: T,
}

#[derive(Clone, Debug)]
struct Pending<T> {
    id: TimerId,
    deadline: u64,
    payload: T,
}

/// Pending timers ordered by deadline.
///
/// Timers with equal deadlines fire in scheduling order. The queue is kept as
/// a sorted vector: UI components typically hold a handful of timers at a
/// time, so linear insertion and cancellation stay cheap and the ordering is
/// trivially deterministic.
#[derive(Clone, Debug)]
pub struct TimerQueue<T> {
    pending: Vec<Pending<T>>,
    next_id: u64,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TimerQueue<T> {
    /// Create an empty queue.
    pub const fn new() -> Self {
        Self {
            pending: Vec::new(),
            next_id: 0,
        }
    }

    /// Schedule `payload` to fire `delay` milliseconds after `now`.
    pub fn schedule(&mut self, now: u64, delay: u64, payload: T) -> TimerId {
        self.schedule_at(now.saturating_add(delay), payload)
    }

    /// Schedule `payload` to fire at the absolute `deadline`.
    pub fn schedule_at(&mut self, deadline: u64, payload: T) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        // Insert after every entry with the same deadline to keep FIFO order for ties.
        let at = self.pending.partition_point(|p| p.deadline <= deadline);
        self.pending.insert(
            at,
            Pending {
                id,
                deadline,
                payload,
            },
        );
        id
    }

    /// Cancel a pending timer, returning its payload.
    ///
    /// Returns `None` if the timer already fired or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> Option<T> {
        let index = self.pending.iter().position(|p| p.id == id)?;
        Some(self.pending.remove(index).payload)
    }

    /// Returns `true` while the timer is still waiting to fire.
    pub fn is_pending(&self, id: TimerId) -> bool {
        self.pending.iter().any(|p| p.id == id)
    }

    /// Earliest pending deadline, if any.
    pub fn next_deadline(&self) -> Option<u64> {
        self.pending.first().map(|p| p.deadline)
    }

    /// Remove and return the earliest timer whose deadline is `<= now`.
    ///
    /// Call repeatedly until it returns `None` to drain everything that is due.
    /// Handlers that schedule new timers while draining are fine: a timer
    /// scheduled with a zero delay at `now` is itself due and will be returned
    /// by a later call.
    pub fn pop_due(&mut self, now: u64) -> Option<Expired<T>> {
        if self.pending.first()?.deadline > now {
            return None;
        }
        let Pending {
            id,
            deadline,
            payload,
        } = self.pending.remove(0);
        Some(Expired {
            id,
            deadline,
            payload,
        })
    }

    /// Number of pending timers.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Returns `true` if no timers are pending.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Cancel every pending timer.
    pub fn clear(&mut self) {
        self.pending.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn pops_in_deadline_order() {
        let mut q = TimerQueue::new();
        q.schedule(0, 30, 'c');
        q.schedule(0, 10, 'a');
        q.schedule(0, 20, 'b');

        let mut out = Vec::new();
        while let Some(e) = q.pop_due(100) {
            out.push(e.payload);
        }
        assert_eq!(out, vec!['a', 'b', 'c']);
        assert!(q.is_empty());
    }

    #[test]
    fn equal_deadlines_fire_in_scheduling_order() {
        let mut q = TimerQueue::new();
        q.schedule_at(5, 1);
        q.schedule_at(5, 2);
        q.schedule_at(5, 3);
        let out: Vec<_> = core::iter::from_fn(|| q.pop_due(5).map(|e| e.payload)).collect();
        assert_eq!(out, vec![1, 2, 3]);
    }

    #[test]
    fn not_due_before_deadline() {
        let mut q = TimerQueue::new();
        q.schedule(100, 50, ());
        assert!(q.pop_due(149).is_none());
        assert_eq!(q.next_deadline(), Some(150));
        assert!(q.pop_due(150).is_some());
    }

    #[test]
    fn zero_delay_is_due_immediately() {
        let mut q = TimerQueue::new();
        let id = q.schedule(42, 0, "now");
        let e = q.pop_due(42).unwrap();
        assert_eq!(e.id, id);
        assert_eq!(e.deadline, 42);
    }

    #[test]
    fn cancel_removes_timer_once() {
        let mut q = TimerQueue::new();
        let a = q.schedule(0, 10, 'a');
        let b = q.schedule(0, 20, 'b');
        assert_eq!(q.cancel(a), Some('a'));
        assert_eq!(q.cancel(a), None);
        assert!(!q.is_pending(a));
        assert!(q.is_pending(b));
        assert_eq!(q.next_deadline(), Some(20));
    }

    #[test]
    fn ids_are_not_reused_after_firing() {
        let mut q = TimerQueue::new();
        let first = q.schedule(0, 0, ());
        q.pop_due(0).unwrap();
        let second = q.schedule(0, 0, ());
        assert_ne!(first, second);
        // A stale id must not cancel the newer timer.
        assert_eq!(q.cancel(first), None);
        assert!(q.is_pending(second));
    }

    #[test]
    fn deadline_saturates() {
        let mut q = TimerQueue::new();
        q.schedule(u64::MAX - 1, 10, ());
        assert_eq!(q.next_deadline(), Some(u64::MAX));
    }

    #[test]
    fn clear_drops_everything() {
        let mut q = TimerQueue::new();
        q.schedule(0, 1, ());
        q.schedule(0, 2, ());
        q.clear();
        assert!(q.is_empty());
        assert_eq!(q.next_deadline(), None);
    }
}
