// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Single-timer slot.

use crate::queue::{TimerId, TimerQueue};

/// Holds at most one pending timer in a [`TimerQueue`].
///
/// Arming an already armed slot cancels the previous timer first, so there is
/// never more than one outstanding timer per slot. When the queue reports an
/// expired timer, pass its id to [`TimerSlot::fired`] to find out whether it
/// belonged to this slot.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct TimerSlot {
    armed: Option<TimerId>,
}

impl TimerSlot {
    /// Create an empty slot.
    pub const fn new() -> Self {
        Self { armed: None }
    }

    /// Schedule `payload` after `delay`, replacing any timer this slot held.
    pub fn arm<T>(
        &mut self,
        queue: &mut TimerQueue<T>,
        now: u64,
        delay: u64,
        payload: T,
    ) -> TimerId {
        self.cancel(queue);
        let id = queue.schedule(now, delay, payload);
        self.armed = Some(id);
        id
    }

    /// Cancel the pending timer, if any. Returns `true` if something was cancelled.
    pub fn cancel<T>(&mut self, queue: &mut TimerQueue<T>) -> bool {
        match self.armed.take() {
            Some(id) => queue.cancel(id).is_some(),
            None => false,
        }
    }

    /// Claim an expired timer id.
    ///
    /// Returns `true` and disarms the slot if `id` is the timer this slot is
    /// holding; otherwise leaves the slot untouched.
    pub fn fired(&mut self, id: TimerId) -> bool {
        if self.armed == Some(id) {
            self.armed = None;
            true
        } else {
            false
        }
    }

    /// Returns `true` while the slot holds a timer that has not been claimed.
    pub fn is_armed(&self) -> bool {
        self.armed.is_some()
    }

    /// Id of the held timer.
    pub fn id(&self) -> Option<TimerId> {
        self.armed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rearm_cancels_previous_timer() {
        let mut q = TimerQueue::new();
        let mut slot = TimerSlot::new();
        let first = slot.arm(&mut q, 0, 10, 1);
        let second = slot.arm(&mut q, 5, 10, 2);
        assert!(!q.is_pending(first));
        assert!(q.is_pending(second));
        assert_eq!(q.len(), 1);
        assert_eq!(slot.id(), Some(second));
    }

    #[test]
    fn fired_only_claims_own_timer() {
        let mut q = TimerQueue::new();
        let mut slot = TimerSlot::new();
        let other = q.schedule(0, 1, 0);
        slot.arm(&mut q, 0, 5, 1);

        let e = q.pop_due(10).unwrap();
        assert_eq!(e.id, other);
        assert!(!slot.fired(e.id));
        assert!(slot.is_armed());

        let e = q.pop_due(10).unwrap();
        assert!(slot.fired(e.id));
        assert!(!slot.is_armed());
    }

    #[test]
    fn cancel_is_idempotent() {
        let mut q: TimerQueue<()> = TimerQueue::new();
        let mut slot = TimerSlot::new();
        assert!(!slot.cancel(&mut q));
        slot.arm(&mut q, 0, 1, ());
        assert!(slot.cancel(&mut q));
        assert!(!slot.cancel(&mut q));
        assert!(q.is_empty());
    }

    #[test]
    fn stale_fire_after_rearm_is_ignored() {
        let mut q = TimerQueue::new();
        let mut slot = TimerSlot::new();
        let first = slot.arm(&mut q, 0, 1, 'a');
        slot.arm(&mut q, 0, 1, 'b');
        assert!(!slot.fired(first));
        assert!(slot.is_armed());
    }
}
