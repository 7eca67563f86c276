// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_timing --heading-base-level=0

//! Understory Timing: host-agnostic timer queue primitives for UI runtimes.
//!
//! UI components frequently need "do this in N milliseconds unless something
//! else happens first" behavior: debounced starts, delayed commits, grace
//! periods before showing a spinner. This crate keeps the bookkeeping for such
//! timers without owning a clock or an event loop.
//!
//! - [`TimerQueue`]: deadline-ordered pending timers carrying a payload. Timers
//!   are cancelled by id; ids are never reused, so a stale id can never cancel
//!   a newer timer.
//! - [`TimerSlot`]: a holder for *at most one* pending timer. Arming the slot
//!   cancels whatever it held before, which is the common shape for
//!   "restart the delay" logic.
//!
//! The host supplies time as plain milliseconds (`u64`) from whatever
//! monotonic source it has, asks the queue for [`TimerQueue::next_deadline`]
//! to schedule a wake-up, and drains due timers with [`TimerQueue::pop_due`].
//!
//! ## Minimal example
//!
//! ```rust
//! use understory_timing::{TimerQueue, TimerSlot};
//!
//! #[derive(Debug, PartialEq)]
//! enum Job { ShowSpinner, Commit }
//!
//! let mut queue = TimerQueue::new();
//! let mut spinner = TimerSlot::new();
//!
//! spinner.arm(&mut queue, 0, 200, Job::ShowSpinner);
//! let commit = queue.schedule(0, 50, Job::Commit);
//! assert_eq!(queue.next_deadline(), Some(50));
//!
//! // Re-arming replaces the pending spinner timer.
//! spinner.arm(&mut queue, 100, 200, Job::ShowSpinner);
//! assert_eq!(queue.len(), 2);
//!
//! let due = queue.pop_due(60).unwrap();
//! assert_eq!(due.id, commit);
//! assert_eq!(due.payload, Job::Commit);
//! assert!(queue.pop_due(60).is_none());
//!
//! let due = queue.pop_due(300).unwrap();
//! assert!(spinner.fired(due.id));
//! assert!(!spinner.is_armed());
//! ```
//!
//! ## `no_std` Support
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod queue;
mod slot;

pub use queue::{Expired, TimerId, TimerQueue};
pub use slot::TimerSlot;
