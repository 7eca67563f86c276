// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hover/blur tracking over a set of hover targets.
//!
//! [`HoverTracker`] turns raw per-target input (pointer enter/leave, focus,
//! blur, touch) into de-duplicated [`HoverSignal`]s, and keeps the listener
//! bookkeeping for its targets: whenever the target set, the mounted state, or
//! controlled mode changes, it returns a [`ListenerDiff`] describing exactly
//! which targets need listeners attached or detached.
//!
//! Signals are *proposals*. The caller decides whether to commit them (for
//! example after giving listeners a chance to cancel) with
//! [`HoverTracker::begin_hover`] / [`HoverTracker::end_hover`].
//!
//! ## Minimal example
//!
//! ```
//! use understory_hover_video::hover::{HoverInput, HoverSignal, HoverTracker};
//!
//! let mut tracker = HoverTracker::new([1_u32, 2]);
//! let diff = tracker.mount();
//! assert_eq!(diff.attach.as_slice(), &[1, 2]);
//!
//! assert_eq!(tracker.input(&1, HoverInput::PointerEnter), Some(HoverSignal::Start));
//! tracker.begin_hover(Some(1));
//! // Repeated enters are absorbed.
//! assert_eq!(tracker.input(&1, HoverInput::Focus), None);
//!
//! // A touch inside the active target keeps hovering; anywhere else ends it.
//! assert!(!tracker.touch_is_outside(|t| *t == 1));
//! assert!(tracker.touch_is_outside(|_| false));
//! ```

use smallvec::SmallVec;

/// Raw input observed on a hover target.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum HoverInput {
    /// Pointer entered the target.
    PointerEnter,
    /// Pointer left the target.
    PointerLeave,
    /// The target received focus.
    Focus,
    /// The target lost focus.
    Blur,
    /// A touch started on the target.
    TouchStart,
}

impl HoverInput {
    /// Every input kind, in listener installation order.
    pub const ALL: [Self; 5] = [
        Self::PointerEnter,
        Self::PointerLeave,
        Self::Focus,
        Self::Blur,
        Self::TouchStart,
    ];

    /// The DOM event name conventionally carrying this input.
    pub const fn event_name(self) -> &'static str {
        match self {
            Self::PointerEnter => "mouseenter",
            Self::PointerLeave => "mouseleave",
            Self::Focus => "focus",
            Self::Blur => "blur",
            Self::TouchStart => "touchstart",
        }
    }

    /// The logical signal this input asks for.
    pub const fn signal(self) -> HoverSignal {
        match self {
            Self::PointerEnter | Self::Focus | Self::TouchStart => HoverSignal::Start,
            Self::PointerLeave | Self::Blur => HoverSignal::End,
        }
    }
}

/// A de-duplicated hover transition.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum HoverSignal {
    /// Not hovering → hovering.
    Start,
    /// Hovering → not hovering.
    End,
}

/// Targets whose listeners must change.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListenerDiff<K> {
    /// Remove the five target listeners from these.
    pub detach: SmallVec<[K; 1]>,
    /// Install the five target listeners on these.
    pub attach: SmallVec<[K; 1]>,
}

impl<K> Default for ListenerDiff<K> {
    fn default() -> Self {
        Self {
            detach: SmallVec::new(),
            attach: SmallVec::new(),
        }
    }
}

impl<K> ListenerDiff<K> {
    /// Returns `true` if no listener changes are needed.
    pub fn is_empty(&self) -> bool {
        self.detach.is_empty() && self.attach.is_empty()
    }
}

/// Hover state over one or more targets.
///
/// Targets are held as an ordered, duplicate-free sequence; a single target is
/// just a sequence of one. The tracker only stores keys, it never owns the
/// elements they refer to.
#[derive(Clone, Debug)]
pub struct HoverTracker<K> {
    targets: SmallVec<[K; 1]>,
    active: Option<K>,
    hovering: bool,
    mounted: bool,
    controlled: bool,
}

impl<K: Clone + PartialEq> HoverTracker<K> {
    /// Create an unmounted tracker over `targets`.
    pub fn new(targets: impl IntoIterator<Item = K>) -> Self {
        Self {
            targets: dedup(targets),
            active: None,
            hovering: false,
            mounted: false,
            controlled: false,
        }
    }

    /// Current targets, in order.
    pub fn targets(&self) -> &[K] {
        &self.targets
    }

    /// The target that started the current hover, if it came from a target.
    pub fn active_target(&self) -> Option<&K> {
        self.active.as_ref()
    }

    /// Returns `true` between a committed start and the matching end.
    pub fn is_hovering(&self) -> bool {
        self.hovering
    }

    /// Returns `true` in controlled mode.
    pub fn is_controlled(&self) -> bool {
        self.controlled
    }

    /// Returns `true` while target listeners should be installed.
    pub fn is_listening(&self) -> bool {
        self.mounted && !self.controlled
    }

    /// Start tracking; returns the listeners to install.
    pub fn mount(&mut self) -> ListenerDiff<K> {
        self.set_flags(true, self.controlled)
    }

    /// Stop tracking; returns the listeners to remove.
    pub fn unmount(&mut self) -> ListenerDiff<K> {
        self.set_flags(false, self.controlled)
    }

    /// Enter or leave controlled mode.
    ///
    /// Controlled mode removes the target listeners altogether; native input
    /// is ignored until it is turned off again. Hover state is kept as is.
    pub fn set_controlled(&mut self, controlled: bool) -> ListenerDiff<K> {
        self.set_flags(self.mounted, controlled)
    }

    /// Replace the target set.
    ///
    /// Duplicate keys are dropped. While listening, returns the minimal diff:
    /// targets present in both sets keep their listeners.
    pub fn set_targets(&mut self, targets: impl IntoIterator<Item = K>) -> ListenerDiff<K> {
        let next = dedup(targets);
        let mut diff = ListenerDiff::default();
        if self.is_listening() {
            diff.detach = self
                .targets
                .iter()
                .filter(|t| !next.contains(t))
                .cloned()
                .collect();
            diff.attach = next
                .iter()
                .filter(|t| !self.targets.contains(t))
                .cloned()
                .collect();
        }
        if self.active.as_ref().is_some_and(|a| !next.contains(a)) {
            self.active = None;
        }
        self.targets = next;
        diff
    }

    /// Feed native input observed on `target`.
    ///
    /// Returns the signal to propose, or `None` if the input is redundant,
    /// comes from an unknown target, or listeners are not active. A start
    /// input on another target while already hovering moves the active target
    /// there without proposing anything.
    pub fn input(&mut self, target: &K, input: HoverInput) -> Option<HoverSignal> {
        if !self.is_listening() || !self.targets.contains(target) {
            return None;
        }
        match input.signal() {
            HoverSignal::Start if self.hovering => {
                self.active = Some(target.clone());
                None
            }
            HoverSignal::Start => Some(HoverSignal::Start),
            HoverSignal::End if self.hovering => Some(HoverSignal::End),
            HoverSignal::End => None,
        }
    }

    /// Decide whether a touch anywhere in the document ends the hover.
    ///
    /// `contains` reports whether the touched point lies inside a given
    /// target. The touch is outside if it is not inside the active target, or
    /// not inside any target when the hover was started programmatically.
    pub fn touch_is_outside(&self, contains: impl Fn(&K) -> bool) -> bool {
        if !self.hovering || self.controlled {
            return false;
        }
        match &self.active {
            Some(active) => !contains(active),
            None => !self.targets.iter().any(contains),
        }
    }

    /// Commit a hover start. Returns `false` if already hovering.
    pub fn begin_hover(&mut self, target: Option<K>) -> bool {
        if self.hovering {
            return false;
        }
        self.hovering = true;
        self.active = target;
        true
    }

    /// Commit a hover end. Returns `false` if not hovering.
    pub fn end_hover(&mut self) -> bool {
        if !self.hovering {
            return false;
        }
        self.hovering = false;
        self.active = None;
        true
    }

    fn set_flags(&mut self, mounted: bool, controlled: bool) -> ListenerDiff<K> {
        let was_listening = self.is_listening();
        self.mounted = mounted;
        self.controlled = controlled;
        let mut diff = ListenerDiff::default();
        match (was_listening, self.is_listening()) {
            (false, true) => diff.attach = self.targets.clone(),
            (true, false) => diff.detach = self.targets.clone(),
            _ => {}
        }
        diff
    }
}

fn dedup<K: PartialEq>(targets: impl IntoIterator<Item = K>) -> SmallVec<[K; 1]> {
    let mut out = SmallVec::new();
    for t in targets {
        if !out.contains(&t) {
            out.push(t);
        }
    }
    out
}
