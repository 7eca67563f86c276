// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The embedding side of a player.
//!
//! A [`Host`] is whatever owns the real element tree: a browser binding, a
//! native toolkit widget, or a scripted fake in tests. The player calls into it
//! to install listeners, notify observers, and reflect state; the host calls
//! back into the player with input, timer wake-ups, and media completions.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use crate::attributes::Attribute;
use crate::state::PlaybackState;

/// Overlay fade duration used when the host has no better value (0.4s).
pub const DEFAULT_OVERLAY_TRANSITION_MS: u64 = 400;

/// Notifications a player dispatches to its observers.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PlayerEvent {
    /// About to start hovering. Cancelable: preventing it leaves the player untouched.
    HoverStart,
    /// About to stop hovering. Cancelable: preventing it keeps the player hovering.
    HoverEnd,
    /// A playback state was committed.
    PlaybackStateChange(PlaybackState),
}

impl PlayerEvent {
    /// DOM event type name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::HoverStart => "hoverstart",
            Self::HoverEnd => "hoverend",
            Self::PlaybackStateChange(_) => "playbackstatechange",
        }
    }

    /// Whether observers may prevent the default action.
    pub const fn is_cancelable(self) -> bool {
        matches!(self, Self::HoverStart | Self::HoverEnd)
    }
}

/// Result of dispatching a [`PlayerEvent`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum DefaultAction {
    /// Proceed with the default action.
    #[default]
    Run,
    /// An observer prevented the default action. Ignored for events that are
    /// not cancelable.
    Prevented,
}

/// Document-level listeners a player toggles.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DocumentListener {
    /// `touchstart` anywhere; installed while mounted. Report touches with
    /// [`HoverVideoPlayer::handle_document_touch`](crate::HoverVideoPlayer::handle_document_touch).
    TouchStart,
    /// `click` anywhere; installed while a muted autoplay fallback waits for a
    /// user gesture. Report clicks with
    /// [`HoverVideoPlayer::handle_document_click`](crate::HoverVideoPlayer::handle_document_click).
    Click,
}

/// State a player reflects onto its host element.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Published {
    /// `data-playback-state`.
    PlaybackState(PlaybackState),
    /// `data-is-hovering` presence.
    IsHovering(bool),
    /// Reflect a configuration value back to its attribute (`None` removes it).
    Reflect {
        /// Attribute to write.
        attribute: Attribute,
        /// New value.
        value: Option<String>,
    },
}

/// The embedding a player runs in.
pub trait Host {
    /// Reference to an element that can be a hover target.
    type Target: Clone + PartialEq + fmt::Debug;

    /// Monotonic time in milliseconds.
    fn now(&self) -> u64;

    /// The player's own element, the default hover target.
    fn host_target(&self) -> Self::Target;

    /// Resolve a selector to targets, in document order.
    fn query_targets(&mut self, selector: &str) -> Vec<Self::Target>;

    /// Install the enter/leave/focus/blur/touch listeners on `target`.
    fn attach_target_listeners(&mut self, target: &Self::Target);

    /// Remove the listeners installed by [`Host::attach_target_listeners`].
    fn detach_target_listeners(&mut self, target: &Self::Target);

    /// Install or remove a document-level listener.
    fn set_document_listener(&mut self, listener: DocumentListener, active: bool);

    /// Deliver `event` to observers, synchronously.
    fn dispatch(&mut self, event: &PlayerEvent) -> DefaultAction;

    /// Reflect state onto the host element.
    fn publish(&mut self, change: Published);

    /// Current overlay fade duration in milliseconds.
    ///
    /// Read once per pause commit, and only when a paused overlay is present.
    fn overlay_transition_ms(&self) -> u64 {
        DEFAULT_OVERLAY_TRANSITION_MS
    }
}
