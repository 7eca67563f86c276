// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_hover_video --heading-base-level=0

//! Understory Hover Video: a hover-to-play video player as a host-agnostic state machine.
//!
//! A hover video player wraps a video element and plays it while the user
//! hovers over (or focuses, or touches) one or more hover targets, pausing it
//! again when the hover ends. Around that simple idea sit the details that
//! make it pleasant in practice:
//!
//! - **Playback states** ([`PlaybackState`]): `paused`, `loading` and
//!   `playing`, published on every committed change and forceable from outside.
//! - **Hover tracking** ([`hover::HoverTracker`]): de-duplicated start/end
//!   signals over any number of targets, controlled mode, and touch-outside
//!   detection.
//! - **Cancelable events** ([`PlayerEvent`]): `hoverstart` and `hoverend` may
//!   be prevented by observers; `playbackstatechange` reports commits.
//! - **Timing**: an optional start delay before `play()`, and a pause commit
//!   deferred until the paused overlay has faded back in.
//! - **Pause policies**: restart from the beginning and/or release buffered
//!   media ([`unload::SourceUnloader`]) whenever a pause commits.
//! - **Autoplay fallback**: if the browser blocks unmuted playback, retry muted
//!   and unmute on the next click.
//!
//! The player never touches a DOM. It talks to its embedding through two
//! traits: [`Host`] (listeners, events, attribute reflection, time) and
//! [`MediaElement`] (the video itself). Timers live in an
//! [`understory_timing::TimerQueue`] inside the player; the host only has to
//! wake it at [`HoverVideoPlayer::next_deadline`].
//!
//! ## Minimal example
//!
//! ```rust
//! use understory_hover_video::{
//!     DefaultAction, DocumentListener, Host, HoverVideoPlayer, MediaElement, PlayAttempt,
//!     PlaybackState, PlayerConfig, PlayerEvent, Preload, Published, ReadyState,
//! };
//!
//! #[derive(Debug, Default)]
//! struct Page {
//!     now: u64,
//!     events: Vec<&'static str>,
//! }
//!
//! impl Host for Page {
//!     type Target = u32;
//!     fn now(&self) -> u64 { self.now }
//!     fn host_target(&self) -> u32 { 0 }
//!     fn query_targets(&mut self, _selector: &str) -> Vec<u32> { Vec::new() }
//!     fn attach_target_listeners(&mut self, _target: &u32) {}
//!     fn detach_target_listeners(&mut self, _target: &u32) {}
//!     fn set_document_listener(&mut self, _listener: DocumentListener, _active: bool) {}
//!     fn dispatch(&mut self, event: &PlayerEvent) -> DefaultAction {
//!         self.events.push(event.name());
//!         DefaultAction::Run
//!     }
//!     fn publish(&mut self, _change: Published) {}
//! }
//!
//! #[derive(Debug, Default)]
//! struct Video {
//!     pending: Option<PlayAttempt>,
//!     paused: bool,
//! }
//!
//! impl MediaElement for Video {
//!     type Source = String;
//!     fn play(&mut self, attempt: PlayAttempt) { self.pending = Some(attempt); }
//!     fn pause(&mut self) { self.paused = true; }
//!     fn load(&mut self) {}
//!     fn current_time(&self) -> f64 { 0.0 }
//!     fn set_current_time(&mut self, _seconds: f64) {}
//!     fn muted(&self) -> bool { false }
//!     fn set_muted(&mut self, _muted: bool) {}
//!     fn ready_state(&self) -> ReadyState { ReadyState::HaveEnoughData }
//!     fn preload(&self) -> Option<Preload> { None }
//!     fn set_preload(&mut self, _preload: Preload) {}
//!     fn take_src(&mut self) -> Option<String> { None }
//!     fn set_src(&mut self, _src: String) {}
//!     fn take_sources(&mut self) -> Vec<String> { Vec::new() }
//!     fn append_source(&mut self, _source: String) {}
//! }
//!
//! let mut player = HoverVideoPlayer::new(Page::default(), PlayerConfig::default());
//! player.replace_media(Some(Video::default()));
//! player.start();
//!
//! player.hover();
//! assert_eq!(player.playback_state(), PlaybackState::Loading);
//!
//! // The embedding reports that `play()` resolved.
//! let attempt = player.media_mut().unwrap().pending.take().unwrap();
//! player.play_settled(attempt, Ok(()));
//! assert_eq!(player.playback_state(), PlaybackState::Playing);
//!
//! // Without a paused overlay the pause commits on the next timer poll.
//! player.blur();
//! assert_eq!(player.playback_state(), PlaybackState::Paused);
//! assert_eq!(player.next_deadline(), Some(0));
//! player.poll_timers();
//! assert!(player.media().unwrap().paused);
//!
//! assert_eq!(
//!     player.host().events,
//!     [
//!         "hoverstart",
//!         "playbackstatechange",
//!         "playbackstatechange",
//!         "hoverend",
//!         "playbackstatechange",
//!     ]
//! );
//! ```
//!
//! ## Configuration
//!
//! Every option can be set two ways, matching a custom element's attributes
//! and properties:
//!
//! - [`HoverVideoPlayer::attribute_changed`] takes raw attribute text, parses
//!   it leniently, and logs (rather than returns) a [`ConfigError`] when the
//!   value is invalid, falling back to the default.
//! - Typed setters such as [`HoverVideoPlayer::set_playback_start_delay`]
//!   apply a value and reflect it back through [`Published::Reflect`].
//!
//! ## Logging
//!
//! Diagnostics go through [`tracing`]. Failed playback is an `error`, invalid
//! configuration a `warn`, and expected interruptions (aborted play attempts,
//! prevented events, unloads) are `debug`. Stale completions are `trace`.
//!
//! ## `no_std` Support
//!
//! This crate is `no_std` and uses `alloc`. The `std` feature (on by default)
//! only enables `std` support in `tracing`.

#![no_std]

extern crate alloc;

pub mod attributes;
mod config;
mod error;
mod host;
pub mod hover;
mod media;
mod player;
pub mod presentation;
mod state;
pub mod unload;

pub use config::PlayerConfig;
pub use error::{ConfigError, PlayError};
pub use host::{
    DEFAULT_OVERLAY_TRANSITION_MS, DefaultAction, DocumentListener, Host, PlayerEvent, Published,
};
pub use media::{MediaElement, MediaGeneration, PlayAttempt, Preload, ReadyState};
pub use player::HoverVideoPlayer;
pub use state::{PlaybackState, SizingMode};
