// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The playback state machine.

use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;

use tracing::{debug, error, trace, warn};
use understory_timing::{TimerQueue, TimerSlot};

use crate::attributes::{Attribute, parse_bool, parse_delay_ms};
use crate::config::PlayerConfig;
use crate::error::{ConfigError, PlayError};
use crate::host::{DefaultAction, DocumentListener, Host, PlayerEvent, Published};
use crate::hover::{HoverInput, HoverSignal, HoverTracker, ListenerDiff};
use crate::media::{MediaElement, MediaGeneration, PlayAttempt, Preload};
use crate::presentation::PresentationState;
use crate::state::{PlaybackState, SizingMode};
use crate::unload::{SourceUnloader, UnloadOutcome};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum PlayerTimer {
    StartPlayback,
    CommitPause,
}

/// Progress of a `Loading` player toward `Playing`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
enum StartPhase {
    #[default]
    Idle,
    /// Waiting for the start delay to elapse.
    Delayed,
    /// Waiting for a media element to be attached.
    AwaitingMedia,
    /// `play()` was called; waiting for it to settle.
    Attempting(PlayAttempt),
    /// The first attempt hit the autoplay policy; retrying muted.
    RetryingMuted(PlayAttempt),
}

/// A hover-to-play video player.
///
/// Owns the playback state, the hover tracker, the start/pause timers, and
/// the media element. Everything it does to the outside world goes through
/// its [`Host`] and [`MediaElement`].
///
/// ## Driving a player
///
/// - Call [`start`](Self::start) when the player is mounted and
///   [`stop`](Self::stop) when it is unmounted.
/// - Forward native input with [`handle_target_input`](Self::handle_target_input),
///   [`handle_document_touch`](Self::handle_document_touch) and
///   [`handle_document_click`](Self::handle_document_click).
/// - Forward attribute changes with [`attribute_changed`](Self::attribute_changed).
/// - After each call, (re)schedule a wake-up for [`next_deadline`](Self::next_deadline)
///   and call [`poll_timers`](Self::poll_timers) when it passes.
/// - Report media completions with [`play_settled`](Self::play_settled) and
///   [`media_emptied`](Self::media_emptied).
pub struct HoverVideoPlayer<H: Host, M: MediaElement> {
    host: H,
    config: PlayerConfig,
    tracker: HoverTracker<H::Target>,
    hover_target_selector: Option<String>,
    state: PlaybackState,
    phase: StartPhase,
    media: Option<M>,
    media_generation: MediaGeneration,
    attempt_seq: u64,
    timers: TimerQueue<PlayerTimer>,
    start_timer: TimerSlot,
    pause_timer: TimerSlot,
    unloader: SourceUnloader<M::Source>,
    has_paused_overlay: bool,
    unmute_on_click: Option<MediaGeneration>,
    mounted: bool,
}

impl<H: Host, M: MediaElement> fmt::Debug for HoverVideoPlayer<H, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HoverVideoPlayer")
            .field("config", &self.config)
            .field("tracker", &self.tracker)
            .field("state", &self.state)
            .field("phase", &self.phase)
            .field("has_media", &self.media.is_some())
            .field("media_generation", &self.media_generation)
            .field("mounted", &self.mounted)
            .finish_non_exhaustive()
    }
}

impl<H: Host, M: MediaElement> HoverVideoPlayer<H, M> {
    /// Create an unmounted player whose hover target is the host element.
    pub fn new(host: H, config: PlayerConfig) -> Self {
        let mut tracker = HoverTracker::new([host.host_target()]);
        // Unmounted, so this only records the flag.
        let _ = tracker.set_controlled(config.controlled);
        Self {
            host,
            config,
            tracker,
            hover_target_selector: None,
            state: PlaybackState::Paused,
            phase: StartPhase::Idle,
            media: None,
            media_generation: MediaGeneration::default(),
            attempt_seq: 0,
            timers: TimerQueue::new(),
            start_timer: TimerSlot::new(),
            pause_timer: TimerSlot::new(),
            unloader: SourceUnloader::new(),
            has_paused_overlay: false,
            unmute_on_click: None,
            mounted: false,
        }
    }

    // --- Lifecycle ---------------------------------------------------------

    /// Mount: publish initial state and install listeners.
    pub fn start(&mut self) {
        if self.mounted {
            return;
        }
        self.mounted = true;
        self.host.publish(Published::PlaybackState(self.state));
        self.host
            .publish(Published::IsHovering(self.tracker.is_hovering()));
        self.host.publish(Published::Reflect {
            attribute: Attribute::SizingMode,
            value: Some(self.config.sizing_mode.as_str().to_string()),
        });
        let diff = self.tracker.mount();
        self.apply_listener_diff(diff);
        self.host
            .set_document_listener(DocumentListener::TouchStart, true);
        if self.media.is_none() {
            warn!(err = %ConfigError::MissingMedia, "mounted without a media element");
        }
    }

    /// Unmount: cancel timers, remove every listener, and come to rest.
    ///
    /// Media that was playing (or about to be paused) is paused right away and
    /// any unloaded sources are put back.
    pub fn stop(&mut self) {
        if !self.mounted {
            return;
        }
        self.mounted = false;
        self.start_timer.cancel(&mut self.timers);
        let pause_pending = self.pause_timer.cancel(&mut self.timers);
        self.timers.clear();

        let diff = self.tracker.unmount();
        self.apply_listener_diff(diff);
        self.host
            .set_document_listener(DocumentListener::TouchStart, false);
        self.release_unmute_listener();

        let generation = self.media_generation;
        if let Some(media) = self.media.as_mut() {
            if self.state.is_active() || pause_pending {
                media.pause();
            }
            self.unloader.restore_now(media, generation);
        }
        self.phase = StartPhase::Idle;
        if self.tracker.end_hover() {
            self.host.publish(Published::IsHovering(false));
        }
        self.set_state(PlaybackState::Paused);
    }

    /// Returns `true` between [`start`](Self::start) and [`stop`](Self::stop).
    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    // --- Accessors ---------------------------------------------------------

    /// Committed playback state.
    pub fn playback_state(&self) -> PlaybackState {
        self.state
    }

    /// Returns `true` while a hover is in progress.
    pub fn is_hovering(&self) -> bool {
        self.tracker.is_hovering()
    }

    /// Current configuration.
    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    /// Current hover targets.
    pub fn hover_targets(&self) -> &[H::Target] {
        self.tracker.targets()
    }

    /// The target that started the current hover, if any.
    pub fn active_hover_target(&self) -> Option<&H::Target> {
        self.tracker.active_target()
    }

    /// The host.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// The host, mutably.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// The attached media element.
    pub fn media(&self) -> Option<&M> {
        self.media.as_ref()
    }

    /// The attached media element, mutably.
    pub fn media_mut(&mut self) -> Option<&mut M> {
        self.media.as_mut()
    }

    /// Generation of the current media attachment.
    pub fn media_generation(&self) -> MediaGeneration {
        self.media_generation
    }

    /// Snapshot for renderers.
    pub fn presentation(&self) -> PresentationState {
        PresentationState {
            playback_state: self.state,
            is_hovering: self.tracker.is_hovering(),
            sizing_mode: self.config.sizing_mode,
            has_paused_overlay: self.has_paused_overlay,
        }
    }

    /// Earliest pending timer deadline, in host milliseconds.
    pub fn next_deadline(&self) -> Option<u64> {
        self.timers.next_deadline()
    }

    // --- Hover -------------------------------------------------------------

    /// Start hovering programmatically. Works in controlled mode too.
    pub fn hover(&mut self) {
        self.start_hover(None);
    }

    /// Stop hovering programmatically. Works in controlled mode too.
    pub fn blur(&mut self) {
        self.end_hover();
    }

    /// Forward native input observed on one of the hover targets.
    pub fn handle_target_input(&mut self, target: &H::Target, input: HoverInput) {
        match self.tracker.input(target, input) {
            Some(HoverSignal::Start) => self.start_hover(Some(target.clone())),
            Some(HoverSignal::End) => self.end_hover(),
            None => {}
        }
    }

    /// Forward a document-level touch; `contains` reports whether the touch
    /// landed inside a given target.
    pub fn handle_document_touch(&mut self, contains: impl Fn(&H::Target) -> bool) {
        if self.tracker.touch_is_outside(contains) {
            self.end_hover();
        }
    }

    /// Forward a document-level click.
    ///
    /// Completes a pending muted-autoplay fallback by unmuting.
    pub fn handle_document_click(&mut self) {
        let Some(generation) = self.unmute_on_click.take() else {
            return;
        };
        self.host.set_document_listener(DocumentListener::Click, false);
        if generation == self.media_generation {
            if let Some(media) = self.media.as_mut() {
                debug!("unmuting after user click");
                media.set_muted(false);
            }
        }
    }

    fn start_hover(&mut self, target: Option<H::Target>) {
        if self.tracker.is_hovering() {
            return;
        }
        if self.host.dispatch(&PlayerEvent::HoverStart) == DefaultAction::Prevented {
            debug!("hoverstart was prevented");
            return;
        }
        self.tracker.begin_hover(target);
        self.host.publish(Published::IsHovering(true));
        self.request_playback();
    }

    fn end_hover(&mut self) {
        if !self.tracker.is_hovering() {
            return;
        }
        if self.host.dispatch(&PlayerEvent::HoverEnd) == DefaultAction::Prevented {
            debug!("hoverend was prevented");
            return;
        }
        self.tracker.end_hover();
        self.host.publish(Published::IsHovering(false));
        self.request_pause();
    }

    // --- Configuration: property path ---------------------------------------

    /// Set `restart-on-pause` and reflect it.
    pub fn set_restart_on_pause(&mut self, enabled: bool) {
        self.config.restart_on_pause = enabled;
        self.reflect_bool(Attribute::RestartOnPause, enabled);
    }

    /// Set `unload-on-pause` and reflect it.
    pub fn set_unload_on_pause(&mut self, enabled: bool) {
        self.apply_unload_on_pause(enabled);
        self.reflect_bool(Attribute::UnloadOnPause, enabled);
    }

    /// Set `playback-start-delay` in milliseconds and reflect it.
    pub fn set_playback_start_delay(&mut self, delay_ms: u64) {
        self.config.playback_start_delay_ms = delay_ms;
        self.host.publish(Published::Reflect {
            attribute: Attribute::PlaybackStartDelay,
            value: Some(delay_ms.to_string()),
        });
    }

    /// Set `controlled` and reflect it.
    pub fn set_controlled(&mut self, controlled: bool) {
        self.apply_controlled(controlled);
        self.reflect_bool(Attribute::Controlled, controlled);
    }

    /// Set `sizing-mode` and reflect it.
    pub fn set_sizing_mode(&mut self, mode: SizingMode) {
        self.config.sizing_mode = mode;
        self.host.publish(Published::Reflect {
            attribute: Attribute::SizingMode,
            value: Some(mode.as_str().to_string()),
        });
    }

    /// Use `targets` as hover targets; an empty set means the host element.
    ///
    /// Clears the `hover-target` attribute, since it no longer describes the
    /// targets in use.
    pub fn set_hover_targets(&mut self, targets: impl IntoIterator<Item = H::Target>) {
        self.hover_target_selector = None;
        self.host.publish(Published::Reflect {
            attribute: Attribute::HoverTarget,
            value: None,
        });
        let targets: Vec<_> = targets.into_iter().collect();
        if targets.is_empty() {
            self.replace_targets([self.host.host_target()]);
        } else {
            self.replace_targets(targets);
        }
    }

    /// Go back to using the host element as the only hover target.
    pub fn reset_hover_target(&mut self) {
        self.set_hover_targets([]);
    }

    /// Record whether paused-overlay content is present.
    pub fn set_has_paused_overlay(&mut self, present: bool) {
        self.has_paused_overlay = present;
    }

    /// Force a playback state, as if `data-playback-state` had been written.
    ///
    /// `Loading` and `Playing` both request playback (which always passes
    /// through `Loading`); `Paused` requests a pause. The hover state is not
    /// touched.
    pub fn request_playback_state(&mut self, state: PlaybackState) {
        match state {
            PlaybackState::Paused => self.request_pause(),
            PlaybackState::Loading | PlaybackState::Playing => self.request_playback(),
        }
    }

    // --- Configuration: attribute path --------------------------------------

    /// Apply a change to an observed attribute.
    ///
    /// Unknown names are ignored. Invalid values are logged and replaced by
    /// the attribute's default. Re-applying the current value is a no-op, so
    /// hosts may echo the player's own reflections back.
    pub fn attribute_changed(&mut self, name: &str, value: Option<&str>) {
        let Some(attribute) = Attribute::from_name(name) else {
            trace!(name, "ignoring unobserved attribute");
            return;
        };
        match attribute {
            Attribute::HoverTarget => self.apply_hover_target_selector(value),
            Attribute::RestartOnPause => self.config.restart_on_pause = parse_bool(value),
            Attribute::UnloadOnPause => self.apply_unload_on_pause(parse_bool(value)),
            Attribute::PlaybackStartDelay => {
                self.config.playback_start_delay_ms = match value {
                    None => 0,
                    Some(v) => parse_delay_ms(v).unwrap_or_else(|err| {
                        warn!(%err, "playback-start-delay falls back to 0");
                        0
                    }),
                };
            }
            Attribute::Controlled => self.apply_controlled(parse_bool(value)),
            Attribute::SizingMode => {
                self.config.sizing_mode = match value {
                    None => SizingMode::default(),
                    Some(v) => v.parse().unwrap_or_else(|err: ConfigError| {
                        warn!(%err, "sizing-mode falls back to video");
                        SizingMode::default()
                    }),
                };
            }
            Attribute::PlaybackState => self.apply_playback_state_attribute(value),
        }
    }

    fn apply_hover_target_selector(&mut self, value: Option<&str>) {
        let selector = value.filter(|s| !s.trim().is_empty());
        if selector == self.hover_target_selector.as_deref() {
            return;
        }
        self.hover_target_selector = selector.map(ToString::to_string);
        let Some(selector) = selector else {
            self.replace_targets([self.host.host_target()]);
            return;
        };
        let found = self.host.query_targets(selector);
        if found.is_empty() {
            let err = ConfigError::HoverTargetNotFound(selector.to_string());
            warn!(%err, "using the player element as hover target");
            self.replace_targets([self.host.host_target()]);
        } else {
            self.replace_targets(found);
        }
    }

    fn apply_playback_state_attribute(&mut self, value: Option<&str>) {
        let requested = match value.map(str::parse::<PlaybackState>) {
            None => PlaybackState::Paused,
            Some(Ok(state)) => state,
            Some(Err(err)) => {
                warn!(%err, "ignoring forced playback state");
                self.host.publish(Published::PlaybackState(self.state));
                return;
            }
        };
        let before = self.state;
        if requested != before {
            self.request_playback_state(requested);
        }
        // Nothing committed: make the attribute tell the truth again.
        if self.state == before && value != Some(self.state.as_str()) {
            self.host.publish(Published::PlaybackState(self.state));
        }
    }

    fn apply_unload_on_pause(&mut self, enabled: bool) {
        self.config.unload_on_pause = enabled;
        if enabled {
            self.default_preload();
        }
    }

    fn apply_controlled(&mut self, controlled: bool) {
        self.config.controlled = controlled;
        let diff = self.tracker.set_controlled(controlled);
        self.apply_listener_diff(diff);
    }

    fn reflect_bool(&mut self, attribute: Attribute, enabled: bool) {
        self.host.publish(Published::Reflect {
            attribute,
            value: enabled.then(String::new),
        });
    }

    fn replace_targets(&mut self, targets: impl IntoIterator<Item = H::Target>) {
        let diff = self.tracker.set_targets(targets);
        self.apply_listener_diff(diff);
    }

    fn apply_listener_diff(&mut self, diff: ListenerDiff<H::Target>) {
        for target in &diff.detach {
            self.host.detach_target_listeners(target);
        }
        for target in &diff.attach {
            self.host.attach_target_listeners(target);
        }
    }

    // --- Media -------------------------------------------------------------

    /// Attach a new media element (or none), returning the previous one.
    ///
    /// The previous element gets any unloaded sources back before it is
    /// returned. Completions still in flight for it are ignored from now on.
    /// If playback was wanted, it starts over on the new element.
    pub fn replace_media(&mut self, media: Option<M>) -> Option<M> {
        let old_generation = self.media_generation;
        let mut previous = core::mem::replace(&mut self.media, media);
        self.media_generation = old_generation.next();
        if let Some(old) = previous.as_mut() {
            self.unloader.restore_now(old, old_generation);
        }
        self.unloader.forget();
        self.release_unmute_listener();
        // A pause commit was meant for the element that just left.
        self.pause_timer.cancel(&mut self.timers);

        if self.media.is_some() {
            if self.config.unload_on_pause {
                self.default_preload();
            }
        } else if self.mounted {
            warn!(err = %ConfigError::MissingMedia, "media element was removed");
        }

        match self.state {
            PlaybackState::Paused => {}
            PlaybackState::Loading => {
                if self.phase != StartPhase::Delayed {
                    self.attempt_play();
                }
            }
            PlaybackState::Playing => {
                self.phase = StartPhase::Idle;
                self.set_state(PlaybackState::Paused);
                self.request_playback();
            }
        }
        previous
    }

    /// Report the outcome of a [`MediaElement::play`] call.
    ///
    /// Only the most recent attempt on the current element counts; anything
    /// else is stale and ignored.
    pub fn play_settled(&mut self, attempt: PlayAttempt, result: Result<(), PlayError>) {
        let current = match self.phase {
            StartPhase::Attempting(a) | StartPhase::RetryingMuted(a) => Some(a),
            _ => None,
        };
        if self.state != PlaybackState::Loading
            || current != Some(attempt)
            || attempt.media != self.media_generation
        {
            match &result {
                Err(err) if !err.is_superseded() => {
                    debug!(%err, "ignoring failure of a superseded play attempt");
                }
                _ => trace!(?attempt, "ignoring stale play attempt"),
            }
            return;
        }
        match result {
            Ok(()) => {
                self.phase = StartPhase::Idle;
                self.set_state(PlaybackState::Playing);
            }
            Err(PlayError::Aborted) => {
                debug!("play attempt was interrupted");
                self.abandon_start();
            }
            Err(PlayError::NotAllowed) if matches!(self.phase, StartPhase::Attempting(_)) => {
                self.retry_muted();
            }
            Err(err) => {
                error!(%err, "video playback failed");
                self.abandon_start();
            }
        }
    }

    /// Report that the element of `generation` emptied its source list.
    pub fn media_emptied(&mut self, generation: MediaGeneration) {
        if generation != self.media_generation {
            trace!(?generation, "ignoring emptied from a detached element");
            return;
        }
        let Some(media) = self.media.as_mut() else {
            return;
        };
        if self.unloader.on_emptied(media, generation) {
            debug!("restored video sources after unloading");
        }
    }

    /// Run every timer that is due at the host's current time.
    pub fn poll_timers(&mut self) {
        let now = self.host.now();
        while let Some(expired) = self.timers.pop_due(now) {
            match expired.payload {
                PlayerTimer::StartPlayback if self.start_timer.fired(expired.id) => {
                    if self.state == PlaybackState::Loading && self.phase == StartPhase::Delayed {
                        self.attempt_play();
                    }
                }
                PlayerTimer::CommitPause if self.pause_timer.fired(expired.id) => {
                    if self.state == PlaybackState::Paused {
                        self.commit_pause();
                    }
                }
                _ => trace!(id = expired.id.get(), "ignoring superseded timer"),
            }
        }
    }

    // --- Transitions -------------------------------------------------------

    fn set_state(&mut self, state: PlaybackState) {
        if self.state == state {
            return;
        }
        self.state = state;
        self.host.publish(Published::PlaybackState(state));
        self.host.dispatch(&PlayerEvent::PlaybackStateChange(state));
    }

    fn request_playback(&mut self) {
        if self.state.is_active() {
            return;
        }
        self.pause_timer.cancel(&mut self.timers);
        self.set_state(PlaybackState::Loading);
        let delay = self.config.playback_start_delay_ms;
        if delay > 0 {
            self.phase = StartPhase::Delayed;
            let now = self.host.now();
            self.start_timer
                .arm(&mut self.timers, now, delay, PlayerTimer::StartPlayback);
        } else {
            self.attempt_play();
        }
    }

    fn request_pause(&mut self) {
        if !self.state.is_active() {
            return;
        }
        self.start_timer.cancel(&mut self.timers);
        // Forgetting the attempt makes its eventual settlement stale.
        self.phase = StartPhase::Idle;
        self.set_state(PlaybackState::Paused);
        let delay = if self.has_paused_overlay {
            self.host.overlay_transition_ms()
        } else {
            0
        };
        let now = self.host.now();
        self.pause_timer
            .arm(&mut self.timers, now, delay, PlayerTimer::CommitPause);
    }

    fn attempt_play(&mut self) {
        let generation = self.media_generation;
        let Some(media) = self.media.as_mut() else {
            debug!("no media element yet; playback starts once one is attached");
            self.phase = StartPhase::AwaitingMedia;
            return;
        };
        if self.unloader.restore_now(media, generation) {
            debug!("restored unloaded sources ahead of playback");
        }
        self.attempt_seq += 1;
        let attempt = PlayAttempt::new(generation, self.attempt_seq);
        self.phase = StartPhase::Attempting(attempt);
        media.play(attempt);
    }

    fn retry_muted(&mut self) {
        let generation = self.media_generation;
        let Some(media) = self.media.as_mut() else {
            self.abandon_start();
            return;
        };
        if media.muted() {
            error!(err = %PlayError::NotAllowed, "video playback failed while muted");
            self.abandon_start();
            return;
        }
        debug!("autoplay was blocked; retrying muted until the next click");
        media.set_muted(true);
        self.attempt_seq += 1;
        let attempt = PlayAttempt::new(generation, self.attempt_seq);
        self.phase = StartPhase::RetryingMuted(attempt);
        media.play(attempt);
        if self.unmute_on_click.replace(generation).is_none() {
            self.host.set_document_listener(DocumentListener::Click, true);
        }
    }

    fn abandon_start(&mut self) {
        if matches!(self.phase, StartPhase::RetryingMuted(_)) {
            self.release_unmute_listener();
        }
        self.start_timer.cancel(&mut self.timers);
        self.phase = StartPhase::Idle;
        self.set_state(PlaybackState::Paused);
    }

    fn commit_pause(&mut self) {
        let generation = self.media_generation;
        let Some(media) = self.media.as_mut() else {
            return;
        };
        media.pause();
        let resume_at = if self.config.restart_on_pause {
            media.set_current_time(0.0);
            0.0
        } else {
            media.current_time()
        };
        if self.config.unload_on_pause {
            match self.unloader.unload(media, generation, resume_at) {
                UnloadOutcome::AwaitingEmptied => debug!("unloading video sources"),
                UnloadOutcome::NothingToUnload => debug!("no video sources to unload"),
            }
        }
    }

    fn default_preload(&mut self) {
        if let Some(media) = self.media.as_mut() {
            if media.preload().is_none() {
                media.set_preload(Preload::Metadata);
            }
        }
    }

    fn release_unmute_listener(&mut self) {
        if self.unmute_on_click.take().is_some() {
            self.host.set_document_listener(DocumentListener::Click, false);
        }
    }
}
