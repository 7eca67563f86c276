// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scripted host and media fakes shared by the integration tests.

#![allow(
    dead_code,
    reason = "Each integration test binary uses a different subset of the helpers."
)]
#![allow(
    missing_docs,
    reason = "Integration-test helper module; not part of the public API."
)]

use std::collections::BTreeMap;

use understory_hover_video::attributes::IS_HOVERING_ATTRIBUTE;
use understory_hover_video::{
    DefaultAction, DocumentListener, Host, HoverVideoPlayer, MediaElement, PlayAttempt,
    PlayError, PlayerConfig, PlayerEvent, Preload, Published, ReadyState,
};

pub(crate) type Player = HoverVideoPlayer<FakeHost, FakeMedia>;

/// The player's own element.
pub(crate) const PLAYER: &str = "player";

#[derive(Debug)]
pub(crate) struct FakeHost {
    pub(crate) now: u64,
    pub(crate) events: Vec<PlayerEvent>,
    /// Event names whose default action listeners prevent.
    pub(crate) prevent: Vec<&'static str>,
    /// Current attribute values of the player element.
    pub(crate) attributes: BTreeMap<String, String>,
    pub(crate) published: Vec<Published>,
    /// Targets with listeners installed, in installation order.
    pub(crate) listening: Vec<&'static str>,
    pub(crate) attach_calls: usize,
    pub(crate) detach_calls: usize,
    pub(crate) document: Vec<DocumentListener>,
    /// Selector → matching elements.
    pub(crate) selectors: BTreeMap<&'static str, Vec<&'static str>>,
    pub(crate) overlay_ms: u64,
}

impl Default for FakeHost {
    fn default() -> Self {
        Self {
            now: 0,
            events: Vec::new(),
            prevent: Vec::new(),
            attributes: BTreeMap::new(),
            published: Vec::new(),
            listening: Vec::new(),
            attach_calls: 0,
            detach_calls: 0,
            document: Vec::new(),
            selectors: BTreeMap::new(),
            overlay_ms: 400,
        }
    }
}

impl FakeHost {
    pub(crate) fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub(crate) fn event_names(&self) -> Vec<&'static str> {
        self.events.iter().map(|e| e.name()).collect()
    }

    /// States carried by `playbackstatechange` events, in order.
    pub(crate) fn state_changes(&self) -> Vec<&'static str> {
        self.events
            .iter()
            .filter_map(|e| match e {
                PlayerEvent::PlaybackStateChange(s) => Some(s.as_str()),
                _ => None,
            })
            .collect()
    }

    pub(crate) fn has_document_listener(&self, listener: DocumentListener) -> bool {
        self.document.contains(&listener)
    }
}

impl Host for FakeHost {
    type Target = &'static str;

    fn now(&self) -> u64 {
        self.now
    }

    fn host_target(&self) -> &'static str {
        PLAYER
    }

    fn query_targets(&mut self, selector: &str) -> Vec<&'static str> {
        self.selectors.get(selector).cloned().unwrap_or_default()
    }

    fn attach_target_listeners(&mut self, target: &&'static str) {
        assert!(
            !self.listening.contains(target),
            "listeners attached twice to {target}"
        );
        self.attach_calls += 1;
        self.listening.push(*target);
    }

    fn detach_target_listeners(&mut self, target: &&'static str) {
        assert!(
            self.listening.contains(target),
            "detaching listeners that were never attached to {target}"
        );
        self.detach_calls += 1;
        self.listening.retain(|t| t != target);
    }

    fn set_document_listener(&mut self, listener: DocumentListener, active: bool) {
        if active {
            assert!(
                !self.document.contains(&listener),
                "{listener:?} installed twice"
            );
            self.document.push(listener);
        } else {
            self.document.retain(|l| *l != listener);
        }
    }

    fn dispatch(&mut self, event: &PlayerEvent) -> DefaultAction {
        self.events.push(*event);
        if event.is_cancelable() && self.prevent.contains(&event.name()) {
            DefaultAction::Prevented
        } else {
            DefaultAction::Run
        }
    }

    fn publish(&mut self, change: Published) {
        match &change {
            Published::PlaybackState(state) => {
                self.attributes
                    .insert("data-playback-state".into(), state.as_str().into());
            }
            Published::IsHovering(true) => {
                self.attributes
                    .insert(IS_HOVERING_ATTRIBUTE.into(), String::new());
            }
            Published::IsHovering(false) => {
                self.attributes.remove(IS_HOVERING_ATTRIBUTE);
            }
            Published::Reflect {
                attribute,
                value: Some(value),
            } => {
                self.attributes
                    .insert(attribute.name().into(), value.clone());
            }
            Published::Reflect {
                attribute,
                value: None,
            } => {
                self.attributes.remove(attribute.name());
            }
        }
        self.published.push(change);
    }

    fn overlay_transition_ms(&self) -> u64 {
        self.overlay_ms
    }
}

#[derive(Debug, Default)]
pub(crate) struct FakeMedia {
    pub(crate) plays: Vec<PlayAttempt>,
    pub(crate) pauses: usize,
    pub(crate) loads: usize,
    pub(crate) time: f64,
    pub(crate) muted: bool,
    pub(crate) preload: Option<Preload>,
    pub(crate) src: Option<String>,
    pub(crate) sources: Vec<&'static str>,
}

impl FakeMedia {
    pub(crate) fn with_sources(sources: &[&'static str]) -> Self {
        Self {
            sources: sources.to_vec(),
            ..Self::default()
        }
    }

    pub(crate) fn last_play(&self) -> PlayAttempt {
        *self.plays.last().expect("play() was never called")
    }
}

impl MediaElement for FakeMedia {
    type Source = &'static str;

    fn play(&mut self, attempt: PlayAttempt) {
        self.plays.push(attempt);
    }

    fn pause(&mut self) {
        self.pauses += 1;
    }

    fn load(&mut self) {
        self.loads += 1;
    }

    fn current_time(&self) -> f64 {
        self.time
    }

    fn set_current_time(&mut self, seconds: f64) {
        self.time = seconds;
    }

    fn muted(&self) -> bool {
        self.muted
    }

    fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn ready_state(&self) -> ReadyState {
        if self.src.is_some() || !self.sources.is_empty() {
            ReadyState::HaveEnoughData
        } else {
            ReadyState::HaveNothing
        }
    }

    fn preload(&self) -> Option<Preload> {
        self.preload
    }

    fn set_preload(&mut self, preload: Preload) {
        self.preload = Some(preload);
    }

    fn take_src(&mut self) -> Option<String> {
        self.src.take()
    }

    fn set_src(&mut self, src: String) {
        self.src = Some(src);
    }

    fn take_sources(&mut self) -> Vec<&'static str> {
        std::mem::take(&mut self.sources)
    }

    fn append_source(&mut self, source: &'static str) {
        self.sources.push(source);
    }
}

/// A mounted player with a media element attached.
pub(crate) fn mounted(config: PlayerConfig) -> Player {
    mounted_with(FakeHost::default(), config)
}

pub(crate) fn mounted_with(host: FakeHost, config: PlayerConfig) -> Player {
    let mut player = HoverVideoPlayer::new(host, config);
    player.replace_media(Some(FakeMedia::with_sources(&["clip.webm", "clip.mp4"])));
    player.start();
    player
}

pub(crate) fn media(player: &Player) -> &FakeMedia {
    player.media().expect("media attached")
}

/// Advance the fake clock and run whatever timers became due.
pub(crate) fn advance(player: &mut Player, ms: u64) {
    player.host_mut().now += ms;
    player.poll_timers();
}

/// Resolve the most recent `play()` call.
pub(crate) fn resolve_play(player: &mut Player) {
    let attempt = media(player).last_play();
    player.play_settled(attempt, Ok(()));
}

/// Reject the most recent `play()` call.
pub(crate) fn reject_play(player: &mut Player, err: PlayError) {
    let attempt = media(player).last_play();
    player.play_settled(attempt, Err(err));
}

/// Hover and let playback start.
pub(crate) fn play_through_hover(player: &mut Player) {
    player.hover();
    resolve_play(player);
}
