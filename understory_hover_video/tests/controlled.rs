// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Controlled mode: only `hover()`/`blur()` drive playback.

mod common;

use common::{PLAYER, mounted, resolve_play};
use understory_hover_video::hover::HoverInput;
use understory_hover_video::{DocumentListener, PlaybackState, PlayerConfig};

#[test]
fn native_input_is_ignored() {
    let mut player = mounted(PlayerConfig::default().with_controlled(true));
    assert!(player.host().listening.is_empty());

    player.handle_target_input(&PLAYER, HoverInput::PointerEnter);
    player.handle_target_input(&PLAYER, HoverInput::Focus);
    assert_eq!(player.playback_state(), PlaybackState::Paused);
    assert!(player.host().events.is_empty());
}

#[test]
fn programmatic_hover_still_works() {
    let mut player = mounted(PlayerConfig::default().with_controlled(true));
    player.hover();
    assert_eq!(player.playback_state(), PlaybackState::Loading);
    resolve_play(&mut player);
    assert_eq!(player.playback_state(), PlaybackState::Playing);

    player.handle_target_input(&PLAYER, HoverInput::PointerLeave);
    player.handle_document_touch(|_| false);
    assert_eq!(player.playback_state(), PlaybackState::Playing);

    player.blur();
    assert_eq!(player.playback_state(), PlaybackState::Paused);
}

#[test]
fn toggling_controlled_moves_listeners() {
    let mut player = mounted(PlayerConfig::default());
    assert_eq!(player.host().listening, [PLAYER]);

    player.attribute_changed("controlled", Some(""));
    assert!(player.config().controlled);
    assert!(player.host().listening.is_empty());
    // The document listener is shared with touch handling and stays put.
    assert!(
        player
            .host()
            .has_document_listener(DocumentListener::TouchStart)
    );

    player.attribute_changed("controlled", Some("false"));
    assert!(!player.config().controlled);
    assert_eq!(player.host().listening, [PLAYER]);
}

#[test]
fn entering_controlled_mode_keeps_hover_state() {
    let mut player = mounted(PlayerConfig::default());
    player.handle_target_input(&PLAYER, HoverInput::PointerEnter);
    player.set_controlled(true);
    assert!(player.is_hovering());
    assert_eq!(player.playback_state(), PlaybackState::Loading);

    player.blur();
    assert!(!player.is_hovering());
}

#[test]
fn controlled_property_reflects() {
    let mut player = mounted(PlayerConfig::default());
    player.set_controlled(true);
    assert_eq!(player.host().attribute("controlled"), Some(""));
    // Echoing the reflection back is a no-op.
    player.attribute_changed("controlled", Some(""));
    assert_eq!(player.host().detach_calls, 1);

    player.set_controlled(false);
    assert_eq!(player.host().attribute("controlled"), None);
    assert_eq!(player.host().listening, [PLAYER]);
}
